//! API Models
//!
//! Request payloads and response bodies specific to the HTTP surface. Domain
//! types from `assistant-core` are serialized as-is; these wrappers exist for
//! input validation and OpenAPI documentation with `utoipa`.

use assistant_core::{
    interpreter::Intent,
    probe::{HttpMethod, ProbeError, ProbeRequest},
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Deserialize, ToSchema)]
pub struct InterpretPayload {
    #[schema(example = "what time is it")]
    pub text: String,
}

#[derive(Serialize, Deserialize, ToSchema, Debug)]
pub struct InterpretResponse {
    #[schema(value_type = String, example = "time")]
    pub intent: Intent,
    #[schema(example = "The current time is 10:30:05")]
    pub response: String,
}

#[derive(Deserialize, ToSchema)]
pub struct InstallModulePayload {
    #[schema(example = "Cloud Sync")]
    pub name: String,
}

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CatalogQuery {
    /// Case-insensitive substring of the module name.
    #[serde(default)]
    pub search: String,
}

#[derive(Deserialize, ToSchema)]
pub struct BrightnessPayload {
    #[schema(example = 75)]
    pub value: i64,
}

#[derive(Deserialize, ToSchema)]
pub struct ProbePayload {
    #[schema(example = "GET")]
    pub method: String,
    #[schema(example = "https://jsonplaceholder.typicode.com/posts")]
    pub endpoint: String,
    pub api_key: Option<String>,
    /// Raw JSON text sent for every method except GET.
    pub body: Option<String>,
}

impl TryFrom<ProbePayload> for ProbeRequest {
    type Error = ProbeError;

    fn try_from(payload: ProbePayload) -> Result<Self, Self::Error> {
        Ok(ProbeRequest {
            method: payload.method.parse::<HttpMethod>()?,
            endpoint: payload.endpoint,
            api_key: payload.api_key,
            body: payload.body,
        })
    }
}

#[derive(Serialize, ToSchema)]
pub struct DocSummary {
    pub slug: String,
    pub title: String,
}

#[derive(Serialize, Deserialize, ToSchema, Debug)]
pub struct ErrorResponse {
    pub message: String,
}
