//! HTTP Probe
//!
//! A small request tester for arbitrary REST endpoints: pick a method, an URL,
//! an optional bearer key and an optional JSON body, and get back the status,
//! the elapsed time and the pretty-printed JSON response. Any failure along the
//! way (transport, non-JSON body) collapses into a single failed outcome.
//!
//! Requests carry no timeout and are never retried.

use crate::interpreter::{Clock, format_time};
use reqwest::header::CONTENT_TYPE;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr, time::Instant};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProbeError {
    #[error("Please enter an API endpoint")]
    MissingEndpoint,
    #[error("Unsupported HTTP method: {0}")]
    InvalidMethod(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

impl HttpMethod {
    pub const ALL: [HttpMethod; 5] = [
        HttpMethod::Get,
        HttpMethod::Post,
        HttpMethod::Put,
        HttpMethod::Delete,
        HttpMethod::Patch,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = ProbeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HttpMethod::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ProbeError::InvalidMethod(s.to_string()))
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
            HttpMethod::Patch => reqwest::Method::PATCH,
        }
    }
}

/// A named preset endpoint offered for quick selection.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct QuickEndpoint {
    pub name: &'static str,
    pub url: &'static str,
}

pub static QUICK_ENDPOINTS: &[QuickEndpoint] = &[
    QuickEndpoint {
        name: "Weather API",
        url: "https://api.openweathermap.org/data/2.5/weather",
    },
    QuickEndpoint {
        name: "News API",
        url: "https://newsapi.org/v2/top-headlines",
    },
    QuickEndpoint {
        name: "GitHub API",
        url: "https://api.github.com/users/",
    },
    QuickEndpoint {
        name: "JSONPlaceholder",
        url: "https://jsonplaceholder.typicode.com/posts",
    },
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeRequest {
    pub method: HttpMethod,
    pub endpoint: String,
    #[serde(default)]
    pub api_key: Option<String>,
    /// Raw JSON text; ignored for `GET`.
    #[serde(default)]
    pub body: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProbeOutcome {
    /// `None` when no HTTP response could be read.
    pub status: Option<u16>,
    pub elapsed_ms: u64,
    /// Pretty JSON on success, `"Error: ..."` otherwise.
    pub body: String,
    pub success: bool,
}

/// One row of the call history.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiCallRecord {
    pub timestamp: String,
    pub method: HttpMethod,
    pub endpoint: String,
    pub status: String,
    pub duration: String,
    pub success: bool,
}

impl ApiCallRecord {
    pub fn new(request: &ProbeRequest, outcome: &ProbeOutcome, clock: &dyn Clock) -> Self {
        let (status, duration) = match outcome.status {
            Some(code) => (code.to_string(), format!("{}ms", outcome.elapsed_ms)),
            None => ("Error".to_string(), "N/A".to_string()),
        };
        Self {
            timestamp: format_time(&clock.now()),
            method: request.method,
            endpoint: request.endpoint.clone(),
            status,
            duration,
            success: outcome.success,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct HttpProbe {
    client: reqwest::Client,
}

impl HttpProbe {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Sends the request. Only a missing endpoint is an error; every other
    /// failure is reported inside the outcome.
    pub async fn execute(&self, request: &ProbeRequest) -> Result<ProbeOutcome, ProbeError> {
        let endpoint = request.endpoint.trim();
        if endpoint.is_empty() {
            return Err(ProbeError::MissingEndpoint);
        }

        let started = Instant::now();
        let result = self.dispatch(request, endpoint).await;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        let outcome = match result {
            Ok((status, body)) => {
                info!(method = %request.method, endpoint, status = status.as_u16(), elapsed_ms, "Probe completed");
                ProbeOutcome {
                    status: Some(status.as_u16()),
                    elapsed_ms,
                    body,
                    success: status.is_success(),
                }
            }
            Err(e) => {
                warn!(method = %request.method, endpoint, error = %e, "Probe failed");
                ProbeOutcome {
                    status: None,
                    elapsed_ms,
                    body: format!("Error: {e}"),
                    success: false,
                }
            }
        };
        Ok(outcome)
    }

    async fn dispatch(
        &self,
        request: &ProbeRequest,
        endpoint: &str,
    ) -> anyhow::Result<(reqwest::StatusCode, String)> {
        let mut builder = self
            .client
            .request(request.method.into(), endpoint)
            .header(CONTENT_TYPE, "application/json");

        if let Some(key) = request.api_key.as_deref().filter(|k| !k.is_empty()) {
            builder = builder.bearer_auth(key);
        }
        if request.method != HttpMethod::Get {
            if let Some(body) = request.body.as_deref().filter(|b| !b.is_empty()) {
                builder = builder.body(body.to_string());
            }
        }

        let response = builder.send().await?;
        let status = response.status();
        let data: serde_json::Value = response.json().await?;
        Ok((status, serde_json::to_string_pretty(&data)?))
    }
}
