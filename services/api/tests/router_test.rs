use assistant_api::{config::Config, router::create_router, state::AppState};
use assistant_core::interpreter::Clock;
use axum::{
    Json, Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode},
    routing::get,
};
use chrono::{DateTime, Local, TimeZone};
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

struct FixedClock;

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 1, 15, 10, 30, 5).unwrap()
    }
}

fn app() -> Router {
    let state = AppState::with_clock(Config::default(), Arc::new(FixedClock));
    create_router(Arc::new(state))
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn get_req(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn json_req(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn empty_req(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Serves a few fixed responses on an ephemeral local port.
async fn spawn_upstream() -> String {
    let upstream = Router::new()
        .route("/posts", get(|| async { Json(json!({"id": 1, "title": "hello"})) }))
        .route(
            "/missing",
            get(|| async { (StatusCode::NOT_FOUND, Json(json!({"error": "missing"}))) }),
        )
        .route("/text", get(|| async { "plain text" }));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, upstream).await.unwrap();
    });
    format!("http://{}", addr)
}

#[tokio::test]
async fn test_interpret_records_voice_history() {
    let app = app();

    let (status, body) = send(
        &app,
        json_req("POST", "/voice/interpret", json!({"text": "what time is it"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["intent"], "time");
    assert_eq!(body["response"], "The current time is 10:30:05");

    let (_, body) = send(
        &app,
        json_req("POST", "/voice/interpret", json!({"text": "HELLO"})),
    )
    .await;
    assert_eq!(body["intent"], "greeting");
    assert_eq!(body["response"], "Hello! How can I assist you today?");

    let (status, history) = send(&app, get_req("/voice/history")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(history, json!(["what time is it", "HELLO"]));
}

#[tokio::test]
async fn test_voice_history_keeps_last_five() {
    let app = app();
    for i in 0..7 {
        send(
            &app,
            json_req("POST", "/voice/interpret", json!({"text": format!("command {i}")})),
        )
        .await;
    }

    let (_, history) = send(&app, get_req("/voice/history")).await;
    assert_eq!(
        history,
        json!(["command 2", "command 3", "command 4", "command 5", "command 6"])
    );
}

#[tokio::test]
async fn test_docs_routes() {
    let app = app();

    let (status, sections) = send(&app, get_req("/docs")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(sections.as_array().unwrap().len(), 5);
    assert_eq!(sections[0]["slug"], "overview");

    let (status, section) = send(&app, get_req("/docs/voice")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(section["title"], "Voice Recognition Guide");
    assert!(!section["content"].as_str().unwrap().is_empty());

    let (status, error) = send(&app, get_req("/docs/unknown")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error["message"], "Documentation section 'unknown' not found");
}

#[tokio::test]
async fn test_module_lifecycle() {
    let app = app();

    let (_, modules) = send(&app, get_req("/modules")).await;
    assert_eq!(modules.as_array().unwrap().len(), 4);
    assert_eq!(modules[0]["name"], "Voice Recognition");
    assert_eq!(modules[0]["status"], "active");

    let (status, module) = send(
        &app,
        json_req("POST", "/modules", json!({"name": "Cloud Sync"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(module["id"], 5);
    assert_eq!(module["version"], "2.0.5");
    assert_eq!(module["status"], "active");

    let (status, _) = send(
        &app,
        json_req("POST", "/modules", json!({"name": "Cloud Sync"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = send(
        &app,
        json_req("POST", "/modules", json!({"name": "Teleportation"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, module) = send(&app, empty_req("PATCH", "/modules/1/toggle")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(module["status"], "inactive");

    let (_, module) = send(&app, empty_req("POST", "/modules/2/update")).await;
    assert_eq!(module["name"], "Text-to-Speech");
    assert_eq!(module["version"], "1.9.0");

    let (status, _) = send(&app, empty_req("DELETE", "/modules/3")).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, error) = send(&app, empty_req("DELETE", "/modules/3")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error["message"], "Module with id '3' not found");

    let (_, modules) = send(&app, get_req("/modules")).await;
    let names: Vec<&str> = modules
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["name"].as_str().unwrap())
        .collect();
    assert_eq!(
        names,
        vec!["Voice Recognition", "Text-to-Speech", "API Gateway", "Cloud Sync"]
    );
}

#[tokio::test]
async fn test_catalog_search_flags_installed_modules() {
    let app = app();
    send(
        &app,
        json_req("POST", "/modules", json!({"name": "Security Module"})),
    )
    .await;

    let (status, listings) = send(&app, get_req("/modules/catalog?search=SEC")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listings.as_array().unwrap().len(), 1);
    assert_eq!(listings[0]["name"], "Security Module");
    assert_eq!(listings[0]["installed"], true);

    let (_, listings) = send(&app, get_req("/modules/catalog")).await;
    assert_eq!(listings.as_array().unwrap().len(), 6);
}

#[tokio::test]
async fn test_screen_controls() {
    let app = app();

    let (_, screen) = send(&app, get_req("/screen")).await;
    assert_eq!(screen["brightness"], 100);
    assert_eq!(screen["fullscreen"], false);

    let (_, screen) = send(
        &app,
        json_req("POST", "/screen/brightness", json!({"value": 5})),
    )
    .await;
    assert_eq!(screen["brightness"], 20);

    let (_, screen) = send(&app, empty_req("POST", "/screen/fullscreen")).await;
    assert_eq!(screen["fullscreen"], true);

    let (_, screen) = send(&app, empty_req("POST", "/screen/lock")).await;
    assert_eq!(screen["locked"], true);

    let (_, screen) = send(&app, empty_req("POST", "/screen/optimize")).await;
    assert_eq!(screen["brightness"], 100);
    assert_eq!(
        screen["actions"],
        json!([
            "10:30:05: Brightness adjusted to 20%",
            "10:30:05: Entered fullscreen mode",
            "10:30:05: Screen locked",
            "10:30:05: Brightness adjusted to 100%",
            "10:30:05: Performance mode activated",
        ])
    );
}

#[tokio::test]
async fn test_metrics_start_at_zero_uptime() {
    let app = app();
    let (status, report) = send(&app, get_req("/metrics")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["uptime"], "0h 0m 0s");
    assert_eq!(report["readings"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn test_probe_rejects_invalid_requests() {
    let app = app();

    let (status, error) = send(
        &app,
        json_req("POST", "/probe", json!({"method": "GET", "endpoint": "  "})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["message"], "Please enter an API endpoint");

    let (status, _) = send(
        &app,
        json_req(
            "POST",
            "/probe",
            json!({"method": "BREW", "endpoint": "http://127.0.0.1:1"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, history) = send(&app, get_req("/probe/history")).await;
    assert_eq!(history, json!([]));
}

#[tokio::test]
async fn test_probe_records_outcomes() {
    let upstream = spawn_upstream().await;
    let app = app();

    let (status, outcome) = send(
        &app,
        json_req(
            "POST",
            "/probe",
            json!({"method": "get", "endpoint": format!("{upstream}/posts"), "api_key": "secret"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(outcome["status"], 200);
    assert_eq!(outcome["success"], true);
    let body: Value = serde_json::from_str(outcome["body"].as_str().unwrap()).unwrap();
    assert_eq!(body["title"], "hello");

    let (_, outcome) = send(
        &app,
        json_req(
            "POST",
            "/probe",
            json!({"method": "GET", "endpoint": format!("{upstream}/missing")}),
        ),
    )
    .await;
    assert_eq!(outcome["status"], 404);
    assert_eq!(outcome["success"], false);

    let (_, outcome) = send(
        &app,
        json_req(
            "POST",
            "/probe",
            json!({"method": "GET", "endpoint": format!("{upstream}/text")}),
        ),
    )
    .await;
    assert_eq!(outcome["status"], Value::Null);
    assert_eq!(outcome["success"], false);
    assert!(outcome["body"].as_str().unwrap().starts_with("Error: "));

    let (_, history) = send(&app, get_req("/probe/history")).await;
    let history = history.as_array().unwrap();
    assert_eq!(history.len(), 3);
    assert_eq!(history[0]["method"], "GET");
    assert_eq!(history[0]["status"], "200");
    assert_eq!(history[0]["timestamp"], "10:30:05");
    assert!(history[0]["duration"].as_str().unwrap().ends_with("ms"));
    assert_eq!(history[1]["status"], "404");
    assert_eq!(history[2]["status"], "Error");
    assert_eq!(history[2]["duration"], "N/A");
}

#[tokio::test]
async fn test_quick_endpoints_and_openapi() {
    let app = app();

    let (status, presets) = send(&app, get_req("/probe/endpoints")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(presets.as_array().unwrap().len(), 4);
    assert_eq!(presets[3]["name"], "JSONPlaceholder");

    let (status, doc) = send(&app, get_req("/api-docs/openapi.json")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(doc["paths"]["/voice/interpret"].is_object());
}
