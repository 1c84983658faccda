#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use scanlab_core::clock::ManualClock;
use scanlab_core::ids::SequenceIdProvider;
use tower::ServiceExt;

use scanlab_api::config::ServerConfig;
use scanlab_api::router::build_app_router;
use scanlab_api::service::JobService;
use scanlab_api::state::AppState;

/// Multipart boundary used by [`post_files`].
const BOUNDARY: &str = "scanlab-test-boundary";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3001".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 5,
        max_upload_bytes: 1024 * 1024,
    }
}

/// A job service on a manual clock, handing out `{prefix}-1`, `{prefix}-2`, ...
pub fn manual_service(prefix: &str) -> (Arc<ManualClock>, Arc<JobService>) {
    let clock = Arc::new(ManualClock::default());
    let service = JobService::new(clock.clone(), Arc::new(SequenceIdProvider::new(prefix)));
    (clock, Arc::new(service))
}

/// Build the full application router with all middleware layers around
/// `jobs`, exactly as `main.rs` does.
pub fn build_test_app(jobs: Arc<JobService>) -> Router {
    let config = test_config();
    let state = AppState {
        config: Arc::new(config.clone()),
        jobs,
    };
    build_app_router(state, &config)
}

/// Send a GET request.
pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// POST a multipart form with one `files` part per `(name, content)` pair.
pub async fn post_files(app: Router, uri: &str, files: &[(&str, &[u8])]) -> Response<Body> {
    let mut body = Vec::new();
    for (name, content) in files {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"files\"; \
                 filename=\"{name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(content);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Collect a response body as raw bytes.
pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

/// Submit one file through the router and return the new job id.
pub async fn submit_one(app: Router) -> String {
    let response = post_files(app, "/api/v1/scans", &[("brain_t1.dcm", b"DICM".as_slice())]).await;
    let json = body_json(response).await;
    json["data"]["job_id"].as_str().unwrap().to_string()
}
