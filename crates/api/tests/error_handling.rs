//! Tests for `AppError` → HTTP response mapping.
//!
//! These tests call `IntoResponse` directly on `AppError` values; no server
//! is involved.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use http_body_util::BodyExt;
use scanlab_api::error::AppError;
use scanlab_core::error::CoreError;
use scanlab_core::scan::Stage;

/// Helper: convert an `AppError` into its status code and parsed JSON body.
async fn error_to_response(err: AppError) -> (StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

#[tokio::test]
async fn invalid_input_returns_400_validation_error() {
    let err = AppError::Core(CoreError::InvalidInput("At least one file is required".into()));
    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["error"], "At least one file is required");
}

#[tokio::test]
async fn missing_parameter_returns_400() {
    let (status, json) = error_to_response(CoreError::MissingParameter("job_id").into()).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "MISSING_PARAMETER");
    assert_eq!(json["error"], "job_id parameter is required");
}

#[tokio::test]
async fn not_found_returns_404() {
    let err = CoreError::NotFound {
        entity: "Scan job",
        id: "scan-42".into(),
    };
    let (status, json) = error_to_response(err.into()).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], "Scan job with id scan-42 not found");
}

#[tokio::test]
async fn not_ready_returns_409_with_stage() {
    let err = CoreError::NotReady {
        id: "scan-7".into(),
        stage: Stage::Compressing,
    };
    let (status, json) = error_to_response(err.into()).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["code"], "NOT_READY");
    assert!(json["error"].as_str().unwrap().contains("compressing"));
}

#[tokio::test]
async fn processing_failed_returns_422() {
    let err = CoreError::ProcessingFailed("Unable to analyze scan data.".into());
    let (status, json) = error_to_response(err.into()).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["code"], "PROCESSING_FAILED");
}

#[tokio::test]
async fn internal_errors_are_sanitized() {
    let (status, json) =
        error_to_response(CoreError::Internal("store poisoned".into()).into()).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "INTERNAL_ERROR");
    assert_eq!(json["error"], "An internal error occurred");

    let (status, json) = error_to_response(AppError::InternalError("boom".into())).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"], "An internal error occurred");
}

#[tokio::test]
async fn bad_request_returns_400() {
    let (status, json) =
        error_to_response(AppError::BadRequest("malformed multipart".into())).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "BAD_REQUEST");
    assert_eq!(json["error"], "malformed multipart");
}
