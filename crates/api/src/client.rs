//! HTTP client for the scan API.
//!
//! Wraps the `/api/v1/scans` endpoints using [`reqwest`] and implements
//! [`StatusSource`] so a [`Poller`](scanlab_core::polling::Poller) can drive a
//! remote job exactly as it drives an in-process one.

use async_trait::async_trait;
use scanlab_core::polling::StatusSource;
use scanlab_core::scan::{ScanResult, StatusReport, SubmitReceipt};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::handlers::scans::FILES_FIELD;
use crate::response::DataResponse;

/// HTTP client for one scan API server.
#[derive(Debug, Clone)]
pub struct ScanApiClient {
    client: reqwest::Client,
    base_url: String,
}

/// A file to upload: name and raw bytes.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub name: String,
    pub content: Vec<u8>,
}

/// Errors from the scan API client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The HTTP request itself failed (network, DNS, TLS, decoding).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The server answered with a non-2xx status.
    #[error("Scan API error ({status} {code}): {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },
}

impl ClientError {
    /// Machine-readable error code, if the server supplied one.
    pub fn code(&self) -> Option<&str> {
        match self {
            ClientError::Api { code, .. } => Some(code),
            ClientError::Request(_) => None,
        }
    }
}

/// Error body produced by [`AppError`](crate::error::AppError).
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
    code: String,
}

impl ScanApiClient {
    /// Create a client for a server, e.g. `http://localhost:3000`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Upload `files` and start a scan job.
    pub async fn submit(&self, files: Vec<UploadFile>) -> Result<SubmitReceipt, ClientError> {
        let form = files
            .into_iter()
            .fold(reqwest::multipart::Form::new(), |form, file| {
                let part = reqwest::multipart::Part::bytes(file.content).file_name(file.name);
                form.part(FILES_FIELD, part)
            });

        let response = self
            .client
            .post(format!("{}/api/v1/scans", self.base_url))
            .multipart(form)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    pub async fn status(&self, job_id: &str) -> Result<StatusReport, ClientError> {
        let response = self
            .client
            .get(format!("{}/api/v1/scans/status", self.base_url))
            .query(&[("job_id", job_id)])
            .send()
            .await?;

        Self::parse_response(response).await
    }

    pub async fn results(&self, job_id: &str) -> Result<ScanResult, ClientError> {
        let response = self
            .client
            .get(format!("{}/api/v1/scans/results", self.base_url))
            .query(&[("job_id", job_id)])
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Unwrap the `{ "data": T }` envelope or convert an error body.
    async fn parse_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = response.status();
        if status.is_success() {
            let envelope: DataResponse<T> = response.json().await?;
            return Ok(envelope.data);
        }

        let text = response.text().await.unwrap_or_default();
        let (code, message) = match serde_json::from_str::<ErrorBody>(&text) {
            Ok(body) => (body.code, body.error),
            Err(_) => ("UNKNOWN".to_string(), text),
        };

        Err(ClientError::Api {
            status: status.as_u16(),
            code,
            message,
        })
    }
}

#[async_trait]
impl StatusSource for ScanApiClient {
    type Error = ClientError;

    async fn status(&self, job_id: &str) -> Result<StatusReport, ClientError> {
        ScanApiClient::status(self, job_id).await
    }

    async fn results(&self, job_id: &str) -> Result<ScanResult, ClientError> {
        ScanApiClient::results(self, job_id).await
    }
}
