//! Ingestion API client.
//!
//! One multipart POST per archive, single attempt, 60 s deadlines.

use std::path::Path;

use reqwest::multipart::{Form, Part};
use tokio_util::io::ReaderStream;
use tracing::{info, warn};

use crate::types::{ApiErrorBody, UploadOutcome};
use crate::{DEFAULT_ENDPOINT, UPLOAD_TIMEOUT};

/// Errors from the upload client.
///
/// These never escape [`Uploader::upload`]; that boundary folds them
/// into [`UploadOutcome::Failed`].
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid archive path: {0}")]
    InvalidPath(String),
}

/// Ingestion API upload client.
pub struct Uploader {
    http: reqwest::Client,
    endpoint: String,
}

impl Uploader {
    /// Creates a client targeting the production endpoint, with 60 s
    /// connect, read, and request deadlines.
    pub fn new() -> Result<Self, UploadError> {
        let http = reqwest::Client::builder()
            .connect_timeout(UPLOAD_TIMEOUT)
            .read_timeout(UPLOAD_TIMEOUT)
            .timeout(UPLOAD_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            endpoint: DEFAULT_ENDPOINT.to_string(),
        })
    }

    /// Sets a custom ingestion endpoint.
    pub fn with_endpoint(mut self, url: impl Into<String>) -> Self {
        self.endpoint = url.into();
        self
    }

    /// Uploads a mapping archive tagged with `app_version`.
    ///
    /// Never returns an error: a missing or blank `access_token` skips
    /// the upload without any network traffic, and every transport or
    /// server failure is logged and reported through the returned
    /// [`UploadOutcome`].
    pub async fn upload(
        &self,
        archive: &Path,
        app_version: &str,
        access_token: Option<&str>,
    ) -> UploadOutcome {
        let token = match access_token {
            Some(t) if !t.trim().is_empty() => t,
            _ => {
                info!("access token not provided, skipping mapping upload");
                return UploadOutcome::Skipped;
            }
        };

        info!(
            archive = %archive.display(),
            version = app_version,
            "uploading mapping archive"
        );

        match self.try_upload(archive, app_version, token).await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(
                    archive = %archive.display(),
                    version = app_version,
                    error = %e,
                    "upload failed"
                );
                UploadOutcome::Failed {
                    status: None,
                    detail: e.to_string(),
                }
            }
        }
    }

    /// Builds and sends the multipart request, classifying the response.
    async fn try_upload(
        &self,
        archive: &Path,
        app_version: &str,
        token: &str,
    ) -> Result<UploadOutcome, UploadError> {
        let file_name = archive
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| UploadError::InvalidPath(archive.to_string_lossy().into_owned()))?;

        let file = tokio::fs::File::open(archive).await?;
        let length = file.metadata().await?.len();

        // Stream the archive from disk. The declared length keeps the
        // request sized rather than chunked.
        let body = reqwest::Body::wrap_stream(ReaderStream::new(file));
        let part = Part::stream_with_length(body, length)
            .file_name(file_name.clone())
            .mime_str("application/zip")?;

        // The ingestion API expects the credential and version fields
        // ahead of the file part.
        let form = Form::new()
            .text("access_token", token.to_string())
            .text("version", app_version.to_string())
            .part("mapping", part);

        let resp = self.http.post(&self.endpoint).multipart(form).send().await?;
        let status = resp.status();

        if status.is_success() {
            info!(
                archive = %file_name,
                status = status.as_u16(),
                "mapping archive uploaded successfully"
            );
            return Ok(UploadOutcome::Uploaded {
                status: status.as_u16(),
            });
        }

        let detail = error_detail(&resp.text().await.unwrap_or_default());
        warn!(
            archive = %file_name,
            version = app_version,
            status = status.as_u16(),
            detail = %detail,
            "failed to upload mapping archive"
        );
        Ok(UploadOutcome::Failed {
            status: Some(status.as_u16()),
            detail,
        })
    }
}

/// Extracts a readable message from an ingestion API error body.
///
/// Rejections arrive as `{"err": 1, "message": "..."}`; other bodies
/// pass through trimmed, and a blank body gets a placeholder.
fn error_detail(body: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<ApiErrorBody>(body) {
        if let Some(message) = parsed.message {
            if !message.is_empty() {
                return message;
            }
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        "no error message".to_string()
    } else {
        trimmed.to_string()
    }
}
