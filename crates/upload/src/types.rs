//! Upload outcome and ingestion API response types.

use serde::Deserialize;

/// Result of one upload attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    /// The endpoint accepted the archive.
    Uploaded { status: u16 },
    /// No credential was configured; nothing was sent.
    Skipped,
    /// The request was rejected or never completed. `status` is `None`
    /// when no HTTP response arrived at all.
    Failed {
        status: Option<u16>,
        detail: String,
    },
}

impl UploadOutcome {
    /// True when the archive was neither accepted nor skipped.
    pub fn is_failure(&self) -> bool {
        matches!(self, UploadOutcome::Failed { .. })
    }
}

/// Error envelope returned by the ingestion API on rejected uploads.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorBody {
    pub message: Option<String>,
}
