//! Mapping-archive upload client.
//!
//! Sends compressed mapping archives to the ingestion endpoint as
//! multipart form-data. Failures are reported and logged, never raised:
//! a failed upload must not break the build that produced the mapping.

pub mod client;
pub mod types;

pub use client::{UploadError, Uploader};
pub use types::UploadOutcome;

use std::time::Duration;

/// Production ingestion endpoint for obfuscation mapping archives.
pub const DEFAULT_ENDPOINT: &str = "https://api.rollbar.com/api/1/proguard";

/// Connect, read, and overall request deadline for one upload attempt.
pub const UPLOAD_TIMEOUT: Duration = Duration::from_secs(60);
