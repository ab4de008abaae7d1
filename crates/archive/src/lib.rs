//! Mapping-file archiving.
//!
//! Compresses one obfuscation mapping file into a single-entry zip
//! archive, skipping the work when an up-to-date archive already exists.

mod pack;

pub use pack::{ArchiveFile, archive_mapping_file};

/// Deflate compression level for mapping archives: maximum (9).
pub const MAX_COMPRESSION: i32 = 9;

/// Errors produced by the archive crate.
#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    #[error("cannot read mapping file {path}: {source}")]
    Source { path: String, source: std::io::Error },

    #[error("cannot write archive {path}: {source}")]
    Destination { path: String, source: std::io::Error },

    #[error("invalid mapping path: {0}")]
    InvalidPath(String),

    #[error("zip encoding failed: {0}")]
    Encoder(#[from] zip::result::ZipError),
}
