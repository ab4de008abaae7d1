//! Zip packing of a single mapping file.

use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::info;
use zip::ZipWriter;
use zip::write::FileOptions;

use crate::{ArchiveError, MAX_COMPRESSION};

/// A produced (or reused) mapping archive.
#[derive(Debug, Clone)]
pub struct ArchiveFile {
    /// Location of the zip archive on disk.
    pub path: PathBuf,
    /// True when an up-to-date archive already existed and no
    /// compression was performed.
    pub reused: bool,
}

/// Compresses `source` into a single-entry deflate zip at `destination`.
///
/// The entry is named after the source file's base name and holds its
/// bytes verbatim. Parent directories of `destination` are created as
/// needed. If `destination` already exists and is strictly newer than
/// `source`, the existing archive is returned without re-encoding.
pub fn archive_mapping_file(
    source: &Path,
    destination: &Path,
) -> Result<ArchiveFile, ArchiveError> {
    let metadata = std::fs::metadata(source).map_err(|e| source_error(source, e))?;
    if !metadata.is_file() {
        return Err(ArchiveError::InvalidPath(
            source.to_string_lossy().into_owned(),
        ));
    }
    let source_modified = metadata.modified().map_err(|e| source_error(source, e))?;

    // An archive strictly newer than its source is still valid, so
    // repeat runs skip the compression entirely. Equal timestamps
    // re-encode: the source may have changed within mtime granularity.
    if let Ok(destination_modified) = std::fs::metadata(destination).and_then(|m| m.modified()) {
        if destination_modified > source_modified {
            info!(
                archive = %destination.display(),
                "archive up to date, skipping compression"
            );
            return Ok(ArchiveFile {
                path: destination.to_path_buf(),
                reused: true,
            });
        }
    }

    info!(
        source = %source.display(),
        archive = %destination.display(),
        "compressing mapping file"
    );

    let entry_name = source
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| ArchiveError::InvalidPath(source.to_string_lossy().into_owned()))?;

    // Open the source before touching the destination so an unreadable
    // mapping leaves any previous archive intact.
    let mut reader = std::fs::File::open(source).map_err(|e| source_error(source, e))?;

    if let Some(parent) = destination.parent() {
        std::fs::create_dir_all(parent).map_err(|e| destination_error(destination, e))?;
    }

    let file = std::fs::File::create(destination).map_err(|e| destination_error(destination, e))?;
    let mut writer = ZipWriter::new(std::io::BufWriter::new(file));

    let options = FileOptions::default()
        .compression_method(zip::CompressionMethod::Deflated)
        .compression_level(Some(MAX_COMPRESSION));
    writer.start_file(entry_name, options)?;
    // Mapping files run to hundreds of megabytes, so stream rather than
    // load the whole file.
    std::io::copy(&mut reader, &mut writer).map_err(|e| destination_error(destination, e))?;

    let mut inner = writer.finish()?;
    inner
        .flush()
        .map_err(|e| destination_error(destination, e))?;

    Ok(ArchiveFile {
        path: destination.to_path_buf(),
        reused: false,
    })
}

fn source_error(path: &Path, source: std::io::Error) -> ArchiveError {
    ArchiveError::Source {
        path: path.to_string_lossy().into_owned(),
        source,
    }
}

fn destination_error(path: &Path, source: std::io::Error) -> ArchiveError {
    ArchiveError::Destination {
        path: path.to_string_lossy().into_owned(),
        source,
    }
}
