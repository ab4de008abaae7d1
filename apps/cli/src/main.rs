//! Mapping pipeline entry point: compress, then upload.

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use mapship_archive::archive_mapping_file;
use mapship_upload::Uploader;

/// Compresses an obfuscation mapping file into a zip archive and
/// uploads it to the ingestion endpoint.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Mapping file produced by the build.
    #[arg(long)]
    mapping_file: PathBuf,

    /// Destination path for the zip archive.
    #[arg(long)]
    archive: PathBuf,

    /// Application version label attached to the upload.
    #[arg(long)]
    app_version: String,

    /// Ingestion API access token. Absent or blank skips the upload.
    #[arg(long, env = "MAPSHIP_ACCESS_TOKEN")]
    access_token: Option<String>,

    /// Ingestion endpoint URL.
    #[arg(long, default_value = mapship_upload::DEFAULT_ENDPOINT)]
    endpoint: String,
}

fn main() -> anyhow::Result<()> {
    // Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "starting mapping upload pipeline"
    );

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(run(args))?;

    tracing::info!("mapping pipeline finished");
    Ok(())
}

/// Archives the mapping file, then uploads it.
///
/// Archiving errors abort the run; upload failures are logged by the
/// client and never abort.
async fn run(args: Args) -> anyhow::Result<()> {
    let Args {
        mapping_file,
        archive,
        app_version,
        access_token,
        endpoint,
    } = args;

    let archived =
        tokio::task::spawn_blocking(move || archive_mapping_file(&mapping_file, &archive))
            .await??;

    let uploader = match Uploader::new() {
        Ok(u) => u.with_endpoint(endpoint),
        Err(e) => {
            tracing::warn!(error = %e, "upload client unavailable, skipping upload");
            return Ok(());
        }
    };

    // The outcome is logged by the client; a failed upload must not
    // fail the build that produced the mapping.
    uploader
        .upload(&archived.path, &app_version, access_token.as_deref())
        .await;

    Ok(())
}
