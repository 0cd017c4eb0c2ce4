//! JSON snapshot output for one-off `fetch` runs.
//!
//! # Output Structure
//!
//! ```text
//! json_output_dir/
//! └── 2025-05-06/
//!     └── digest.json
//! ```
//!
//! A later run on the same day replaces that day's snapshot.

use crate::errors::OutputError;
use crate::models::Digest;
use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{error, info, instrument};

/// Write a [`Digest`] to a JSON file with a date-based directory structure.
///
/// Creates the dated directory when missing and writes the digest as
/// pretty-printed JSON, replacing any snapshot already written that day.
///
/// # Arguments
///
/// * `digest` - Items and per-source failures to serialize
/// * `json_output_dir` - Base directory for JSON output
/// * `date` - Day the snapshot belongs to; names the subdirectory
///
/// # Returns
///
/// The path written, or an [`OutputError`] if serialization, directory
/// creation or the file write fails.
///
/// # Output Path
///
/// `{json_output_dir}/{date}/digest.json`
#[instrument(level = "info", skip_all, fields(json_output_dir = %json_output_dir))]
pub async fn write_digest(
    digest: &Digest,
    json_output_dir: &str,
    date: NaiveDate,
) -> Result<PathBuf, OutputError> {
    let json = serde_json::to_string_pretty(digest)?;

    let full_json_dir = Path::new(json_output_dir).join(date.to_string());
    info!(dir = %full_json_dir.display(), "Ensuring JSON directory exists");
    if let Err(e) = fs::create_dir_all(&full_json_dir).await {
        error!(dir = %full_json_dir.display(), error = %e, "Failed to create JSON dir");
        return Err(e.into());
    }

    let path = full_json_dir.join("digest.json");
    fs::write(&path, json).await?;
    info!(path = %path.display(), items = digest.items.len(), "Wrote digest JSON");
    Ok(path)
}
