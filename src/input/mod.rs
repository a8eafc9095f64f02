pub mod source;
pub mod sqlite;

use std::path::{Path, PathBuf};

use thiserror::Error;

pub use source::{BytesSource, DatasetSource, FileSource, RetrievalError};

/// File name of the bundled dataset artifact.
pub const DATASET_FILE_NAME: &str = "Democracy_Data.db";

/// Failure to produce a dataset. Carries strings only so one failed attempt
/// can be handed to every caller that joined it.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum LoadError {
    #[error("failed to retrieve {0}")]
    Retrieval(#[from] RetrievalError),
    #[error("unsupported gzip input without feature enabled: {0}")]
    GzipNotEnabled(String),
    #[error("failed to decompress {resource}: {reason}")]
    Decompress { resource: String, reason: String },
    #[error("failed to read {resource} as a sqlite database: {reason}")]
    Parse { resource: String, reason: String },
    #[error("unexpected schema: table {table} is missing columns ({})", .columns.join(", "))]
    MissingColumns { table: String, columns: Vec<String> },
    #[error("query returned no results")]
    NoResults,
    #[error("dataset load task failed: {0}")]
    Task(String),
}

pub fn default_dataset_path() -> PathBuf {
    let relative = Path::new("data").join(DATASET_FILE_NAME);
    if relative.is_file() {
        return relative;
    }

    let manifest = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("data")
        .join(DATASET_FILE_NAME);
    if manifest.is_file() {
        return manifest;
    }

    if let Ok(exe) = std::env::current_exe()
        && let Some(dir) = exe.parent()
    {
        let sibling = dir.join("data").join(DATASET_FILE_NAME);
        if sibling.is_file() {
            return sibling;
        }
        let parent = dir.join("..").join("data").join(DATASET_FILE_NAME);
        if parent.is_file() {
            return parent;
        }
    }

    relative
}
