use std::borrow::Cow;
use std::future::Future;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RetrievalError {
    #[error("{resource}: {reason}")]
    Io { resource: String, reason: String },
    #[error("{resource}: status {code} {reason}")]
    Status {
        resource: String,
        code: u16,
        reason: String,
    },
}

/// Where the raw dataset artifact comes from.
///
/// Implementations for remote stores map a non-success response to
/// [`RetrievalError::Status`].
pub trait DatasetSource: Send + Sync + 'static {
    /// Human-readable name used in diagnostics.
    fn resource(&self) -> String;

    fn retrieve(&self) -> impl Future<Output = Result<Vec<u8>, RetrievalError>> + Send;
}

#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DatasetSource for FileSource {
    fn resource(&self) -> String {
        self.path.to_string_lossy().to_string()
    }

    async fn retrieve(&self) -> Result<Vec<u8>, RetrievalError> {
        tokio::fs::read(&self.path)
            .await
            .map_err(|err| RetrievalError::Io {
                resource: self.resource(),
                reason: err.to_string(),
            })
    }
}

/// An artifact already in memory, typically `include_bytes!`.
#[derive(Debug, Clone)]
pub struct BytesSource {
    name: String,
    bytes: Cow<'static, [u8]>,
}

impl BytesSource {
    pub fn new(name: impl Into<String>, bytes: impl Into<Cow<'static, [u8]>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    pub fn embedded(name: impl Into<String>, bytes: &'static [u8]) -> Self {
        Self::new(name, Cow::Borrowed(bytes))
    }
}

impl DatasetSource for BytesSource {
    fn resource(&self) -> String {
        self.name.clone()
    }

    async fn retrieve(&self) -> Result<Vec<u8>, RetrievalError> {
        Ok(self.bytes.to_vec())
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/input/source.rs"]
mod tests;
