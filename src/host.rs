//! Host capabilities consumed by the tools.
//!
//! The host owns file storage. Tools only see a [`FileHandle`] and resolve it
//! through an injected [`FileStore`]. [`LocalFileStore`] is a directory-backed
//! implementation for embedding hosts and tests.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Coarse file category declared by the host when the file was stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    /// Audio recording.
    Audio,
    /// Video clip.
    Video,
    /// Still image.
    Image,
    /// Generic application data.
    Application,
    /// Office/text document.
    Document,
    /// Anything the host could not classify, including type names this
    /// crate does not know.
    #[serde(other)]
    Custom,
}

/// Opaque reference to a file stored by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileHandle {
    /// Host-side identifier used to fetch the bytes.
    pub id: String,
    /// Declared coarse type.
    #[serde(rename = "type")]
    pub file_type: FileType,
    /// MIME type recorded at upload time, if any.
    #[serde(default)]
    pub mime_type: Option<String>,
    /// Original file name, if any.
    #[serde(default)]
    pub filename: Option<String>,
}

impl FileHandle {
    /// Create a handle with no MIME type or file name.
    pub fn new(id: impl Into<String>, file_type: FileType) -> Self {
        Self {
            id: id.into(),
            file_type,
            mime_type: None,
            filename: None,
        }
    }

    /// Attach a MIME type.
    #[must_use]
    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }
}

/// Failure resolving a [`FileHandle`] through the host.
#[derive(Debug, Error)]
pub enum FileStoreError {
    /// No file is stored under the handle's id.
    #[error("file not found: {0}")]
    NotFound(String),
    /// The handle id is not acceptable to this store.
    #[error("invalid file id: {0}")]
    InvalidId(String),
    /// Underlying I/O failure.
    #[error("failed to read file: {0}")]
    Io(#[from] std::io::Error),
}

/// File capabilities the host provides to tools.
///
/// Implementations must be `Send + Sync`; tools share one store across
/// concurrent invocations.
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Fetch the raw bytes behind `file`.
    ///
    /// # Errors
    ///
    /// Returns [`FileStoreError`] if the file cannot be resolved or read.
    async fn download(&self, file: &FileHandle) -> Result<Vec<u8>, FileStoreError>;

    /// MIME type attribute for `file`, if the host knows one.
    fn mime_type(&self, file: &FileHandle) -> Option<String> {
        file.mime_type.clone()
    }
}

/// [`FileStore`] that resolves handle ids as relative paths under a root.
#[derive(Debug, Clone)]
pub struct LocalFileStore {
    root: PathBuf,
}

impl LocalFileStore {
    /// Create a store rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory of the store.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a handle id to a path, refusing anything that leaves the root.
    pub(crate) fn resolve(&self, id: &str) -> Result<PathBuf, FileStoreError> {
        let relative = Path::new(id);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if id.is_empty() || escapes {
            return Err(FileStoreError::InvalidId(id.to_owned()));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl FileStore for LocalFileStore {
    async fn download(&self, file: &FileHandle) -> Result<Vec<u8>, FileStoreError> {
        let path = self.resolve(&file.id)?;
        debug!(path = %path.display(), "reading stored file");
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(FileStoreError::NotFound(file.id.clone()))
            }
            Err(e) => Err(FileStoreError::Io(e)),
        }
    }
}
