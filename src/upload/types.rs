use crate::api::FileActionResponse;
use crate::error::Result;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Clone, Default, PartialEq)]
pub enum UploadPhase {
    #[default]
    Idle,
    Uploading,
    Success(FileActionResponse),
    Error(String),
}

/// Where the bytes of a selected file come from.
#[derive(Debug, Clone, PartialEq)]
pub enum FileSource {
    Path(PathBuf),
    /// Dropped files on platforms that hand over contents instead of a path
    Bytes(Arc<[u8]>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelectedFile {
    pub name: String,
    pub size: u64,
    pub source: FileSource,
}

impl SelectedFile {
    pub fn from_path(path: PathBuf) -> Result<Self> {
        let size = std::fs::metadata(&path)?.len();
        let name = path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();
        Ok(Self {
            name,
            size,
            source: FileSource::Path(path),
        })
    }

    pub fn from_bytes(name: String, bytes: Arc<[u8]>) -> Self {
        Self {
            name,
            size: bytes.len() as u64,
            source: FileSource::Bytes(bytes),
        }
    }

    pub async fn read(&self) -> Result<Vec<u8>> {
        match &self.source {
            FileSource::Path(path) => Ok(tokio::fs::read(path).await?),
            FileSource::Bytes(bytes) => Ok(bytes.to_vec()),
        }
    }
}
