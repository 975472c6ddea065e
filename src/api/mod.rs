mod client;
mod error;
#[cfg(test)]
pub mod fake;
mod types;

pub use client::ApiClient;
pub use error::RequestError;
pub use types::{
    FileActionResponse, FileRecord, OutputFormat, OutputMetadata, StatusKind, UploadRequest,
};

use async_trait::async_trait;

/// The backend file endpoints, one method per endpoint.
///
/// Implementations never retry; a failed call surfaces as a [`RequestError`].
#[async_trait]
pub trait FileApi: Send + Sync {
    async fn list_files(&self, status: Option<&str>) -> Result<Vec<FileRecord>, RequestError>;

    async fn file_status(&self, file_id: &str) -> Result<FileRecord, RequestError>;

    async fn upload_file(&self, request: UploadRequest) -> Result<FileActionResponse, RequestError>;

    /// Original bytes as uploaded
    async fn download_input(&self, file_id: &str) -> Result<Vec<u8>, RequestError>;

    async fn output_metadata(&self, file_id: &str) -> Result<OutputMetadata, RequestError>;

    /// Processed bytes converted to `format`
    async fn download_output(
        &self,
        file_id: &str,
        format: OutputFormat,
    ) -> Result<Vec<u8>, RequestError>;

    async fn retry_file(&self, file_id: &str) -> Result<FileActionResponse, RequestError>;

    async fn delete_file(&self, file_id: &str) -> Result<(), RequestError>;
}
