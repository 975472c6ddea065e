use super::error::error_message;
use super::types::{FileActionResponse, FileRecord, OutputFormat, OutputMetadata, UploadRequest};
use super::{FileApi, RequestError};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

/// HTTP client for the CleanStream file endpoints.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, RequestError> {
        let base_url = Self::parse_base_url(base_url)?;
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(format!("cleanstream-dashboard/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|source| RequestError::Transport {
                operation: "Create HTTP client",
                source,
            })?;

        Ok(Self { client, base_url })
    }

    pub fn parse_base_url(raw: &str) -> Result<Url, RequestError> {
        let url = Url::parse(raw.trim()).map_err(|_| RequestError::InvalidUrl(raw.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
            return Err(RequestError::InvalidUrl(raw.to_string()));
        }
        Ok(url)
    }

    /// Joins path segments onto the base URL, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, RequestError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| RequestError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send(
        &self,
        operation: &'static str,
        request: RequestBuilder,
    ) -> Result<Response, RequestError> {
        let response = request
            .send()
            .await
            .map_err(|source| RequestError::Transport { operation, source })?;

        let status = response.status();
        debug!(operation, %status, "received response");
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = error_message(operation, status, &body);
        warn!(operation, %status, %message, "request failed");
        Err(RequestError::Status { status, message })
    }

    async fn json<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        request: RequestBuilder,
    ) -> Result<T, RequestError> {
        let response = self.send(operation, request).await?;
        response
            .json()
            .await
            .map_err(|e| RequestError::Decode {
                operation,
                message: e.to_string(),
            })
    }

    /// Like `json`, but an empty body yields the default value.
    async fn json_or_default<T: DeserializeOwned + Default>(
        &self,
        operation: &'static str,
        request: RequestBuilder,
    ) -> Result<T, RequestError> {
        let response = self.send(operation, request).await?;
        let body = response.text().await.map_err(|e| RequestError::Decode {
            operation,
            message: e.to_string(),
        })?;
        if body.trim().is_empty() {
            return Ok(T::default());
        }
        serde_json::from_str(&body).map_err(|e| RequestError::Decode {
            operation,
            message: e.to_string(),
        })
    }

    async fn bytes(
        &self,
        operation: &'static str,
        request: RequestBuilder,
    ) -> Result<Vec<u8>, RequestError> {
        let response = self.send(operation, request).await?;
        let bytes = response.bytes().await.map_err(|e| RequestError::Decode {
            operation,
            message: e.to_string(),
        })?;
        Ok(bytes.to_vec())
    }
}

fn mime_for(filename: &str) -> &'static str {
    let lower = filename.to_ascii_lowercase();
    if lower.ends_with(".csv") {
        "text/csv"
    } else if lower.ends_with(".xlsx") {
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
    } else if lower.ends_with(".xls") {
        "application/vnd.ms-excel"
    } else {
        "application/octet-stream"
    }
}

#[async_trait]
impl FileApi for ApiClient {
    async fn list_files(&self, status: Option<&str>) -> Result<Vec<FileRecord>, RequestError> {
        let url = self.endpoint(&["api", "files", "list"])?;
        let mut request = self.client.get(url);
        if let Some(status) = status.filter(|s| !s.is_empty()) {
            request = request.query(&[("status", status)]);
        }
        let files: Option<Vec<FileRecord>> = self.json("List files", request).await?;
        Ok(files.unwrap_or_default())
    }

    async fn file_status(&self, file_id: &str) -> Result<FileRecord, RequestError> {
        let url = self.endpoint(&["api", "files", "status", file_id])?;
        self.json("Get file status", self.client.get(url)).await
    }

    async fn upload_file(&self, request: UploadRequest) -> Result<FileActionResponse, RequestError> {
        let url = self.endpoint(&["api", "files", "upload"])?;
        let mime = mime_for(&request.filename);
        debug!(filename = %request.filename, size = request.bytes.len(), "uploading file");

        let part = Part::bytes(request.bytes)
            .file_name(request.filename)
            .mime_str(mime)
            .map_err(|source| RequestError::Transport {
                operation: "Upload",
                source,
            })?;
        let mut form = Form::new().part("file", part);
        if let Some(format) = request.target_format {
            form = form.text("targetFormat", format.as_str());
        }

        self.json("Upload", self.client.post(url).multipart(form))
            .await
    }

    async fn download_input(&self, file_id: &str) -> Result<Vec<u8>, RequestError> {
        let url = self.endpoint(&["api", "files", file_id, "download"])?;
        self.bytes("Download input file", self.client.get(url)).await
    }

    async fn output_metadata(&self, file_id: &str) -> Result<OutputMetadata, RequestError> {
        let url = self.endpoint(&["api", "files", file_id, "output"])?;
        self.json("Get output file", self.client.get(url)).await
    }

    async fn download_output(
        &self,
        file_id: &str,
        format: OutputFormat,
    ) -> Result<Vec<u8>, RequestError> {
        let url = self.endpoint(&["api", "files", file_id, "output", "download"])?;
        let request = self.client.get(url).query(&[("format", format.as_str())]);
        self.bytes("Download output file", request).await
    }

    async fn retry_file(&self, file_id: &str) -> Result<FileActionResponse, RequestError> {
        let url = self.endpoint(&["api", "files", "retry", file_id])?;
        self.json_or_default("Retry", self.client.post(url)).await
    }

    async fn delete_file(&self, file_id: &str) -> Result<(), RequestError> {
        let url = self.endpoint(&["api", "files", file_id])?;
        self.send("Delete", self.client.delete(url)).await?;
        Ok(())
    }
}
