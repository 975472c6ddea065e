//! Scriptable in-memory backend for store and poller tests.

use super::{
    FileActionResponse, FileApi, FileRecord, OutputFormat, OutputMetadata, RequestError,
    UploadRequest,
};
use async_trait::async_trait;
use reqwest::StatusCode;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

#[derive(Default)]
pub struct FakeApi {
    pub files: Mutex<Vec<FileRecord>>,
    pub list_error: Mutex<Option<String>>,
    /// Delay applied to successive list calls; the list is captured before sleeping.
    pub list_delays: Mutex<VecDeque<Duration>>,
    pub list_calls: AtomicUsize,
    /// Scripted status responses; the last entry repeats once the rest are used up.
    pub statuses: Mutex<VecDeque<Result<String, String>>>,
    pub status_calls: AtomicUsize,
    /// Delay before each status response is returned
    pub status_delay: Mutex<Option<Duration>>,
    pub upload_error: Mutex<Option<(StatusCode, String)>>,
}

pub fn record(id: &str, filename: &str, status: &str) -> FileRecord {
    FileRecord {
        file_id: Some(id.to_string()),
        filename: Some(filename.to_string()),
        status: Some(status.to_string()),
        ..Default::default()
    }
}

impl FakeApi {
    pub fn with_files(files: Vec<FileRecord>) -> Self {
        let api = Self::default();
        *api.files.lock().unwrap() = files;
        api
    }

    pub fn with_statuses(statuses: Vec<Result<&str, &str>>) -> Self {
        let api = Self::default();
        *api.statuses.lock().unwrap() = statuses
            .into_iter()
            .map(|s| s.map(str::to_string).map_err(str::to_string))
            .collect();
        api
    }

    pub fn set_files(&self, files: Vec<FileRecord>) {
        *self.files.lock().unwrap() = files;
    }

    pub fn fail_list(&self, message: Option<&str>) {
        *self.list_error.lock().unwrap() = message.map(str::to_string);
    }

    fn unavailable(message: &str) -> RequestError {
        RequestError::Status {
            status: StatusCode::SERVICE_UNAVAILABLE,
            message: message.to_string(),
        }
    }
}

#[async_trait]
impl FileApi for FakeApi {
    async fn list_files(&self, _status: Option<&str>) -> Result<Vec<FileRecord>, RequestError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        let result = match self.list_error.lock().unwrap().as_deref() {
            Some(message) => Err(Self::unavailable(message)),
            None => Ok(self.files.lock().unwrap().clone()),
        };
        let delay = self.list_delays.lock().unwrap().pop_front();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        result
    }

    async fn file_status(&self, file_id: &str) -> Result<FileRecord, RequestError> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        let delay = *self.status_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let next = {
            let mut statuses = self.statuses.lock().unwrap();
            if statuses.len() > 1 {
                statuses.pop_front()
            } else {
                statuses.front().cloned()
            }
        };
        match next {
            Some(Ok(status)) => Ok(record(file_id, "polled.csv", &status)),
            Some(Err(message)) => Err(Self::unavailable(&message)),
            None => Err(Self::unavailable("no status scripted")),
        }
    }

    async fn upload_file(&self, request: UploadRequest) -> Result<FileActionResponse, RequestError> {
        if let Some((status, message)) = self.upload_error.lock().unwrap().clone() {
            return Err(RequestError::Status { status, message });
        }
        let mut files = self.files.lock().unwrap();
        let id = format!("f-{}", files.len() + 1);
        files.push(record(&id, &request.filename, "UPLOADED"));
        Ok(FileActionResponse {
            file_id: Some(id),
            filename: Some(request.filename),
            status: Some("UPLOADED".to_string()),
            ..Default::default()
        })
    }

    async fn download_input(&self, _file_id: &str) -> Result<Vec<u8>, RequestError> {
        Ok(b"id,email\n".to_vec())
    }

    async fn output_metadata(&self, file_id: &str) -> Result<OutputMetadata, RequestError> {
        Ok(OutputMetadata {
            file_id: Some(file_id.to_string()),
            ..Default::default()
        })
    }

    async fn download_output(
        &self,
        _file_id: &str,
        format: OutputFormat,
    ) -> Result<Vec<u8>, RequestError> {
        Ok(format.as_str().as_bytes().to_vec())
    }

    async fn retry_file(&self, _file_id: &str) -> Result<FileActionResponse, RequestError> {
        Ok(FileActionResponse::default())
    }

    async fn delete_file(&self, file_id: &str) -> Result<(), RequestError> {
        self.files
            .lock()
            .unwrap()
            .retain(|f| f.file_id.as_deref() != Some(file_id));
        Ok(())
    }
}
