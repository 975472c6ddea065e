//! Owned state container for the shared file list.
//!
//! `FileStore` is a cheap clonable handle; every clone sees the same list.
//! Only [`FileStore::refresh`] and [`FileStore::upload`] mutate it.

use crate::api::{FileActionResponse, FileApi, FileRecord, RequestError, UploadRequest};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoreSnapshot {
    /// Records in the order the server returned them
    pub files: Vec<FileRecord>,
    pub loading: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    Applied,
    /// The request failed; the previous list is kept
    Failed,
    /// A newer refresh was issued while this one was in flight
    Superseded,
}

#[derive(Default)]
struct Inner {
    snapshot: StoreSnapshot,
    /// Ticket of the most recently issued refresh
    issued: u64,
}

#[derive(Clone)]
pub struct FileStore {
    api: Arc<dyn FileApi>,
    inner: Arc<Mutex<Inner>>,
}

impl FileStore {
    pub fn new(api: Arc<dyn FileApi>) -> Self {
        Self {
            api,
            inner: Arc::new(Mutex::new(Inner::default())),
        }
    }

    pub fn api(&self) -> Arc<dyn FileApi> {
        Arc::clone(&self.api)
    }

    pub fn snapshot(&self) -> StoreSnapshot {
        self.lock().snapshot.clone()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replaces the list with the server's current one.
    ///
    /// Responses that arrive after a newer refresh was issued are dropped.
    pub async fn refresh(&self) -> RefreshOutcome {
        let ticket = {
            let mut inner = self.lock();
            inner.issued += 1;
            inner.snapshot.loading = true;
            inner.snapshot.error = None;
            inner.issued
        };

        let result = self.api.list_files(None).await;

        let mut inner = self.lock();
        if ticket != inner.issued {
            debug!(ticket, newest = inner.issued, "dropping superseded file list");
            return RefreshOutcome::Superseded;
        }

        inner.snapshot.loading = false;
        match result {
            Ok(files) => {
                debug!(count = files.len(), "file list refreshed");
                inner.snapshot.files = files;
                RefreshOutcome::Applied
            }
            Err(e) => {
                warn!(error = %e, "failed to refresh file list");
                inner.snapshot.error = Some(e.to_string());
                RefreshOutcome::Failed
            }
        }
    }

    /// Uploads a file, then refreshes the list whatever the upload's outcome.
    pub async fn upload(
        &self,
        request: UploadRequest,
    ) -> Result<FileActionResponse, RequestError> {
        let filename = request.filename.clone();
        let result = self.api.upload_file(request).await;
        match &result {
            Ok(response) => info!(%filename, file_id = ?response.file_id, "upload accepted"),
            Err(e) => warn!(%filename, status = ?e.status(), error = %e, "upload rejected"),
        }

        self.refresh().await;
        result
    }
}
