use super::types::{SelectedFile, UploadPhase};
use crate::api::{FileActionResponse, OutputFormat};
use crate::error::{DashboardError, Result};
use crate::utils::file_size::format_size;
use std::path::Path;
use tracing::debug;

pub const MAX_UPLOAD_BYTES: u64 = 50 * 1024 * 1024;
pub const SUPPORTED_EXTENSIONS: [&str; 3] = ["csv", "xlsx", "xls"];

pub fn is_supported_file(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
}

/// Rejects files the backend would refuse anyway.
pub fn check_file(file: &SelectedFile) -> Result<()> {
    if !is_supported_file(&file.name) {
        return Err(DashboardError::UnsupportedFile(file.name.clone()));
    }
    if file.size > MAX_UPLOAD_BYTES {
        return Err(DashboardError::FileTooLarge {
            name: file.name.clone(),
            size: format_size(file.size),
            limit: format_size(MAX_UPLOAD_BYTES),
        });
    }
    Ok(())
}

/// State of the upload page: `Idle -> Uploading -> Success | Error`,
/// back to `Idle` on reset or when another file is picked.
#[derive(Debug, Default)]
pub struct UploadForm {
    selected: Option<SelectedFile>,
    phase: UploadPhase,
    /// A drag carrying files is hovering the window
    pub dragging: bool,
    pub target_format: Option<OutputFormat>,
}

impl UploadForm {
    pub fn selected(&self) -> Option<&SelectedFile> {
        self.selected.as_ref()
    }

    pub fn phase(&self) -> &UploadPhase {
        &self.phase
    }

    pub fn is_uploading(&self) -> bool {
        matches!(self.phase, UploadPhase::Uploading)
    }

    /// Ignored while an upload is running.
    pub fn select(&mut self, file: SelectedFile) {
        if self.is_uploading() {
            return;
        }
        debug!(name = %file.name, size = file.size, "file selected");
        self.phase = match check_file(&file) {
            Ok(()) => UploadPhase::Idle,
            Err(e) => UploadPhase::Error(e.to_string()),
        };
        self.selected = Some(file);
    }

    pub fn can_upload(&self) -> bool {
        matches!(self.phase, UploadPhase::Idle | UploadPhase::Error(_))
            && self.selected.as_ref().is_some_and(|f| check_file(f).is_ok())
    }

    /// Moves to `Uploading` and hands back the file to send.
    pub fn begin(&mut self) -> Result<SelectedFile> {
        if self.is_uploading() {
            return Err(DashboardError::UploadInProgress);
        }
        let file = self.selected.clone().ok_or(DashboardError::NoFileSelected)?;
        if let Err(e) = check_file(&file) {
            self.phase = UploadPhase::Error(e.to_string());
            return Err(e);
        }
        self.phase = UploadPhase::Uploading;
        Ok(file)
    }

    /// Results arriving when no upload is running (e.g. after a reset) are dropped.
    pub fn finish(&mut self, result: std::result::Result<FileActionResponse, String>) {
        if !self.is_uploading() {
            return;
        }
        self.phase = match result {
            Ok(response) => UploadPhase::Success(response),
            Err(message) => UploadPhase::Error(message),
        };
    }

    pub fn reset(&mut self) {
        self.selected = None;
        self.phase = UploadPhase::Idle;
        self.dragging = false;
    }
}
