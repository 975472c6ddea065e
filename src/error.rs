//! Application-level errors for the dashboard.

use crate::api::RequestError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DashboardError>;

#[derive(Debug, Error)]
pub enum DashboardError {
    /// A backend call failed
    #[error(transparent)]
    Request(#[from] RequestError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// File rejected before it ever reaches the server
    #[error("Unsupported file type '{0}'. Supported formats: CSV, XLSX, XLS")]
    UnsupportedFile(String),

    #[error("'{name}' is {size}, larger than the {limit} upload limit")]
    FileTooLarge {
        name: String,
        size: String,
        limit: String,
    },

    #[error("No file selected")]
    NoFileSelected,

    #[error("An upload is already in progress")]
    UploadInProgress,

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("UI error: {0}")]
    Ui(String),
}
