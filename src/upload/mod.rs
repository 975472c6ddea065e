mod form;
mod types;

pub use form::{UploadForm, MAX_UPLOAD_BYTES, SUPPORTED_EXTENSIONS};
pub use types::{SelectedFile, UploadPhase};
