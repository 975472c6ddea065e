use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// An upload as reported by the backend.
///
/// The backend is not trusted to send every field, so all of them are optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRecord {
    #[serde(default, deserialize_with = "opaque_id")]
    pub file_id: Option<String>,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub uploaded_at: Option<String>,
    #[serde(default)]
    pub processed_at: Option<String>,
    #[serde(default)]
    pub file_size: Option<u64>,
    #[serde(default)]
    pub error_message: Option<String>,
}

impl FileRecord {
    pub fn id(&self) -> Option<&str> {
        self.file_id.as_deref()
    }

    pub fn display_name(&self) -> &str {
        self.filename.as_deref().unwrap_or("-")
    }

    pub fn status_kind(&self) -> StatusKind {
        StatusKind::parse(self.status.as_deref().unwrap_or_default())
    }
}

/// Ids arrive as strings from some deployments and as numbers from others.
fn opaque_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(id)) => Some(id),
        Some(Value::Number(id)) => Some(id.to_string()),
        _ => None,
    })
}

/// Case-insensitive reading of a server status string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusKind {
    Uploaded,
    Processing,
    Completed,
    Processed,
    Failed,
    Other(String),
}

impl StatusKind {
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        match raw.to_ascii_uppercase().as_str() {
            "UPLOADED" => Self::Uploaded,
            "PROCESSING" => Self::Processing,
            "COMPLETED" => Self::Completed,
            "PROCESSED" => Self::Processed,
            "FAILED" => Self::Failed,
            _ => Self::Other(raw.to_string()),
        }
    }

    /// No further transitions are expected once a file gets here.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Processed | Self::Failed)
    }

    pub fn is_successful(&self) -> bool {
        matches!(self, Self::Completed | Self::Processed)
    }
}

impl fmt::Display for StatusKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uploaded => f.write_str("UPLOADED"),
            Self::Processing => f.write_str("PROCESSING"),
            Self::Completed => f.write_str("COMPLETED"),
            Self::Processed => f.write_str("PROCESSED"),
            Self::Failed => f.write_str("FAILED"),
            Self::Other(raw) if raw.is_empty() => f.write_str("-"),
            Self::Other(raw) => f.write_str(&raw.to_uppercase()),
        }
    }
}

/// Formats the backend can convert a processed file into.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    #[default]
    Json,
    Csv,
    Xlsx,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 3] = [Self::Json, Self::Csv, Self::Xlsx];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "JSON",
            Self::Csv => "CSV",
            Self::Xlsx => "XLSX",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
            Self::Xlsx => "xlsx",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub filename: String,
    pub bytes: Vec<u8>,
    pub target_format: Option<OutputFormat>,
}

/// Body returned by the upload and retry endpoints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileActionResponse {
    #[serde(default, deserialize_with = "opaque_id")]
    pub file_id: Option<String>,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Description of a processed output, kept loosely typed since its shape
/// depends on the cleaning pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputMetadata {
    #[serde(default, deserialize_with = "opaque_id")]
    pub file_id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl OutputMetadata {
    pub fn pretty(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| format!("{:?}", self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_kind_is_case_insensitive() {
        assert_eq!(StatusKind::parse("completed"), StatusKind::Completed);
        assert_eq!(StatusKind::parse("Completed"), StatusKind::Completed);
        assert_eq!(StatusKind::parse(" FAILED "), StatusKind::Failed);
        assert_eq!(StatusKind::parse("Processing"), StatusKind::Processing);
        assert_eq!(StatusKind::parse("processed"), StatusKind::Processed);
        assert_eq!(
            StatusKind::parse("Queued"),
            StatusKind::Other("Queued".to_string())
        );
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(StatusKind::Completed.is_terminal());
        assert!(StatusKind::Processed.is_terminal());
        assert!(StatusKind::Failed.is_terminal());
        assert!(!StatusKind::Processing.is_terminal());
        assert!(!StatusKind::Uploaded.is_terminal());
        assert!(!StatusKind::Other("QUEUED".into()).is_terminal());
    }

    #[test]
    fn test_record_tolerates_missing_and_numeric_fields() {
        let records: Vec<FileRecord> = serde_json::from_str(
            r#"[
                {"fileId": 42, "filename": "a.csv", "status": "FAILED",
                 "uploadedAt": "2025-12-01T10:30:00", "processedAt": null,
                 "fileSize": 2048, "errorMessage": "bad header"},
                {"filename": "b.xlsx"}
            ]"#,
        )
        .unwrap();

        assert_eq!(records[0].id(), Some("42"));
        assert_eq!(records[0].status_kind(), StatusKind::Failed);
        assert_eq!(records[0].file_size, Some(2048));
        assert_eq!(records[0].error_message.as_deref(), Some("bad header"));
        assert_eq!(records[1].id(), None);
        assert_eq!(records[1].status_kind(), StatusKind::Other(String::new()));
        assert_eq!(records[1].status_kind().to_string(), "-");
    }

    #[test]
    fn test_action_response_keeps_unknown_fields() {
        let response: FileActionResponse = serde_json::from_str(
            r#"{"fileId":"f-1","filename":"a.csv","status":"UPLOADED","rows":120}"#,
        )
        .unwrap();
        assert_eq!(response.file_id.as_deref(), Some("f-1"));
        assert_eq!(response.extra.get("rows"), Some(&Value::from(120)));
    }

    #[test]
    fn test_output_format_wire_names() {
        let names: Vec<_> = OutputFormat::ALL.iter().map(OutputFormat::as_str).collect();
        assert_eq!(names, ["JSON", "CSV", "XLSX"]);
        assert_eq!(OutputFormat::default(), OutputFormat::Json);
    }
}
