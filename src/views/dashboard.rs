use super::format_timestamp;
use crate::api::{FileRecord, StatusKind};
use crate::utils::file_size::format_size;

pub const RECENT_ACTIVITY_LIMIT: usize = 8;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DashboardStats {
    pub total: usize,
    /// COMPLETED or PROCESSED
    pub successful: usize,
    pub processing: usize,
    pub failed: usize,
    pub total_bytes: u64,
}

impl DashboardStats {
    pub fn from_files(files: &[FileRecord]) -> Self {
        files.iter().fold(Self::default(), |mut stats, file| {
            stats.total += 1;
            stats.total_bytes += file.file_size.unwrap_or(0);
            match file.status_kind() {
                kind if kind.is_successful() => stats.successful += 1,
                StatusKind::Processing => stats.processing += 1,
                StatusKind::Failed => stats.failed += 1,
                _ => {}
            }
            stats
        })
    }

    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.successful as f64 * 100.0 / self.total as f64
        }
    }

    pub fn success_rate_label(&self) -> String {
        if self.total == 0 {
            "0%".to_string()
        } else {
            format!("{:.1}%", self.success_rate())
        }
    }

    pub fn data_processed_label(&self) -> String {
        format!("{:.1} KB", self.total_bytes as f64 / 1024.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityRow {
    pub file_name: String,
    pub upload_date: String,
    pub status: StatusKind,
    pub size: String,
}

/// The newest `limit` uploads, newest first. The server lists oldest first.
pub fn recent_activity(files: &[FileRecord], limit: usize) -> Vec<ActivityRow> {
    files
        .iter()
        .rev()
        .take(limit)
        .map(|file| ActivityRow {
            file_name: file.display_name().to_string(),
            upload_date: format_timestamp(file.uploaded_at.as_deref()),
            status: file.status_kind(),
            size: file
                .file_size
                .map(format_size)
                .unwrap_or_else(|| "-".to_string()),
        })
        .collect()
}

pub fn latest_file(files: &[FileRecord]) -> Option<&FileRecord> {
    files.last()
}
