use crate::api::{FileActionResponse, FileRecord, OutputMetadata, StatusKind};
use crate::upload::{UploadForm, UploadPhase};
use crate::views::history::StatusFilter;
use std::path::PathBuf;
use tracing::debug;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Page {
    #[default]
    Dashboard,
    Upload,
    History,
}

impl Page {
    pub const ALL: [Page; 3] = [Self::Dashboard, Self::Upload, Self::History];

    pub fn title(&self) -> &'static str {
        match self {
            Self::Dashboard => "Dashboard",
            Self::Upload => "Uploads",
            Self::History => "History",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Self::Dashboard => "📊",
            Self::Upload => "📤",
            Self::History => "🕘",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
    /// Saved download that the user can open from the banner
    pub path: Option<PathBuf>,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            message: message.into(),
            path: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
            path: None,
        }
    }

    pub fn with_path(mut self, path: PathBuf) -> Self {
        self.path = Some(path);
        self
    }
}

/// Results sent back to the UI thread by background tasks.
#[derive(Debug)]
pub enum UiEvent {
    UploadFinished(Result<FileActionResponse, String>),
    ActionFinished(Notice),
    OutputDetails {
        filename: String,
        result: Result<OutputMetadata, String>,
    },
    /// The polled file reached a terminal status
    PollFinished { file_id: String, record: FileRecord },
}

/// Follow-up work an event asks of the app.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Refresh,
    FollowProcessing(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct OutputDetails {
    pub filename: String,
    pub metadata: OutputMetadata,
}

#[derive(Debug, Default)]
pub struct HistoryState {
    pub search_query: String,
    pub status_filter: StatusFilter,
    pub current_page: usize,
}

impl HistoryState {
    pub fn set_query(&mut self, query: String) {
        self.search_query = query;
        self.current_page = 1;
    }

    pub fn set_filter(&mut self, filter: StatusFilter) {
        self.status_filter = filter;
        self.current_page = 1;
    }
}

const MAX_NOTICES: usize = 5;

#[derive(Debug, Default)]
pub struct AppState {
    pub page: Page,
    pub history: HistoryState,
    pub upload: UploadForm,
    pub notices: Vec<Notice>,
    pub output_details: Option<OutputDetails>,
    /// Per-row actions still running in the background
    pub pending_actions: usize,
}

impl AppState {
    pub fn push_notice(&mut self, notice: Notice) {
        self.notices.push(notice);
        if self.notices.len() > MAX_NOTICES {
            let excess = self.notices.len() - MAX_NOTICES;
            self.notices.drain(..excess);
        }
    }

    pub fn dismiss_notice(&mut self, index: usize) {
        if index < self.notices.len() {
            self.notices.remove(index);
        }
    }

    /// Folds a background result into the state. `watched_file` is the id the
    /// poller currently follows; completions for any other id are dropped.
    pub fn apply(&mut self, event: UiEvent, watched_file: Option<&str>) -> Vec<Effect> {
        if !matches!(event, UiEvent::PollFinished { .. }) {
            self.pending_actions = self.pending_actions.saturating_sub(1);
        }

        match event {
            UiEvent::UploadFinished(result) => {
                let file_id = result.as_ref().ok().and_then(|r| r.file_id.clone());
                if let Err(message) = &result {
                    self.push_notice(Notice::error(message.clone()));
                }
                self.upload.finish(result);
                let accepted = matches!(self.upload.phase(), UploadPhase::Success(_));
                file_id
                    .filter(|_| accepted)
                    .map(Effect::FollowProcessing)
                    .into_iter()
                    .collect()
            }
            UiEvent::ActionFinished(notice) => {
                self.push_notice(notice);
                Vec::new()
            }
            UiEvent::OutputDetails { filename, result } => {
                match result {
                    Ok(metadata) => self.output_details = Some(OutputDetails { filename, metadata }),
                    Err(message) => self.push_notice(Notice::error(format!(
                        "Could not load output for {}: {}",
                        filename, message
                    ))),
                }
                Vec::new()
            }
            UiEvent::PollFinished { file_id, record } => {
                if watched_file != Some(file_id.as_str()) {
                    debug!(%file_id, "ignoring completion of a file no longer watched");
                    return Vec::new();
                }
                let name = record.filename.as_deref().unwrap_or(&file_id);
                let notice = match record.status_kind() {
                    StatusKind::Failed => Notice::error(format!(
                        "{} failed: {}",
                        name,
                        record
                            .error_message
                            .as_deref()
                            .unwrap_or("processing failed")
                    )),
                    kind => Notice::info(format!("{} finished processing ({})", name, kind)),
                };
                self.push_notice(notice);
                vec![Effect::Refresh]
            }
        }
    }
}
