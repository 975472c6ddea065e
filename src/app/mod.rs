mod pages;
mod state;
mod ui;

use crate::api::{FileApi, FileRecord, OutputFormat, RequestError, UploadRequest};
use crate::config::DashboardConfig;
use crate::error::DashboardError;
use crate::poller::StatusPoller;
use crate::store::FileStore;
use crate::upload::{SelectedFile, SUPPORTED_EXTENSIONS};
use eframe::{egui, App};
use rfd::FileDialog;
pub use state::{AppState, Effect, Notice, NoticeKind, OutputDetails, Page, UiEvent};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::mpsc as std_mpsc;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Runtime;
use tracing::{debug, info, warn};

/// How often to repaint while background work is outstanding
const BUSY_REPAINT: Duration = Duration::from_millis(250);

pub struct CleanStreamApp {
    state: AppState,
    store: FileStore,
    poller: StatusPoller,
    events: std_mpsc::Sender<UiEvent>,
    event_receiver: std_mpsc::Receiver<UiEvent>,
    ctx: egui::Context,
    api_base: String,
    runtime: Runtime,
}

impl CleanStreamApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        config: &DashboardConfig,
        runtime: Runtime,
        api: Arc<dyn FileApi>,
    ) -> Self {
        info!(api_base = %config.api_base, "initializing CleanStream dashboard");
        let (events, event_receiver) = std_mpsc::channel();
        let store = FileStore::new(Arc::clone(&api));
        let poller = StatusPoller::new(api, config.poll_interval(), runtime.handle().clone());

        let app = Self {
            state: AppState::default(),
            store,
            poller,
            events,
            event_receiver,
            ctx: cc.egui_ctx.clone(),
            api_base: config.api_base.clone(),
            runtime,
        };
        app.refresh();
        app
    }

    pub fn refresh(&self) {
        let store = self.store.clone();
        let ctx = self.ctx.clone();
        self.runtime.spawn(async move {
            store.refresh().await;
            ctx.request_repaint();
        });
    }

    /// Runs `task` on the runtime and delivers its event to the UI thread.
    fn spawn_action<F>(&mut self, task: F)
    where
        F: Future<Output = UiEvent> + Send + 'static,
    {
        self.state.pending_actions += 1;
        let events = self.events.clone();
        let ctx = self.ctx.clone();
        self.runtime.spawn(async move {
            let event = task.await;
            // The receiver only goes away when the window is closing.
            let _ = events.send(event);
            ctx.request_repaint();
        });
    }

    pub fn select_path(&mut self, path: PathBuf) {
        match SelectedFile::from_path(path) {
            Ok(file) => self.state.upload.select(file),
            Err(e) => {
                warn!(error = %e, "could not read selected file");
                self.state.push_notice(Notice::error(e.to_string()));
            }
        }
    }

    pub fn pick_file(&mut self) {
        if let Some(path) = FileDialog::new()
            .add_filter("Spreadsheets", &SUPPORTED_EXTENSIONS)
            .pick_file()
        {
            self.select_path(path);
        }
    }

    pub fn start_upload(&mut self) {
        let file = match self.state.upload.begin() {
            Ok(file) => file,
            Err(e) => {
                warn!(error = %e, "upload not started");
                self.state.push_notice(Notice::error(e.to_string()));
                return;
            }
        };

        info!(name = %file.name, size = file.size, "starting upload");
        let target_format = self.state.upload.target_format;
        let store = self.store.clone();
        self.spawn_action(async move {
            let result = async {
                let bytes = file.read().await?;
                let request = UploadRequest {
                    filename: file.name.clone(),
                    bytes,
                    target_format,
                };
                Ok::<_, DashboardError>(store.upload(request).await?)
            }
            .await;
            UiEvent::UploadFinished(result.map_err(|e| upload_error_message(&e)))
        });
    }

    pub fn reset_upload(&mut self) {
        debug!("resetting upload form");
        self.state.upload.reset();
        self.poller.watch(None, None);
    }

    /// Polls the file until processing ends, then refreshes the list.
    fn follow_processing(&mut self, file_id: String) {
        let events = self.events.clone();
        let ctx = self.ctx.clone();
        let watched = file_id.clone();
        self.poller.watch(
            Some(file_id),
            Some(Box::new(move |record: &FileRecord| {
                let _ = events.send(UiEvent::PollFinished {
                    file_id: watched,
                    record: record.clone(),
                });
                ctx.request_repaint();
            })),
        );
    }

    pub fn retry(&mut self, file_id: String, filename: String) {
        info!(%file_id, "retrying file");
        let api = self.store.api();
        let store = self.store.clone();
        self.spawn_action(async move {
            let result = api.retry_file(&file_id).await.map(|_| ());
            if result.is_ok() {
                store.refresh().await;
            }
            UiEvent::ActionFinished(retried_notice(&filename, result))
        });
    }

    pub fn delete(&mut self, file_id: String, filename: String) {
        info!(%file_id, "deleting file");
        let api = self.store.api();
        let store = self.store.clone();
        self.spawn_action(async move {
            let result = api.delete_file(&file_id).await;
            if result.is_ok() {
                store.refresh().await;
            }
            UiEvent::ActionFinished(deleted_notice(&filename, result))
        });
    }

    pub fn download_input(&mut self, file_id: String, filename: String) {
        let Some(path) = FileDialog::new().set_file_name(&filename).save_file() else {
            return;
        };
        let api = self.store.api();
        self.spawn_action(async move {
            let result = async {
                let bytes = api.download_input(&file_id).await?;
                tokio::fs::write(&path, bytes).await?;
                Ok::<_, DashboardError>(())
            }
            .await;
            UiEvent::ActionFinished(saved_notice(&filename, path, result))
        });
    }

    pub fn download_output(&mut self, file_id: String, filename: String, format: OutputFormat) {
        let Some(path) = FileDialog::new()
            .set_file_name(output_file_name(&filename, format))
            .add_filter(format.as_str(), &[format.extension()])
            .save_file()
        else {
            return;
        };
        let api = self.store.api();
        self.spawn_action(async move {
            let result = async {
                let bytes = api.download_output(&file_id, format).await?;
                tokio::fs::write(&path, bytes).await?;
                Ok::<_, DashboardError>(())
            }
            .await;
            UiEvent::ActionFinished(saved_notice(&filename, path, result))
        });
    }

    pub fn show_output_details(&mut self, file_id: String, filename: String) {
        let api = self.store.api();
        self.spawn_action(async move {
            let result = api
                .output_metadata(&file_id)
                .await
                .map_err(|e| e.to_string());
            UiEvent::OutputDetails { filename, result }
        });
    }

    pub fn update_state(&mut self, ctx: &egui::Context) {
        self.handle_dropped_files(ctx);

        while let Ok(event) = self.event_receiver.try_recv() {
            self.handle_event(event);
        }

        let busy = self.store.snapshot().loading
            || self.poller.is_polling()
            || self.state.pending_actions > 0;
        if busy {
            ctx.request_repaint_after(BUSY_REPAINT);
        }
    }

    fn handle_event(&mut self, event: UiEvent) {
        let watched = self.poller.snapshot().file_id;
        for effect in self.state.apply(event, watched.as_deref()) {
            match effect {
                Effect::Refresh => self.refresh(),
                Effect::FollowProcessing(file_id) => self.follow_processing(file_id),
            }
        }
    }

    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let (hovering, dropped) = ctx.input(|i| {
            (
                !i.raw.hovered_files.is_empty(),
                i.raw.dropped_files.clone(),
            )
        });
        self.state.upload.dragging = hovering;

        let Some(file) = dropped.into_iter().next() else {
            return;
        };
        self.state.page = Page::Upload;
        match (file.path, file.bytes) {
            (Some(path), _) => self.select_path(path),
            (None, Some(bytes)) => self
                .state
                .upload
                .select(SelectedFile::from_bytes(file.name, bytes)),
            (None, None) => warn!(name = %file.name, "dropped file has neither path nor contents"),
        }
    }
}

/// Suggested name for a converted output, e.g. `orders.csv` -> `orders_cleaned.xlsx`.
fn output_file_name(filename: &str, format: OutputFormat) -> String {
    let stem = Path::new(filename)
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .unwrap_or("output");
    format!("{}_cleaned.{}", stem, format.extension())
}

/// Request errors already name the operation; other failures get the prefix here.
fn upload_error_message(error: &DashboardError) -> String {
    match error {
        DashboardError::Request(e) => e.to_string(),
        other => format!("Upload failed: {}", other),
    }
}

fn retried_notice(filename: &str, result: Result<(), RequestError>) -> Notice {
    match result {
        Ok(()) => Notice::info(format!("Retry started for {}", filename)),
        Err(e) => {
            warn!(%filename, error = %e, "retry failed");
            Notice::error(format!("Could not retry {}: {}", filename, e))
        }
    }
}

fn deleted_notice(filename: &str, result: Result<(), RequestError>) -> Notice {
    match result {
        Ok(()) => Notice::info(format!("Deleted {}", filename)),
        Err(e) => {
            warn!(%filename, error = %e, "delete failed");
            Notice::error(format!("Could not delete {}: {}", filename, e))
        }
    }
}

fn saved_notice(
    filename: &str,
    path: PathBuf,
    result: Result<(), DashboardError>,
) -> Notice {
    match result {
        Ok(()) => {
            info!(path = %path.display(), "download saved");
            Notice::info(format!("Saved {} to {}", filename, path.display())).with_path(path)
        }
        Err(e) => {
            warn!(%filename, error = %e, "download failed");
            Notice::error(format!("Could not download {}: {}", filename, e))
        }
    }
}

impl App for CleanStreamApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.update_state(ctx);
        self.render(ctx);
    }
}
