use super::super::ui::muted;
use super::super::CleanStreamApp;
use super::status_badge;
use crate::api::{FileRecord, OutputFormat, StatusKind};
use crate::store::StoreSnapshot;
use crate::utils::color::{ACCENT, ERROR};
use crate::utils::file_size::format_size;
use crate::views::format_timestamp;
use crate::views::history::{history_page, StatusFilter};
use eframe::egui::{self, RichText};

/// Row buttons are collected while the grid borrows the snapshot and run afterwards.
enum RowAction {
    DownloadInput,
    DownloadOutput(OutputFormat),
    Details,
    Retry,
    Delete,
}

impl CleanStreamApp {
    pub(in crate::app) fn render_history(&mut self, ui: &mut egui::Ui, snapshot: &StoreSnapshot) {
        ui.heading("Upload History");
        ui.label(muted(ui, "Browse, download and manage previous uploads"));
        ui.add_space(12.0);

        ui.horizontal(|ui| {
            let mut query = self.state.history.search_query.clone();
            let response = ui.add(
                egui::TextEdit::singleline(&mut query)
                    .hint_text("🔍 Search by file name")
                    .desired_width(280.0),
            );
            if response.changed() {
                self.state.history.set_query(query);
            }

            ui.add_space(12.0);
            for filter in StatusFilter::ALL {
                let selected = self.state.history.status_filter == filter;
                if ui.selectable_label(selected, filter.label()).clicked() && !selected {
                    self.state.history.set_filter(filter);
                }
            }
        });
        ui.add_space(12.0);

        let history = &self.state.history;
        let page = history_page(
            &snapshot.files,
            &history.search_query,
            history.status_filter,
            history.current_page,
        );
        self.state.history.current_page = page.pagination.current_page;

        if snapshot.loading && snapshot.files.is_empty() {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label("Loading uploads...");
            });
            return;
        }

        if page.is_empty() {
            ui.add_space(24.0);
            ui.vertical_centered(|ui| {
                ui.label(muted(ui, "No uploads found matching your criteria"));
            });
            return;
        }

        let mut action: Option<(RowAction, &FileRecord)> = None;
        egui::Grid::new("upload_history")
            .num_columns(6)
            .striped(true)
            .spacing([20.0, 8.0])
            .show(ui, |ui| {
                for header in ["File Name", "Uploaded", "Processed", "Size", "Status", "Actions"] {
                    ui.label(RichText::new(header).strong());
                }
                ui.end_row();

                for record in &page.rows {
                    let kind = record.status_kind();
                    ui.label(record.display_name());
                    ui.label(format_timestamp(record.uploaded_at.as_deref()));
                    ui.label(format_timestamp(record.processed_at.as_deref()));
                    ui.label(record.file_size.map(format_size).unwrap_or_else(|| "-".to_string()));

                    let badge = status_badge(ui, &kind);
                    if let Some(message) = &record.error_message {
                        badge.on_hover_text(message.as_str());
                    }

                    ui.horizontal(|ui| {
                        if let Some(row_action) = row_actions(ui, &kind) {
                            action = Some((row_action, *record));
                        }
                    });
                    ui.end_row();
                }
            });

        if let Some((row_action, record)) = action {
            self.run_row_action(row_action, record);
        }

        let pagination = page.pagination;
        if !pagination.is_paged() {
            return;
        }
        ui.add_space(12.0);
        ui.horizontal(|ui| {
            ui.label(muted(ui, pagination.summary()));
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                // Laid out right to left, so the buttons are added in reverse.
                if ui
                    .add_enabled(pagination.has_next(), egui::Button::new("Next ▶"))
                    .clicked()
                {
                    self.state.history.current_page = pagination.current_page + 1;
                }
                for number in pagination.window().into_iter().rev() {
                    let current = number == pagination.current_page;
                    let text = if current {
                        RichText::new(number.to_string()).color(ACCENT).strong()
                    } else {
                        RichText::new(number.to_string())
                    };
                    if ui.selectable_label(current, text).clicked() {
                        self.state.history.current_page = number;
                    }
                }
                if ui
                    .add_enabled(pagination.has_previous(), egui::Button::new("◀ Previous"))
                    .clicked()
                {
                    self.state.history.current_page = pagination.current_page - 1;
                }
            });
        });
    }

    fn run_row_action(&mut self, action: RowAction, record: &FileRecord) {
        let Some(file_id) = record.id().map(str::to_string) else {
            return;
        };
        let filename = record.display_name().to_string();
        match action {
            RowAction::DownloadInput => self.download_input(file_id, filename),
            RowAction::DownloadOutput(format) => self.download_output(file_id, filename, format),
            RowAction::Details => self.show_output_details(file_id, filename),
            RowAction::Retry => self.retry(file_id, filename),
            RowAction::Delete => self.delete(file_id, filename),
        }
    }
}

fn row_actions(ui: &mut egui::Ui, kind: &StatusKind) -> Option<RowAction> {
    let mut action = None;

    if ui.small_button("⬇").on_hover_text("Download original").clicked() {
        action = Some(RowAction::DownloadInput);
    }

    if kind.is_successful() {
        ui.menu_button("📄 Output", |ui| {
            for format in OutputFormat::ALL {
                if ui.button(format!("Download {}", format)).clicked() {
                    action = Some(RowAction::DownloadOutput(format));
                    ui.close_menu();
                }
            }
            ui.separator();
            if ui.button("Show details").clicked() {
                action = Some(RowAction::Details);
                ui.close_menu();
            }
        });
    }

    if *kind == StatusKind::Failed && ui.small_button("🔄 Retry").clicked() {
        action = Some(RowAction::Retry);
    }

    if ui
        .small_button(RichText::new("🗑").color(ERROR))
        .on_hover_text("Delete")
        .clicked()
    {
        action = Some(RowAction::Delete);
    }

    action
}
