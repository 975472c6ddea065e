use super::super::ui::muted;
use super::super::CleanStreamApp;
use super::render_process_steps;
use crate::api::{OutputFormat, StatusKind};
use crate::upload::{UploadPhase, MAX_UPLOAD_BYTES};
use crate::utils::color::{ACCENT, ERROR, SUCCESS};
use crate::utils::file_size::format_size;
use eframe::egui::{self, RichText};

impl CleanStreamApp {
    pub(in crate::app) fn render_upload(&mut self, ui: &mut egui::Ui) {
        ui.heading("Upload File");
        ui.label(muted(ui, "Upload a spreadsheet to clean and convert it"));
        ui.add_space(12.0);

        self.render_drop_zone(ui);
        ui.add_space(12.0);

        if self.state.upload.selected().is_some() {
            self.render_selected_file(ui);
            ui.add_space(12.0);
        }

        self.render_upload_phase(ui);
        self.render_poll_status(ui);
    }

    fn render_drop_zone(&mut self, ui: &mut egui::Ui) {
        let dragging = self.state.upload.dragging;
        let stroke = if dragging {
            egui::Stroke::new(2.0, ACCENT)
        } else {
            ui.visuals().widgets.noninteractive.bg_stroke
        };

        egui::Frame::none()
            .stroke(stroke)
            .fill(if dragging {
                ACCENT.gamma_multiply(0.08)
            } else {
                ui.visuals().extreme_bg_color
            })
            .rounding(10.0)
            .inner_margin(24.0)
            .show(ui, |ui| {
                ui.set_min_width(ui.available_width());
                ui.vertical_centered(|ui| {
                    ui.label(RichText::new("📤").size(36.0));
                    let title = if dragging {
                        "Drop the file to select it"
                    } else {
                        "Drag and drop your file here"
                    };
                    ui.label(RichText::new(title).size(18.0).strong());
                    ui.label(muted(ui, "or"));
                    ui.add_enabled_ui(!self.state.upload.is_uploading(), |ui| {
                        if ui.button("📁 Select File").clicked() {
                            self.pick_file();
                        }
                    });
                    ui.add_space(6.0);
                    ui.label(muted(
                        ui,
                        format!(
                            "Supported formats: CSV, XLSX, XLS (Max {}MB)",
                            MAX_UPLOAD_BYTES / (1024 * 1024)
                        ),
                    ));
                });
            });
    }

    fn render_selected_file(&mut self, ui: &mut egui::Ui) {
        let Some(file) = self.state.upload.selected() else {
            return;
        };
        let name = file.name.clone();
        let size = format_size(file.size);
        let uploading = self.state.upload.is_uploading();

        ui.group(|ui| {
            ui.set_min_width(ui.available_width());
            ui.horizontal(|ui| {
                ui.label(RichText::new("📄").size(24.0));
                ui.vertical(|ui| {
                    ui.label(RichText::new(name).strong());
                    ui.label(muted(ui, size));
                });
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui
                        .add_enabled(!uploading, egui::Button::new("✖ Remove"))
                        .clicked()
                    {
                        self.reset_upload();
                    }
                });
            });

            ui.add_space(8.0);
            ui.add_enabled_ui(!uploading, |ui| {
                ui.horizontal(|ui| {
                    ui.label("Output format:");
                    let target = &mut self.state.upload.target_format;
                    egui::ComboBox::from_id_source("target_format")
                        .selected_text(target.map(|f| f.as_str()).unwrap_or("Server default"))
                        .show_ui(ui, |ui| {
                            ui.selectable_value(target, None, "Server default");
                            for format in OutputFormat::ALL {
                                ui.selectable_value(target, Some(format), format.as_str());
                            }
                        });
                });
            });
        });
    }

    fn render_upload_phase(&mut self, ui: &mut egui::Ui) {
        let phase = self.state.upload.phase().clone();
        match phase {
            UploadPhase::Idle => {
                if ui
                    .add_enabled(
                        self.state.upload.can_upload(),
                        egui::Button::new(RichText::new("⬆ Start Upload").size(16.0)),
                    )
                    .clicked()
                {
                    self.start_upload();
                }
            }
            UploadPhase::Uploading => {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label("Uploading...");
                });
            }
            UploadPhase::Success(response) => {
                let message = response
                    .message
                    .clone()
                    .unwrap_or_else(|| "Upload successful".to_string());
                ui.colored_label(SUCCESS, format!("✅ {}", message));
                if let Some(file_id) = response.file_id {
                    ui.label(muted(ui, format!("File ID: {}", file_id)));
                }
                ui.add_space(6.0);
                if ui.button("Upload another").clicked() {
                    self.reset_upload();
                }
            }
            UploadPhase::Error(message) => {
                ui.colored_label(ERROR, format!("❌ {}", message));
                ui.add_space(6.0);
                let retry_enabled = self.state.upload.can_upload();
                ui.horizontal(|ui| {
                    if ui
                        .add_enabled(retry_enabled, egui::Button::new("⬆ Try again"))
                        .clicked()
                    {
                        self.start_upload();
                    }
                    if ui.button("Start over").clicked() {
                        self.reset_upload();
                    }
                });
            }
        }
    }

    fn render_poll_status(&mut self, ui: &mut egui::Ui) {
        let poll = self.poller.snapshot();
        let Some(file_id) = poll.file_id else {
            return;
        };

        ui.add_space(16.0);
        ui.group(|ui| {
            ui.set_min_width(ui.available_width());
            ui.horizontal(|ui| {
                ui.label(RichText::new("Processing Status").size(18.0).strong());
                if poll.polling {
                    ui.spinner();
                }
            });
            ui.label(muted(ui, format!("File ID: {}", file_id)));
            ui.add_space(10.0);

            let kind = poll
                .status
                .as_deref()
                .map(StatusKind::parse)
                .unwrap_or(StatusKind::Uploaded);
            render_process_steps(ui, &kind, None);

            if let Some(error) = &poll.error {
                ui.add_space(6.0);
                ui.colored_label(ERROR, format!("Status check failed: {}", error));
            }
        });
    }
}
