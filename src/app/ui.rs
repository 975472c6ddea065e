use super::{CleanStreamApp, Notice, NoticeKind, Page};
use crate::store::StoreSnapshot;
use crate::utils::color::{ACCENT, ERROR, INFO};
use eframe::egui::{self, Color32, RichText};
use std::path::PathBuf;
use tracing::warn;

enum NoticeAction {
    Dismiss(usize),
    Open(PathBuf),
}

impl CleanStreamApp {
    pub fn render(&mut self, ctx: &egui::Context) {
        let snapshot = self.store.snapshot();

        egui::SidePanel::left("navigation")
            .resizable(false)
            .exact_width(200.0)
            .show(ctx, |ui| self.render_sidebar(ui, &snapshot));

        egui::CentralPanel::default().show(ctx, |ui| {
            self.render_notices(ui);

            if let Some(error) = &snapshot.error {
                ui.group(|ui| {
                    ui.horizontal(|ui| {
                        ui.colored_label(ERROR, "❌");
                        ui.colored_label(ERROR, format!("Could not load files: {}", error));
                        if ui.small_button("Retry").clicked() {
                            self.refresh();
                        }
                    });
                });
                ui.add_space(8.0);
            }

            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| match self.state.page {
                    Page::Dashboard => self.render_dashboard(ui, &snapshot),
                    Page::Upload => self.render_upload(ui),
                    Page::History => self.render_history(ui, &snapshot),
                });
        });

        self.render_output_details(ctx);
    }

    fn render_sidebar(&mut self, ui: &mut egui::Ui, snapshot: &StoreSnapshot) {
        ui.add_space(16.0);
        ui.vertical_centered(|ui| {
            ui.heading(RichText::new("CleanStream").color(ACCENT).strong());
            ui.label(
                RichText::new("Data cleaning dashboard")
                    .color(ui.visuals().text_color().gamma_multiply(0.7)),
            );
        });
        ui.add_space(16.0);
        ui.separator();
        ui.add_space(8.0);

        for page in Page::ALL {
            let label = format!("{}  {}", page.icon(), page.title());
            let selected = self.state.page == page;
            if ui
                .add_sized(
                    [ui.available_width(), 32.0],
                    egui::SelectableLabel::new(selected, label),
                )
                .clicked()
            {
                self.state.page = page;
            }
        }

        ui.add_space(8.0);
        ui.separator();
        ui.add_space(8.0);

        ui.horizontal(|ui| {
            ui.add_enabled_ui(!snapshot.loading, |ui| {
                if ui.button("🔄 Refresh").clicked() {
                    self.refresh();
                }
            });
            if snapshot.loading {
                ui.spinner();
            }
        });

        ui.with_layout(egui::Layout::bottom_up(egui::Align::Min), |ui| {
            ui.add_space(8.0);
            ui.label(
                RichText::new(format!("Backend: {}", self.api_base))
                    .small()
                    .color(ui.visuals().text_color().gamma_multiply(0.6)),
            );
        });
    }

    fn render_notices(&mut self, ui: &mut egui::Ui) {
        let mut action = None;

        for (index, notice) in self.state.notices.iter().enumerate().rev() {
            let color = match notice.kind {
                NoticeKind::Info => INFO,
                NoticeKind::Error => ERROR,
            };
            egui::Frame::none()
                .stroke(egui::Stroke::new(1.0, color))
                .fill(color.gamma_multiply(0.08))
                .rounding(6.0)
                .inner_margin(8.0)
                .show(ui, |ui| {
                    ui.horizontal(|ui| {
                        ui.colored_label(color, notice.message.as_str());
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            if ui.small_button("✖").clicked() {
                                action = Some(NoticeAction::Dismiss(index));
                            }
                            if let Some(path) = &notice.path {
                                if ui.small_button("Open").clicked() {
                                    action = Some(NoticeAction::Open(path.clone()));
                                }
                            }
                        });
                    });
                });
            ui.add_space(4.0);
        }

        match action {
            Some(NoticeAction::Dismiss(index)) => self.state.dismiss_notice(index),
            Some(NoticeAction::Open(path)) => {
                if let Err(e) = open::that(&path) {
                    warn!(path = %path.display(), error = %e, "failed to open download");
                    self.state.push_notice(Notice::error(format!(
                        "Could not open {}: {}",
                        path.display(),
                        e
                    )));
                }
            }
            None => {}
        }

        if !self.state.notices.is_empty() {
            ui.add_space(8.0);
        }
    }

    fn render_output_details(&mut self, ctx: &egui::Context) {
        let Some(details) = &self.state.output_details else {
            return;
        };

        let mut open = true;
        egui::Window::new(format!("Output: {}", details.filename))
            .open(&mut open)
            .default_width(420.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical()
                    .max_height(360.0)
                    .show(ui, |ui| {
                        egui::Frame::none()
                            .fill(ui.style().visuals.extreme_bg_color)
                            .inner_margin(8.0)
                            .show(ui, |ui| {
                                ui.label(RichText::new(details.metadata.pretty()).monospace());
                            });
                    });
            });

        if !open {
            self.state.output_details = None;
        }
    }
}

/// Label used for stat values while the list is still loading.
pub(super) fn value_or_ellipsis(loading: bool, value: usize) -> String {
    if loading {
        "...".to_string()
    } else {
        value.to_string()
    }
}

pub(super) fn muted(ui: &egui::Ui, text: impl Into<String>) -> RichText {
    RichText::new(text.into()).color(ui.visuals().text_color().gamma_multiply(0.7))
}

pub(super) fn stat_card(ui: &mut egui::Ui, title: &str, value: String, badge: Option<(String, Color32)>) {
    egui::Frame::group(ui.style())
        .rounding(8.0)
        .inner_margin(12.0)
        .show(ui, |ui| {
            ui.set_min_width(ui.available_width());
            ui.horizontal(|ui| {
                ui.label(muted(ui, title));
                if let Some((badge, color)) = badge {
                    ui.colored_label(color, badge);
                }
            });
            ui.label(RichText::new(value).size(26.0).strong());
        });
}
