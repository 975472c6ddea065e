use super::super::ui::{muted, stat_card, value_or_ellipsis};
use super::super::CleanStreamApp;
use super::{render_process_steps, status_badge};
use crate::store::StoreSnapshot;
use crate::utils::color::{SUCCESS, WARNING};
use crate::views::dashboard::{latest_file, recent_activity, DashboardStats, RECENT_ACTIVITY_LIMIT};
use eframe::egui::{self, RichText};

impl CleanStreamApp {
    pub(in crate::app) fn render_dashboard(&mut self, ui: &mut egui::Ui, snapshot: &StoreSnapshot) {
        let files = &snapshot.files;
        let stats = DashboardStats::from_files(files);

        ui.horizontal(|ui| {
            ui.vertical(|ui| {
                ui.heading("Dashboard");
                ui.label(muted(
                    ui,
                    format!(
                        "Real-time insights and analytics • Updated {}",
                        chrono::Local::now().format("%H:%M:%S")
                    ),
                ));
            });
            if stats.processing > 0 {
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.colored_label(WARNING, format!("● {} processing", stats.processing));
                });
            }
        });
        ui.add_space(16.0);

        ui.columns(4, |columns| {
            stat_card(
                &mut columns[0],
                "Total Uploads",
                value_or_ellipsis(snapshot.loading, stats.total),
                None,
            );
            stat_card(
                &mut columns[1],
                "Successful",
                value_or_ellipsis(snapshot.loading, stats.successful),
                (!snapshot.loading).then(|| (stats.success_rate_label(), SUCCESS)),
            );
            stat_card(
                &mut columns[2],
                "Data Processed",
                stats.data_processed_label(),
                None,
            );
            stat_card(
                &mut columns[3],
                "Processing",
                value_or_ellipsis(snapshot.loading, stats.processing),
                None,
            );
        });
        ui.add_space(16.0);

        if let Some(latest) = latest_file(files) {
            ui.group(|ui| {
                ui.set_min_width(ui.available_width());
                ui.label(RichText::new("Latest Upload Processing").size(18.0).strong());
                ui.label(muted(ui, latest.display_name()));
                ui.add_space(10.0);
                render_process_steps(ui, &latest.status_kind(), latest.error_message.as_deref());
            });
            ui.add_space(16.0);
        }

        let rows = recent_activity(files, RECENT_ACTIVITY_LIMIT);
        ui.group(|ui| {
            ui.set_min_width(ui.available_width());
            ui.horizontal(|ui| {
                ui.label(RichText::new("Recent Activity").size(18.0).strong());
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(muted(ui, format!("Last {} uploads", rows.len())));
                });
            });
            ui.add_space(8.0);

            if rows.is_empty() {
                ui.label(muted(ui, "No uploads yet"));
                return;
            }

            egui::Grid::new("recent_activity")
                .num_columns(4)
                .striped(true)
                .spacing([24.0, 8.0])
                .show(ui, |ui| {
                    for header in ["File Name", "Upload Date", "Status", "Size"] {
                        ui.label(RichText::new(header).strong());
                    }
                    ui.end_row();

                    for row in &rows {
                        ui.label(row.file_name.as_str());
                        ui.label(row.upload_date.as_str());
                        status_badge(ui, &row.status);
                        ui.label(row.size.as_str());
                        ui.end_row();
                    }
                });
        });
    }
}
