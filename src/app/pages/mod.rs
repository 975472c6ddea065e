mod dashboard;
mod history;
mod upload;

use crate::api::StatusKind;
use crate::utils::color::{StatusColor, ERROR, MUTED, SUCCESS, WARNING};
use crate::views::steps::ProcessSteps;
use eframe::egui::{self, RichText};

fn status_badge(ui: &mut egui::Ui, kind: &StatusKind) -> egui::Response {
    let dot = match kind {
        StatusKind::Processing => "◌",
        StatusKind::Failed => "✖",
        k if k.is_successful() => "✔",
        _ => "●",
    };
    ui.colored_label(kind.color(), format!("{} {}", dot, kind))
}

/// Pipeline stages for one file, laid out left to right.
fn render_process_steps(ui: &mut egui::Ui, kind: &StatusKind, error_message: Option<&str>) {
    let steps = ProcessSteps::from_status(kind);

    ui.columns(steps.steps.len(), |columns| {
        for (column, step) in columns.iter_mut().zip(&steps.steps) {
            column.vertical_centered(|ui| {
                let (icon, color) = if step.completed {
                    ("✔", SUCCESS)
                } else if steps.failed {
                    ("✖", ERROR)
                } else if step.active {
                    ("⏳", WARNING)
                } else {
                    ("○", MUTED)
                };
                ui.label(RichText::new(icon).size(22.0).color(color));
                ui.label(RichText::new(step.stage.label()).strong());
                ui.label(RichText::new(step.stage.description()).small().color(MUTED));
            });
        }
    });

    if steps.failed {
        if let Some(message) = error_message {
            ui.add_space(6.0);
            ui.colored_label(ERROR, format!("Processing failed: {}", message));
        }
    }

    ui.add_space(6.0);
    ui.horizontal(|ui| {
        ui.label(format!("📊 Status: {}", steps.status));
        if steps.ready_for_download() {
            ui.colored_label(SUCCESS, "✨ Ready for download");
        }
    });
}
