use crate::api::StatusKind;
use eframe::egui::Color32;

pub const ACCENT: Color32 = Color32::from_rgb(161, 89, 225);
pub const SUCCESS: Color32 = Color32::from_rgb(0, 180, 0);
pub const ERROR: Color32 = Color32::from_rgb(220, 50, 50);
pub const WARNING: Color32 = Color32::from_rgb(230, 150, 20);
pub const MUTED: Color32 = Color32::from_rgb(150, 150, 150);
pub const INFO: Color32 = Color32::from_rgb(60, 120, 220);

pub trait StatusColor {
    fn color(&self) -> Color32;
}

impl StatusColor for StatusKind {
    fn color(&self) -> Color32 {
        match self {
            StatusKind::Completed | StatusKind::Processed => SUCCESS,
            StatusKind::Failed => ERROR,
            StatusKind::Processing => WARNING,
            StatusKind::Uploaded => INFO,
            StatusKind::Other(_) => MUTED,
        }
    }
}
