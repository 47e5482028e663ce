use crate::upload::ItemStatus;
use eframe::egui::Color32;

pub trait ColorExt {
    fn parse_hex(hex: &str) -> Option<Self>
    where
        Self: Sized;
}

impl ColorExt for Color32 {
    fn parse_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }

        let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
        Some(Color32::from_rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}

pub const PENDING: &str = "#777777";
pub const UPLOADING: &str = "#f0ad4e";
pub const UPLOADED: &str = "#5cb85c";
pub const FAILED: &str = "#d9534f";

pub const TERMINAL_BG: &str = "#0c0c0c";
pub const TERMINAL_TEXT: &str = "#c8c8c8";
pub const TERMINAL_COMMENT: &str = "#6a9955";
pub const TERMINAL_PROMPT: &str = "#4ec9b0";
pub const TERMINAL_LINK: &str = "#f0ad4e";

pub fn palette(code: &str) -> Color32 {
    Color32::parse_hex(code).unwrap_or(Color32::GRAY)
}

/// Badge colour for a card's status indicator.
pub fn status_color(status: &ItemStatus) -> Color32 {
    match status {
        ItemStatus::Pending => palette(PENDING),
        ItemStatus::Uploading => palette(UPLOADING),
        ItemStatus::Uploaded => palette(UPLOADED),
        ItemStatus::MissingInfo(_) | ItemStatus::Failed(_) | ItemStatus::NetworkError(_) => {
            palette(FAILED)
        }
    }
}
