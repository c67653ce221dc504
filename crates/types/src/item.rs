//! Status item as serialized into the bar protocol

use crate::color::{Color, Styling};
use serde::Serialize;

/// How the bar interprets `full_text`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Markup {
    #[default]
    Pango,
}

/// One block of the status line.
///
/// Field order matches the wire format: `background`, `color`, `full_text`,
/// `markup`, `separator`, `separator_block_width`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayItem {
    pub background: Color,
    pub color: Color,
    pub full_text: String,
    pub markup: Markup,
    pub separator: bool,
    pub separator_block_width: u32,
}

impl DisplayItem {
    /// An empty item carrying the shared styling
    pub fn new(styling: &Styling) -> Self {
        Self {
            background: styling.background,
            color: styling.foreground,
            full_text: String::new(),
            markup: Markup::Pango,
            separator: false,
            separator_block_width: 0,
        }
    }
}
