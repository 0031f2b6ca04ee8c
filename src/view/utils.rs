//! Utility functions for rendering UI components

use ratatui::{
    style::{Color, Style},
    widgets::{Block, BorderType, Borders},
};

pub const SPOTIFY_GREEN: Color = Color::Rgb(0x1E, 0xD7, 0x60);
pub const BORDER_COLOR: Color = Color::Indexed(63);

pub fn format_duration(ms: u32) -> String {
    let total_seconds = ms / 1000;
    let minutes = total_seconds / 60;
    let seconds = total_seconds % 60;
    format!("{}:{:02}", minutes, seconds)
}

pub fn truncate_string(s: &str, max_width: usize) -> String {
    if s.chars().count() > max_width {
        let truncated: String = s.chars().take(max_width.saturating_sub(3)).collect();
        format!("{}...", truncated)
    } else {
        s.to_string()
    }
}

/// Rounded box used by the art panel and the control buttons
pub fn rounded_block(border: Color) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border))
}
