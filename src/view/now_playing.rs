//! Album art panel and track metadata

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::Line,
    widgets::{Block, Padding, Paragraph},
    Frame,
};

use crate::config::{ART_HEIGHT, ART_WIDTH};
use crate::model::{PlaybackSnapshot, TrackInfo};
use super::utils::{rounded_block, truncate_string, BORDER_COLOR};

pub const PANEL_HEIGHT: u16 = ART_HEIGHT + 2;
const METADATA_WIDTH: u16 = 65;
const ART_MARGIN: u16 = 4;

pub fn render_now_playing(
    frame: &mut Frame,
    area: Rect,
    snapshot: &PlaybackSnapshot,
    track: &TrackInfo,
    art: Option<&str>,
) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(ART_WIDTH + 2),  // Art + border
            Constraint::Length(ART_MARGIN),
            Constraint::Length(METADATA_WIDTH),
            Constraint::Min(0),
        ])
        .split(area);

    let art = Paragraph::new(art.unwrap_or_default()).block(rounded_block(BORDER_COLOR));
    frame.render_widget(art, chunks[0]);

    let text_width = usize::from(METADATA_WIDTH.saturating_sub(ART_MARGIN));
    let device = snapshot.device.as_deref().unwrap_or_default();
    let lines = vec![
        Line::from("Now Playing:"),
        Line::default(),
        Line::from(truncate_string(&track.name, text_width)),
        Line::from(truncate_string(&format!("by {}", track.artist), text_width)),
        Line::default(),
        Line::from(truncate_string(&format!("Device: {}", device), text_width)),
    ];

    let metadata = Paragraph::new(lines)
        .style(Style::default().add_modifier(Modifier::BOLD))
        .block(Block::default().padding(Padding::new(0, 0, 2, 0)));
    frame.render_widget(metadata, chunks[2]);
}
