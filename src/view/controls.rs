//! Previous / play-pause / next buttons

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    widgets::Paragraph,
    Frame,
};

use crate::model::{Control, UiState};
use super::utils::{rounded_block, BORDER_COLOR, SPOTIFY_GREEN};

pub const BUTTON_WIDTH: u16 = 10;
pub const BUTTON_HEIGHT: u16 = 3;

fn glyph(control: Control, is_playing: bool) -> &'static str {
    match control {
        Control::Previous => "◁◁",
        Control::PlayPause if is_playing => "||",
        Control::PlayPause => "▷",
        Control::Next => "▷▷",
    }
}

pub fn render_controls(frame: &mut Frame, area: Rect, ui_state: &UiState, is_playing: bool) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(Control::ALL.map(|_| Constraint::Length(BUTTON_WIDTH)))
        .split(area);

    for (i, control) in Control::ALL.into_iter().enumerate() {
        let border = if i == ui_state.selected { SPOTIFY_GREEN } else { BORDER_COLOR };
        let button = Paragraph::new(glyph(control, is_playing))
            .alignment(Alignment::Center)
            .block(rounded_block(border));
        frame.render_widget(button, chunks[i]);
    }
}
