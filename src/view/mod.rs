//! View module - UI rendering
//!
//! Rendering is a pure function of the playback snapshot, the UI state and
//! the converted album art. It is called once per processed event.
//!
//! - `utils`: Shared helpers (formatting, colors, boxes)
//! - `now_playing`: Album art panel and track metadata
//! - `progress`: Progress bar
//! - `controls`: Previous / play-pause / next buttons
//! - `help`: Key help line

mod utils;
mod now_playing;
mod progress;
mod controls;
mod help;

use ratatui::{
    layout::{Constraint, Direction, Layout},
    widgets::Paragraph,
    Frame,
};

use crate::model::{PlaybackSnapshot, UiState};

pub const WAITING_MESSAGE: &str = "Waiting for playback state...";
pub const NO_DEVICE_MESSAGE: &str = "No device connected";
pub const UNSUPPORTED_MESSAGE: &str = "Podcast control is not supported at this time";

pub struct AppView;

impl AppView {
    pub fn render(
        frame: &mut Frame,
        snapshot: Option<&PlaybackSnapshot>,
        ui_state: &UiState,
        art: Option<&str>,
    ) {
        let area = frame.area();

        let Some(snapshot) = snapshot else {
            frame.render_widget(Paragraph::new(WAITING_MESSAGE), area);
            return;
        };
        if !snapshot.device_present() {
            frame.render_widget(Paragraph::new(NO_DEVICE_MESSAGE), area);
            return;
        }
        let Some(track) = &snapshot.track else {
            frame.render_widget(Paragraph::new(UNSUPPORTED_MESSAGE), area);
            return;
        };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(now_playing::PANEL_HEIGHT), // Art + metadata
                Constraint::Length(1),                         // Progress bar
                Constraint::Length(controls::BUTTON_HEIGHT),   // Controls
                Constraint::Length(help::help_height(ui_state.help_expanded)),
                Constraint::Min(0),
            ])
            .split(area);

        now_playing::render_now_playing(frame, chunks[0], snapshot, track, art);
        progress::render_progress_bar(frame, chunks[1], snapshot, ui_state);
        controls::render_controls(frame, chunks[2], ui_state, snapshot.is_playing);
        help::render_help(frame, chunks[3], ui_state.help_expanded);
    }
}
