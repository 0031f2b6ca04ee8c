//! Progress bar rendering

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    widgets::Gauge,
    Frame,
};

use crate::model::{PlaybackSnapshot, UiState};
use super::utils::{format_duration, SPOTIFY_GREEN};

const MIN_WIDTH: u16 = 10;

pub fn render_progress_bar(
    frame: &mut Frame,
    area: Rect,
    snapshot: &PlaybackSnapshot,
    ui_state: &UiState,
) {
    let width = (ui_state.viewport_width / 3).max(MIN_WIDTH).min(area.width);
    let area = Rect { width, ..area };

    let time_str = format!(
        "{} / {}",
        format_duration(snapshot.progress_ms),
        format_duration(snapshot.duration_ms())
    );

    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(SPOTIFY_GREEN).bg(Color::DarkGray))
        .ratio(snapshot.progress_ratio())
        .label(time_str);

    frame.render_widget(gauge, area);
}
