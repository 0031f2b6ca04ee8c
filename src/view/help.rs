//! Contextual help line

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

const KEYBINDINGS: [(&str, &str); 5] = [
    ("←/h", "move left"),
    ("→/l", "move right"),
    ("enter", "select"),
    ("?", "toggle help"),
    ("q", "quit"),
];

/// Rows the help takes up for the given state
pub fn help_height(expanded: bool) -> u16 {
    if expanded { KEYBINDINGS.len() as u16 } else { 1 }
}

fn key_style() -> Style {
    Style::default().fg(Color::Gray)
}

fn desc_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

pub fn render_help(frame: &mut Frame, area: Rect, expanded: bool) {
    let lines: Vec<Line> = if expanded {
        KEYBINDINGS
            .iter()
            .map(|(key, desc)| {
                Line::from(vec![
                    Span::styled(format!("{:<6}", key), key_style()),
                    Span::styled(desc.to_string(), desc_style()),
                ])
            })
            .collect()
    } else {
        let mut spans = Vec::new();
        for (i, (key, desc)) in KEYBINDINGS.iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled(" • ", desc_style()));
            }
            spans.push(Span::styled(key.to_string(), key_style()));
            spans.push(Span::styled(format!(" {}", desc), desc_style()));
        }
        vec![Line::from(spans)]
    };

    frame.render_widget(Paragraph::new(lines), area);
}
