//! Core type definitions for the application

use std::fmt;

use super::playback::PlaybackSnapshot;

/// A playback control, in the order it appears on screen
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Control {
    Previous,
    PlayPause,
    Next,
}

impl Control {
    pub const ALL: [Control; 3] = [Control::Previous, Control::PlayPause, Control::Next];

    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % Self::ALL.len()]
    }
}

impl fmt::Display for Control {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Control::Previous => write!(f, "previous"),
            Control::PlayPause => write!(f, "play/pause"),
            Control::Next => write!(f, "next"),
        }
    }
}

/// UI state for the application
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UiState {
    pub selected: usize,
    pub help_expanded: bool,
    pub viewport_width: u16,
    pub viewport_height: u16,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            // Start on play/pause, the middle control
            selected: 1,
            help_expanded: false,
            viewport_width: 80,
            viewport_height: 24,
        }
    }
}

impl UiState {
    pub fn select_next(&mut self) {
        self.selected = (self.selected + 1) % Control::ALL.len();
    }

    pub fn select_prev(&mut self) {
        let len = Control::ALL.len();
        self.selected = (self.selected + len - 1) % len;
    }

    pub fn selected_control(&self) -> Control {
        Control::from_index(self.selected)
    }

    pub fn toggle_help(&mut self) {
        self.help_expanded = !self.help_expanded;
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.viewport_width = width;
        self.viewport_height = height;
    }
}

/// Lifecycle of the presentation loop
#[derive(Clone, Debug)]
pub enum LoopState {
    /// Authorized, but no playback state fetched yet
    Idle,
    Active(PlaybackSnapshot),
    Terminated,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_wraps_at_both_ends() {
        let mut ui = UiState { selected: 2, ..Default::default() };
        ui.select_next();
        assert_eq!(ui.selected, 0);
        ui.select_prev();
        assert_eq!(ui.selected, 2);
    }

    #[test]
    fn selection_stays_in_range_for_any_sequence() {
        let mut ui = UiState::default();
        // Deterministic pseudo-random walk over left/right presses
        let mut seed: u32 = 0x9e37_79b9;
        for _ in 0..1000 {
            seed ^= seed << 13;
            seed ^= seed >> 17;
            seed ^= seed << 5;
            let before = ui.selected;
            if seed & 1 == 0 {
                ui.select_next();
                assert_eq!(ui.selected, (before + 1) % 3);
            } else {
                ui.select_prev();
                assert_eq!(ui.selected, (before + 2) % 3);
            }
            assert!(ui.selected < 3);
        }
    }

    #[test]
    fn controls_map_positionally() {
        assert_eq!(Control::from_index(0), Control::Previous);
        assert_eq!(Control::from_index(1), Control::PlayPause);
        assert_eq!(Control::from_index(2), Control::Next);
        assert_eq!(UiState::default().selected_control(), Control::PlayPause);
    }

    #[test]
    fn help_toggles_and_resize_updates_viewport() {
        let mut ui = UiState::default();
        ui.toggle_help();
        assert!(ui.help_expanded);
        ui.toggle_help();
        assert!(!ui.help_expanded);
        ui.resize(120, 40);
        assert_eq!((ui.viewport_width, ui.viewport_height), (120, 40));
    }
}
