//! Main application model with state management

use crate::error::LoopError;

use super::playback::PlaybackSnapshot;
use super::types::{LoopState, UiState};

/// Album image converted to glyphs, keyed by the URL it was built from
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AlbumArt {
    pub url: String,
    pub text: String,
}

/// Main application model containing all state.
///
/// Owned by the presentation loop and mutated only from there, so nothing in
/// here needs a lock.
pub struct AppModel {
    state: LoopState,
    pub ui_state: UiState,
    album_art: Option<AlbumArt>,
    art_pending: Option<String>,
    /// Generation the running fetch was started in
    fetch_in_flight: Option<u64>,
    /// Bumped whenever a command changes the player behind our back
    fetch_generation: u64,
    error: Option<LoopError>,
}

impl AppModel {
    pub fn new() -> Self {
        Self {
            state: LoopState::Idle,
            ui_state: UiState::default(),
            album_art: None,
            art_pending: None,
            fetch_in_flight: None,
            fetch_generation: 0,
            error: None,
        }
    }

    #[cfg(test)]
    pub fn state(&self) -> &LoopState {
        &self.state
    }

    pub fn snapshot(&self) -> Option<&PlaybackSnapshot> {
        match &self.state {
            LoopState::Active(snapshot) => Some(snapshot),
            _ => None,
        }
    }

    pub fn is_terminated(&self) -> bool {
        matches!(self.state, LoopState::Terminated)
    }

    /// Whether the current track is playing; `false` while nothing has been fetched
    pub fn is_playing(&self) -> bool {
        self.snapshot().is_some_and(|s| s.is_playing)
    }

    // ========================================================================
    // Playback state
    // ========================================================================

    pub fn set_snapshot(&mut self, snapshot: PlaybackSnapshot) {
        if self.is_terminated() {
            return;
        }
        self.state = LoopState::Active(snapshot);
    }

    pub fn begin_fetch(&mut self) -> bool {
        if self.fetch_in_flight.is_some() || self.is_terminated() {
            return false;
        }
        self.fetch_in_flight = Some(self.fetch_generation);
        true
    }

    /// Marks the running fetch as done. Returns `false` when its result
    /// predates the last player change and must not be shown.
    pub fn finish_fetch(&mut self) -> bool {
        self.fetch_in_flight.take() == Some(self.fetch_generation)
    }

    /// Any fetch already running may have read the player before it changed
    pub fn invalidate_fetch(&mut self) {
        self.fetch_generation += 1;
    }

    // ========================================================================
    // Album art
    // ========================================================================

    /// Art text for the current track, if it has been converted already
    pub fn album_art(&self) -> Option<&str> {
        let url = self.snapshot()?.album_art_url()?;
        self.album_art
            .as_ref()
            .filter(|art| art.url == url)
            .map(|art| art.text.as_str())
    }

    /// Returns the URL to convert when the current track's art is neither
    /// cached nor already requested.
    pub fn next_art_request(&mut self) -> Option<String> {
        let url = self.snapshot()?.album_art_url()?.to_string();
        let cached = self.album_art.as_ref().is_some_and(|art| art.url == url);
        if cached || self.art_pending.as_deref() == Some(url.as_str()) {
            return None;
        }
        self.art_pending = Some(url.clone());
        Some(url)
    }

    pub fn set_album_art(&mut self, url: String, text: String) {
        if self.art_pending.as_deref() == Some(url.as_str()) {
            self.art_pending = None;
        }
        if self.snapshot().and_then(|s| s.album_art_url()) == Some(url.as_str()) {
            self.album_art = Some(AlbumArt { url, text });
        }
    }

    // ========================================================================
    // Termination
    // ========================================================================

    pub fn terminate(&mut self) {
        self.state = LoopState::Terminated;
    }

    pub fn fail(&mut self, error: LoopError) {
        tracing::error!(error = %error, "Presentation loop terminating");
        if self.error.is_none() {
            self.error = Some(error);
        }
        self.terminate();
    }

    pub fn take_error(&mut self) -> Option<LoopError> {
        self.error.take()
    }
}
