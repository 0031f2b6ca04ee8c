//! Model module - Application state and data types
//!
//! - `types`: Controls, UI state and the loop lifecycle
//! - `playback`: Playback snapshots fetched from Spotify
//! - `spotify_client`: Spotify API client wrapper and the `PlaybackService` seam
//! - `app_model`: Main application model owned by the presentation loop

mod types;
mod playback;
mod spotify_client;
mod app_model;

pub use types::{Control, LoopState, UiState};

pub use playback::{PlaybackSnapshot, TrackInfo};

pub use spotify_client::{PlaybackService, SpotifyClient};

pub use app_model::AppModel;
