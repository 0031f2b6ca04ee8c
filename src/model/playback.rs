//! Point-in-time playback state fetched from Spotify

use chrono::TimeDelta;
use rspotify::model::{CurrentPlaybackContext, PlayableItem};

/// Metadata about the currently playing track
#[derive(Clone, Debug, PartialEq)]
pub struct TrackInfo {
    pub name: String,
    pub artist: String,
    pub album_art_url: Option<String>,
    pub duration_ms: u32,
}

/// Immutable view of the player, replaced wholesale on every refresh
#[derive(Clone, Debug, PartialEq)]
pub struct PlaybackSnapshot {
    pub is_playing: bool,
    /// Name of the active device, `None` when nothing is connected
    pub device: Option<String>,
    /// `None` when the active item is not a playable track (e.g. a podcast episode)
    pub track: Option<TrackInfo>,
    pub progress_ms: u32,
}

fn to_millis(delta: TimeDelta) -> u32 {
    delta.num_milliseconds().clamp(0, u32::MAX as i64) as u32
}

impl PlaybackSnapshot {
    /// Snapshot used when Spotify reports no playback at all
    pub fn no_device() -> Self {
        Self {
            is_playing: false,
            device: None,
            track: None,
            progress_ms: 0,
        }
    }

    pub fn from_playback(playback: Option<&CurrentPlaybackContext>) -> Self {
        let Some(playback) = playback else {
            return Self::no_device();
        };

        let device = match &playback.device.id {
            Some(id) if !id.is_empty() => Some(playback.device.name.clone()),
            _ => None,
        };

        let track = match &playback.item {
            Some(PlayableItem::Track(track)) => Some(TrackInfo {
                name: track.name.clone(),
                artist: track
                    .artists
                    .first()
                    .map(|a| a.name.clone())
                    .unwrap_or_default(),
                album_art_url: track.album.images.first().map(|image| image.url.clone()),
                duration_ms: to_millis(track.duration),
            }),
            _ => None,
        };

        Self {
            is_playing: playback.is_playing,
            device,
            track,
            progress_ms: playback.progress.map(to_millis).unwrap_or(0),
        }
    }

    pub fn device_present(&self) -> bool {
        self.device.is_some()
    }

    pub fn duration_ms(&self) -> u32 {
        self.track.as_ref().map(|t| t.duration_ms).unwrap_or(0)
    }

    pub fn album_art_url(&self) -> Option<&str> {
        self.track.as_ref()?.album_art_url.as_deref()
    }

    /// Elapsed over total duration, clamped to `[0, 1]`
    pub fn progress_ratio(&self) -> f64 {
        let duration_ms = self.duration_ms();
        if duration_ms > 0 {
            (self.progress_ms as f64 / duration_ms as f64).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    pub fn is_finished(&self) -> bool {
        self.track.is_some() && self.progress_ratio() >= 1.0
    }
}
