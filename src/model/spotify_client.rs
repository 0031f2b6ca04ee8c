//! Spotify API client wrapper

use std::sync::Arc;
use anyhow::Result;
use async_trait::async_trait;
use rspotify::{model::PrivateUser, prelude::*, AuthCodeSpotify};

use super::playback::PlaybackSnapshot;

/// Playback operations the presentation loop needs from the streaming service
#[async_trait]
pub trait PlaybackService: Send + Sync {
    async fn current_playback(&self) -> Result<PlaybackSnapshot>;
    async fn previous_track(&self) -> Result<()>;
    async fn next_track(&self) -> Result<()>;
    async fn pause(&self) -> Result<()>;
    async fn play(&self) -> Result<()>;
}

/// Authenticated Spotify session, created once by the authorization flow
#[derive(Clone)]
pub struct SpotifyClient {
    client: Arc<AuthCodeSpotify>,
}

impl SpotifyClient {
    pub fn new(client: AuthCodeSpotify) -> Self {
        Self {
            client: Arc::new(client),
        }
    }

    pub async fn current_user(&self) -> Result<PrivateUser> {
        tracing::debug!("Fetching current user");
        let result = self.client.me().await;
        crate::log_api_result!("me", result);
        Ok(result?)
    }
}

#[async_trait]
impl PlaybackService for SpotifyClient {
    async fn current_playback(&self) -> Result<PlaybackSnapshot> {
        tracing::trace!("Fetching current playback state");
        let result = self.client.current_playback(None, None::<Vec<_>>).await?;
        if let Some(ref playback) = result {
            tracing::trace!(
                is_playing = playback.is_playing,
                device = %playback.device.name,
                "Got playback state"
            );
        }
        Ok(PlaybackSnapshot::from_playback(result.as_ref()))
    }

    async fn previous_track(&self) -> Result<()> {
        let result = self.client.previous_track(None).await;
        crate::log_api_result!("previous_track", result);
        Ok(result?)
    }

    async fn next_track(&self) -> Result<()> {
        let result = self.client.next_track(None).await;
        crate::log_api_result!("next_track", result);
        Ok(result?)
    }

    async fn pause(&self) -> Result<()> {
        let result = self.client.pause_playback(None).await;
        crate::log_api_result!("pause_playback", result);
        Ok(result?)
    }

    async fn play(&self) -> Result<()> {
        let result = self.client.resume_playback(None, None).await;
        crate::log_api_result!("resume_playback", result);
        Ok(result?)
    }
}
