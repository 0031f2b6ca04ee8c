//! Playback refresh and control dispatch
//!
//! Network calls run in spawned tasks and report back through the event
//! queue, so the loop never blocks on Spotify while handling an event.

use anyhow::Result;

use crate::error::LoopError;
use crate::model::{Control, PlaybackSnapshot};

use super::events::AppEvent;
use super::{AppController, Flow};

impl AppController {
    pub(crate) fn refresh_playback(&mut self) {
        if !self.model.begin_fetch() {
            tracing::trace!("Playback fetch already in flight, skipping tick");
            return;
        }

        let service = self.service.clone();
        let tx = self.events.clone();
        tokio::spawn(async move {
            let result = service.current_playback().await;
            let _ = tx.send(AppEvent::PlaybackFetched(result));
        });
    }

    pub(crate) fn on_playback_fetched(&mut self, result: Result<PlaybackSnapshot>) -> Flow {
        if !self.model.finish_fetch() {
            tracing::debug!("Discarding playback fetched before the last command, refetching");
            self.refresh_playback();
            return Flow::Continue;
        }

        let snapshot = match result {
            Ok(snapshot) => snapshot,
            Err(e) => {
                self.model.fail(LoopError::Fetch(format!("{e:#}")));
                return Flow::Exit;
            }
        };

        let finished = snapshot.is_finished();
        self.model.set_snapshot(snapshot);
        if finished {
            tracing::info!("Track reached the end, stopping");
            self.model.terminate();
            return Flow::Exit;
        }

        self.request_album_art();
        Flow::Continue
    }

    pub(crate) fn dispatch_control(&mut self, control: Control) {
        // Toggle against what the last snapshot showed
        let pause = self.model.is_playing();
        tracing::debug!(%control, pause, "Dispatching playback command");

        let service = self.service.clone();
        let tx = self.events.clone();
        tokio::spawn(async move {
            let result = match control {
                Control::Previous => service.previous_track().await,
                Control::PlayPause if pause => service.pause().await,
                Control::PlayPause => service.play().await,
                Control::Next => service.next_track().await,
            };
            let _ = tx.send(AppEvent::CommandCompleted(control, result));
        });
    }

    pub(crate) fn on_command_completed(&mut self, control: Control, result: Result<()>) -> Flow {
        match result {
            Ok(()) => {
                tracing::info!(%control, "Playback command succeeded");
                self.model.invalidate_fetch();
                // Show the effect right away instead of waiting for the timer
                let _ = self.events.send(AppEvent::Tick);
                Flow::Continue
            }
            Err(e) => {
                self.model.fail(LoopError::Command {
                    control,
                    message: format!("{e:#}"),
                });
                Flow::Exit
            }
        }
    }

    fn request_album_art(&mut self) {
        let Some(url) = self.model.next_art_request() else {
            return;
        };

        let art = self.art.clone();
        let tx = self.events.clone();
        let (width, height) = (self.art_width, self.art_height);
        tokio::spawn(async move {
            let result = art.render(&url, width, height).await;
            let _ = tx.send(AppEvent::ArtReady { url, result });
        });
    }

    pub(crate) fn on_art_ready(&mut self, url: String, result: Result<String>) {
        let text = result.unwrap_or_else(|e| {
            tracing::warn!(url = %url, error = %e, "Album art conversion failed");
            String::new()
        });
        self.model.set_album_art(url, text);
    }
}
