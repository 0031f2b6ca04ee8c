//! Event queue feeding the presentation loop

use std::time::Duration;

use anyhow::Result;
use crossterm::event::{Event, EventStream};
use futures::StreamExt;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

use crate::model::{Control, PlaybackSnapshot};

use super::input::{map_key, Input};

/// Everything the loop reacts to, processed one at a time
#[derive(Debug)]
pub enum AppEvent {
    Tick,
    Input(Input),
    Resize(u16, u16),
    PlaybackFetched(Result<PlaybackSnapshot>),
    CommandCompleted(Control, Result<()>),
    ArtReady { url: String, result: Result<String> },
}

/// Sends a `Tick` every `period`, the first one immediately
pub fn spawn_ticker(tx: UnboundedSender<AppEvent>, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        loop {
            interval.tick().await;
            if tx.send(AppEvent::Tick).is_err() {
                break;
            }
        }
    })
}

/// Forwards key presses and resizes from the terminal
pub fn spawn_terminal_events(tx: UnboundedSender<AppEvent>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut reader = EventStream::new();
        while let Some(event) = reader.next().await {
            let app_event = match event {
                Ok(Event::Key(key)) => match map_key(key) {
                    Some(input) => AppEvent::Input(input),
                    None => continue,
                },
                Ok(Event::Resize(width, height)) => AppEvent::Resize(width, height),
                Ok(_) => continue,
                Err(e) => {
                    tracing::error!(error = %e, "Terminal event stream failed");
                    break;
                }
            };
            if tx.send(app_event).is_err() {
                break;
            }
        }
    })
}
