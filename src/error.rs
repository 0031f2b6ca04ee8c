use std::time::Duration;

use thiserror::Error;

use crate::model::Control;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing environment variable {0}")]
    Missing(&'static str),
    #[error("invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid redirect URI {uri}: {reason}")]
    InvalidRedirect { uri: String, reason: String },
    #[error("failed to bind callback listener on {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Spotify client error: {0}")]
    Client(#[from] rspotify::ClientError),
    #[error("authorization denied: {0}")]
    Denied(String),
    #[error("failed to exchange authorization code: {0}")]
    Exchange(String),
    #[error("callback listener stopped before authorization completed")]
    ListenerClosed,
    #[error("no authorization callback received within {0:?}")]
    TimedOut(Duration),
}

#[derive(Debug, Error)]
pub enum LoopError {
    #[error("failed to fetch playback state: {0}")]
    Fetch(String),
    #[error("{control} command failed: {message}")]
    Command { control: Control, message: String },
    #[error("terminal error: {0}")]
    Io(#[from] std::io::Error),
}
