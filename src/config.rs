//! Runtime configuration sourced from the environment

use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;

use rand::{distributions::Alphanumeric, Rng};

use crate::error::ConfigError;

pub const CLIENT_ID_VAR: &str = "SPOTIFY_ID";
pub const CLIENT_SECRET_VAR: &str = "SPOTIFY_SECRET";
pub const REDIRECT_URI_VAR: &str = "SPOTIFY_REDIRECT_URI";
pub const AUTH_TIMEOUT_VAR: &str = "SPOTIFY_AUTH_TIMEOUT_SECS";
pub const LOG_FILTER_VAR: &str = "RUST_LOG";
pub const LOG_DIR_VAR: &str = "SPOTIFY_NOWPLAYING_LOG_DIR";

/// Must match the redirect URI registered with the Spotify application
pub const DEFAULT_REDIRECT_URI: &str = "http://localhost:8080/callback";
pub const SCOPES: &str =
    "user-read-currently-playing user-read-playback-state user-modify-playback-state";

const REFRESH_INTERVAL: Duration = Duration::from_secs(1);
/// Upper bound on the token request made while a callback is open
const EXCHANGE_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_LOG_DIR: &str = ".logs";
pub const DEFAULT_LOG_FILTER: &str = "spotify_nowplaying=debug,rspotify=info,warn";
const STATE_TOKEN_LEN: usize = 16;
pub const ART_HEIGHT: u16 = 15;
// Terminal cells are roughly 2.5 times taller than wide
pub const ART_WIDTH: u16 = (ART_HEIGHT as f32 * 2.5) as u16;

/// Everything the authorization handshake needs
#[derive(Clone, Debug)]
pub struct AuthConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub scopes: HashSet<String>,
    /// Anti-forgery token round-tripped through the redirect
    pub state: String,
    /// Unbounded when `None`
    pub timeout: Option<Duration>,
    pub exchange_timeout: Duration,
}

/// Where the log file goes and what ends up in it
#[derive(Clone, Debug)]
pub struct LogConfig {
    pub dir: PathBuf,
    /// `EnvFilter` directives
    pub filter: String,
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub auth: AuthConfig,
    pub log: LogConfig,
    pub refresh_interval: Duration,
    pub art_width: u16,
    pub art_height: u16,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        let required = |name: &'static str| {
            lookup(name)
                .filter(|value| !value.trim().is_empty())
                .ok_or(ConfigError::Missing(name))
        };

        let client_id = required(CLIENT_ID_VAR)?;
        let client_secret = required(CLIENT_SECRET_VAR)?;
        let redirect_uri = lookup(REDIRECT_URI_VAR)
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_REDIRECT_URI.to_string());

        let timeout = match lookup(AUTH_TIMEOUT_VAR) {
            Some(value) => {
                let secs: u64 = value.trim().parse().map_err(|_| ConfigError::Invalid {
                    name: AUTH_TIMEOUT_VAR,
                    value: value.clone(),
                })?;
                (secs > 0).then(|| Duration::from_secs(secs))
            }
            None => None,
        };

        let non_empty = |name: &'static str| lookup(name).filter(|value| !value.trim().is_empty());
        let log = LogConfig {
            dir: non_empty(LOG_DIR_VAR)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_DIR)),
            filter: non_empty(LOG_FILTER_VAR).unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
        };

        Ok(Self {
            auth: AuthConfig {
                client_id,
                client_secret,
                redirect_uri,
                scopes: SCOPES.split_whitespace().map(str::to_string).collect(),
                state: random_state(),
                timeout,
                exchange_timeout: EXCHANGE_TIMEOUT,
            },
            log,
            refresh_interval: REFRESH_INTERVAL,
            art_width: ART_WIDTH,
            art_height: ART_HEIGHT,
        })
    }
}

fn random_state() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(STATE_TOKEN_LEN)
        .map(char::from)
        .collect()
}
