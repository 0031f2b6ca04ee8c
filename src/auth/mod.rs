//! OAuth authorization-code handshake with Spotify
//!
//! - `callback`: Handlers for the provider's redirect
//! - `coordinator`: Callback listener lifecycle and the blocking handoff

mod callback;
mod coordinator;

use anyhow::Result;
use async_trait::async_trait;
use rspotify::{prelude::*, AuthCodeSpotify, Config, Credentials, OAuth};
use url::{Host, Url};

use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::model::SpotifyClient;

use callback::CodeExchange;
use coordinator::AuthorizationCoordinator;

/// Exchanges codes through rspotify's token endpoint
struct SpotifyExchange {
    client: AuthCodeSpotify,
}

#[async_trait]
impl CodeExchange for SpotifyExchange {
    type Session = SpotifyClient;

    async fn exchange(&self, code: &str) -> Result<SpotifyClient> {
        self.client.request_token(code).await?;
        tracing::debug!("Access token received");
        Ok(SpotifyClient::new(self.client.clone()))
    }
}

/// Where the callback listener has to live for a given redirect URI
#[derive(Debug, PartialEq, Eq)]
struct ListenerTarget {
    host: String,
    port: u16,
    path: String,
}

fn listener_target(redirect_uri: &str) -> Result<ListenerTarget, AuthError> {
    let invalid = |reason: &str| AuthError::InvalidRedirect {
        uri: redirect_uri.to_string(),
        reason: reason.to_string(),
    };

    let url = Url::parse(redirect_uri).map_err(|e| invalid(&e.to_string()))?;
    if url.scheme() != "http" {
        return Err(invalid("the local listener only speaks plain http"));
    }
    let host = match url.host() {
        Some(Host::Domain(domain)) => domain.to_string(),
        Some(Host::Ipv4(addr)) => addr.to_string(),
        Some(Host::Ipv6(addr)) => addr.to_string(),
        None => return Err(invalid("missing host")),
    };
    let port = url.port_or_known_default().ok_or_else(|| invalid("missing port"))?;

    Ok(ListenerTarget {
        host,
        port,
        path: url.path().to_string(),
    })
}

/// Runs the full handshake and returns the authenticated session.
///
/// The listener is bound before the authorization URL is shown, so the
/// provider can never redirect to a port nobody is listening on.
pub async fn authorize(config: &AuthConfig) -> Result<SpotifyClient, AuthError> {
    let target = listener_target(&config.redirect_uri)?;

    let spotify = AuthCodeSpotify::with_config(
        Credentials::new(&config.client_id, &config.client_secret),
        OAuth {
            redirect_uri: config.redirect_uri.clone(),
            state: config.state.clone(),
            scopes: config.scopes.clone(),
            ..Default::default()
        },
        Config {
            token_cached: false,
            token_refreshing: false,
            ..Default::default()
        },
    );

    let coordinator = AuthorizationCoordinator::bind(
        &target.host,
        target.port,
        &target.path,
        config.state.clone(),
        SpotifyExchange {
            client: spotify.clone(),
        },
        config.exchange_timeout,
    )
    .await?;

    let url = spotify.get_authorize_url(false)?;
    println!("Login to Spotify at the following link, if it doesn't automatically open: {url}");
    if let Err(e) = webbrowser::open(&url) {
        tracing::warn!(error = %e, "Could not open browser, waiting for manual login");
    }

    tracing::info!(addr = %coordinator.local_addr(), "Waiting for authorization callback");
    let session = coordinator.wait(config.timeout).await?;
    tracing::info!("Authorization completed");
    Ok(session)
}
