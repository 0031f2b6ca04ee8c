//! HTTP handlers for the OAuth redirect

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Html,
    routing::get,
    Router,
};
use serde::Deserialize;
use tokio::sync::{mpsc::UnboundedSender, Mutex};

const SUCCESS_PAGE: &str = r#"
<!doctype html>
<html>
<head><title>Success</title></head>
<body><h1>Authentication Successful!</h1><p>You can close this window.</p><script>window.close();</script></body>
</html>
"#;
const STATE_MISMATCH_PAGE: &str =
    "<!doctype html><html><body><h1>Invalid authorization state</h1></body></html>";
const DENIED_PAGE: &str =
    "<!doctype html><html><body><h1>Authorization was denied</h1></body></html>";
const MISSING_CODE_PAGE: &str =
    "<!doctype html><html><body><h1>Missing authorization code</h1></body></html>";
const EXCHANGE_FAILED_PAGE: &str =
    "<!doctype html><html><body><h1>Could not complete authorization</h1></body></html>";
const EXCHANGE_TIMED_OUT_PAGE: &str =
    "<!doctype html><html><body><h1>Spotify did not answer in time</h1></body></html>";
const ALREADY_COMPLETE_PAGE: &str =
    "<!doctype html><html><body><h1>Authorization already completed</h1></body></html>";

/// Turns an authorization code into an authenticated session
#[async_trait]
pub trait CodeExchange: Send + Sync + 'static {
    type Session: Send + 'static;

    async fn exchange(&self, code: &str) -> Result<Self::Session>;
}

/// What a single callback request amounted to
#[derive(Debug)]
pub enum CallbackOutcome<S> {
    Success(S),
    StateMismatch,
    Denied(String),
    ExchangeFailure(String),
}

/// State shared by the callback handlers of one authorization attempt
pub struct CallbackContext<E: CodeExchange> {
    expected_state: String,
    exchange: E,
    exchange_timeout: Duration,
    /// Taken on success so a session is handed off at most once
    handoff: Mutex<Option<UnboundedSender<CallbackOutcome<E::Session>>>>,
}

impl<E: CodeExchange> CallbackContext<E> {
    pub fn new(
        expected_state: String,
        exchange: E,
        exchange_timeout: Duration,
        handoff: UnboundedSender<CallbackOutcome<E::Session>>,
    ) -> Self {
        Self {
            expected_state,
            exchange,
            exchange_timeout,
            handoff: Mutex::new(Some(handoff)),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    code: Option<String>,
    state: Option<String>,
    error: Option<String>,
}

pub fn router<E: CodeExchange>(ctx: Arc<CallbackContext<E>>, callback_path: &str) -> Router {
    let mut router = Router::new().route(callback_path, get(handle_callback::<E>));
    if callback_path != "/" {
        router = router.route("/", get(index));
    }
    router.with_state(ctx)
}

async fn index() -> StatusCode {
    StatusCode::OK
}

async fn handle_callback<E: CodeExchange>(
    State(ctx): State<Arc<CallbackContext<E>>>,
    Query(params): Query<CallbackParams>,
) -> (StatusCode, Html<&'static str>) {
    // Held for the whole request so concurrent callbacks cannot both succeed
    let mut handoff = ctx.handoff.lock().await;
    let Some(tx) = handoff.clone() else {
        tracing::debug!("Callback received after authorization completed");
        return (StatusCode::GONE, Html(ALREADY_COMPLETE_PAGE));
    };

    if params.state.as_deref() != Some(ctx.expected_state.as_str()) {
        tracing::warn!(state = ?params.state, "Rejected callback with mismatched state");
        let _ = tx.send(CallbackOutcome::StateMismatch);
        return (StatusCode::BAD_REQUEST, Html(STATE_MISMATCH_PAGE));
    }

    if let Some(error) = params.error {
        tracing::warn!(error = %error, "Authorization denied by user or provider");
        let _ = tx.send(CallbackOutcome::Denied(error));
        return (StatusCode::BAD_REQUEST, Html(DENIED_PAGE));
    }

    let Some(code) = params.code else {
        tracing::warn!("Callback carried a valid state but no code");
        return (StatusCode::BAD_REQUEST, Html(MISSING_CODE_PAGE));
    };

    let exchanged = tokio::time::timeout(ctx.exchange_timeout, ctx.exchange.exchange(&code)).await;
    let Ok(exchanged) = exchanged else {
        tracing::error!(timeout = ?ctx.exchange_timeout, "Token exchange timed out");
        let _ = tx.send(CallbackOutcome::ExchangeFailure(format!(
            "token exchange timed out after {:?}",
            ctx.exchange_timeout
        )));
        return (StatusCode::GATEWAY_TIMEOUT, Html(EXCHANGE_TIMED_OUT_PAGE));
    };

    match exchanged {
        Ok(session) => {
            handoff.take();
            let _ = tx.send(CallbackOutcome::Success(session));
            tracing::info!("Authorization code exchanged for a session");
            (StatusCode::OK, Html(SUCCESS_PAGE))
        }
        Err(e) => {
            tracing::error!(error = %e, "Token exchange failed");
            let _ = tx.send(CallbackOutcome::ExchangeFailure(format!("{e:#}")));
            (StatusCode::INTERNAL_SERVER_ERROR, Html(EXCHANGE_FAILED_PAGE))
        }
    }
}
