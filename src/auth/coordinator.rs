//! Listener lifecycle and the blocking wait for the handoff

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::sync::{mpsc, watch};

use crate::error::AuthError;

use super::callback::{router, CallbackContext, CallbackOutcome, CodeExchange};

/// Owns one authorization attempt: the callback listeners and the receiving
/// end of their handoff channel. Dropping it shuts the listeners down.
pub struct AuthorizationCoordinator<S> {
    outcomes: mpsc::UnboundedReceiver<CallbackOutcome<S>>,
    shutdown: watch::Sender<bool>,
    local_addr: SocketAddr,
}

/// Binds every address `host` resolves to on one port.
///
/// The first address must bind. Later ones reuse its port (so port 0 still
/// yields a single port) and are skipped with a warning if they fail, e.g.
/// `::1` on a host without IPv6.
async fn bind_all(host: &str, port: u16) -> Result<Vec<TcpListener>, AuthError> {
    let bind_err = |source: io::Error| AuthError::Bind {
        addr: format!("{host}:{port}"),
        source,
    };

    let mut addrs: Vec<SocketAddr> = Vec::new();
    for addr in tokio::net::lookup_host((host, port)).await.map_err(bind_err)? {
        if !addrs.contains(&addr) {
            addrs.push(addr);
        }
    }
    let Some((first, rest)) = addrs.split_first() else {
        return Err(bind_err(io::Error::new(
            io::ErrorKind::AddrNotAvailable,
            "host resolved to no addresses",
        )));
    };

    let primary = TcpListener::bind(*first).await.map_err(bind_err)?;
    let bound_port = primary.local_addr().map_err(bind_err)?.port();
    let mut listeners = vec![primary];

    for addr in rest {
        let addr = SocketAddr::new(addr.ip(), bound_port);
        match TcpListener::bind(addr).await {
            Ok(listener) => listeners.push(listener),
            Err(e) => tracing::warn!(%addr, error = %e, "Skipping callback address"),
        }
    }
    Ok(listeners)
}

impl<S: Send + 'static> AuthorizationCoordinator<S> {
    /// Binds the callback listeners and starts serving them in the background.
    pub async fn bind<E>(
        host: &str,
        port: u16,
        callback_path: &str,
        expected_state: String,
        exchange: E,
        exchange_timeout: Duration,
    ) -> Result<Self, AuthError>
    where
        E: CodeExchange<Session = S>,
    {
        let listeners = bind_all(host, port).await?;
        let local_addr = listeners[0].local_addr().map_err(|source| AuthError::Bind {
            addr: format!("{host}:{port}"),
            source,
        })?;

        let (tx, outcomes) = mpsc::unbounded_channel();
        let ctx = Arc::new(CallbackContext::new(expected_state, exchange, exchange_timeout, tx));
        let app = router(ctx, callback_path);

        let (shutdown, shutdown_rx) = watch::channel(false);
        for listener in listeners {
            let addr = listener.local_addr().ok();
            let mut shutdown_rx = shutdown_rx.clone();
            let server = axum::serve(listener, app.clone()).with_graceful_shutdown(async move {
                // Resolves on the signal or when the coordinator is gone
                let _ = shutdown_rx.changed().await;
            });
            tokio::spawn(async move {
                if let Err(e) = server.await {
                    tracing::error!(?addr, error = %e, "Callback listener failed");
                }
                tracing::debug!(?addr, "Callback listener stopped");
            });
            tracing::info!(?addr, callback_path, "Callback listener ready");
        }

        Ok(Self {
            outcomes,
            shutdown,
            local_addr,
        })
    }

    /// Address of the first listener; its port is shared by all of them
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Blocks until a callback produces a session or a fatal outcome.
    ///
    /// State mismatches are logged and waited past. `timeout` of `None`
    /// waits indefinitely.
    pub async fn wait(mut self, timeout: Option<Duration>) -> Result<S, AuthError> {
        let deadline = timeout.map(|limit| (limit, tokio::time::Instant::now() + limit));

        loop {
            let next = match deadline {
                Some((limit, at)) => tokio::time::timeout_at(at, self.outcomes.recv())
                    .await
                    .map_err(|_| AuthError::TimedOut(limit))?,
                None => self.outcomes.recv().await,
            };

            match next {
                Some(CallbackOutcome::Success(session)) => return Ok(session),
                Some(CallbackOutcome::StateMismatch) => {
                    tracing::warn!("Ignoring callback with mismatched state, still waiting");
                }
                Some(CallbackOutcome::Denied(reason)) => return Err(AuthError::Denied(reason)),
                Some(CallbackOutcome::ExchangeFailure(message)) => {
                    return Err(AuthError::Exchange(message));
                }
                None => return Err(AuthError::ListenerClosed),
            }
        }
    }
}

impl<S> Drop for AuthorizationCoordinator<S> {
    fn drop(&mut self) {
        self.shutdown.send_replace(true);
    }
}
