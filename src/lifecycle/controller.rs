//! Server lifecycle controller.
//!
//! # Responsibilities
//! - Own the listener's start/stop sequence
//! - Run the accept/serve loop on a background task
//! - Report startup success or failure to the foreground
//! - Drain in-flight connections within a bounded deadline
//!
//! # Design Decisions
//! - `start` never blocks: binding happens on the background task, and the
//!   outcome travels back over an explicit startup channel instead of being
//!   visible only in the logs
//! - A startup failure is not fatal; the foreground keeps waiting for the
//!   interrupt so the operator decides when the process dies
//! - The drain deadline is computed when the shutdown trigger arrives; once
//!   it elapses, remaining connection tasks are aborted

use std::convert::Infallible;
use std::net::SocketAddr;
use std::time::Duration;

use axum::http::Request;
use axum::response::Response;
use hyper::body::Incoming;
use hyper_util::rt::{TokioExecutor, TokioIo, TokioTimer};
use hyper_util::server::conn::auto;
use hyper_util::server::graceful::GracefulShutdown;
use hyper_util::service::TowerToHyperService;
use tokio::sync::{oneshot, watch};
use tokio::task::{JoinHandle, JoinSet};
use tower::Service;

use crate::config::ServerConfig;
use crate::lifecycle::signals;
use crate::net::{ConnectionId, IdleTimeout, Listener, ListenerError};

/// Listener state, for lifecycle tracking.
///
/// Transitions only move forward: Created → Running → Draining → Stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerState {
    /// The controller holds the configuration but the serve task has not
    /// been spawned; handles are only ever handed out past this point.
    Created,
    /// The serve task owns the listener (or is still trying to bind it).
    Running,
    /// Shutdown triggered; in-flight connections are finishing.
    Draining,
    /// The serve task has ended; the process is about to exit.
    Stopped,
}

impl std::fmt::Display for ServerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ServerState::Created => "created",
            ServerState::Running => "running",
            ServerState::Draining => "draining",
            ServerState::Stopped => "stopped",
        };
        f.write_str(name)
    }
}

/// Owns the full run loop of one network listener.
pub struct LifecycleController {
    config: ServerConfig,
}

impl LifecycleController {
    /// Create a controller for the given configuration.
    pub fn new(config: ServerConfig) -> Self {
        Self { config }
    }

    /// Start the listener on a background task and return immediately.
    ///
    /// The handler can be any cloneable service that turns an HTTP request
    /// into a response; an [`axum::Router`] qualifies. Bind failures are
    /// delivered through the handle (see [`ServerHandle::started`]) and do
    /// not take the foreground down.
    pub fn start<S>(self, handler: S) -> ServerHandle
    where
        S: Service<Request<Incoming>, Response = Response, Error = Infallible>
            + Clone
            + Send
            + 'static,
        S::Future: Send,
    {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let (started_tx, started_rx) = oneshot::channel();

        let join = tokio::spawn(serve(self.config.clone(), handler, shutdown_rx, started_tx));

        tracing::debug!(
            from = %ServerState::Created,
            to = %ServerState::Running,
            "lifecycle transition"
        );
        ServerHandle {
            config: self.config,
            join,
            shutdown_tx,
            started_rx: Some(started_rx),
            local_addr: None,
            state: ServerState::Running,
        }
    }
}

/// The running listener instance. Owned exclusively by the controller's
/// caller for its entire life; shutdown consumes it, so the state machine
/// cannot move backward.
pub struct ServerHandle {
    config: ServerConfig,
    join: JoinHandle<()>,
    shutdown_tx: watch::Sender<bool>,
    started_rx: Option<oneshot::Receiver<Result<SocketAddr, ListenerError>>>,
    local_addr: Option<SocketAddr>,
    state: ServerState,
}

impl ServerHandle {
    /// Wait for the background task to report its bind outcome.
    ///
    /// Returns the bound address on success. The error is yielded once; the
    /// handle itself stays usable so shutdown still works after a failure.
    pub async fn started(&mut self) -> Result<SocketAddr, ListenerError> {
        if let Some(rx) = self.started_rx.take() {
            match rx.await {
                Ok(Ok(addr)) => self.local_addr = Some(addr),
                Ok(Err(err)) => return Err(err),
                Err(_) => return Err(ListenerError::Closed),
            }
        }
        self.local_addr.ok_or(ListenerError::Closed)
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ServerState {
        self.state
    }

    /// Block until exactly one interrupt arrives, then drain and stop.
    ///
    /// Only the interrupt signal is registered; terminate/quit/kill bypass
    /// graceful shutdown entirely. A listener that failed to start is logged
    /// here at error level while the wait continues.
    pub async fn wait_and_shutdown(mut self) {
        let interrupt = signals::interrupt();
        tokio::pin!(interrupt);

        if let Some(rx) = self.started_rx.take() {
            tokio::select! {
                _ = &mut interrupt => {
                    self.shutdown().await;
                    return;
                }
                startup = rx => match startup {
                    Ok(Ok(addr)) => self.local_addr = Some(addr),
                    Ok(Err(err)) => {
                        tracing::error!(error = %err, "server failed to start, still waiting for interrupt");
                    }
                    Err(_) => {
                        tracing::error!("server task exited before startup, still waiting for interrupt");
                    }
                }
            }
        }

        (&mut interrupt).await;
        self.shutdown().await;
    }

    /// Stop accepting new connections and drain within the configured
    /// deadline. Connections still open when the deadline elapses are
    /// forcibly closed. Always ends in `Stopped`.
    pub async fn shutdown(mut self) -> ServerState {
        self.transition(ServerState::Draining);
        let _ = self.shutdown_tx.send(true);

        // The serve task bounds its own drain with shutdown_wait; allow a
        // scheduling epsilon before giving up on the join itself.
        let grace = self.config.shutdown_wait + Duration::from_secs(1);
        match tokio::time::timeout(grace, &mut self.join).await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => {
                tracing::error!(error = %err, "server task failed during drain");
            }
            Err(_) => {
                self.join.abort();
                tracing::warn!("server task overran the drain deadline, aborted");
            }
        }

        self.transition(ServerState::Stopped);
        tracing::info!("shutting down");
        self.state
    }

    fn transition(&mut self, next: ServerState) {
        tracing::debug!(from = %self.state, to = %next, "lifecycle transition");
        self.state = next;
    }
}

/// Accept/serve loop run on the background task.
///
/// Reports the bind outcome over `started_tx`, serves until the shutdown
/// trigger flips, then drains: the listener is dropped first so no new
/// connections are accepted, in-flight connections get until the deadline,
/// and whatever remains is aborted.
async fn serve<S>(
    config: ServerConfig,
    handler: S,
    mut shutdown_rx: watch::Receiver<bool>,
    started_tx: oneshot::Sender<Result<SocketAddr, ListenerError>>,
) where
    S: Service<Request<Incoming>, Response = Response, Error = Infallible> + Clone + Send + 'static,
    S::Future: Send,
{
    let listener = match Listener::bind(&config).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!(error = %err, "failed to start server");
            let _ = started_tx.send(Err(err));
            return;
        }
    };

    let local_addr = match listener.local_addr() {
        Ok(addr) => addr,
        Err(source) => {
            let err = ListenerError::Bind {
                addr: config.bind_address.clone(),
                source,
            };
            tracing::error!(error = %err, "failed to start server");
            let _ = started_tx.send(Err(err));
            return;
        }
    };

    let _ = started_tx.send(Ok(local_addr));
    tracing::info!(address = %local_addr, "server started");

    let mut builder = auto::Builder::new(TokioExecutor::new());
    builder
        .http1()
        .timer(TokioTimer::new())
        .header_read_timeout(config.read_timeout);
    builder.http2().timer(TokioTimer::new());

    let graceful = GracefulShutdown::new();
    let mut connections: JoinSet<()> = JoinSet::new();

    loop {
        tokio::select! {
            _ = shutdown_rx.changed() => break,
            accepted = listener.accept() => {
                let (stream, peer_addr) = match accepted {
                    Ok(pair) => pair,
                    Err(err) => {
                        tracing::warn!(error = %err, "accept failed");
                        continue;
                    }
                };

                let id = ConnectionId::new();
                tracing::debug!(connection_id = %id, peer_addr = %peer_addr, "connection accepted");

                let io = TokioIo::new(IdleTimeout::new(stream, config.idle_timeout));
                let service = TowerToHyperService::new(handler.clone());
                let conn = graceful.watch(
                    builder
                        .serve_connection_with_upgrades(io, service)
                        .into_owned(),
                );
                connections.spawn(async move {
                    if let Err(err) = conn.await {
                        tracing::debug!(connection_id = %id, error = %err, "connection closed with error");
                    }
                });
            }
            Some(_) = connections.join_next() => {}
        }
    }

    // Stop accepting immediately, then drain until done or deadline.
    drop(listener);
    tracing::info!(
        active_connections = connections.len(),
        wait = ?config.shutdown_wait,
        "draining connections"
    );

    match tokio::time::timeout(config.shutdown_wait, graceful.shutdown()).await {
        Ok(()) => tracing::info!("drain complete"),
        Err(_) => {
            tracing::warn!(
                remaining = connections.len(),
                "drain deadline elapsed, closing remaining connections"
            );
            connections.shutdown().await;
        }
    }
}
