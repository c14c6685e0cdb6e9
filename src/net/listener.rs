//! TCP listener for the service.
//!
//! # Responsibilities
//! - Bind to the configured address
//! - Accept incoming TCP connections
//! - Surface bind and accept failures as typed errors

use std::net::SocketAddr;

use thiserror::Error;
use tokio::net::{TcpListener, TcpStream};

use crate::config::ServerConfig;

/// Error type for listener operations.
#[derive(Debug, Error)]
pub enum ListenerError {
    /// Failed to bind to the configured address. Also covers syntactically
    /// invalid addresses, which are only detected here.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        /// The configured bind address.
        addr: String,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Failed to accept a connection.
    #[error("failed to accept connection: {0}")]
    Accept(#[from] std::io::Error),

    /// The listener task went away before reporting its address.
    #[error("listener closed before startup completed")]
    Closed,
}

/// Listening socket for one server lifecycle.
pub struct Listener {
    inner: TcpListener,
}

impl Listener {
    /// Bind to the address in `config`.
    pub async fn bind(config: &ServerConfig) -> Result<Self, ListenerError> {
        let inner = TcpListener::bind(&config.bind_address)
            .await
            .map_err(|source| ListenerError::Bind {
                addr: config.bind_address.clone(),
                source,
            })?;

        let local_addr = inner.local_addr().map_err(|source| ListenerError::Bind {
            addr: config.bind_address.clone(),
            source,
        })?;

        tracing::info!(address = %local_addr, "listener bound");

        Ok(Self { inner })
    }

    /// Accept the next connection.
    pub async fn accept(&self) -> Result<(TcpStream, SocketAddr), ListenerError> {
        let (stream, peer_addr) = self.inner.accept().await?;
        Ok((stream, peer_addr))
    }

    /// Get the local address this listener is bound to.
    pub fn local_addr(&self) -> Result<SocketAddr, std::io::Error> {
        self.inner.local_addr()
    }
}
