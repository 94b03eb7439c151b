// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 the evalsrc authors

//! The local RPC server presented to the language runtime.
//!
//! Binds an ephemeral loopback port at construction time, spawns its own
//! accept loop, and hands each connection off to its own task — one
//! request/response pair per connection. `cancel` cancels the accept loop
//! and every in-flight connection, then awaits teardown.

use crate::handlers::{self, MonitorCtx};
use crate::event::{BeginRegEvent, EndRegEvent};
use crate::provider::ProviderHost;
use evalsrc_core::SourceError;
use evalsrc_wire::{ProtocolError, RpcResponse};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Knobs for the monitor's transport: bind address and per-connection
/// timeout, independent of any broader engine configuration.
#[derive(Debug, Clone, Copy)]
pub struct MonitorConfig {
    /// Loopback address to bind; almost always `127.0.0.1`.
    pub bind_host: std::net::Ipv4Addr,
    /// How long a single connection may take to send its request and
    /// receive its response before being dropped.
    pub ipc_timeout: Duration,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self { bind_host: std::net::Ipv4Addr::LOCALHOST, ipc_timeout: Duration::from_secs(60) }
    }
}

/// The local RPC server exposing `Invoke`, `BeginRegisterResource`, and
/// `EndRegisterResource` to the language runtime.
pub struct Monitor {
    address: SocketAddr,
    cancel: CancellationToken,
    accept_task: JoinHandle<()>,
}

impl Monitor {
    /// Bind a fresh ephemeral port and start accepting connections.
    ///
    /// Returns the monitor handle plus the two event receivers the
    /// iterator reads from.
    pub async fn bind(
        config: MonitorConfig,
        provider_host: Arc<dyn ProviderHost>,
    ) -> Result<(Self, mpsc::Receiver<BeginRegEvent>, mpsc::Receiver<EndRegEvent>), SourceError> {
        let listener = TcpListener::bind((config.bind_host, 0))
            .await
            .map_err(SourceError::MonitorBind)?;
        let address = listener.local_addr().map_err(SourceError::MonitorBind)?;
        info!(%address, "monitor bound");

        // Capacity 1 is the closest tokio's bounded mpsc comes to an
        // unbuffered channel (tokio does not support zero-capacity
        // channels); see DESIGN.md for the ordering caveat this implies
        // under truly concurrent senders.
        let (begin_tx, begin_rx) = mpsc::channel(1);
        let (end_tx, end_rx) = mpsc::channel(1);
        let cancel = CancellationToken::new();

        let ctx = Arc::new(MonitorCtx { provider_host, begin_tx, end_tx, cancel: cancel.clone() });
        let accept_task = tokio::spawn(accept_loop(listener, ctx, config.ipc_timeout, cancel.clone()));

        Ok((Self { address, cancel, accept_task }, begin_rx, end_rx))
    }

    /// The bind address handed to the language runtime on startup.
    pub fn address(&self) -> SocketAddr {
        self.address
    }

    /// Cancel the accept loop and every in-flight connection, and await
    /// teardown. Safe to call even if a connection is parked waiting on an
    /// event reply — that RPC unblocks with [`SourceError::Cancelled`]
    /// instead of hanging.
    pub async fn cancel(self) -> Result<(), SourceError> {
        self.cancel.cancel();
        self.accept_task.await.map_err(|e| SourceError::Shutdown(std::io::Error::other(e)))
    }
}

async fn accept_loop(
    listener: TcpListener,
    ctx: Arc<MonitorCtx>,
    timeout: Duration,
    cancel: CancellationToken,
) {
    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                debug!("monitor accept loop cancelled");
                break;
            }
            accepted = listener.accept() => {
                match accepted {
                    Ok((stream, peer)) => {
                        debug!(%peer, "monitor connection accepted");
                        let ctx = Arc::clone(&ctx);
                        tokio::spawn(async move {
                            if let Err(e) = handle_connection(stream, &ctx, timeout).await {
                                log_connection_error(e);
                            }
                        });
                    }
                    Err(e) => error!(error = %e, "monitor accept error"),
                }
            }
        }
    }
}

async fn handle_connection(
    mut stream: TcpStream,
    ctx: &MonitorCtx,
    timeout: Duration,
) -> Result<(), ProtocolError> {
    let request = evalsrc_wire::read_request(&mut stream, timeout).await?;
    let response = match handlers::dispatch(request, ctx).await {
        Ok(response) => response,
        Err(e) => RpcResponse::Error { message: e.to_string() },
    };
    evalsrc_wire::write_response(&mut stream, &response, timeout).await
}

fn log_connection_error(e: ProtocolError) {
    match e {
        ProtocolError::ConnectionClosed => debug!("language runtime disconnected"),
        ProtocolError::Timeout => warn!("monitor connection timed out"),
        other => error!(error = %other, "monitor connection error"),
    }
}

#[cfg(test)]
mod server_tests;
