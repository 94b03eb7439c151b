// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 the evalsrc authors

//! The engine-facing pull interface.

use evalsrc_core::SourceError;
use evalsrc_monitor::{Monitor, SourceEvent};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::info;

/// Blocks on [`next`](SourceIterator::next) and returns the next resource
/// event, or end-of-stream (optionally carrying the program's error).
///
/// A pull-driven selector that unifies forward progress (new resources)
/// with termination (program exit) into a single stream: the engine may
/// interleave `next()` with its own step-execution work freely, and
/// backpressure to the program is automatic because the monitor's RPC
/// reply is only sent after the engine calls `done(...)`.
pub struct SourceIterator {
    done: bool,
    destroy: bool,
    monitor: Monitor,
    begin_rx: mpsc::Receiver<evalsrc_monitor::BeginRegEvent>,
    end_rx: mpsc::Receiver<evalsrc_monitor::EndRegEvent>,
    finish_rx: oneshot::Receiver<Option<SourceError>>,
    // Kept alive for the iterator's lifetime; the driver is a detached task
    // that always completes on its own (it sends exactly one finish value),
    // so the handle is never awaited here.
    _driver_handle: Option<JoinHandle<()>>,
}

impl SourceIterator {
    pub(crate) fn new(
        monitor: Monitor,
        begin_rx: mpsc::Receiver<evalsrc_monitor::BeginRegEvent>,
        end_rx: mpsc::Receiver<evalsrc_monitor::EndRegEvent>,
        finish_rx: oneshot::Receiver<Option<SourceError>>,
        driver_handle: Option<JoinHandle<()>>,
        destroy: bool,
    ) -> Self {
        Self {
            done: false,
            destroy,
            monitor,
            begin_rx,
            end_rx,
            finish_rx,
            _driver_handle: driver_handle,
        }
    }

    /// Returns the next resource event, or `Ok(None)` at end-of-stream.
    /// `Err` carries the program's error when it terminated abnormally.
    ///
    /// The three readiness sources (a pending begin event, a pending end
    /// event, a program-finish signal) race with no priority among them —
    /// the default, unbiased behavior of `tokio::select!`.
    pub async fn next(&mut self) -> Result<Option<SourceEvent>, SourceError> {
        if self.done {
            return Ok(None);
        }
        if self.destroy {
            self.done = true;
            return Ok(None);
        }

        tokio::select! {
            Some(event) = self.begin_rx.recv() => Ok(Some(SourceEvent::Begin(event))),
            Some(event) = self.end_rx.recv() => Ok(Some(SourceEvent::End(event))),
            result = &mut self.finish_rx => {
                self.done = true;
                match result {
                    Ok(Some(err)) => Err(err),
                    Ok(None) => Ok(None),
                    // The driver task was dropped without sending — treat
                    // as a clean end-of-stream rather than panicking the
                    // engine loop.
                    Err(_recv_error) => Ok(None),
                }
            }
        }
    }

    /// Cancel the monitor and await its shutdown.
    pub async fn close(self) -> Result<(), SourceError> {
        info!("closing iterator");
        self.monitor.cancel().await
    }
}
