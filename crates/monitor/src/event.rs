// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 the evalsrc authors

//! The two variants of `SourceEvent`, each carrying its input payload and a
//! single-use reply channel.
//!
//! Each event is consumed by value when the engine calls `done`, which is
//! how a second `done()` call on the same event is made a compile-time
//! impossibility rather than a runtime check: there is only ever one
//! `BeginRegEvent`/`EndRegEvent` value, and `done` takes `self`.

use evalsrc_core::{FinalState, Goal, SourceError, Urn};
use tokio::sync::oneshot;

/// A unit of work flowing from the monitor to the iterator, completed by
/// the engine calling [`BeginRegEvent::done`] or [`EndRegEvent::done`].
#[derive(Debug)]
pub enum SourceEvent {
    Begin(BeginRegEvent),
    End(EndRegEvent),
}

/// Produced by a `BeginRegisterResource` call. The engine must call
/// [`done`](Self::done) with the assigned URN before the program is allowed
/// to observe it — the RPC blocks on the reply channel until that happens.
#[derive(Debug)]
pub struct BeginRegEvent {
    goal: Goal,
    reply: oneshot::Sender<Urn>,
}

impl BeginRegEvent {
    pub(crate) fn new(goal: Goal) -> (Self, oneshot::Receiver<Urn>) {
        let (reply, rx) = oneshot::channel();
        (Self { goal, reply }, rx)
    }

    pub fn goal(&self) -> &Goal {
        &self.goal
    }

    /// Deliver the engine's assigned URN, unblocking the parked RPC.
    ///
    /// Fails only if the monitor was cancelled and the RPC side has already
    /// given up waiting.
    pub fn done(self, urn: Urn) -> Result<(), SourceError> {
        self.reply.send(urn).map_err(|_| SourceError::Cancelled)
    }
}

/// Produced by an `EndRegisterResource` call. The engine must call
/// [`done`](Self::done) with the final state before the program is allowed
/// to observe the resource's ID and outputs.
#[derive(Debug)]
pub struct EndRegEvent {
    urn: Urn,
    extras: evalsrc_core::PropertyMap,
    reply: oneshot::Sender<FinalState>,
}

impl EndRegEvent {
    pub(crate) fn new(
        urn: Urn,
        extras: evalsrc_core::PropertyMap,
    ) -> (Self, oneshot::Receiver<FinalState>) {
        let (reply, rx) = oneshot::channel();
        (Self { urn, extras, reply }, rx)
    }

    pub fn urn(&self) -> &Urn {
        &self.urn
    }

    pub fn extras(&self) -> &evalsrc_core::PropertyMap {
        &self.extras
    }

    /// Deliver the engine's final state, unblocking the parked RPC.
    pub fn done(self, final_state: FinalState) -> Result<(), SourceError> {
        self.reply.send(final_state).map_err(|_| SourceError::Cancelled)
    }
}
