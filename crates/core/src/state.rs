// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 the evalsrc authors

//! The engine's response to `EndRegisterResource`.

use crate::property::PropertyMap;

/// Per-property feedback from a provider's `Invoke` or `Check`, describing
/// an invalid input. Not an RPC error — typed structured feedback returned
/// alongside a normal response.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CheckFailure {
    pub property: String,
    pub reason: String,
}

/// The authoritative post-step attribute snapshot for a resource.
#[derive(Debug, Clone, PartialEq)]
pub struct State {
    synthesized: PropertyMap,
}

impl State {
    pub fn new(synthesized: PropertyMap) -> Self {
        Self { synthesized }
    }

    /// The subset of attributes to send back to the program.
    pub fn synthesized(&self) -> &PropertyMap {
        &self.synthesized
    }
}

/// The engine's response to an `EndRegisterResource` call.
#[derive(Debug, Clone, PartialEq)]
pub struct FinalState {
    /// The resource's assigned ID; empty for non-custom resources.
    id: String,
    state: State,
    /// `true` if all returned values are stable across dry-runs.
    stable: bool,
    /// Property names known to be stable when the whole object is not.
    stables: Vec<String>,
}

impl FinalState {
    pub fn new(id: impl Into<String>, state: State, stable: bool, stables: Vec<String>) -> Self {
        Self { id: id.into(), state, stable, stables }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn stable(&self) -> bool {
        self.stable
    }

    pub fn stables(&self) -> &[String] {
        &self.stables
    }
}
