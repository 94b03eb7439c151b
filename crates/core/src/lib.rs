// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 the evalsrc authors

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! evalsrc-core: shared data model for the evaluation source.
//!
//! Holds the types that flow between a language-runtime subprocess and the
//! planning engine: [`RunInfo`], [`Goal`], [`Urn`], [`FinalState`], and the
//! [`PropertyValue`] map that stands in for the engine-wide property codec.
//! None of the planning logic itself lives here — only the shapes the
//! monitor and iterator pass back and forth.

pub mod error;
pub mod goal;
pub mod options;
pub mod package;
pub mod property;
pub mod state;

pub use error::SourceError;
pub use goal::Goal;
pub use options::IterateOptions;
pub use package::{PackageName, RunInfo, Target};
pub use property::{MarshalOptions, PropertyMap, PropertyValue};
pub use state::{CheckFailure, FinalState};

/// A stack-unique resource identifier assigned by the engine.
///
/// Format is opaque to this crate: the engine allocates it, this crate only
/// carries it. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Urn(String);

impl Urn {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for Urn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for Urn {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for Urn {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl AsRef<str> for Urn {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
