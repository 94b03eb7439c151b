// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 the evalsrc authors

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! evalsrc-source: the evaluation source — `EvalSource` and its
//! `SourceIterator` — tying the monitor and the program driver together
//! into the engine-facing pull interface.

mod eval_source;
mod iterator;

pub use eval_source::EvalSource;
pub use iterator::SourceIterator;

pub use evalsrc_monitor::{MonitorConfig, Provider, ProviderHost, SourceEvent};
