// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 the evalsrc authors

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! evalsrc-langhost: launches the language-runtime subprocess and reports
//! its termination back to the iterator.

mod driver;
mod process;
mod runtime;

pub use driver::spawn;
pub use process::{ProcessLanguageHost};
pub use runtime::{LanguageHost, LanguageRuntime, RunRequest, RunSummary};
