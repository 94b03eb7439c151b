// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 the evalsrc authors

//! Error kinds shared across the evaluation-source crates.

use thiserror::Error;

/// Errors surfaced by the evaluation source.
///
/// Grouped by how they surface: setup errors (fatal for the run),
/// RPC-handler errors (surfaced back to the language runtime), and
/// program-termination errors (delivered via the iterator's finish signal).
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("monitor failed to bind a listening port: {0}")]
    MonitorBind(#[source] std::io::Error),

    #[error("failed to unmarshal arguments: {0}")]
    Unmarshal(String),

    #[error("failed to marshal return value: {0}")]
    Marshal(String),

    #[error("no provider found for package {0:?}")]
    ProviderNotFound(String),

    #[error("provider invoke failed: {0}")]
    Invoke(String),

    #[error("EndRegisterResource called with an empty urn")]
    MissingUrn,

    #[error("no language runtime found for runtime tag {0:?}")]
    LanguageRuntimeNotFound(String),

    #[error("an unhandled error occurred: {0}")]
    ProgramError(String),

    #[error("language-runtime plugin failed to launch: {0}")]
    LaunchFailed(String),

    #[error("monitor was cancelled before the engine replied")]
    Cancelled,

    #[error("monitor shutdown failed: {0}")]
    Shutdown(#[source] std::io::Error),
}
