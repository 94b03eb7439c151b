// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 the evalsrc authors

//! The narrow slice of the plugin-host contract this crate calls into for
//! launching the language runtime: resolving a runtime tag to a plugin and
//! asking it to run the program. Subprocess *discovery* — how the plugin
//! host finds and version-matches a runtime plugin — is out of scope.

use async_trait::async_trait;
use evalsrc_core::SourceError;
use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Everything `LanguageRuntime::run` needs, assembled from [`evalsrc_core::RunInfo`]
/// plus the monitor's address and the advisory parallelism hint.
#[derive(Debug, Clone)]
pub struct RunRequest {
    pub stack: String,
    pub project: String,
    pub pwd: PathBuf,
    pub program: PathBuf,
    pub args: Vec<String>,
    pub config: BTreeMap<String, String>,
    pub dry_run: bool,
    pub parallel: u32,
    pub monitor_address: SocketAddr,
}

/// What a completed `Run` reports back.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// A non-empty program error the runtime plugin observed but did not
    /// itself turn into a hard `Err`.
    pub program_error: Option<String>,
}

/// A language-runtime plugin: executes the user's program against a
/// monitor address and reports how it went.
#[async_trait]
pub trait LanguageRuntime: Send + Sync {
    async fn run(&self, request: RunRequest) -> Result<RunSummary, SourceError>;
}

/// Resolves a runtime tag (e.g. `"nodejs"`) to a [`LanguageRuntime`] plugin.
#[async_trait]
pub trait LanguageHost: Send + Sync {
    async fn language_runtime(&self, runtime: &str) -> Result<Box<dyn LanguageRuntime>, SourceError>;
}
