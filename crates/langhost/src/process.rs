// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 the evalsrc authors

//! A process-based [`LanguageHost`]/[`LanguageRuntime`]: runs the entry
//! program as a child process, piping its stdio and reaping it on exit, in
//! the manner of a coop-style agent spawn adapted to a single one-shot
//! program instead of a long-lived sidecar.

use crate::runtime::{LanguageHost, LanguageRuntime, RunRequest, RunSummary};
use async_trait::async_trait;
use evalsrc_core::SourceError;
use std::collections::HashMap;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, warn};

/// Resolves each runtime tag to the interpreter used to execute the entry
/// program, e.g. `{"nodejs": "node", "python": "python3"}`. A tag with no
/// entry runs `program` directly, treating it as already executable.
#[derive(Debug, Clone, Default)]
pub struct ProcessLanguageHost {
    interpreters: HashMap<String, String>,
}

impl ProcessLanguageHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_interpreter(mut self, runtime: impl Into<String>, command: impl Into<String>) -> Self {
        self.interpreters.insert(runtime.into(), command.into());
        self
    }
}

#[async_trait]
impl LanguageHost for ProcessLanguageHost {
    async fn language_runtime(&self, runtime: &str) -> Result<Box<dyn LanguageRuntime>, SourceError> {
        Ok(Box::new(ProcessLanguageRuntime { interpreter: self.interpreters.get(runtime).cloned() }))
    }
}

struct ProcessLanguageRuntime {
    interpreter: Option<String>,
}

#[async_trait]
impl LanguageRuntime for ProcessLanguageRuntime {
    async fn run(&self, request: RunRequest) -> Result<RunSummary, SourceError> {
        let mut command = match &self.interpreter {
            Some(interpreter) => {
                let mut command = Command::new(interpreter);
                command.arg(&request.program);
                command
            }
            None => Command::new(&request.program),
        };

        command
            .args(&request.args)
            .current_dir(&request.pwd)
            .env("EVALSRC_MONITOR_ADDRESS", request.monitor_address.to_string())
            .env("EVALSRC_STACK", &request.stack)
            .env("EVALSRC_PROJECT", &request.project)
            .env("EVALSRC_DRY_RUN", request.dry_run.to_string())
            .env("EVALSRC_PARALLEL", request.parallel.to_string())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        for (key, value) in &request.config {
            command.env(format!("EVALSRC_CONFIG_{key}"), value);
        }

        debug!(program = %request.program.display(), "spawning language runtime program");
        let child = command
            .spawn()
            .map_err(|e| SourceError::LaunchFailed(format!("failed to spawn program: {e}")))?;

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| SourceError::LaunchFailed(format!("failed to wait on program: {e}")))?;

        if output.status.success() {
            return Ok(RunSummary::default());
        }

        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        let message = if stderr.is_empty() {
            format!("program exited with status {}", output.status)
        } else {
            stderr
        };
        warn!(%message, "language runtime program reported an error");
        Ok(RunSummary { program_error: Some(message) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    fn request(pwd: &Path, program: PathBuf, args: Vec<String>) -> RunRequest {
        RunRequest {
            stack: "dev".to_string(),
            project: "proj".to_string(),
            pwd: pwd.to_path_buf(),
            program,
            args,
            config: Default::default(),
            dry_run: false,
            parallel: 0,
            monitor_address: SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::LOCALHOST, 1)),
        }
    }

    #[tokio::test]
    async fn successful_program_reports_no_error() {
        let workspace = TempDir::new().unwrap();
        let runtime = ProcessLanguageRuntime { interpreter: None };
        let summary = runtime
            .run(request(workspace.path(), PathBuf::from("/bin/true"), vec![]))
            .await
            .unwrap();
        assert!(summary.program_error.is_none());
    }

    #[tokio::test]
    async fn failing_program_surfaces_stderr_as_the_program_error() {
        let workspace = TempDir::new().unwrap();
        let interpreter = "/bin/sh".to_string();
        let runtime = ProcessLanguageRuntime { interpreter: Some(interpreter) };
        let summary = runtime
            .run(request(
                workspace.path(),
                PathBuf::from("-c"),
                vec!["echo boom 1>&2; exit 1".to_string()],
            ))
            .await
            .unwrap();
        assert_eq!(summary.program_error.as_deref(), Some("boom"));
    }

    #[tokio::test]
    async fn program_runs_with_cwd_set_to_its_scratch_directory() {
        let workspace = TempDir::new().unwrap();
        let interpreter = "/bin/sh".to_string();
        let runtime = ProcessLanguageRuntime { interpreter: Some(interpreter) };
        let summary = runtime
            .run(request(
                workspace.path(),
                PathBuf::from("-c"),
                vec!["echo hi > marker.txt".to_string()],
            ))
            .await
            .unwrap();
        assert!(summary.program_error.is_none());
        assert!(workspace.path().join("marker.txt").exists());
    }

    #[tokio::test]
    async fn host_resolves_any_runtime_tag_to_a_runtime_handle() {
        let host = ProcessLanguageHost::new().with_interpreter("nodejs", "node");
        assert!(host.language_runtime("nodejs").await.is_ok());
        // Tags without a configured interpreter still resolve — the
        // program is run directly, treated as already executable.
        assert!(host.language_runtime("go").await.is_ok());
    }
}
