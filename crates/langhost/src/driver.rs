// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 the evalsrc authors

//! The detached task that launches the language-runtime subprocess and
//! reports its termination back to the iterator.

use crate::runtime::{LanguageHost, RunRequest};
use evalsrc_core::{IterateOptions, RunInfo, SourceError};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// Spawn the program driver as a detached task.
///
/// Resolves the language-runtime plugin, launches the program against it,
/// and always sends exactly one value on the returned finish channel — a
/// `None` on clean exit, or `Some(error)` describing why the program run
/// did not complete. The channel is a `oneshot`, which is inherently
/// single-use, so a shutting down iterator can never observe more than one
/// completion.
pub fn spawn(
    run_info: Arc<RunInfo>,
    monitor_address: SocketAddr,
    language_host: Arc<dyn LanguageHost>,
    options: IterateOptions,
) -> (JoinHandle<()>, oneshot::Receiver<Option<SourceError>>) {
    let (finish_tx, finish_rx) = oneshot::channel();
    let handle = tokio::spawn(async move {
        let result = run(&run_info, monitor_address, language_host.as_ref(), options).await;
        if let Err(ref e) = result {
            error!(error = %e, "program run ended with an error");
        } else {
            info!("program run completed");
        }
        let _ = finish_tx.send(result.err());
    });
    (handle, finish_rx)
}

async fn run(
    run_info: &RunInfo,
    monitor_address: SocketAddr,
    language_host: &dyn LanguageHost,
    options: IterateOptions,
) -> Result<(), SourceError> {
    // Resolve the runtime plugin; on failure, compose a descriptive error
    // and skip straight to reporting it.
    let runtime = language_host
        .language_runtime(&run_info.pkg.runtime)
        .await
        .map_err(|e| SourceError::LaunchFailed(e.to_string()))?;

    // `runtime` (the plugin handle) is a local binding dropped at the end
    // of this function on every exit path, releasing it via ordinary RAII
    // rather than an explicit cleanup step.
    let request = RunRequest {
        stack: run_info.target.stack.clone(),
        project: run_info.pkg.name.clone(),
        pwd: run_info.pwd.clone(),
        program: run_info.program.clone(),
        args: run_info.args.clone(),
        config: run_info.target.config.clone(),
        dry_run: run_info.dry_run,
        parallel: options.parallel,
        monitor_address,
    };
    let summary = runtime.run(request).await?;

    // A non-empty program-error string is lifted to a hard error.
    match summary.program_error {
        Some(message) if !message.is_empty() => Err(SourceError::ProgramError(message)),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::{LanguageRuntime, RunSummary};
    use async_trait::async_trait;
    use evalsrc_core::{PackageName, Target};
    use std::net::{Ipv4Addr, SocketAddrV4};

    struct FakeRuntime {
        summary: RunSummary,
    }

    #[async_trait]
    impl LanguageRuntime for FakeRuntime {
        async fn run(&self, _request: RunRequest) -> Result<RunSummary, SourceError> {
            Ok(self.summary.clone())
        }
    }

    struct FakeHost {
        runtime_tag: &'static str,
        summary: RunSummary,
    }

    #[async_trait]
    impl LanguageHost for FakeHost {
        async fn language_runtime(&self, runtime: &str) -> Result<Box<dyn LanguageRuntime>, SourceError> {
            if runtime != self.runtime_tag {
                return Err(SourceError::LanguageRuntimeNotFound(runtime.to_string()));
            }
            Ok(Box::new(FakeRuntime { summary: self.summary.clone() }))
        }
    }

    fn run_info(runtime: &str) -> Arc<RunInfo> {
        let pkg = PackageName { name: "prog".into(), runtime: runtime.into() };
        Arc::new(RunInfo::new(pkg, "/tmp".into(), "/tmp/index.js".into(), Target::default()))
    }

    fn addr() -> SocketAddr {
        SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::LOCALHOST, 12345))
    }

    #[tokio::test]
    async fn clean_exit_sends_none_on_finish_channel() {
        let host = Arc::new(FakeHost { runtime_tag: "nodejs", summary: RunSummary::default() });
        let (handle, finish_rx) = spawn(run_info("nodejs"), addr(), host, IterateOptions::default());
        let result = finish_rx.await.unwrap();
        handle.await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn unhandled_program_error_is_lifted_to_an_error() {
        let host = Arc::new(FakeHost {
            runtime_tag: "nodejs",
            summary: RunSummary { program_error: Some("boom".to_string()) },
        });
        let (_handle, finish_rx) = spawn(run_info("nodejs"), addr(), host, IterateOptions::default());
        let result = finish_rx.await.unwrap();
        match result {
            Some(SourceError::ProgramError(message)) => {
                assert_eq!(message, "boom");
            }
            other => panic!("expected a program error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_language_runtime_reports_launch_failed() {
        let host = Arc::new(FakeHost { runtime_tag: "python", summary: RunSummary::default() });
        let (_handle, finish_rx) = spawn(run_info("nodejs"), addr(), host, IterateOptions::default());
        let result = finish_rx.await.unwrap();
        assert!(matches!(result, Some(SourceError::LaunchFailed(_))));
    }

    #[tokio::test]
    async fn empty_program_error_string_is_treated_as_clean_exit() {
        let host = Arc::new(FakeHost {
            runtime_tag: "nodejs",
            summary: RunSummary { program_error: Some(String::new()) },
        });
        let (_handle, finish_rx) = spawn(run_info("nodejs"), addr(), host, IterateOptions::default());
        let result = finish_rx.await.unwrap();
        assert!(result.is_none());
    }
}
