// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 the evalsrc authors

//! Factory/lifecycle holder for one evaluation of one program against one
//! target environment.

use crate::iterator::SourceIterator;
use evalsrc_core::{IterateOptions, PackageName, RunInfo, SourceError};
use evalsrc_langhost::LanguageHost;
use evalsrc_monitor::{MonitorConfig, Monitor, ProviderHost};
use std::sync::Arc;
use tracing::info;

/// One evaluation of one program against one target environment. Produces
/// a fresh [`SourceIterator`] per call to [`iterate`](EvalSource::iterate).
pub struct EvalSource {
    run_info: Arc<RunInfo>,
    provider_host: Arc<dyn ProviderHost>,
    language_host: Arc<dyn LanguageHost>,
    monitor_config: MonitorConfig,
}

impl EvalSource {
    pub fn new(
        run_info: RunInfo,
        provider_host: Arc<dyn ProviderHost>,
        language_host: Arc<dyn LanguageHost>,
    ) -> Self {
        Self {
            run_info: Arc::new(run_info),
            provider_host,
            language_host,
            monitor_config: MonitorConfig::default(),
        }
    }

    pub fn with_monitor_config(mut self, config: MonitorConfig) -> Self {
        self.monitor_config = config;
        self
    }

    /// The package this run is evaluating.
    pub fn pkg(&self) -> &PackageName {
        &self.run_info.pkg
    }

    /// The full run descriptor, for diagnostics.
    pub fn info(&self) -> &RunInfo {
        &self.run_info
    }

    /// Construct the monitor, wire it to a fresh iterator, and — unless
    /// this run is a destroy — start the program driver.
    pub async fn iterate(&self, options: IterateOptions) -> Result<SourceIterator, SourceError> {
        let (monitor, begin_rx, end_rx) =
            Monitor::bind(self.monitor_config, Arc::clone(&self.provider_host)).await?;

        if self.run_info.destroy {
            info!("destroy run: monitor bound but no program will be launched");
            // No traffic will ever arrive; a receiver that's immediately
            // dropped still lets the monitor construct and close cleanly.
            let (_finish_tx, finish_rx) = tokio::sync::oneshot::channel();
            return Ok(SourceIterator::new(monitor, begin_rx, end_rx, finish_rx, None, true));
        }

        let (driver_handle, finish_rx) = evalsrc_langhost::spawn(
            Arc::clone(&self.run_info),
            monitor.address(),
            Arc::clone(&self.language_host),
            options,
        );

        Ok(SourceIterator::new(monitor, begin_rx, end_rx, finish_rx, Some(driver_handle), false))
    }

    /// No-op: the plugin host's broader teardown happens externally, in
    /// the caller that owns it.
    pub fn close(&self) -> Result<(), SourceError> {
        Ok(())
    }
}
