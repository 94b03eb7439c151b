// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 the evalsrc authors

//! The narrow slice of the plugin-host contract this crate calls into for
//! the `Invoke` side channel: locating a provider by package name and
//! invoking a function on it. Provider CRUD and the plugin host's broader
//! subprocess-discovery responsibilities are out of scope.

use async_trait::async_trait;
use evalsrc_core::{CheckFailure, PropertyMap, SourceError};
use std::sync::Arc;

/// A plugin offering invoke operations for a class of resource types.
#[async_trait]
pub trait Provider: Send + Sync {
    async fn invoke(
        &self,
        tok: &str,
        args: &PropertyMap,
    ) -> Result<(PropertyMap, Vec<CheckFailure>), SourceError>;
}

/// Looks up the provider responsible for a package, the one call this
/// crate needs from the plugin host.
#[async_trait]
pub trait ProviderHost: Send + Sync {
    async fn provider(&self, package: &str) -> Result<Arc<dyn Provider>, SourceError>;
}
