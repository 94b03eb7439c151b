// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 the evalsrc authors

//! The declared desired state of a single resource.

use crate::property::PropertyMap;

/// The desired-state tuple for one resource, produced by a
/// `BeginRegisterResource` call. Immutable after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Goal {
    /// Fully-qualified provider type token, e.g. `aws:s3:Bucket`.
    type_token: String,
    /// Unique within the parent scope.
    name: String,
    /// `true` if managed by an external provider (has an ID); `false` for a
    /// purely logical/component resource.
    custom: bool,
    /// Possibly containing unresolved/unknown values.
    properties: PropertyMap,
    /// Empty for root-level resources.
    parent: String,
}

impl Goal {
    pub fn new(
        type_token: impl Into<String>,
        name: impl Into<String>,
        custom: bool,
        properties: PropertyMap,
        parent: impl Into<String>,
    ) -> Self {
        Self { type_token: type_token.into(), name: name.into(), custom, properties, parent: parent.into() }
    }

    pub fn type_token(&self) -> &str {
        &self.type_token
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn custom(&self) -> bool {
        self.custom
    }

    pub fn properties(&self) -> &PropertyMap {
        &self.properties
    }

    pub fn parent(&self) -> &str {
        &self.parent
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_goal_has_empty_parent() {
        let goal = Goal::new("aws:s3:Bucket", "b", true, PropertyMap::new(), "");
        assert!(goal.is_root());
    }

    #[test]
    fn child_goal_carries_parent_urn() {
        let goal = Goal::new("aws:s3:BucketObject", "o", true, PropertyMap::new(), "urn:p");
        assert!(!goal.is_root());
        assert_eq!(goal.parent(), "urn:p");
    }
}
