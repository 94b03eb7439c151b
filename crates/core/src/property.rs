// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 the evalsrc authors

//! Stand-in for the engine-wide canonical property codec.
//!
//! The real system marshals resource properties through a codec shared
//! across every provider and the planning engine (out of scope here). This
//! module gives that codec a concrete in-memory shape so the rest of the
//! crate — and the wire protocol in `evalsrc-wire` — has something to
//! serialize: a small closed value type with an explicit "unknown" sentinel
//! and an asset reference, the two special cases [`MarshalOptions`] controls.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A property value, as exchanged between the language runtime and the
/// engine. Mirrors JSON plus two sentinels the engine cares about:
/// [`PropertyValue::Unknown`] (a value not yet known during a dry-run) and
/// [`PropertyValue::Asset`] (a reference the engine may digest).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value")]
pub enum PropertyValue {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Vec<PropertyValue>),
    Object(PropertyMap),
    /// A value the program referenced but that isn't known yet (e.g. during
    /// a dry-run preview). Preserved only when `keep_unknowns` is set.
    Unknown,
    /// A reference to an asset or archive; the digest is computed
    /// externally when `compute_asset_hashes` is set. Carrying a `None`
    /// hash through unmarshal is the documented hook for that future layer.
    Asset { uri: String, hash: Option<String> },
}

impl PropertyValue {
    pub fn is_unknown(&self) -> bool {
        matches!(self, PropertyValue::Unknown)
    }
}

/// An ordered property map. `BTreeMap` keeps iteration order deterministic,
/// which matters for round-trip codec tests.
pub type PropertyMap = BTreeMap<String, PropertyValue>;

/// The two marshal options: whether to keep `Unknown` sentinels instead of
/// dropping them, and whether asset references should have their digest
/// computed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MarshalOptions {
    pub keep_unknowns: bool,
    pub compute_asset_hashes: bool,
}

impl MarshalOptions {
    pub const KEEP_UNKNOWNS: Self =
        Self { keep_unknowns: true, compute_asset_hashes: true };
}

/// Encode a property map to its wire representation (canonical JSON).
pub fn marshal(props: &PropertyMap, opts: MarshalOptions) -> serde_json::Value {
    let mut out = serde_json::Map::new();
    for (key, value) in props {
        if value.is_unknown() && !opts.keep_unknowns {
            continue;
        }
        out.insert(key.clone(), serde_json::to_value(value).unwrap_or(serde_json::Value::Null));
    }
    serde_json::Value::Object(out)
}

/// Decode a property map from its wire representation.
///
/// `opts.keep_unknowns` only affects encoding; unmarshal always preserves
/// whatever sentinels are present so a round trip through `marshal` with
/// `keep_unknowns=true` is lossless.
pub fn unmarshal(value: &serde_json::Value, _opts: MarshalOptions) -> PropertyMap {
    match value.as_object() {
        Some(map) => map
            .iter()
            .filter_map(|(k, v)| serde_json::from_value::<PropertyValue>(v.clone()).ok().map(|pv| (k.clone(), pv)))
            .collect(),
        None => PropertyMap::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn arb_leaf() -> impl Strategy<Value = PropertyValue> {
        prop_oneof![
            Just(PropertyValue::Null),
            any::<bool>().prop_map(PropertyValue::Bool),
            any::<i32>().prop_map(|n| PropertyValue::Number(n as f64)),
            ".*".prop_map(PropertyValue::String),
        ]
    }

    fn arb_value() -> impl Strategy<Value = PropertyValue> {
        arb_leaf().prop_recursive(3, 16, 4, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..4).prop_map(PropertyValue::Array),
                prop::collection::btree_map("[a-z]{1,5}", inner, 0..4).prop_map(PropertyValue::Object),
            ]
        })
    }

    fn arb_map() -> impl Strategy<Value = PropertyMap> {
        prop::collection::btree_map("[a-z]{1,5}", arb_value(), 0..6)
    }

    proptest! {
        #[test]
        fn round_trip_preserves_known_values(map in arb_map()) {
            let wire = marshal(&map, MarshalOptions::KEEP_UNKNOWNS);
            let back = unmarshal(&wire, MarshalOptions::KEEP_UNKNOWNS);
            prop_assert_eq!(back, map);
        }
    }

    #[yare::parameterized(
        null = { "n", PropertyValue::Null },
        bool_true = { "b", PropertyValue::Bool(true) },
        number = { "n2", PropertyValue::Number(12.5) },
        string = { "s", PropertyValue::String("x".into()) },
        unknown_sentinel = { "pending", PropertyValue::Unknown },
        asset_without_hash = { "bundle", PropertyValue::Asset { uri: "file://a.zip".into(), hash: None } },
        asset_with_hash = { "bundle2", PropertyValue::Asset { uri: "file://b.zip".into(), hash: Some("deadbeef".into()) } },
    )]
    fn single_value_round_trips_when_unknowns_kept(key: &str, value: PropertyValue) {
        let mut map = PropertyMap::new();
        map.insert(key.to_string(), value);
        let wire = marshal(&map, MarshalOptions::KEEP_UNKNOWNS);
        let back = unmarshal(&wire, MarshalOptions::KEEP_UNKNOWNS);
        assert_eq!(back, map);
    }

    #[test]
    fn unknown_sentinel_dropped_when_not_kept() {
        let mut map = PropertyMap::new();
        map.insert("known".to_string(), PropertyValue::String("x".into()));
        map.insert("pending".to_string(), PropertyValue::Unknown);
        let opts = MarshalOptions { keep_unknowns: false, compute_asset_hashes: false };
        let wire = marshal(&map, opts);
        assert!(wire.get("pending").is_none());
        assert!(wire.get("known").is_some());
    }
}
