// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 the evalsrc authors

//! The `ResourceMonitor` RPC envelope: one request/response pair per
//! connection, covering `Invoke`, `BeginRegisterResource`, and
//! `EndRegisterResource`.

use evalsrc_core::{CheckFailure, PropertyMap};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op")]
pub enum RpcRequest {
    Invoke {
        tok: String,
        args: PropertyMap,
    },
    BeginRegisterResource {
        #[serde(rename = "type")]
        type_token: String,
        name: String,
        parent: String,
        custom: bool,
        object: PropertyMap,
    },
    EndRegisterResource {
        urn: String,
        extras: PropertyMap,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op")]
pub enum RpcResponse {
    Invoke {
        #[serde(rename = "return")]
        return_props: PropertyMap,
        failures: Vec<CheckFailure>,
    },
    BeginRegisterResource {
        urn: String,
    },
    EndRegisterResource {
        id: String,
        object: PropertyMap,
        stable: bool,
        stables: Vec<String>,
    },
    Error {
        message: String,
    },
}
