// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 the evalsrc authors

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! evalsrc-wire: the framed IPC protocol between the language runtime and
//! the monitor.
//!
//! Wire format: 4-byte length prefix (big-endian) + JSON payload.

mod message;
mod rpc;

pub use message::{decode, encode, read_message, write_message, ProtocolError, MAX_FRAME_BYTES};
pub use rpc::{RpcRequest, RpcResponse};

use std::time::Duration;
use tokio::io::{AsyncRead, AsyncWrite};

/// Read one [`RpcRequest`] off the wire.
pub async fn read_request<R>(reader: &mut R, timeout: Duration) -> Result<RpcRequest, ProtocolError>
where
    R: AsyncRead + Unpin,
{
    read_message(reader, timeout).await
}

/// Write one [`RpcResponse`] to the wire.
pub async fn write_response<W>(
    writer: &mut W,
    response: &RpcResponse,
    timeout: Duration,
) -> Result<(), ProtocolError>
where
    W: AsyncWrite + Unpin,
{
    write_message(writer, response, timeout).await
}
