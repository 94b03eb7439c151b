// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 the evalsrc authors

//! Translates each incoming RPC into either a side-channel provider call
//! (`Invoke`) or a [`SourceEvent`] pushed to the iterator, then blocks the
//! RPC until the engine has replied.

use crate::event::{BeginRegEvent, EndRegEvent, SourceEvent};
use crate::provider::ProviderHost;
use evalsrc_core::{Goal, SourceError, Urn};
use evalsrc_wire::RpcRequest;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Shared context handed to every connection handler.
pub(crate) struct MonitorCtx {
    pub(crate) provider_host: Arc<dyn ProviderHost>,
    pub(crate) begin_tx: mpsc::Sender<BeginRegEvent>,
    pub(crate) end_tx: mpsc::Sender<EndRegEvent>,
    pub(crate) cancel: CancellationToken,
}

/// Dispatch one decoded request, returning the RPC response payload.
///
/// `Invoke` is a synchronous side-channel call and never touches the event
/// channels; the two register calls always produce exactly one
/// [`SourceEvent`] and block on its reply.
pub(crate) async fn dispatch(
    request: RpcRequest,
    ctx: &MonitorCtx,
) -> Result<evalsrc_wire::RpcResponse, SourceError> {
    match request {
        RpcRequest::Invoke { tok, args } => invoke(ctx, tok, args).await,
        RpcRequest::BeginRegisterResource { type_token, name, parent, custom, object } => {
            begin_register_resource(ctx, type_token, name, parent, custom, object).await
        }
        RpcRequest::EndRegisterResource { urn, extras } => {
            end_register_resource(ctx, urn, extras).await
        }
    }
}

async fn invoke(
    ctx: &MonitorCtx,
    tok: String,
    args: evalsrc_core::PropertyMap,
) -> Result<evalsrc_wire::RpcResponse, SourceError> {
    let package = tok.split(':').next().unwrap_or(&tok).to_string();
    let provider = ctx.provider_host.provider(&package).await.map_err(|_| {
        SourceError::ProviderNotFound(package.clone())
    })?;
    let (return_props, failures) = provider.invoke(&tok, &args).await?;
    Ok(evalsrc_wire::RpcResponse::Invoke { return_props, failures })
}

async fn begin_register_resource(
    ctx: &MonitorCtx,
    type_token: String,
    name: String,
    parent: String,
    custom: bool,
    object: evalsrc_core::PropertyMap,
) -> Result<evalsrc_wire::RpcResponse, SourceError> {
    // The wire layer already decodes `object` into typed `PropertyValue`s,
    // so unmarshalling here is just adopting it as the goal's property map —
    // `KeepUnknowns`/`ComputeAssetHashes` apply at the codec boundary this
    // crate sits behind, not to an already-typed value.
    let goal = Goal::new(type_token, name, custom, object, parent);
    let (event, reply_rx) = BeginRegEvent::new(goal);

    send_event(ctx, SourceEvent::Begin(event)).await?;

    let urn: Urn = tokio::select! {
        result = reply_rx => result.map_err(|_| SourceError::Cancelled)?,
        _ = ctx.cancel.cancelled() => return Err(SourceError::Cancelled),
    };
    Ok(evalsrc_wire::RpcResponse::BeginRegisterResource { urn: urn.into_string() })
}

async fn end_register_resource(
    ctx: &MonitorCtx,
    urn: String,
    extras: evalsrc_core::PropertyMap,
) -> Result<evalsrc_wire::RpcResponse, SourceError> {
    if urn.is_empty() {
        return Err(SourceError::MissingUrn);
    }
    let (event, reply_rx) = EndRegEvent::new(Urn::new(urn), extras);

    send_event(ctx, SourceEvent::End(event)).await?;

    let final_state = tokio::select! {
        result = reply_rx => result.map_err(|_| SourceError::Cancelled)?,
        _ = ctx.cancel.cancelled() => return Err(SourceError::Cancelled),
    };
    Ok(evalsrc_wire::RpcResponse::EndRegisterResource {
        id: final_state.id().to_string(),
        object: final_state.state().synthesized().clone(),
        stable: final_state.stable(),
        stables: final_state.stables().to_vec(),
    })
}

/// Send one event on the channel matching its variant, racing cancellation
/// so a parked `Begin`/`EndRegisterResource` call unblocks with a
/// structured error instead of hanging when the monitor is torn down.
async fn send_event(ctx: &MonitorCtx, event: SourceEvent) -> Result<(), SourceError> {
    match event {
        SourceEvent::Begin(event) => {
            tokio::select! {
                result = ctx.begin_tx.send(event) => result.map_err(|_| SourceError::Cancelled),
                _ = ctx.cancel.cancelled() => Err(SourceError::Cancelled),
            }
        }
        SourceEvent::End(event) => {
            tokio::select! {
                result = ctx.end_tx.send(event) => result.map_err(|_| SourceError::Cancelled),
                _ = ctx.cancel.cancelled() => Err(SourceError::Cancelled),
            }
        }
    }
}
