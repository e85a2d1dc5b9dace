//! TCP listener and per-connection request loop.
//!
//! One line in, one line out: each inbound line is a JSON-RPC request
//! envelope, each outbound line the matching response. Connections are
//! handled concurrently and independently; there is no cross-request state
//! beyond what the engine's stores provide.

use std::sync::Arc;

use agora_core::engine::AuthEngine;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio_util::sync::CancellationToken;

use crate::methods::dispatch;
use crate::types::{RpcRequest, RpcResponse, PARSE_ERROR};

/// Accept connections until `cancel` fires.
pub async fn serve(listener: TcpListener, engine: Arc<AuthEngine>, cancel: CancellationToken) {
    let local_addr = listener.local_addr().ok();
    tracing::info!(addr = ?local_addr, "rpc listener started");

    loop {
        tokio::select! {
            () = cancel.cancelled() => {
                tracing::info!("rpc listener stopping");
                break;
            }
            accepted = listener.accept() => {
                match accepted {
                    Ok((stream, peer)) => {
                        let engine = Arc::clone(&engine);
                        let cancel = cancel.clone();
                        tokio::spawn(async move {
                            if let Err(e) = handle_connection(stream, engine, cancel).await {
                                tracing::debug!(%peer, error = %e, "rpc connection closed with error");
                            }
                        });
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "rpc accept failed");
                    }
                }
            }
        }
    }
}

/// Serve one connection: read request lines, write response lines.
async fn handle_connection(
    stream: TcpStream,
    engine: Arc<AuthEngine>,
    cancel: CancellationToken,
) -> std::io::Result<()> {
    let (read_half, mut write_half) = stream.into_split();
    let mut lines = BufReader::new(read_half).lines();

    loop {
        let line = tokio::select! {
            () = cancel.cancelled() => break,
            line = lines.next_line() => line?,
        };
        let Some(line) = line else { break };
        if line.trim().is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<RpcRequest>(&line) {
            Ok(request) => dispatch(&engine, request).await,
            Err(e) => RpcResponse::error(None, PARSE_ERROR, format!("parse error: {e}")),
        };

        // Responses are always a single line; the envelope holds no
        // unescaped newlines.
        let mut out = serde_json::to_vec(&response).unwrap_or_else(|e| {
            tracing::error!(error = %e, "rpc response serialization failed");
            br#"{"jsonrpc":"2.0","error":{"code":-32005,"message":"internal error"},"id":null}"#
                .to_vec()
        });
        out.push(b'\n');
        write_half.write_all(&out).await?;
    }

    Ok(())
}
