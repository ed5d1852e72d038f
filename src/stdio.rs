//! Stdio transport — read loop, dispatch, and response writing.
//!
//! One JSON-RPC message per line on stdin, one response per line on stdout.
//! Stdout carries protocol traffic only; all logging goes to stderr. Every
//! request is dispatched on its own task, so one call's retry waits never
//! stall the requests queued behind it — responses are correlated by id,
//! not by arrival order. A single writer task owns stdout.

use crate::protocol::{
    error_codes, methods, IncomingMessage, RequestId, RpcError, RpcResponse, MCP_PROTOCOL_VERSION,
};
use crate::relay::Relay;
use crate::types::{Error, Result, StdioConfig};
use serde_json::{json, Value};
use std::pin::Pin;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Stdio server wrapping the relay.
#[derive(Debug)]
pub struct StdioServer {
    relay: Arc<Relay>,
    cancel: CancellationToken,
    config: StdioConfig,
}

/// Outcome of reading one inbound line.
enum LineRead {
    Line(String),
    /// Line exceeded the cap; it was drained to its terminator unread.
    Oversized,
    Eof,
}

impl StdioServer {
    pub fn new(relay: Arc<Relay>, cancel: CancellationToken, config: StdioConfig) -> Self {
        Self {
            relay,
            cancel,
            config,
        }
    }

    /// Run over stdin/stdout until EOF or shutdown.
    pub async fn serve(&self) -> std::io::Result<()> {
        self.run(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
            .await
    }

    /// Transport-agnostic server loop; tests drive it over in-memory pipes.
    pub async fn run<R, W>(&self, mut reader: R, writer: W) -> std::io::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let (tx, rx) = mpsc::channel::<RpcResponse>(self.config.response_channel_capacity);
        let writer_task = tokio::spawn(write_responses(writer, rx));

        loop {
            tokio::select! {
                _ = self.cancel.cancelled() => {
                    tracing::info!("stdio server shutting down");
                    break;
                }
                read = read_limited_line(&mut reader, self.config.max_line_bytes) => {
                    match read? {
                        LineRead::Eof => {
                            tracing::info!("stdin closed, stopping");
                            break;
                        }
                        LineRead::Oversized => {
                            tracing::warn!(
                                "dropping request line over {} bytes",
                                self.config.max_line_bytes,
                            );
                            // The line was discarded unread, so there is no id
                            // to echo back.
                            let response = RpcResponse::failure(
                                RequestId::Null,
                                RpcError::new(error_codes::INVALID_REQUEST, "request too large"),
                            );
                            if tx.send(response).await.is_err() {
                                break;
                            }
                        }
                        LineRead::Line(line) => {
                            let trimmed = line.trim();
                            if trimmed.is_empty() {
                                continue;
                            }

                            let message: IncomingMessage = match serde_json::from_str(trimmed) {
                                Ok(message) => message,
                                Err(e) => {
                                    tracing::warn!("unparsable request line: {}", e);
                                    if let Some(id) = recover_id(trimmed) {
                                        let response = RpcResponse::failure(
                                            id,
                                            RpcError::new(
                                                error_codes::PARSE_ERROR,
                                                format!("parse error: {}", e),
                                            ),
                                        );
                                        if tx.send(response).await.is_err() {
                                            break;
                                        }
                                    }
                                    continue;
                                }
                            };

                            let Some(id) = message.id.clone() else {
                                // Notifications get no response.
                                tracing::debug!("notification received: {}", message.method);
                                continue;
                            };

                            // One task per request; the writer serializes output.
                            let relay = self.relay.clone();
                            let tx = tx.clone();
                            tokio::spawn(async move {
                                let response = match dispatch(&relay, &message).await {
                                    Ok(result) => RpcResponse::success(id, result),
                                    Err(e) => RpcResponse::failure(
                                        id,
                                        RpcError::new(e.to_rpc_error_code(), e.to_string()),
                                    ),
                                };
                                let _ = tx.send(response).await;
                            });
                        }
                    }
                }
            }
        }

        // In-flight dispatch tasks hold sender clones; the writer drains
        // their responses before exiting.
        drop(tx);
        match writer_task.await {
            Ok(result) => result,
            Err(e) => Err(std::io::Error::other(e)),
        }
    }
}

/// Route an inbound request to the relay.
async fn dispatch(relay: &Relay, message: &IncomingMessage) -> Result<Value> {
    match message.method.as_str() {
        methods::INITIALIZE => Ok(json!({
            "protocolVersion": MCP_PROTOCOL_VERSION,
            "capabilities": { "tools": {} },
            "serverInfo": {
                "name": env!("CARGO_PKG_NAME"),
                "version": env!("CARGO_PKG_VERSION"),
            },
        })),
        methods::PING => Ok(json!({})),
        methods::TOOLS_LIST => {
            let tools = relay.handle_list_tools(message.params.clone()).await;
            Ok(json!({ "tools": tools }))
        }
        methods::TOOLS_CALL => Ok(relay.handle_call_tool(message.params.clone()).await),
        other => Err(Error::method_not_found(other.to_string())),
    }
}

/// Read one newline-terminated line without buffering more than `max` bytes
/// of it. An over-limit line is consumed up to its terminator and reported
/// as `Oversized`.
async fn read_limited_line<R: AsyncBufRead + Unpin>(
    reader: &mut R,
    max: usize,
) -> std::io::Result<LineRead> {
    let mut buf = Vec::new();
    let read = (&mut *reader)
        .take(max as u64 + 1)
        .read_until(b'\n', &mut buf)
        .await?;
    if read == 0 {
        return Ok(LineRead::Eof);
    }
    if buf.ends_with(b"\n") || buf.len() <= max {
        return Ok(LineRead::Line(String::from_utf8_lossy(&buf).into_owned()));
    }

    // Over the cap: discard what was read and skip ahead to the next line.
    loop {
        let available = reader.fill_buf().await?;
        if available.is_empty() {
            break; // EOF inside the oversized line
        }
        match available.iter().position(|&b| b == b'\n') {
            Some(pos) => {
                Pin::new(&mut *reader).consume(pos + 1);
                break;
            }
            None => {
                let len = available.len();
                Pin::new(&mut *reader).consume(len);
            }
        }
    }
    Ok(LineRead::Oversized)
}

/// Decide whether a rejected line still deserves a response. Non-JSON lines
/// get the prescribed null id; JSON carrying an id has it echoed back; JSON
/// without one was a notification and stays unanswered.
fn recover_id(raw: &str) -> Option<RequestId> {
    let Ok(value) = serde_json::from_str::<Value>(raw) else {
        return Some(RequestId::Null);
    };
    match value.get("id") {
        Some(id) if !id.is_null() => serde_json::from_value::<RequestId>(id.clone()).ok(),
        _ => None,
    }
}

async fn write_responses<W: AsyncWrite + Unpin>(
    mut writer: W,
    mut rx: mpsc::Receiver<RpcResponse>,
) -> std::io::Result<()> {
    while let Some(response) = rx.recv().await {
        write_response(&mut writer, &response).await?;
    }
    Ok(())
}

async fn write_response<W: AsyncWrite + Unpin>(
    writer: &mut W,
    response: &RpcResponse,
) -> std::io::Result<()> {
    let encoded = serde_json::to_string(response).map_err(|e| {
        tracing::error!("response encoding failed: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
    })?;
    writer.write_all(encoded.as_bytes()).await?;
    writer.write_all(b"\n").await?;
    writer.flush().await?;
    Ok(())
}
