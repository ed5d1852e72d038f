//! Relay core — the two request handlers and the background refresh loop.
//!
//! `tools/list` serves exactly one authoritative list per call: the freshly
//! fetched one when the endpoint answers, otherwise the cached one, otherwise
//! the bundled seed. The lists are never merged. `tools/call` forwards
//! verbatim and resolves every failure into a well-formed error result — it
//! never raises toward the transport.

use crate::cache::ToolCache;
use crate::client::RelayClient;
use crate::protocol::{methods, RequestId, RpcRequest, ToolList};
use crate::schema::normalize_tools;
use crate::seed::seed_tools;
use crate::types::{Config, Error, RefreshConfig, Result};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicI64, Ordering};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

/// Guidance returned to the caller when the remote endpoint cannot be reached.
const CALL_FAILURE_GUIDANCE: &str = "Failed to communicate with the tool endpoint. \
    Ensure the editor extension is installed and its MCP server is shown as running, \
    or point the relay at the right address with --server-url.";

/// The relay engine shared by the stdio server and the refresh loop.
#[derive(Debug)]
pub struct Relay {
    client: RelayClient,
    cache: ToolCache,
    refresh: RefreshConfig,
    next_id: AtomicI64,
}

impl Relay {
    pub fn new(config: &Config) -> Self {
        Self::with_parts(
            RelayClient::new(config.endpoint.base_url.clone(), config.retry.clone()),
            ToolCache::new(&config.cache),
            config.refresh.clone(),
        )
    }

    pub fn with_parts(client: RelayClient, cache: ToolCache, refresh: RefreshConfig) -> Self {
        Self {
            client,
            cache,
            refresh,
            next_id: AtomicI64::new(1),
        }
    }

    /// Fresh correlation identifier for one outbound call. Unique within the
    /// process, which is all the endpoint needs to disambiguate in-flight
    /// requests.
    fn next_id(&self) -> RequestId {
        RequestId::Number(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    /// Serve `tools/list`: remote fetch preferred, cache then seed as the
    /// fallback. Cache persistence failures never alter the response.
    pub async fn handle_list_tools(&self, params: Option<Value>) -> ToolList {
        let fallback = match self.cache.load().await {
            Some(cached) => cached,
            None => seed_tools(),
        };

        let request = RpcRequest::new(self.next_id(), methods::TOOLS_LIST)
            .with_params(params.unwrap_or_else(|| json!({})));

        let tools = match self.fetch_tools(&request).await {
            Ok(tools) => tools,
            Err(e) => {
                tracing::warn!("failed to fetch tool list, serving fallback: {}", e);
                return fallback;
            }
        };

        let tools = normalize_tools(tools);
        if let Err(e) = self.cache.save(&tools).await {
            tracing::warn!("failed to cache tool list: {}", e);
        }
        tools
    }

    /// Serve `tools/call`: forward verbatim, return the remote result
    /// document unchanged. All failure paths resolve to an error result.
    pub async fn handle_call_tool(&self, params: Option<Value>) -> Value {
        let request = RpcRequest::new(self.next_id(), methods::TOOLS_CALL)
            .with_params(params.unwrap_or_else(|| json!({})));

        match self.forward(&request).await {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!("tool call failed: {}", e);
                json!({
                    "isError": true,
                    "content": [{
                        "type": "text",
                        "text": CALL_FAILURE_GUIDANCE,
                    }],
                })
            }
        }
    }

    /// Run refresh cycles on a fixed period until cancelled. The first cycle
    /// fires one full period after startup.
    pub async fn run_refresh_loop(&self, cancel: CancellationToken) {
        let mut ticker = tokio::time::interval(self.refresh.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        ticker.tick().await; // immediate first tick, not a cycle

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::debug!("refresh loop stopped");
                    break;
                }
                _ = ticker.tick() => {
                    self.refresh_cycle().await;
                }
            }
        }
    }

    /// One refresh cycle: fetch, normalize, diff against cache, notify on
    /// change, persist. Any fetch failure silently skips the cycle.
    pub async fn refresh_cycle(&self) {
        let request =
            RpcRequest::new(self.next_id(), methods::TOOLS_LIST).with_params(json!({}));

        let tools = match self.fetch_tools(&request).await {
            Ok(tools) => tools,
            Err(e) => {
                tracing::debug!("refresh cycle skipped: {}", e);
                return;
            }
        };
        let tools = normalize_tools(tools);

        if let Some(cached) = self.cache.load().await {
            if cached == tools {
                tracing::debug!("tool list unchanged ({} tools)", tools.len());
                return;
            }
        }

        if let Err(e) = self.client.notify_tools_updated().await {
            tracing::warn!("failed to notify tools updated: {}", e);
        }
        if let Err(e) = self.cache.save(&tools).await {
            tracing::warn!("failed to cache tool list: {}", e);
        }
    }

    async fn fetch_tools(&self, request: &RpcRequest) -> Result<ToolList> {
        let response = self.client.send(request).await?;
        let result = response.into_result().map_err(|e| Error::Rpc {
            code: e.code,
            message: e.message,
        })?;
        let tools = result
            .get("tools")
            .cloned()
            .ok_or_else(|| Error::internal("tools/list result has no tools field"))?;
        Ok(serde_json::from_value(tools)?)
    }

    async fn forward(&self, request: &RpcRequest) -> Result<Value> {
        let response = self.client.send(request).await?;
        response.into_result().map_err(|e| Error::Rpc {
            code: e.code,
            message: e.message,
        })
    }
}
