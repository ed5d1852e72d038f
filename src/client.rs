//! Retrying HTTP client for the remote tool endpoint.
//!
//! One logical call is up to `max_attempts` POSTs with a fixed sleep between
//! them. A connection failure or a 5xx status counts as a failed attempt;
//! anything below 500 — including 4xx — is a completed transport exchange and
//! is handed back to the caller, which interprets the payload. Exhaustion
//! collapses into a single error carrying the last attempt's message.

use crate::protocol::{RpcRequest, RpcResponse};
use crate::types::{Error, Result, RetryConfig};

/// Path suffix for the tool-list change notification endpoint.
const NOTIFY_TOOLS_UPDATED_PATH: &str = "/notify-tools-updated";

/// HTTP client bound to one endpoint base URL with a fixed retry policy.
#[derive(Debug, Clone)]
pub struct RelayClient {
    http: reqwest::Client,
    base_url: String,
    retry: RetryConfig,
}

impl RelayClient {
    pub fn new(base_url: impl Into<String>, retry: RetryConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            retry,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// POST a request envelope to the endpoint and parse the response envelope.
    pub async fn send(&self, request: &RpcRequest) -> Result<RpcResponse> {
        let body = serde_json::to_string(request)?;
        let text = self.post_with_retry(&self.base_url, body).await?;
        let response: RpcResponse = serde_json::from_str(&text)?;
        Ok(response)
    }

    /// Best-effort signal that the tool list changed. The response body is
    /// not interpreted; transport success is all that matters.
    pub async fn notify_tools_updated(&self) -> Result<()> {
        let url = format!("{}{}", self.base_url, NOTIFY_TOOLS_UPDATED_PATH);
        self.post_with_retry(&url, String::new()).await?;
        Ok(())
    }

    /// The retry loop. All-or-nothing: either one attempt completes below the
    /// server-error threshold and its body is returned, or the aggregated
    /// failure surfaces after the last attempt.
    async fn post_with_retry(&self, url: &str, body: String) -> Result<String> {
        let mut last_error: Option<Error> = None;

        for attempt in 0..self.retry.max_attempts {
            if attempt > 0 {
                tracing::debug!(
                    "retry attempt {}/{} for {}",
                    attempt + 1,
                    self.retry.max_attempts,
                    url,
                );
                tokio::time::sleep(self.retry.interval).await;
            }

            let sent = self
                .http
                .post(url)
                .header(reqwest::header::CONTENT_TYPE, "application/json")
                .body(body.clone())
                .send()
                .await;

            let response = match sent {
                Ok(response) => response,
                Err(e) => {
                    last_error = Some(Error::Transport(e));
                    continue;
                }
            };

            let status = response.status();
            let text = match response.text().await {
                Ok(text) => text,
                Err(e) => {
                    last_error = Some(Error::Transport(e));
                    continue;
                }
            };

            if status.is_server_error() {
                last_error = Some(Error::RemoteStatus {
                    status: status.as_u16(),
                    body: text,
                });
                continue;
            }

            return Ok(text);
        }

        let message = last_error
            .map(|e| e.to_string())
            .unwrap_or_else(|| "no attempts were made".to_string());
        Err(Error::RetriesExhausted(message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::methods;

    #[test]
    fn notify_url_is_base_plus_suffix() {
        let client = RelayClient::new("http://127.0.0.1:60100", RetryConfig::default());
        assert_eq!(
            format!("{}{}", client.base_url(), NOTIFY_TOOLS_UPDATED_PATH),
            "http://127.0.0.1:60100/notify-tools-updated",
        );
    }

    #[tokio::test]
    async fn unreachable_endpoint_exhausts_and_aggregates() {
        // Bind then drop: the port was just allocated, so nothing listens on it.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = RelayClient::new(
            format!("http://{}", addr),
            RetryConfig {
                max_attempts: 2,
                interval: std::time::Duration::from_millis(10),
            },
        );
        let request = RpcRequest::new(1, methods::TOOLS_LIST);
        let err = client.send(&request).await.unwrap_err();
        assert!(matches!(err, Error::RetriesExhausted(_)));
        assert!(err.to_string().contains("all retry attempts failed"));
    }
}
