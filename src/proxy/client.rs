//! Caller side of the publish proxy
//!
//! Used by the `connect`/`boards` commands and by the publish orchestrator's
//! API path.

use crate::error::{PinforgeError, Result};
use crate::models::Board;
use crate::pinterest::PinData;
use crate::proxy::types::ProxyRequest;

use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

/// HTTP client for the proxy endpoint
#[derive(Clone)]
pub struct ProxyClient {
    client: Client,
    endpoint: String,
}

impl ProxyClient {
    /// Create a client posting to `endpoint`
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PinforgeError::Config(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// List the boards visible to `access_token`
    pub async fn get_boards(&self, access_token: &str) -> Result<Vec<Board>> {
        let body = self.send(&ProxyRequest::get_boards(access_token)).await?;

        let items = body
            .get("items")
            .cloned()
            .ok_or_else(|| PinforgeError::Provider("Boards response has no items".to_string()))?;
        let boards: Vec<Board> = serde_json::from_value(items)?;
        tracing::debug!("Proxy returned {} boards", boards.len());
        Ok(boards)
    }

    /// Publish a pin through the proxy's `create_pin` action
    ///
    /// Returns the created pin object relayed from Pinterest.
    pub async fn create_pin(
        &self,
        access_token: &str,
        board_id: &str,
        pin_data: PinData,
    ) -> Result<Value> {
        let body = self
            .send(&ProxyRequest::create_pin(access_token, board_id, pin_data))
            .await?;
        Ok(body.get("data").cloned().unwrap_or(Value::Null))
    }

    async fn send(&self, request: &ProxyRequest) -> Result<Value> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!("Failed to reach proxy at {}: {}", self.endpoint, e);
                PinforgeError::Http(e)
            })?;

        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        let body: Value = serde_json::from_str(&text).unwrap_or(Value::Null);

        if !status.is_success() {
            let message = body
                .get("error")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| "Upload failed".to_string());
            return Err(PinforgeError::Upstream {
                status: status.as_u16(),
                message,
            }
            .into());
        }

        Ok(body)
    }
}
