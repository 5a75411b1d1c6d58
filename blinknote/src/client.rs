use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Client;
use tracing::{debug, warn};

use crate::gateway::transport::SummarizeBody;
use crate::gateway::{GatewayError, Summarizer};
use crate::summary::{SummaryRequest, SummaryResult};

/// Talks to a gateway hosted elsewhere over its JSON contract.
pub struct RemoteGateway {
    endpoint: String,
    client: Client,
}

impl RemoteGateway {
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        // extraction + completion can each take a while
        Self::with_timeout(endpoint, Duration::from_secs(90))
    }

    pub fn with_timeout(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build reqwest client")?;
        Ok(Self {
            endpoint: endpoint.into(),
            client,
        })
    }
}

#[async_trait::async_trait]
impl Summarizer for RemoteGateway {
    async fn summarize(&self, request: &SummaryRequest) -> Result<SummaryResult, GatewayError> {
        let body = SummarizeBody {
            input_text: Some(request.input_text.clone()),
            input_type: Some(request.input_type.to_string()),
            summary_length: Some(request.summary_length.to_string()),
        };

        debug!("client: posting to {}", self.endpoint);
        let response = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| GatewayError::Remote {
                status: 502,
                message: format!("Failed to reach gateway: {}", e),
            })?;

        let status = response.status().as_u16();
        let invalid = || GatewayError::Remote {
            status,
            message: "Invalid response from server".to_string(),
        };

        let value: serde_json::Value = response.json().await.map_err(|e| {
            warn!("client: undecodable gateway reply ({}): {}", status, e);
            invalid()
        })?;

        if !(200..300).contains(&status) {
            let message = value
                .get("error")
                .and_then(|v| v.as_str())
                .unwrap_or("Failed to generate summary")
                .to_string();
            return Err(GatewayError::Remote { status, message });
        }

        serde_json::from_value(value).map_err(|e| {
            warn!("client: reply is not a summary result: {}", e);
            invalid()
        })
    }
}
