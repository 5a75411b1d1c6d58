use anyhow::Result;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Core trait for completion providers
#[async_trait::async_trait]
pub trait LlmProvider: Send + Sync {
    /// Generate a completion for a system/user message pair
    async fn generate(&self, request: LlmRequest) -> Result<LlmResponse>;
}

/// Request structure for LLM generation
#[derive(Debug, Clone)]
pub struct LlmRequest {
    pub system: Option<String>,
    pub prompt: String,
    pub max_tokens: Option<usize>,
    pub temperature: Option<f32>,
    /// Falls back to the provider's configured timeout when unset
    pub timeout_seconds: Option<u64>,
}

/// Response from LLM generation
#[derive(Debug, Clone)]
pub struct LlmResponse {
    pub content: String,
    pub usage: UsageMetadata,
    pub model: String,
}

/// Token usage metadata
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UsageMetadata {
    pub prompt_tokens: usize,
    pub completion_tokens: usize,
    pub total_tokens: usize,
}

/// The completion endpoint answered with a non-success status.
///
/// Providers return this inside `anyhow::Error` so callers can tell an upstream
/// refusal apart from transport or decoding failures with `downcast_ref`.
#[derive(Debug, Error)]
#[error("LLM API error {status}: {body}")]
pub struct ApiError {
    pub status: u16,
    pub body: String,
}

pub mod remote;
