//! Summarization gateway: validation, extraction, prompting and the completion call.
//!
//! `Gateway::summarize` is the one pipeline. Hosting transports (the Rocket route,
//! the command-line client) go through [`transport::handle`] or the [`Summarizer`]
//! trait rather than re-implementing any step.

use std::sync::Arc;

use anyhow::Result;
use thiserror::Error;
use tracing::{error, info, warn};

use common::Config;

use crate::extraction::{ContentExtractor, ExtractionError, HttpExtractor, MIN_CONTENT_CHARS};
use crate::llm::remote::RemoteLlmProvider;
use crate::llm::{ApiError, LlmProvider, LlmRequest};
use crate::prompt::{build_prompt, SUMMARY_TEMPERATURE};
use crate::summary::{count_words, InputType, SummaryRequest, SummaryResult};

pub mod transport;

/// Every way a summarization can fail, with its HTTP status.
///
/// `Remote` only comes from [`crate::client::RemoteGateway`]. It lives here so that
/// both `Summarizer` implementations share one error type and callers such as
/// `cli::summarize_and_record` need not care which one they hold.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GatewayError {
    #[error("{0}")]
    Validation(String),

    #[error("Failed to extract content from URL: {0}")]
    Extraction(String),

    #[error("Language model error: {0}")]
    Upstream(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Method not allowed")]
    MethodNotAllowed,

    /// Error reported by a gateway reached over HTTP; the message is shown as-is.
    #[error("{message}")]
    Remote { status: u16, message: String },
}

impl GatewayError {
    pub fn validation(message: impl Into<String>) -> Self {
        GatewayError::Validation(message.into())
    }

    pub fn status(&self) -> u16 {
        match self {
            GatewayError::Validation(_) | GatewayError::Extraction(_) => 400,
            GatewayError::MethodNotAllowed => 405,
            GatewayError::Upstream(_) | GatewayError::Internal(_) => 500,
            GatewayError::Remote { status, .. } => *status,
        }
    }
}

/// Anything that turns a request into a summary: the in-process gateway or a remote one.
#[async_trait::async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, request: &SummaryRequest) -> Result<SummaryResult, GatewayError>;
}

pub struct Gateway {
    extractor: Arc<dyn ContentExtractor>,
    llm: Arc<dyn LlmProvider>,
}

impl Gateway {
    pub fn new(extractor: Arc<dyn ContentExtractor>, llm: Arc<dyn LlmProvider>) -> Self {
        Self { extractor, llm }
    }

    /// Wire the HTTP extractor and the remote completion provider from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let api_key = config.llm_api_key()?;
        let extractor = HttpExtractor::from_config(&config.extraction)?;
        let provider = RemoteLlmProvider::from_config(&config.llm, api_key);
        info!(
            "gateway: completion provider {} at {}",
            provider.model(),
            config.llm.api_url
        );
        Ok(Self::new(Arc::new(extractor), Arc::new(provider)))
    }

    pub async fn summarize(&self, request: &SummaryRequest) -> Result<SummaryResult, GatewayError> {
        let input_text = request.input_text.trim();
        if input_text.is_empty() {
            return Err(GatewayError::validation("Input text is required"));
        }

        info!(
            input_type = %request.input_type,
            summary_length = %request.summary_length,
            "gateway: summarization requested"
        );

        let text_to_summarize = match request.input_type {
            InputType::Url => match self.extractor.extract(input_text).await {
                Ok(content) => content.into_inner(),
                Err(ExtractionError::Insufficient { chars }) => {
                    warn!("gateway: only {} chars extracted from {}", chars, input_text);
                    return Err(GatewayError::validation(
                        "Could not extract sufficient content from URL",
                    ));
                }
                Err(e) => return Err(GatewayError::Extraction(e.to_string())),
            },
            InputType::Text => input_text.to_string(),
        };

        if text_to_summarize.chars().count() < MIN_CONTENT_CHARS {
            return Err(GatewayError::validation("Text is too short to summarize"));
        }

        let prompt = build_prompt(&text_to_summarize, request.summary_length);
        let response = self
            .llm
            .generate(LlmRequest {
                system: Some(prompt.system_message),
                prompt: prompt.user_message,
                max_tokens: Some(prompt.max_output_tokens),
                temperature: Some(SUMMARY_TEMPERATURE),
                timeout_seconds: None,
            })
            .await
            .map_err(completion_failure)?;

        info!(
            "gateway: {} produced summary using {} tokens",
            response.model, response.usage.total_tokens
        );

        let summary = response.content.trim().to_string();
        Ok(SummaryResult {
            input_text: input_text.to_string(),
            input_type: request.input_type,
            word_count_original: count_words(&text_to_summarize),
            word_count_summary: count_words(&summary),
            summary,
            summary_length: request.summary_length,
        })
    }
}

#[async_trait::async_trait]
impl Summarizer for Gateway {
    async fn summarize(&self, request: &SummaryRequest) -> Result<SummaryResult, GatewayError> {
        Gateway::summarize(self, request).await
    }
}

fn completion_failure(err: anyhow::Error) -> GatewayError {
    match err.downcast_ref::<ApiError>() {
        Some(api) => {
            error!("gateway: completion endpoint answered {}: {}", api.status, api.body);
            let detail = if api.body.trim().is_empty() {
                format!("status {}", api.status)
            } else {
                api.body.clone()
            };
            GatewayError::Upstream(detail)
        }
        None => {
            error!("gateway: completion call failed: {:#}", err);
            GatewayError::Internal(format!("{:#}", err))
        }
    }
}
