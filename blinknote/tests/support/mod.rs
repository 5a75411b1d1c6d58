// Test doubles for the gateway's outbound collaborators
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::Result;
use blinknote::extraction::{ContentExtractor, ExtractedContent, ExtractionError};
use blinknote::gateway::Gateway;
use blinknote::llm::{ApiError, LlmProvider, LlmRequest, LlmResponse, UsageMetadata};

pub const ARTICLE: &str = "Rust is a systems programming language focused on safety, \
    speed and concurrency. Its ownership model prevents data races at compile time \
    without a garbage collector.";

/// Extractor returning canned text, or a fetch failure when `text` is None.
pub struct FakeExtractor {
    pub calls: AtomicUsize,
    text: Option<String>,
}

impl FakeExtractor {
    pub fn returning(text: impl Into<String>) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            text: Some(text.into()),
        }
    }

    pub fn failing() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            text: None,
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl ContentExtractor for FakeExtractor {
    async fn extract(&self, _url: &str) -> Result<ExtractedContent, ExtractionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.text {
            Some(text) => ExtractedContent::new(text.clone()),
            None => Err(ExtractionError::Fetch(anyhow::anyhow!(
                "page fetch failed with status: 404 Not Found"
            ))),
        }
    }
}

/// Completion provider answering with fixed text or a fixed upstream error.
pub struct FakeLlm {
    pub calls: AtomicUsize,
    pub last_request: Mutex<Option<LlmRequest>>,
    reply: std::result::Result<String, (u16, String)>,
}

impl FakeLlm {
    pub fn answering(content: impl Into<String>) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
            reply: Ok(content.into()),
        }
    }

    pub fn rejecting(status: u16, body: impl Into<String>) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
            reply: Err((status, body.into())),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<LlmRequest> {
        self.last_request.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl LlmProvider for FakeLlm {
    async fn generate(&self, request: LlmRequest) -> Result<LlmResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some(request);
        match &self.reply {
            Ok(content) => Ok(LlmResponse {
                content: content.clone(),
                usage: UsageMetadata::default(),
                model: "fake-model".to_string(),
            }),
            Err((status, body)) => Err(ApiError {
                status: *status,
                body: body.clone(),
            }
            .into()),
        }
    }
}

pub fn gateway(extractor: &Arc<FakeExtractor>, llm: &Arc<FakeLlm>) -> Gateway {
    Gateway::new(extractor.clone(), llm.clone())
}
