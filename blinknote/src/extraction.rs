use anyhow::{Context, Result};
use regex::Regex;
use reqwest::Client;
use std::sync::LazyLock;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

use common::ExtractionConfig;

/// Below this many characters there is nothing worth summarizing.
pub const MIN_CONTENT_CHARS: usize = 50;

static SCRIPT_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<script.*?</script>").expect("valid script pattern"));
static STYLE_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<style.*?</style>").expect("valid style pattern"));
static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").expect("valid tag pattern"));
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace pattern"));

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("{0:#}")]
    Fetch(anyhow::Error),

    #[error("extracted only {chars} characters of text")]
    Insufficient { chars: usize },
}

/// Plain text reduced from a fetched page, at least `MIN_CONTENT_CHARS` long.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedContent(String);

impl ExtractedContent {
    pub fn new(text: String) -> Result<Self, ExtractionError> {
        let chars = text.chars().count();
        if chars < MIN_CONTENT_CHARS {
            return Err(ExtractionError::Insufficient { chars });
        }
        Ok(Self(text))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

#[async_trait::async_trait]
pub trait ContentExtractor: Send + Sync {
    /// Fetch `url` and reduce it to summarizable plain text
    async fn extract(&self, url: &str) -> Result<ExtractedContent, ExtractionError>;
}

/// Fetches pages over HTTP(S) with a browser-like user agent.
pub struct HttpExtractor {
    client: Client,
}

impl HttpExtractor {
    pub fn new(user_agent: &str, timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(user_agent)
            .build()
            .context("failed to build reqwest client")?;
        Ok(Self { client })
    }

    pub fn from_config(config: &ExtractionConfig) -> Result<Self> {
        Self::new(&config.user_agent, config.timeout_seconds)
    }

    async fn fetch_page(&self, url: &str) -> Result<String> {
        let parsed = url::Url::parse(url).context("invalid URL")?;
        if !matches!(parsed.scheme(), "http" | "https") {
            anyhow::bail!("unsupported URL scheme: {}", parsed.scheme());
        }

        let response = self
            .client
            .get(parsed)
            .send()
            .await
            .context("failed to fetch page")?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("page fetch failed with status: {}", status);
        }

        response.text().await.context("failed to read response body")
    }
}

#[async_trait::async_trait]
impl ContentExtractor for HttpExtractor {
    async fn extract(&self, url: &str) -> Result<ExtractedContent, ExtractionError> {
        let html = self.fetch_page(url).await.map_err(|e| {
            warn!("extraction: fetch failed for {}: {:#}", url, e);
            ExtractionError::Fetch(e)
        })?;

        let text = reduce_markup(&html);
        info!(
            "extraction: reduced {} bytes of markup to {} chars from {}",
            html.len(),
            text.chars().count(),
            url
        );
        ExtractedContent::new(text)
    }
}

/// Best-effort markup to text: drop script and style blocks with their bodies,
/// turn every other tag into a space, then collapse whitespace.
pub fn reduce_markup(html: &str) -> String {
    let text = SCRIPT_BLOCK.replace_all(html, "");
    let text = STYLE_BLOCK.replace_all(&text, "");
    let text = TAG.replace_all(&text, " ");
    let text = WHITESPACE.replace_all(&text, " ");
    text.trim().to_string()
}
