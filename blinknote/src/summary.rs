use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What the user handed in: pasted text or a page address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputType {
    Text,
    Url,
}

impl InputType {
    pub fn as_str(self) -> &'static str {
        match self {
            InputType::Text => "text",
            InputType::Url => "url",
        }
    }
}

impl FromStr for InputType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(InputType::Text),
            "url" => Ok(InputType::Url),
            other => Err(format!("unknown input type: {}", other)),
        }
    }
}

impl fmt::Display for InputType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Summary granularity ("tier")
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryLength {
    Short,
    Medium,
    Detailed,
}

impl SummaryLength {
    pub fn as_str(self) -> &'static str {
        match self {
            SummaryLength::Short => "short",
            SummaryLength::Medium => "medium",
            SummaryLength::Detailed => "detailed",
        }
    }
}

impl FromStr for SummaryLength {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "short" => Ok(SummaryLength::Short),
            "medium" => Ok(SummaryLength::Medium),
            "detailed" => Ok(SummaryLength::Detailed),
            other => Err(format!("unknown summary length: {}", other)),
        }
    }
}

impl fmt::Display for SummaryLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single summarization request, already typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryRequest {
    pub input_text: String,
    pub input_type: InputType,
    pub summary_length: SummaryLength,
}

impl SummaryRequest {
    pub fn new(
        input_text: impl Into<String>,
        input_type: InputType,
        summary_length: SummaryLength,
    ) -> Self {
        Self {
            input_text: input_text.into(),
            input_type,
            summary_length,
        }
    }
}

/// Shaped gateway output. Field names are the wire names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryResult {
    pub input_text: String,
    pub input_type: InputType,
    pub summary: String,
    pub summary_length: SummaryLength,
    pub word_count_original: usize,
    pub word_count_summary: usize,
}

/// Number of whitespace-delimited, non-empty tokens.
pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}
