// Transport-neutral request/response adapter for the gateway
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use super::{Gateway, GatewayError};
use crate::summary::{InputType, SummaryLength, SummaryRequest};

/// JSON body accepted by `POST /api/summarize`. Everything is optional so that
/// missing fields produce our own validation messages rather than decoder errors.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct SummarizeBody {
    pub input_text: Option<String>,
    pub input_type: Option<String>,
    pub summary_length: Option<String>,
}

impl SummarizeBody {
    /// Validate and type the body. Missing type defaults to text, missing length to medium.
    pub fn into_request(self) -> Result<SummaryRequest, GatewayError> {
        let input_text = self.input_text.unwrap_or_default().trim().to_string();
        if input_text.is_empty() {
            return Err(GatewayError::validation("Input text is required"));
        }

        let input_type = match self.input_type.as_deref() {
            None => InputType::Text,
            Some(raw) => raw
                .parse()
                .map_err(|_| GatewayError::validation("Invalid input type"))?,
        };

        let summary_length = match self.summary_length.as_deref() {
            None => SummaryLength::Medium,
            Some(raw) => raw
                .parse()
                .map_err(|_| GatewayError::validation("Invalid summary length"))?,
        };

        Ok(SummaryRequest {
            input_text,
            input_type,
            summary_length,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Status code plus JSON body, ready for any HTTP host to send.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub status: u16,
    pub body: Value,
}

impl Reply {
    pub fn ok(body: Value) -> Self {
        Self { status: 200, body }
    }

    pub fn from_error(err: &GatewayError) -> Self {
        if err.status() >= 500 {
            tracing::error!("gateway: request failed: {}", err);
        } else {
            warn!("gateway: request rejected: {}", err);
        }
        Self {
            status: err.status(),
            body: serde_json::json!(ErrorBody {
                error: err.to_string()
            }),
        }
    }
}

/// Run one HTTP exchange through the gateway.
pub async fn handle(gateway: &Gateway, method: &str, body: &str) -> Reply {
    match respond(gateway, method, body).await {
        Ok(value) => Reply::ok(value),
        Err(err) => Reply::from_error(&err),
    }
}

async fn respond(gateway: &Gateway, method: &str, body: &str) -> Result<Value, GatewayError> {
    if !method.eq_ignore_ascii_case("POST") {
        return Err(GatewayError::MethodNotAllowed);
    }

    let parsed: Option<SummarizeBody> = if body.trim().is_empty() {
        None
    } else {
        serde_json::from_str(body)
            .map_err(|e| GatewayError::validation(format!("Invalid JSON body: {}", e)))?
    };
    let request = parsed
        .ok_or_else(|| GatewayError::validation("No data provided"))?
        .into_request()?;

    let result = gateway.summarize(&request).await?;
    serde_json::to_value(&result).map_err(|e| GatewayError::Internal(e.to_string()))
}
