mod support;

use std::sync::Arc;

use blinknote::cli::summarize_and_record;
use blinknote::client::RemoteGateway;
use blinknote::gateway::{GatewayError, Summarizer};
use blinknote::history::{HistoryStore, MemoryHistoryPort};
use blinknote::summary::{InputType, SummaryLength, SummaryRequest};
use mockito::Matcher;
use serde_json::json;

use support::{FakeExtractor, FakeLlm, ARTICLE};

fn request() -> SummaryRequest {
    SummaryRequest::new(ARTICLE, InputType::Text, SummaryLength::Medium)
}

#[tokio::test]
async fn remote_success_is_recorded() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/summarize")
        .match_body(Matcher::Json(json!({
            "input_text": ARTICLE,
            "input_type": "text",
            "summary_length": "medium"
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "input_text": ARTICLE,
                "input_type": "text",
                "summary": "Rust is safe and fast.",
                "summary_length": "medium",
                "word_count_original": 26,
                "word_count_summary": 5
            })
            .to_string(),
        )
        .create_async()
        .await;

    let remote = RemoteGateway::new(format!("{}/api/summarize", server.url())).expect("client");
    let history = HistoryStore::new(Arc::new(MemoryHistoryPort::new()));

    let entry = summarize_and_record(&remote, &history, &request())
        .await
        .expect("recorded");

    assert_eq!(entry.result.summary, "Rust is safe and fast.");
    assert_eq!(entry.result.word_count_summary, 5);
    assert_eq!(history.list().await, vec![entry]);

    mock.assert_async().await;
}

#[tokio::test]
async fn remote_error_message_is_surfaced() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/")
        .with_status(400)
        .with_header("content-type", "application/json")
        .with_body(r#"{"error": "Text is too short to summarize"}"#)
        .create_async()
        .await;

    let remote = RemoteGateway::new(server.url()).expect("client");
    let err = remote.summarize(&request()).await.unwrap_err();

    assert_eq!(
        err,
        GatewayError::Remote {
            status: 400,
            message: "Text is too short to summarize".to_string()
        }
    );
}

#[tokio::test]
async fn non_json_reply_is_invalid_response() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/")
        .with_status(502)
        .with_body("<html>Bad Gateway</html>")
        .create_async()
        .await;

    let remote = RemoteGateway::new(server.url()).expect("client");
    let err = remote.summarize(&request()).await.unwrap_err();

    assert_eq!(err.to_string(), "Invalid response from server");
    assert_eq!(err.status(), 502);
}

#[tokio::test]
async fn error_without_message_uses_generic_text() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/")
        .with_status(500)
        .with_header("content-type", "application/json")
        .with_body("{}")
        .create_async()
        .await;

    let remote = RemoteGateway::new(server.url()).expect("client");
    let err = remote.summarize(&request()).await.unwrap_err();
    assert_eq!(err.to_string(), "Failed to generate summary");
}

#[tokio::test]
async fn failed_summary_never_touches_history() {
    let extractor = Arc::new(FakeExtractor::returning(ARTICLE));
    let llm = Arc::new(FakeLlm::rejecting(500, "upstream exploded"));
    let gateway = support::gateway(&extractor, &llm);

    let port = Arc::new(MemoryHistoryPort::new());
    let history = HistoryStore::new(port.clone());

    let err = summarize_and_record(&gateway, &history, &request())
        .await
        .unwrap_err();

    assert!(err.to_string().contains("upstream exploded"));
    assert!(port.raw().is_none());
    assert!(history.list().await.is_empty());
}

#[tokio::test]
async fn failure_leaves_prior_history_untouched() {
    let port = Arc::new(MemoryHistoryPort::new());
    let history = HistoryStore::new(port.clone());

    let extractor = Arc::new(FakeExtractor::returning(ARTICLE));
    let ok = support::gateway(&extractor, &Arc::new(FakeLlm::answering("First.")));
    summarize_and_record(&ok, &history, &request()).await.expect("first");
    let before = port.raw();

    let failing = support::gateway(&extractor, &Arc::new(FakeLlm::rejecting(429, "slow down")));
    assert!(summarize_and_record(&failing, &history, &request()).await.is_err());

    assert_eq!(port.raw(), before);
    assert_eq!(history.list().await.len(), 1);
}
