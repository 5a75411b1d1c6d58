mod support;

use std::sync::Arc;

use blinknote::server::{build_rocket, AppState};
use rocket::http::{ContentType, Status};
use rocket::local::asynchronous::Client;
use serde_json::{json, Value};

use support::{FakeExtractor, FakeLlm, ARTICLE};

async fn client_with(llm: Arc<FakeLlm>) -> Client {
    let extractor = Arc::new(FakeExtractor::returning(ARTICLE));
    let gateway = Arc::new(support::gateway(&extractor, &llm));
    let rocket = build_rocket(AppState::new(gateway), rocket::Config::figment());
    Client::tracked(rocket).await.expect("valid rocket instance")
}

#[rocket::async_test]
async fn post_returns_summary_payload() {
    let llm = Arc::new(FakeLlm::answering("Rust is safe."));
    let client = client_with(llm.clone()).await;

    let body = json!({ "input_text": ARTICLE, "input_type": "text", "summary_length": "short" });
    let response = client
        .post("/api/summarize")
        .header(ContentType::JSON)
        .body(body.to_string())
        .dispatch()
        .await;

    assert_eq!(response.status(), Status::Ok);
    let payload: Value = response.into_json().await.expect("json body");
    assert_eq!(payload["summary"], "Rust is safe.");
    assert_eq!(payload["input_text"], ARTICLE);
    assert_eq!(payload["summary_length"], "short");
    assert_eq!(payload["word_count_summary"], 3);
    assert_eq!(llm.calls(), 1);
}

#[rocket::async_test]
async fn other_methods_get_405() {
    let llm = Arc::new(FakeLlm::answering("unused"));
    let client = client_with(llm.clone()).await;

    for response in [
        client.get("/api/summarize").dispatch().await,
        client.put("/api/summarize").dispatch().await,
        client.patch("/api/summarize").dispatch().await,
        client.delete("/api/summarize").dispatch().await,
    ] {
        assert_eq!(response.status(), Status::MethodNotAllowed);
        let payload: Value = response.into_json().await.expect("json body");
        assert_eq!(payload, json!({ "error": "Method not allowed" }));
    }
    assert_eq!(llm.calls(), 0);
}

#[rocket::async_test]
async fn too_short_text_is_400() {
    let llm = Arc::new(FakeLlm::answering("unused"));
    let client = client_with(llm.clone()).await;

    let response = client
        .post("/api/summarize")
        .header(ContentType::JSON)
        .body(r#"{"input_text": "short", "input_type": "text", "summary_length": "medium"}"#)
        .dispatch()
        .await;

    assert_eq!(response.status(), Status::BadRequest);
    let payload: Value = response.into_json().await.expect("json body");
    assert_eq!(payload, json!({ "error": "Text is too short to summarize" }));
    assert_eq!(llm.calls(), 0);
}

#[rocket::async_test]
async fn upstream_failure_is_500_with_detail() {
    let llm = Arc::new(FakeLlm::rejecting(503, "model overloaded"));
    let client = client_with(llm).await;

    let response = client
        .post("/api/summarize")
        .header(ContentType::JSON)
        .body(json!({ "input_text": ARTICLE }).to_string())
        .dispatch()
        .await;

    assert_eq!(response.status(), Status::InternalServerError);
    let payload: Value = response.into_json().await.expect("json body");
    assert_eq!(payload, json!({ "error": "Language model error: model overloaded" }));
}

#[rocket::async_test]
async fn health_and_unknown_routes() {
    let client = client_with(Arc::new(FakeLlm::answering("unused"))).await;

    let response = client.get("/api/health").dispatch().await;
    assert_eq!(response.status(), Status::Ok);
    let payload: Value = response.into_json().await.expect("json body");
    assert_eq!(payload["status"], "healthy");
    assert_eq!(payload["service"], "text-summarizer");

    let response = client.get("/api/nothing-here").dispatch().await;
    assert_eq!(response.status(), Status::NotFound);
    let payload: Value = response.into_json().await.expect("json body");
    assert_eq!(payload, json!({ "error": "Not found" }));
}
