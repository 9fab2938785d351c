//! Integration tests for the AI gateway protocol.
//!
//! These drive the real `/api/gateway` endpoint over HTTP against a stub
//! upstream, covering the dispatch table, the error contract, and response
//! normalization.

use serde_json::{Value, json};

use bodega_integration_tests::TestContext;

/// A canned upstream response with a single text part.
fn text_response(text: &str) -> Value {
    json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] }
        }]
    })
}

// =============================================================================
// Protocol Errors
// =============================================================================

#[tokio::test]
async fn test_bogus_action_is_400() {
    // No credential configured on purpose: action validity is checked first
    let ctx = TestContext::start_without_gemini().await;

    let response = ctx
        .post_json("/api/gateway", &json!({ "action": "bogus", "payload": {} }))
        .await;

    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.expect("json");
    assert!(body["error"].as_str().expect("error").contains("bogus"));
}

#[tokio::test]
async fn test_non_post_is_405_with_error_body() {
    let ctx = TestContext::start_without_gemini().await;

    let response = ctx.get("/api/gateway").await;

    assert_eq!(response.status(), 405);
    let body: Value = response.json().await.expect("json");
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_missing_credential_is_500() {
    let ctx = TestContext::start_without_gemini().await;

    let response = ctx
        .post_json(
            "/api/gateway",
            &json!({ "action": "suggest", "payload": { "interest": "series" } }),
        )
        .await;

    assert_eq!(response.status(), 500);
    let body: Value = response.json().await.expect("json");
    assert!(body["error"].as_str().expect("error").contains("not configured"));
}

#[tokio::test]
async fn test_malformed_payload_is_400() {
    let ctx = TestContext::start_with_upstream(text_response("unused")).await;

    // chat requires newMessage
    let response = ctx
        .post_json(
            "/api/gateway",
            &json!({ "action": "chat", "payload": { "history": [] } }),
        )
        .await;

    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.expect("json");
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_upstream_failure_is_opaque_500() {
    let ctx = TestContext::start_with_broken_upstream().await;

    let response = ctx
        .post_json(
            "/api/gateway",
            &json!({ "action": "suggest", "payload": { "interest": "series" } }),
        )
        .await;

    assert_eq!(response.status(), 500);
    let body: Value = response.json().await.expect("json");
    // The client sees a generic message, never the transport error
    assert_eq!(
        body["error"].as_str().expect("error"),
        "The assistant could not complete the request"
    );
}

// =============================================================================
// chat
// =============================================================================

#[tokio::test]
async fn test_chat_relays_reply_and_forwards_history() {
    let ctx = TestContext::start_with_upstream(text_response("Claro! Netflix cuesta $4.80.")).await;

    let response = ctx
        .post_json(
            "/api/gateway",
            &json!({
                "action": "chat",
                "payload": {
                    "history": [
                        { "role": "user", "parts": [{ "text": "hola" }] },
                        { "role": "model", "parts": [{ "text": "Bienvenido!" }] }
                    ],
                    "newMessage": "cuanto cuesta netflix?"
                }
            }),
        )
        .await;

    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.expect("json");
    assert_eq!(body["text"], "Claro! Netflix cuesta $4.80.");
    assert!(body.get("sources").is_none());

    // The upstream saw the persona, the full history, and the new message
    let upstream = ctx.last_upstream_request().expect("upstream request");
    assert!(upstream["systemInstruction"]["parts"][0]["text"].is_string());
    let contents = upstream["contents"].as_array().expect("contents");
    assert_eq!(contents.len(), 3);
    assert_eq!(contents[0]["role"], "user");
    assert_eq!(contents[1]["role"], "model");
    assert_eq!(contents[2]["parts"][0]["text"], "cuanto cuesta netflix?");
}

// =============================================================================
// suggest
// =============================================================================

#[tokio::test]
async fn test_suggest_grounds_prompt_in_catalog() {
    let ctx = TestContext::start_with_upstream(text_response("El Combo Cine es para ti!")).await;

    let response = ctx
        .post_json(
            "/api/gateway",
            &json!({ "action": "suggest", "payload": { "interest": "peliculas" } }),
        )
        .await;

    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.expect("json");
    assert_eq!(body["text"], "El Combo Cine es para ti!");

    let upstream = ctx.last_upstream_request().expect("upstream request");
    let prompt = upstream["contents"][0]["parts"][0]["text"]
        .as_str()
        .expect("prompt");
    assert!(prompt.contains("peliculas"));
    // The prompt names what the store actually sells
    assert!(prompt.contains("Netflix Premium"));
    assert!(prompt.contains("Combo Cine en Casa"));
}

// =============================================================================
// groundedSearch
// =============================================================================

#[tokio::test]
async fn test_grounded_search_dedups_sources() {
    let ctx = TestContext::start_with_upstream(json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": "grounded answer" }] },
            "groundingMetadata": {
                "groundingChunks": [
                    { "web": { "uri": "https://a.example", "title": "A" } },
                    { "web": { "uri": "https://a.example", "title": "A again" } },
                    { "web": { "uri": "", "title": "empty uri" } },
                    { "web": { "uri": "https://b.example" } }
                ]
            }
        }]
    }))
    .await;

    let response = ctx
        .post_json(
            "/api/gateway",
            &json!({ "action": "groundedSearch", "payload": { "query": "que es iptv?" } }),
        )
        .await;

    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.expect("json");
    assert_eq!(body["text"], "grounded answer");

    let sources = body["sources"].as_array().expect("sources");
    assert_eq!(sources.len(), 2);
    assert_eq!(sources[0]["uri"], "https://a.example");
    assert_eq!(sources[0]["title"], "A");
    // Missing title falls back to the uri
    assert_eq!(sources[1]["uri"], "https://b.example");
    assert_eq!(sources[1]["title"], "https://b.example");

    // The upstream request carried the search tool
    let upstream = ctx.last_upstream_request().expect("upstream request");
    assert!(upstream["tools"][0]["googleSearch"].is_object());
}

// =============================================================================
// editImage
// =============================================================================

#[tokio::test]
async fn test_edit_image_returns_base64_image() {
    let ctx = TestContext::start_with_upstream(json!({
        "candidates": [{
            "content": {
                "role": "model",
                "parts": [
                    { "text": "done!" },
                    { "inlineData": { "mimeType": "image/png", "data": "ZWRpdGVk" } }
                ]
            }
        }]
    }))
    .await;

    let response = ctx
        .post_json(
            "/api/gateway",
            &json!({
                "action": "editImage",
                "payload": {
                    "base64ImageData": "aGVsbG8=",
                    "mimeType": "image/png",
                    "prompt": "make it watercolor"
                }
            }),
        )
        .await;

    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.expect("json");
    assert_eq!(body["text"], "ZWRpdGVk");

    // The upstream saw the image part and the requested modalities
    let upstream = ctx.last_upstream_request().expect("upstream request");
    assert_eq!(
        upstream["contents"][0]["parts"][0]["inlineData"]["data"],
        "aGVsbG8="
    );
    assert_eq!(upstream["generationConfig"]["responseModalities"][0], "IMAGE");
}

#[tokio::test]
async fn test_edit_image_without_image_part_is_500() {
    // Upstream answers with text only: no inline image anywhere
    let ctx = TestContext::start_with_upstream(text_response("sorry, no image")).await;

    let response = ctx
        .post_json(
            "/api/gateway",
            &json!({
                "action": "editImage",
                "payload": {
                    "base64ImageData": "aGVsbG8=",
                    "mimeType": "image/png",
                    "prompt": "make it watercolor"
                }
            }),
        )
        .await;

    assert_eq!(response.status(), 500);
    let body: Value = response.json().await.expect("json");
    assert!(body["error"].as_str().expect("error").contains("image"));
}

#[tokio::test]
async fn test_edit_image_rejects_invalid_base64() {
    let ctx = TestContext::start_with_upstream(text_response("unused")).await;

    let response = ctx
        .post_json(
            "/api/gateway",
            &json!({
                "action": "editImage",
                "payload": {
                    "base64ImageData": "!!! not base64 !!!",
                    "mimeType": "image/png",
                    "prompt": "make it watercolor"
                }
            }),
        )
        .await;

    assert_eq!(response.status(), 400);
    // Rejected before any upstream call was made
    assert!(ctx.last_upstream_request().is_none());
}
