//! AI gateway dispatch and response normalization.
//!
//! The gateway accepts `{ action, payload }` requests, parses them into a
//! typed action, forwards to the Gemini client, and reshapes the upstream
//! response into the stable `{ text, sources? }` reply shape. Dispatch
//! returns an explicit `Result` so callers must handle both paths; nothing
//! is swallowed in a catch-all.
//!
//! The gateway holds no state between requests. Conversation history is
//! passed in full by the caller on every chat call.

use std::collections::HashSet;

use base64::Engine;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::instrument;

use crate::catalog::Catalog;
use crate::gemini::types::{
    Content, GenerateContentRequest, GenerationConfig, GroundingChunk, Part, SystemInstruction,
    ToolSpec,
};
use crate::gemini::{GeminiClient, GeminiError};

/// Persona preloaded into every chat session.
const SYSTEM_INSTRUCTION: &str = "You are the sales assistant for Bodega Digital, \
an online store selling digital subscription plans (streaming, music, productivity) \
and discounted bundles called combos. Prices are quoted in US dollars and in \
bolívares. Orders are confirmed through WhatsApp, where the customer sends the \
payment receipt for manual verification. Be warm and brief, recommend products or \
combos when it helps, and always answer in the language the customer writes in.";

// =============================================================================
// Wire Types
// =============================================================================

/// An incoming gateway request: `{ "action": ..., "payload": {...} }`.
#[derive(Debug, Deserialize)]
pub struct GatewayRequest {
    /// The action discriminator.
    pub action: String,
    /// Action-specific payload.
    #[serde(default)]
    pub payload: Value,
}

/// Payload for the `chat` action.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatPayload {
    /// Prior conversation turns, oldest first.
    #[serde(default)]
    pub history: Vec<HistoryMessage>,
    /// The new user message to answer.
    pub new_message: String,
}

/// One prior conversation turn.
#[derive(Debug, Deserialize)]
pub struct HistoryMessage {
    /// "user" or "model".
    pub role: String,
    /// Text parts of the turn.
    #[serde(default)]
    pub parts: Vec<HistoryPart>,
}

/// A text part of a history turn.
#[derive(Debug, Deserialize)]
pub struct HistoryPart {
    /// The text content.
    pub text: String,
}

/// Payload for the `suggest` action.
#[derive(Debug, Deserialize)]
pub struct SuggestPayload {
    /// What the customer said they are interested in.
    pub interest: String,
}

/// Payload for the `groundedSearch` action.
#[derive(Debug, Deserialize)]
pub struct SearchPayload {
    /// The question to answer with web grounding.
    pub query: String,
}

/// Payload for the `editImage` action.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditImagePayload {
    /// Base64-encoded source image.
    pub base64_image_data: String,
    /// Mime type of the source image.
    pub mime_type: String,
    /// The edit instruction.
    pub prompt: String,
}

/// A grounding citation in a reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Source {
    /// Source URI, unique within a reply.
    pub uri: String,
    /// Source title; falls back to the uri when the upstream omits it.
    pub title: String,
}

/// A successful gateway reply: `{ "text": ..., "sources"?: [...] }`.
#[derive(Debug, Serialize)]
pub struct GatewayReply {
    /// The assistant's reply; for `editImage`, the base64 edited image.
    pub text: String,
    /// Grounding citations, only present for `groundedSearch`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<Source>>,
}

impl GatewayReply {
    fn text_only(text: String) -> Self {
        Self {
            text,
            sources: None,
        }
    }
}

// =============================================================================
// Errors
// =============================================================================

/// Errors surfaced by the gateway dispatch.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The action discriminator is not one the gateway knows.
    #[error("unrecognized action: {0}")]
    InvalidAction(String),

    /// The payload does not match the action's expected fields.
    #[error("invalid payload for action {action}: {message}")]
    InvalidPayload {
        /// The action whose payload failed to parse.
        action: &'static str,
        /// What was wrong with it.
        message: String,
    },

    /// No upstream credential is configured.
    #[error("AI gateway is not configured")]
    NotConfigured,

    /// The image edit produced no inline image part.
    #[error("upstream returned no image")]
    NoImageReturned,

    /// The upstream call failed.
    #[error(transparent)]
    Upstream(#[from] GeminiError),
}

// =============================================================================
// Typed Actions
// =============================================================================

/// A parsed, validated gateway action.
#[derive(Debug)]
enum GatewayAction {
    Chat(ChatPayload),
    Suggest(SuggestPayload),
    GroundedSearch(SearchPayload),
    EditImage(EditImagePayload),
}

impl GatewayAction {
    const fn name(&self) -> &'static str {
        match self {
            Self::Chat(_) => "chat",
            Self::Suggest(_) => "suggest",
            Self::GroundedSearch(_) => "groundedSearch",
            Self::EditImage(_) => "editImage",
        }
    }
}

/// Parse the wire request into a typed action.
///
/// Action validity is checked before anything else, so an unrecognized
/// action is rejected even on a deployment without an upstream credential.
fn parse_request(request: GatewayRequest) -> Result<GatewayAction, GatewayError> {
    match request.action.as_str() {
        "chat" => Ok(GatewayAction::Chat(payload("chat", request.payload)?)),
        "suggest" => Ok(GatewayAction::Suggest(payload("suggest", request.payload)?)),
        "groundedSearch" => Ok(GatewayAction::GroundedSearch(payload(
            "groundedSearch",
            request.payload,
        )?)),
        "editImage" => Ok(GatewayAction::EditImage(payload(
            "editImage",
            request.payload,
        )?)),
        other => Err(GatewayError::InvalidAction(other.to_string())),
    }
}

fn payload<T: serde::de::DeserializeOwned>(
    action: &'static str,
    value: Value,
) -> Result<T, GatewayError> {
    serde_json::from_value(value).map_err(|e| GatewayError::InvalidPayload {
        action,
        message: e.to_string(),
    })
}

// =============================================================================
// Dispatch
// =============================================================================

/// The AI gateway: one entry point for the four upstream actions.
///
/// Constructed per request from `AppState`; holds no state of its own.
pub struct GatewayService<'a> {
    client: Option<&'a GeminiClient>,
    catalog: &'a Catalog,
}

impl<'a> GatewayService<'a> {
    /// Create a gateway over an optional client and the live catalog.
    #[must_use]
    pub const fn new(client: Option<&'a GeminiClient>, catalog: &'a Catalog) -> Self {
        Self { client, catalog }
    }

    /// Dispatch one gateway request.
    ///
    /// # Errors
    ///
    /// Returns `InvalidAction`/`InvalidPayload` for protocol errors,
    /// `NotConfigured` when no credential is set, `NoImageReturned` when an
    /// edit yields no image, and `Upstream` for any upstream failure. The
    /// upstream failure is logged here with the originating action name;
    /// the HTTP layer surfaces only an opaque message.
    #[instrument(skip(self, request), fields(action = %request.action))]
    pub async fn dispatch(&self, request: GatewayRequest) -> Result<GatewayReply, GatewayError> {
        let action = parse_request(request)?;
        let client = self.client.ok_or(GatewayError::NotConfigured)?;

        let result = match &action {
            GatewayAction::Chat(chat) => self.chat(client, chat).await,
            GatewayAction::Suggest(suggest) => self.suggest(client, suggest).await,
            GatewayAction::GroundedSearch(search) => self.grounded_search(client, search).await,
            GatewayAction::EditImage(edit) => self.edit_image(client, edit).await,
        };

        if let Err(GatewayError::Upstream(e)) = &result {
            tracing::error!(action = action.name(), error = %e, "Upstream AI call failed");
        }

        result
    }

    /// Conversational reply with the store persona and full history.
    async fn chat(
        &self,
        client: &GeminiClient,
        chat: &ChatPayload,
    ) -> Result<GatewayReply, GatewayError> {
        let mut contents: Vec<Content> = chat
            .history
            .iter()
            .map(|m| Content {
                role: m.role.clone(),
                parts: m.parts.iter().map(|p| Part::text(&p.text)).collect(),
            })
            .collect();
        contents.push(Content::user_text(&chat.new_message));

        let mut request = GenerateContentRequest::new(contents);
        request.system_instruction = Some(SystemInstruction::text(SYSTEM_INSTRUCTION));

        let response = client.generate(&request).await?;
        Ok(GatewayReply::text_only(
            response.text().unwrap_or_default(),
        ))
    }

    /// Single-shot product/combo suggestion grounded in the live catalog.
    async fn suggest(
        &self,
        client: &GeminiClient,
        suggest: &SuggestPayload,
    ) -> Result<GatewayReply, GatewayError> {
        let names: Vec<&str> = self.catalog.names().collect();
        let prompt = format!(
            "A customer of Bodega Digital is interested in: {}. The store sells \
             these subscriptions and combos: {}. In one or two short sentences, \
             enthusiastically suggest the best match for them.",
            suggest.interest,
            names.join(", "),
        );

        let request = GenerateContentRequest::new(vec![Content::user_text(prompt)]);

        let response = client.generate(&request).await?;
        Ok(GatewayReply::text_only(
            response.text().unwrap_or_default(),
        ))
    }

    /// Web-grounded answer with deduplicated citations.
    async fn grounded_search(
        &self,
        client: &GeminiClient,
        search: &SearchPayload,
    ) -> Result<GatewayReply, GatewayError> {
        let mut request =
            GenerateContentRequest::new(vec![Content::user_text(&search.query)]);
        request.tools = Some(vec![ToolSpec::google_search()]);

        let response = client.generate(&request).await?;
        let sources = dedup_sources(response.grounding_chunks());

        Ok(GatewayReply {
            text: response.text().unwrap_or_default(),
            sources: Some(sources),
        })
    }

    /// Multimodal image edit; the reply text is the base64 edited image.
    async fn edit_image(
        &self,
        client: &GeminiClient,
        edit: &EditImagePayload,
    ) -> Result<GatewayReply, GatewayError> {
        // Reject undecodable input before spending an upstream call on it.
        if base64::engine::general_purpose::STANDARD
            .decode(&edit.base64_image_data)
            .is_err()
        {
            return Err(GatewayError::InvalidPayload {
                action: "editImage",
                message: "base64ImageData is not valid base64".to_string(),
            });
        }

        let content = Content {
            role: "user".to_string(),
            parts: vec![
                Part::inline_data(&edit.mime_type, &edit.base64_image_data),
                Part::text(&edit.prompt),
            ],
        };

        let mut request = GenerateContentRequest::new(vec![content]);
        request.generation_config = Some(GenerationConfig {
            response_modalities: Some(vec!["IMAGE".to_string(), "TEXT".to_string()]),
        });

        let response = client.generate_image(&request).await?;
        let image = response
            .inline_image()
            .ok_or(GatewayError::NoImageReturned)?;

        Ok(GatewayReply::text_only(image.data.clone()))
    }
}

/// Collapse grounding chunks into an ordered, uri-unique source list.
///
/// Entries without a non-empty uri are dropped; the first occurrence of a
/// uri wins and later duplicates are ignored, preserving upstream order.
fn dedup_sources(chunks: &[GroundingChunk]) -> Vec<Source> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut sources = Vec::new();

    for chunk in chunks {
        let Some(web) = &chunk.web else { continue };
        let Some(uri) = web.uri.as_deref().filter(|u| !u.is_empty()) else {
            continue;
        };
        if seen.insert(uri) {
            let title = web
                .title
                .as_deref()
                .filter(|t| !t.is_empty())
                .unwrap_or(uri);
            sources.push(Source {
                uri: uri.to_string(),
                title: title.to_string(),
            });
        }
    }

    sources
}

#[cfg(test)]
mod tests {
    use crate::gemini::types::WebSource;

    use super::*;

    fn empty_catalog() -> Catalog {
        Catalog::from_json(r#"{ "products": [], "combos": [] }"#).expect("parse")
    }

    fn chunk(uri: Option<&str>, title: Option<&str>) -> GroundingChunk {
        GroundingChunk {
            web: Some(WebSource {
                uri: uri.map(String::from),
                title: title.map(String::from),
            }),
        }
    }

    #[test]
    fn test_parse_request_unknown_action() {
        let request = GatewayRequest {
            action: "bogus".to_string(),
            payload: Value::Null,
        };
        let err = parse_request(request).expect_err("unknown action");
        assert!(matches!(err, GatewayError::InvalidAction(a) if a == "bogus"));
    }

    #[test]
    fn test_parse_request_chat() {
        let request = GatewayRequest {
            action: "chat".to_string(),
            payload: serde_json::json!({
                "history": [
                    { "role": "user", "parts": [{ "text": "hola" }] },
                    { "role": "model", "parts": [{ "text": "buenas!" }] }
                ],
                "newMessage": "precios de netflix?"
            }),
        };

        let action = parse_request(request).expect("parse");
        let GatewayAction::Chat(chat) = action else {
            panic!("expected chat action");
        };
        assert_eq!(chat.history.len(), 2);
        assert_eq!(chat.new_message, "precios de netflix?");
    }

    #[test]
    fn test_parse_request_bad_payload() {
        let request = GatewayRequest {
            action: "suggest".to_string(),
            payload: serde_json::json!({ "wrong_field": 1 }),
        };
        let err = parse_request(request).expect_err("bad payload");
        assert!(matches!(
            err,
            GatewayError::InvalidPayload { action: "suggest", .. }
        ));
    }

    #[test]
    fn test_dedup_sources_first_occurrence_wins() {
        let chunks = vec![
            chunk(Some("https://a.example"), Some("First A")),
            chunk(Some("https://b.example"), Some("B")),
            chunk(Some("https://a.example"), Some("Second A")),
        ];

        let sources = dedup_sources(&chunks);
        assert_eq!(sources.len(), 2);
        assert_eq!(sources[0].uri, "https://a.example");
        assert_eq!(sources[0].title, "First A");
        assert_eq!(sources[1].uri, "https://b.example");
    }

    #[test]
    fn test_dedup_sources_drops_empty_uris() {
        let chunks = vec![
            chunk(None, Some("no uri")),
            chunk(Some(""), Some("empty uri")),
            GroundingChunk { web: None },
            chunk(Some("https://kept.example"), None),
        ];

        let sources = dedup_sources(&chunks);
        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].uri, "https://kept.example");
        // Missing title falls back to the uri
        assert_eq!(sources[0].title, "https://kept.example");
    }

    #[test]
    fn test_reply_serialization_omits_absent_sources() {
        let reply = GatewayReply::text_only("hola".to_string());
        let json = serde_json::to_value(&reply).expect("serialize");
        assert_eq!(json["text"], "hola");
        assert!(json.get("sources").is_none());
    }

    #[tokio::test]
    async fn test_dispatch_without_client_is_not_configured() {
        let catalog = empty_catalog();
        let service = GatewayService::new(None, &catalog);

        let request = GatewayRequest {
            action: "suggest".to_string(),
            payload: serde_json::json!({ "interest": "series" }),
        };

        let err = service.dispatch(request).await.expect_err("no client");
        assert!(matches!(err, GatewayError::NotConfigured));
    }

    #[tokio::test]
    async fn test_dispatch_checks_action_before_configuration() {
        let catalog = empty_catalog();
        let service = GatewayService::new(None, &catalog);

        let request = GatewayRequest {
            action: "bogus".to_string(),
            payload: Value::Null,
        };

        // An unknown action must be a protocol error, not NotConfigured
        let err = service.dispatch(request).await.expect_err("unknown action");
        assert!(matches!(err, GatewayError::InvalidAction(_)));
    }
}
