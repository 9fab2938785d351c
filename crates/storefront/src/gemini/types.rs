//! Types for the Gemini API.
//!
//! These types match the `generateContent` REST wire format. Requests are
//! built by the gateway service; response accessors are pure functions so
//! parsing behavior is unit-testable without a network.

use serde::{Deserialize, Serialize};

// =============================================================================
// Request Types
// =============================================================================

/// A single message in a conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    /// The role of the message sender ("user" or "model").
    #[serde(default)]
    pub role: String,
    /// The content parts of the message.
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    /// A user message containing a single text part.
    #[must_use]
    pub fn user_text(text: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            parts: vec![Part::text(text)],
        }
    }
}

/// One part of a message: text or inline binary data, never both.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    /// Text content.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Inline base64 data (e.g., an image).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<InlineData>,
}

impl Part {
    /// A text part.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            inline_data: None,
        }
    }

    /// An inline-data part carrying base64 bytes of the given mime type.
    #[must_use]
    pub fn inline_data(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            text: None,
            inline_data: Some(InlineData {
                mime_type: mime_type.into(),
                data: data.into(),
            }),
        }
    }
}

/// Base64-encoded binary payload with its mime type.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    /// Mime type of the data (e.g., "image/png").
    pub mime_type: String,
    /// Base64-encoded bytes.
    pub data: String,
}

/// System instruction preloading the model with a persona.
#[derive(Debug, Clone, Serialize)]
pub struct SystemInstruction {
    /// Instruction parts (text only).
    pub parts: Vec<Part>,
}

impl SystemInstruction {
    /// A system instruction from a single text block.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            parts: vec![Part::text(text)],
        }
    }
}

/// A tool made available to the model.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolSpec {
    /// The built-in web search tool.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub google_search: Option<GoogleSearch>,
}

impl ToolSpec {
    /// The web search tool, enabled with default settings.
    #[must_use]
    pub const fn google_search() -> Self {
        Self {
            google_search: Some(GoogleSearch {}),
        }
    }
}

/// Marker config for the built-in search tool (serializes as `{}`).
#[derive(Debug, Clone, Serialize)]
pub struct GoogleSearch {}

/// Generation parameters.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    /// Response modalities to request (e.g., `["IMAGE", "TEXT"]`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_modalities: Option<Vec<String>>,
}

/// Request body for the `generateContent` endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    /// Conversation contents, oldest first.
    pub contents: Vec<Content>,
    /// Persona/system instruction.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<SystemInstruction>,
    /// Tools available to the model.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<ToolSpec>>,
    /// Generation parameters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

impl GenerateContentRequest {
    /// A plain request: contents only, no tools or special config.
    #[must_use]
    pub const fn new(contents: Vec<Content>) -> Self {
        Self {
            contents,
            system_instruction: None,
            tools: None,
            generation_config: None,
        }
    }
}

// =============================================================================
// Response Types
// =============================================================================

/// Response from the `generateContent` endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateContentResponse {
    /// Generated candidates; in practice a single entry.
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

/// One generated candidate.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    /// The generated content.
    pub content: Option<Content>,
    /// Citation metadata attached when the search tool was used.
    #[serde(default)]
    pub grounding_metadata: Option<GroundingMetadata>,
}

/// Citation metadata for a grounded response.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroundingMetadata {
    /// The sources the answer was grounded in.
    #[serde(default)]
    pub grounding_chunks: Vec<GroundingChunk>,
}

/// One citation entry.
#[derive(Debug, Clone, Deserialize)]
pub struct GroundingChunk {
    /// Web source, when the chunk is a web citation.
    pub web: Option<WebSource>,
}

/// A web citation.
#[derive(Debug, Clone, Deserialize)]
pub struct WebSource {
    /// Source URI; may be absent or empty in upstream metadata.
    pub uri: Option<String>,
    /// Source page title.
    pub title: Option<String>,
}

impl GenerateContentResponse {
    fn first_candidate(&self) -> Option<&Candidate> {
        self.candidates.first()
    }

    /// Concatenated text of the first candidate's text parts.
    ///
    /// Returns `None` when there is no candidate or no text part at all.
    #[must_use]
    pub fn text(&self) -> Option<String> {
        let content = self.first_candidate()?.content.as_ref()?;
        let mut out = String::new();
        for part in &content.parts {
            if let Some(text) = &part.text {
                out.push_str(text);
            }
        }
        if out.is_empty() { None } else { Some(out) }
    }

    /// First inline-data part of the first candidate, if any.
    #[must_use]
    pub fn inline_image(&self) -> Option<&InlineData> {
        self.first_candidate()?
            .content
            .as_ref()?
            .parts
            .iter()
            .find_map(|part| part.inline_data.as_ref())
    }

    /// Grounding citations of the first candidate; empty when ungrounded.
    #[must_use]
    pub fn grounding_chunks(&self) -> &[GroundingChunk] {
        self.first_candidate()
            .and_then(|c| c.grounding_metadata.as_ref())
            .map_or(&[], |m| &m.grounding_chunks)
    }
}
