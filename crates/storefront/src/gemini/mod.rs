//! Gemini API client for the AI gateway.
//!
//! Thin typed wrapper over the `generateContent` REST endpoint. The gateway
//! service builds requests per action (chat, suggestion, grounded search,
//! image edit) and this module handles transport, authentication, and
//! response parsing.

mod client;
mod error;
pub mod types;

pub use client::GeminiClient;
pub use error::GeminiError;
