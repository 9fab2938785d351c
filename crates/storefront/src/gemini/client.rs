//! Gemini API client.
//!
//! One POST per call to `{base_url}/v1beta/models/{model}:generateContent`,
//! authenticated with the `x-goog-api-key` header. Non-streaming only; the
//! gateway relays complete responses.

use std::sync::Arc;

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use tracing::instrument;

use crate::config::GeminiConfig;

use super::error::{ApiErrorResponse, GeminiError};
use super::types::{GenerateContentRequest, GenerateContentResponse};

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Gemini API client.
///
/// Cheaply cloneable; holds the HTTP client, credentials, and model ids.
#[derive(Clone)]
pub struct GeminiClient {
    inner: Arc<GeminiClientInner>,
}

struct GeminiClientInner {
    client: reqwest::Client,
    base_url: String,
    model: String,
    image_model: String,
}

impl GeminiClient {
    /// Create a new Gemini client.
    ///
    /// # Panics
    ///
    /// Panics if the API key contains invalid header characters.
    #[must_use]
    pub fn new(config: &GeminiConfig) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            API_KEY_HEADER,
            HeaderValue::from_str(config.api_key.expose_secret())
                .expect("Invalid API key for header"),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            inner: Arc::new(GeminiClientInner {
                client,
                base_url: config.base_url.trim_end_matches('/').to_string(),
                model: config.model.clone(),
                image_model: config.image_model.clone(),
            }),
        }
    }

    /// Generate content with the text model.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the API responds with an error
    /// status, or the response body does not parse.
    #[instrument(skip(self, request), fields(model = %self.inner.model))]
    pub async fn generate(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, GeminiError> {
        self.post_model(&self.inner.model, request).await
    }

    /// Generate content with the image model.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`GeminiClient::generate`].
    #[instrument(skip(self, request), fields(model = %self.inner.image_model))]
    pub async fn generate_image(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, GeminiError> {
        self.post_model(&self.inner.image_model, request).await
    }

    async fn post_model(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, GeminiError> {
        let url = format!(
            "{}/v1beta/models/{model}:generateContent",
            self.inner.base_url
        );

        let response = self.inner.client.post(url).json(request).send().await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(parse_error_body(status.as_u16(), &body));
        }

        serde_json::from_str(&body)
            .map_err(|e| GeminiError::Parse(format!("Failed to parse response: {e}")))
    }
}

/// Turn an error body into a `GeminiError`, tolerating non-JSON bodies.
fn parse_error_body(status: u16, body: &str) -> GeminiError {
    match serde_json::from_str::<ApiErrorResponse>(body) {
        Ok(api_error) => {
            let message = match api_error.error.status {
                Some(symbol) => format!("{} [{symbol}]", api_error.error.message),
                None => api_error.error.message,
            };
            GeminiError::Api { status, message }
        }
        Err(_) => GeminiError::Api {
            status,
            message: body.chars().take(200).collect(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_body_json() {
        let body = r#"{
            "error": { "code": 429, "message": "Resource exhausted", "status": "RESOURCE_EXHAUSTED" }
        }"#;
        let err = parse_error_body(429, body);
        assert_eq!(
            err.to_string(),
            "API error (429): Resource exhausted [RESOURCE_EXHAUSTED]"
        );
    }

    #[test]
    fn test_parse_error_body_plain_text() {
        let err = parse_error_body(502, "Bad Gateway");
        assert_eq!(err.to_string(), "API error (502): Bad Gateway");
    }

    #[test]
    fn test_gemini_client_is_clone_send_sync() {
        fn assert_clone<T: Clone>() {}
        fn assert_send_sync<T: Send + Sync>() {}
        assert_clone::<GeminiClient>();
        assert_send_sync::<GeminiClient>();
    }
}
