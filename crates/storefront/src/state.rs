//! Application state shared across handlers.

use std::sync::Arc;

use crate::catalog::Catalog;
use crate::config::StorefrontConfig;
use crate::gemini::GeminiClient;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`. Everything in here is immutable after
/// startup; per-customer state (the cart) lives in the session instead.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: Catalog,
    gemini: Option<GeminiClient>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// Builds the Gemini client when a credential is configured; otherwise
    /// the gateway answers every action with a configuration error.
    #[must_use]
    pub fn new(config: StorefrontConfig, catalog: Catalog) -> Self {
        let gemini = config.gemini.as_ref().map(GeminiClient::new);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                gemini,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the product catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// Get the Gemini client, if one is configured.
    #[must_use]
    pub fn gemini(&self) -> Option<&GeminiClient> {
        self.inner.gemini.as_ref()
    }
}
