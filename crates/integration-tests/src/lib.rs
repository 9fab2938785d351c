//! Integration test harness for Bodega Digital.
//!
//! [`TestContext`] starts the real storefront application on an ephemeral
//! port. The upstream Gemini API is replaced by a local stub server that
//! returns a canned response body and records the request it received, so
//! tests can assert on both directions of the gateway without a network.
//!
//! # Example
//!
//! ```rust,ignore
//! let ctx = TestContext::start_with_upstream(serde_json::json!({
//!     "candidates": [{ "content": { "role": "model", "parts": [{ "text": "hola" }] } }]
//! })).await;
//!
//! let response = ctx.post_json("/api/gateway", &request).await;
//! assert_eq!(response.status(), 200);
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use axum::{Json, Router, extract::State, routing::post};
use secrecy::SecretString;
use serde_json::Value;

use bodega_storefront::catalog::Catalog;
use bodega_storefront::config::{GeminiConfig, StorefrontConfig};
use bodega_storefront::state::AppState;

/// Support number used by every test configuration.
pub const TEST_WHATSAPP_NUMBER: &str = "584121234567";

/// Catalog used by every test server: a product at $4.80, a combo at $8.10,
/// and a sold-out product, enough to cover every cart scenario.
const TEST_CATALOG: &str = r#"{
    "products": [
        {
            "id": "netflix-premium",
            "name": "Netflix Premium",
            "category": "Streaming",
            "price": { "usd": "4.80", "bs": "540.00" }
        },
        {
            "id": "crunchyroll",
            "name": "Crunchyroll",
            "category": "Streaming",
            "price": { "usd": "3.20", "bs": "360.00" },
            "sold_out": true
        }
    ],
    "combos": [
        {
            "id": "combo-cine",
            "name": "Combo Cine en Casa",
            "price": { "usd": "8.10", "bs": "911.25" },
            "included": ["Netflix Premium", "Max"]
        }
    ]
}"#;

/// Shared state of the stub upstream: the canned reply and the last
/// request body it received.
struct UpstreamState {
    body: Value,
    last_request: Mutex<Option<Value>>,
}

/// A running storefront with (optionally) a stub upstream.
pub struct TestContext {
    /// Cookie-holding HTTP client; one client is one customer session.
    pub client: reqwest::Client,
    base_url: String,
    upstream: Option<Arc<UpstreamState>>,
}

impl TestContext {
    /// Start the storefront with a stub Gemini upstream answering every
    /// model call with `upstream_body`.
    ///
    /// # Panics
    ///
    /// Panics if a listener cannot be bound or the client cannot build.
    pub async fn start_with_upstream(upstream_body: Value) -> Self {
        let upstream = Arc::new(UpstreamState {
            body: upstream_body,
            last_request: Mutex::new(None),
        });

        let stub = Router::new()
            .route("/v1beta/models/{model_call}", post(upstream_handler))
            .with_state(Arc::clone(&upstream));
        let upstream_addr = serve(stub).await;

        let gemini = GeminiConfig {
            api_key: SecretString::from("kq7Rw2xVb9Tz4Np8Lm3Jd6Fg1Hs5Yc0A"),
            model: "gemini-2.5-flash".to_string(),
            image_model: "gemini-2.5-flash-image".to_string(),
            base_url: format!("http://{upstream_addr}"),
        };

        Self::start(Some(gemini), Some(upstream)).await
    }

    /// Start the storefront with no Gemini credential configured.
    ///
    /// # Panics
    ///
    /// Panics if a listener cannot be bound or the client cannot build.
    pub async fn start_without_gemini() -> Self {
        Self::start(None, None).await
    }

    /// Start the storefront with a credential pointing at a dead port, so
    /// every upstream call fails at the transport level.
    ///
    /// # Panics
    ///
    /// Panics if a listener cannot be bound or the client cannot build.
    pub async fn start_with_broken_upstream() -> Self {
        // Bind and immediately drop a listener to get a port nothing serves
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind");
        let addr = listener.local_addr().expect("local addr");
        drop(listener);

        let gemini = GeminiConfig {
            api_key: SecretString::from("kq7Rw2xVb9Tz4Np8Lm3Jd6Fg1Hs5Yc0A"),
            model: "gemini-2.5-flash".to_string(),
            image_model: "gemini-2.5-flash-image".to_string(),
            base_url: format!("http://{addr}"),
        };

        Self::start(Some(gemini), None).await
    }

    async fn start(gemini: Option<GeminiConfig>, upstream: Option<Arc<UpstreamState>>) -> Self {
        let config = StorefrontConfig {
            host: "127.0.0.1".parse().expect("ip"),
            port: 0,
            catalog_path: PathBuf::new(),
            whatsapp_number: TEST_WHATSAPP_NUMBER.to_string(),
            gemini,
            sentry_dsn: None,
            sentry_environment: None,
        };
        let catalog = Catalog::from_json(TEST_CATALOG).expect("test catalog");

        let app = bodega_storefront::app(AppState::new(config, catalog));
        let addr = serve(app).await;

        let client = reqwest::Client::builder()
            .cookie_store(true)
            .build()
            .expect("client");

        Self {
            client,
            base_url: format!("http://{addr}"),
            upstream,
        }
    }

    /// Full URL for a path on the storefront under test.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// GET a path.
    ///
    /// # Panics
    ///
    /// Panics if the request fails at the transport level.
    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client.get(self.url(path)).send().await.expect("GET")
    }

    /// POST a JSON body to a path.
    ///
    /// # Panics
    ///
    /// Panics if the request fails at the transport level.
    pub async fn post_json(&self, path: &str, body: &Value) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .expect("POST")
    }

    /// The last request body the stub upstream received, if any.
    ///
    /// # Panics
    ///
    /// Panics if called on a context started without an upstream.
    #[must_use]
    pub fn last_upstream_request(&self) -> Option<Value> {
        let upstream = self.upstream.as_ref().expect("no stub upstream");
        upstream
            .last_request
            .lock()
            .expect("lock")
            .clone()
    }
}

/// Stub upstream handler: record the request, return the canned body.
async fn upstream_handler(
    State(state): State<Arc<UpstreamState>>,
    Json(request): Json<Value>,
) -> Json<Value> {
    *state.last_request.lock().expect("lock") = Some(request);
    Json(state.body.clone())
}

/// Serve a router on an ephemeral local port, detached.
async fn serve(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("local addr");

    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("serve");
    });

    addr
}
