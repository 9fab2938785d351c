//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Health check
//!
//! # Catalog
//! GET  /api/catalog            - Products and combos
//!
//! # Cart (session-scoped)
//! GET  /api/cart               - Cart view
//! POST /api/cart/add           - Add one unit of an item
//! POST /api/cart/update        - Set a line's quantity (<= 0 removes)
//! POST /api/cart/remove        - Remove a line
//! GET  /api/cart/count         - Item count badge
//!
//! # Checkout
//! POST /api/checkout/confirm   - Build the WhatsApp link, clear the cart
//!
//! # AI Gateway
//! POST /api/gateway            - Dispatch one of: chat, suggest,
//!                                groundedSearch, editImage
//! ```

pub mod cart;
pub mod catalog;
pub mod gateway;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/count", get(cart::count))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Catalog
        .route("/api/catalog", get(catalog::index))
        // Cart routes
        .nest("/api/cart", cart_routes())
        // Checkout hand-off
        .route("/api/checkout/confirm", post(cart::confirm))
        // AI gateway (POST only; other verbs hit the 405 fallback)
        .route("/api/gateway", post(gateway::handle))
}
