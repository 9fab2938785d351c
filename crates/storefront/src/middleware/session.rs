//! Session layer for per-customer carts.
//!
//! Sessions are backed by the in-memory store: carts intentionally do not
//! survive a restart, matching the no-persistence contract of the cart.

use tower_sessions::{MemoryStore, SessionManagerLayer};

/// Session cookie name.
const SESSION_COOKIE: &str = "bodega.sid";

/// Create the session layer with an in-memory store.
///
/// The cookie is not marked secure because TLS terminates at the proxy in
/// every deployed environment.
#[must_use]
pub fn create_session_layer() -> SessionManagerLayer<MemoryStore> {
    let store = MemoryStore::default();
    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE)
        .with_secure(false)
}
