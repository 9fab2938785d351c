//! Catalog route handlers.

use axum::{Json, extract::State};
use serde::Serialize;

use bodega_core::{Combo, SubscriptionProduct};

use crate::state::AppState;

/// Catalog listing response.
#[derive(Debug, Serialize)]
pub struct CatalogResponse {
    /// Subscription products, in display order.
    pub products: Vec<SubscriptionProduct>,
    /// Combos, in display order.
    pub combos: Vec<Combo>,
}

/// List the full catalog.
///
/// GET /api/catalog
pub async fn index(State(state): State<AppState>) -> Json<CatalogResponse> {
    let catalog = state.catalog();
    Json(CatalogResponse {
        products: catalog.products().to_vec(),
        combos: catalog.combos().to_vec(),
    })
}
