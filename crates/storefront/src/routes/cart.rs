//! Cart route handlers.
//!
//! The cart lives in the customer's session as a serialized value. Every
//! handler loads it, routes the mutation through the cart's own operations,
//! and saves it back; nothing here touches cart lines directly.

use axum::{Json, extract::State};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use bodega_core::{Cart, CatalogItem, ItemId};

use crate::error::{AppError, Result};
use crate::services::checkout;
use crate::state::AppState;

/// Session key under which the cart is stored.
const CART_KEY: &str = "cart";

// =============================================================================
// Session Helpers
// =============================================================================

/// Load the cart from the session, defaulting to an empty one.
async fn load_cart(session: &Session) -> Result<Cart> {
    Ok(session.get::<Cart>(CART_KEY).await?.unwrap_or_default())
}

/// Save the cart back to the session.
async fn save_cart(session: &Session, cart: &Cart) -> Result<()> {
    session.insert(CART_KEY, cart).await?;
    Ok(())
}

// =============================================================================
// Request/Response Types
// =============================================================================

/// Add to cart request body.
#[derive(Debug, Deserialize)]
pub struct AddToCartRequest {
    /// Catalog id of the item to add.
    pub item_id: ItemId,
}

/// Update cart request body.
#[derive(Debug, Deserialize)]
pub struct UpdateCartRequest {
    /// Catalog id of the line to update.
    pub item_id: ItemId,
    /// Absolute new quantity; zero or negative removes the line.
    pub quantity: i64,
}

/// Remove from cart request body.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartRequest {
    /// Catalog id of the line to remove.
    pub item_id: ItemId,
}

/// Cart line display data.
#[derive(Debug, Serialize)]
pub struct CartLineView {
    /// The catalog item.
    pub item: CatalogItem,
    /// Units of the item.
    pub quantity: u32,
    /// USD line total.
    pub line_total_usd: Decimal,
    /// Bolívar line total.
    pub line_total_bs: Decimal,
}

/// Cart display data.
#[derive(Debug, Serialize)]
pub struct CartView {
    /// Lines in first-added order.
    pub lines: Vec<CartLineView>,
    /// USD subtotal.
    pub subtotal_usd: Decimal,
    /// Bolívar subtotal.
    pub subtotal_bs: Decimal,
    /// Total unit count (for the badge).
    pub item_count: u32,
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            lines: cart
                .lines()
                .iter()
                .map(|line| CartLineView {
                    item: line.item.clone(),
                    quantity: line.quantity,
                    line_total_usd: line.line_total_usd(),
                    line_total_bs: line.line_total_bs(),
                })
                .collect(),
            subtotal_usd: cart.subtotal(),
            subtotal_bs: cart.subtotal_bs(),
            item_count: cart.item_count(),
        }
    }
}

/// Cart count badge response.
#[derive(Debug, Serialize)]
pub struct CartCountResponse {
    /// Total unit count.
    pub count: u32,
}

/// Checkout confirmation response.
#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    /// Pre-filled `wa.me` deep link for the order.
    pub whatsapp_url: String,
}

// =============================================================================
// Route Handlers
// =============================================================================

/// Display the cart.
///
/// GET /api/cart
#[instrument(skip(session))]
pub async fn show(session: Session) -> Result<Json<CartView>> {
    let cart = load_cart(&session).await?;
    Ok(Json(CartView::from(&cart)))
}

/// Add one unit of an item to the cart.
///
/// Merges into an existing line when the item is already in the cart.
///
/// POST /api/cart/add
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<AddToCartRequest>,
) -> Result<Json<CartView>> {
    let item = state
        .catalog()
        .get(&request.item_id)
        .ok_or_else(|| AppError::NotFound(format!("item {}", request.item_id)))?;

    let mut cart = load_cart(&session).await?;
    cart.add_item(item);
    save_cart(&session, &cart).await?;

    Ok(Json(CartView::from(&cart)))
}

/// Set a line's quantity. Zero or negative removes the line.
///
/// POST /api/cart/update
#[instrument(skip(session))]
pub async fn update(
    session: Session,
    Json(request): Json<UpdateCartRequest>,
) -> Result<Json<CartView>> {
    let mut cart = load_cart(&session).await?;
    cart.update_quantity(&request.item_id, request.quantity);
    save_cart(&session, &cart).await?;

    Ok(Json(CartView::from(&cart)))
}

/// Remove a line from the cart.
///
/// POST /api/cart/remove
#[instrument(skip(session))]
pub async fn remove(
    session: Session,
    Json(request): Json<RemoveFromCartRequest>,
) -> Result<Json<CartView>> {
    let mut cart = load_cart(&session).await?;
    cart.remove_item(&request.item_id);
    save_cart(&session, &cart).await?;

    Ok(Json(CartView::from(&cart)))
}

/// Get the cart count badge.
///
/// GET /api/cart/count
#[instrument(skip(session))]
pub async fn count(session: Session) -> Result<Json<CartCountResponse>> {
    let cart = load_cart(&session).await?;
    Ok(Json(CartCountResponse {
        count: cart.item_count(),
    }))
}

/// Confirm checkout: build the WhatsApp hand-off link and clear the cart.
///
/// POST /api/checkout/confirm
#[instrument(skip(state, session))]
pub async fn confirm(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<CheckoutResponse>> {
    let mut cart = load_cart(&session).await?;
    if cart.is_empty() {
        return Err(AppError::BadRequest("cart is empty".to_string()));
    }

    let url = checkout::checkout_url(&cart, &state.config().whatsapp_number)
        .map_err(|e| AppError::Internal(format!("failed to build checkout link: {e}")))?;

    cart.clear();
    save_cart(&session, &cart).await?;

    Ok(Json(CheckoutResponse {
        whatsapp_url: url.into(),
    }))
}
