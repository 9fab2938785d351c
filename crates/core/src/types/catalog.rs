//! Catalog item types.
//!
//! The catalog sells two kinds of offerings: individual subscription
//! products and bundled combos. They are modeled as an explicit tagged
//! union rather than sniffing for combo-specific fields, so downstream
//! code matches on the `kind` tag instead of guessing from shape.

use serde::{Deserialize, Serialize};

use super::id::ItemId;
use super::price::Price;

/// An individual subscription product (e.g., a streaming plan).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionProduct {
    /// Unique, stable catalog id.
    pub id: ItemId,
    /// Display name.
    pub name: String,
    /// Category used for storefront navigation (e.g., "Streaming").
    pub category: String,
    /// Price in USD and bolívares.
    pub price: Price,
    /// Whether the product is currently unavailable.
    #[serde(default)]
    pub sold_out: bool,
}

/// A bundled offering referencing multiple named products at a single price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Combo {
    /// Unique, stable catalog id.
    pub id: ItemId,
    /// Display name.
    pub name: String,
    /// Price in USD and bolívares.
    pub price: Price,
    /// Names of the products included in the bundle, in display order.
    pub included: Vec<String>,
}

/// Anything that can be listed in the catalog and added to the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CatalogItem {
    /// A single subscription product.
    Product(SubscriptionProduct),
    /// A bundled combo.
    Combo(Combo),
}

impl CatalogItem {
    /// The item's catalog id.
    #[must_use]
    pub const fn id(&self) -> &ItemId {
        match self {
            Self::Product(p) => &p.id,
            Self::Combo(c) => &c.id,
        }
    }

    /// The item's display name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Product(p) => &p.name,
            Self::Combo(c) => &c.name,
        }
    }

    /// The item's price.
    #[must_use]
    pub const fn price(&self) -> &Price {
        match self {
            Self::Product(p) => &p.price,
            Self::Combo(c) => &c.price,
        }
    }
}
