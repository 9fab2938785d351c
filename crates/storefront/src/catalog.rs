//! Static catalog loaded from a JSON content file at startup.
//!
//! The catalog is the source of truth for what can be added to the cart.
//! It is read once, validated for duplicate ids, and shared read-only via
//! `AppState` for the lifetime of the process.

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use bodega_core::{CatalogItem, Combo, ItemId, SubscriptionProduct};

/// Errors that can occur while loading the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Reading the content file failed.
    #[error("failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),

    /// The content file is not valid catalog JSON.
    #[error("failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),

    /// Two entries share an id.
    #[error("duplicate catalog id: {0}")]
    DuplicateId(String),
}

/// On-disk catalog shape: products and combos in display order.
#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    products: Vec<SubscriptionProduct>,
    #[serde(default)]
    combos: Vec<Combo>,
}

/// The in-memory product catalog.
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<SubscriptionProduct>,
    combos: Vec<Combo>,
}

impl Catalog {
    /// Load and validate the catalog from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, does not parse, or
    /// contains duplicate ids.
    pub fn from_json_file(path: &Path) -> Result<Self, CatalogError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Parse and validate catalog JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON does not parse or contains duplicate ids.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_json::from_str(json)?;

        let mut seen = std::collections::HashSet::new();
        let product_ids = file.products.iter().map(|p| &p.id);
        let combo_ids = file.combos.iter().map(|c| &c.id);
        for id in product_ids.chain(combo_ids) {
            if !seen.insert(id.clone()) {
                return Err(CatalogError::DuplicateId(id.to_string()));
            }
        }

        Ok(Self {
            products: file.products,
            combos: file.combos,
        })
    }

    /// Look up an item by id, across products and combos.
    ///
    /// Returns an owned item suitable for placing into a cart line.
    #[must_use]
    pub fn get(&self, id: &ItemId) -> Option<CatalogItem> {
        if let Some(product) = self.products.iter().find(|p| &p.id == id) {
            return Some(CatalogItem::Product(product.clone()));
        }
        self.combos
            .iter()
            .find(|c| &c.id == id)
            .map(|combo| CatalogItem::Combo(combo.clone()))
    }

    /// Subscription products, in display order.
    #[must_use]
    pub fn products(&self) -> &[SubscriptionProduct] {
        &self.products
    }

    /// Combos, in display order.
    #[must_use]
    pub fn combos(&self) -> &[Combo] {
        &self.combos
    }

    /// Display names of every catalog entry, products first.
    ///
    /// Used to ground AI suggestions in what the store actually sells.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.products
            .iter()
            .map(|p| p.name.as_str())
            .chain(self.combos.iter().map(|c| c.name.as_str()))
    }

    /// Total number of catalog entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len() + self.combos.len()
    }

    /// Whether the catalog has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty() && self.combos.is_empty()
    }
}
