//! The in-memory cart state machine.
//!
//! A cart is an ordered list of lines, one per distinct catalog item, each
//! with a quantity of at least 1. All operations are total: nothing here
//! returns an error, invalid quantities normalize to removal, and unknown
//! ids are no-ops. Derived values (subtotals, item count) are recomputed on
//! every read and never cached.
//!
//! Handlers must route every mutation through these operations rather than
//! poking at lines directly; the field is private for that reason.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{CatalogItem, ItemId};

/// One cart line: a catalog item and how many of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    /// The catalog item in this line.
    pub item: CatalogItem,
    /// How many units of the item. Always >= 1.
    pub quantity: u32,
}

impl CartLine {
    /// USD total for this line (price x quantity).
    #[must_use]
    pub fn line_total_usd(&self) -> Decimal {
        self.item.price().usd * Decimal::from(self.quantity)
    }

    /// Bolívar total for this line (price x quantity).
    #[must_use]
    pub fn line_total_bs(&self) -> Decimal {
        self.item.price().bs * Decimal::from(self.quantity)
    }
}

/// The shopping cart.
///
/// Lines preserve first-added order; updates never reorder. At most one
/// line exists per distinct item id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// The cart lines, in first-added order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Add one unit of an item.
    ///
    /// If a line with the item's id already exists its quantity is
    /// incremented by 1; otherwise a new line with quantity 1 is appended.
    pub fn add_item(&mut self, item: CatalogItem) {
        if let Some(line) = self.lines.iter_mut().find(|l| l.item.id() == item.id()) {
            line.quantity += 1;
        } else {
            self.lines.push(CartLine { item, quantity: 1 });
        }
    }

    /// Set a line's quantity to an absolute value.
    ///
    /// A quantity of zero or less removes the line. An unknown id is a
    /// no-op. Note the asymmetry with [`Cart::add_item`], which increments:
    /// this sets exactly.
    pub fn update_quantity(&mut self, id: &ItemId, quantity: i64) {
        if quantity <= 0 {
            self.remove_item(id);
            return;
        }
        // quantity is positive here, so the cast is lossless up to u32::MAX
        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        if let Some(line) = self.lines.iter_mut().find(|l| l.item.id() == id) {
            line.quantity = quantity;
        }
    }

    /// Remove the line with the given id, if present.
    pub fn remove_item(&mut self, id: &ItemId) {
        self.lines.retain(|l| l.item.id() != id);
    }

    /// Empty the cart. Called after checkout confirmation.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// USD subtotal over all lines, computed fresh.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.lines.iter().map(CartLine::line_total_usd).sum()
    }

    /// Bolívar subtotal over all lines, computed fresh.
    #[must_use]
    pub fn subtotal_bs(&self) -> Decimal {
        self.lines.iter().map(CartLine::line_total_bs).sum()
    }

    /// Total unit count over all lines (for the cart badge, not line count).
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }
}
