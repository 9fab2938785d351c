//! Dual-currency price representation using decimal arithmetic.
//!
//! Every catalog item is priced in both US dollars and Venezuelan bolívares.
//! Amounts are `rust_decimal::Decimal` so money math is exact; serde
//! round-trips them as strings to preserve precision.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A price quoted in both USD and bolívares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in US dollars.
    pub usd: Decimal,
    /// Amount in bolívares.
    pub bs: Decimal,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(usd: Decimal, bs: Decimal) -> Self {
        Self { usd, bs }
    }

    /// Format the USD amount for display (e.g., "$4.80").
    #[must_use]
    pub fn display_usd(&self) -> String {
        format!("${:.2}", self.usd)
    }

    /// Format the bolívar amount for display (e.g., "Bs. 540.00").
    #[must_use]
    pub fn display_bs(&self) -> String {
        format!("Bs. {:.2}", self.bs)
    }
}
