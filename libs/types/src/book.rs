//! Aggregated order book level

use serde::{Deserialize, Serialize};

use crate::numeric::{Price, Quantity};

/// Aggregate open interest at one discrete price.
///
/// Wire names are camelCase (`totalQuantity`, `orderCount`). Older feed
/// variants send `quantity` instead of `totalQuantity`; that alias is
/// accepted on input only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceLevel {
    pub price: Price,
    #[serde(alias = "quantity", default)]
    pub total_quantity: Quantity,
    #[serde(default)]
    pub order_count: u32,
}

impl PriceLevel {
    pub fn new(price: Price, total_quantity: Quantity, order_count: u32) -> Self {
        Self {
            price,
            total_quantity,
            order_count,
        }
    }

    /// A level opened by a single order.
    pub fn single(price: Price, quantity: Quantity) -> Self {
        Self::new(price, quantity, 1)
    }

    /// Return a new level with one more order of `quantity` added.
    ///
    /// `self` is left untouched so a published snapshot holding it stays
    /// valid for diffing.
    pub fn with_order(&self, quantity: Quantity) -> Self {
        Self {
            price: self.price,
            total_quantity: self.total_quantity.saturating_add(quantity),
            order_count: self.order_count.saturating_add(1),
        }
    }

    /// Merge two levels at the same price.
    pub fn merged(&self, other: &PriceLevel) -> Self {
        Self {
            price: self.price,
            total_quantity: self.total_quantity.saturating_add(other.total_quantity),
            order_count: self.order_count.saturating_add(other.order_count),
        }
    }

    /// Check if this level has no remaining quantity.
    pub fn is_empty(&self) -> bool {
        self.total_quantity.is_zero()
    }
}
