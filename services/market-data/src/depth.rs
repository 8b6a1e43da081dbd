//! Fixed-depth ladder normalization
//!
//! The order book panel always renders the same number of rows per side.
//! Real levels fill the rows nearest the spread; the far end is padded with
//! [`LadderRow::Placeholder`] so padding is never confused with a genuine
//! zero-quantity level.

use serde::{Deserialize, Serialize};
use types::book::PriceLevel;

use crate::order_book::{BookSide, OrderBookSnapshot};

/// Rows per side shown by the dashboard.
pub const DEFAULT_DEPTH: usize = 10;

/// One ladder row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum LadderRow {
    Level(PriceLevel),
    Placeholder,
}

impl LadderRow {
    pub fn is_placeholder(&self) -> bool {
        matches!(self, LadderRow::Placeholder)
    }

    pub fn level(&self) -> Option<&PriceLevel> {
        match self {
            LadderRow::Level(level) => Some(level),
            LadderRow::Placeholder => None,
        }
    }
}

/// Pad or truncate a best-first side to exactly `depth` rows.
///
/// Keeps the `depth` levels nearest the best price; placeholders go at the
/// far end.
pub fn normalize_depth(side: &[PriceLevel], depth: usize) -> Vec<LadderRow> {
    side.iter()
        .take(depth)
        .copied()
        .map(LadderRow::Level)
        .chain(std::iter::repeat(LadderRow::Placeholder))
        .take(depth)
        .collect()
}

/// Both sides of a snapshot at fixed depth, best-first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ladder {
    pub asks: Vec<LadderRow>,
    pub bids: Vec<LadderRow>,
}

impl Ladder {
    pub fn from_snapshot(snapshot: &OrderBookSnapshot, depth: usize) -> Self {
        Self {
            asks: normalize_depth(snapshot.levels(BookSide::Ask), depth),
            bids: normalize_depth(snapshot.levels(BookSide::Bid), depth),
        }
    }

    /// Asks in on-screen order: highest row first, best ask last, so the
    /// best ask sits directly above the spread.
    pub fn asks_top_down(&self) -> impl Iterator<Item = &LadderRow> {
        self.asks.iter().rev()
    }

    pub fn depth(&self) -> usize {
        self.asks.len()
    }
}
