//! Client-side order book reconciliation
//!
//! Rebuilds the book from feed messages. [`apply_message`] is a pure
//! function of `(previous snapshot, message)`: it never mutates the previous
//! snapshot and always returns a fresh one, so observers can diff old vs.
//! new by reference.
//!
//! - Delta → add the order's quantity to the level at its exact price
//!   (or open a new level), then re-sort the side
//! - Snapshot → replace both sides wholesale (absent side = empty)
//!
//! After either, the current price is the floored midpoint of best ask and
//! best bid, found by scanning for the extremes rather than trusting array
//! position. An empty side leaves the current price at 0 ("unknown").

use std::cmp::Ordering;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use types::book::PriceLevel;
use types::ids::CompanyCode;
use types::numeric::Price;
use types::order::Side;

use crate::feed::{BookDelta, BookSnapshotMessage, FeedMessage};

/// Why a message produced no new snapshot.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReconcileError {
    #[error("unrecognized feed message")]
    Unrecognized,

    #[error("{kind} message carries no order book data")]
    NotBookData { kind: &'static str },
}

/// One side of the book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BookSide {
    /// Sell interest, best (lowest) first
    Ask,
    /// Buy interest, best (highest) first
    Bid,
}

impl BookSide {
    /// Ordering that puts the best price first on this side.
    pub fn compare(&self, a: &PriceLevel, b: &PriceLevel) -> Ordering {
        match self {
            BookSide::Ask => a.price.cmp(&b.price),
            BookSide::Bid => b.price.cmp(&a.price),
        }
    }

    /// Whether `levels` is strictly ordered best-first with unique prices.
    pub fn is_strictly_ordered(&self, levels: &[PriceLevel]) -> bool {
        levels
            .windows(2)
            .all(|pair| self.compare(&pair[0], &pair[1]) == Ordering::Less)
    }
}

impl From<Side> for BookSide {
    fn from(side: Side) -> Self {
        match side {
            Side::Buy => BookSide::Bid,
            Side::Sell => BookSide::Ask,
        }
    }
}

/// Immutable view of the book for one company.
///
/// Asks ascending by price, bids descending by price, both unique by price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderBookSnapshot {
    pub company_code: CompanyCode,
    /// Floored mid-price, or 0 when either side is empty.
    pub current_price: Price,
    /// `current_price` of the snapshot this one superseded.
    pub prev_price: Price,
    pub ask_levels: Vec<PriceLevel>,
    pub bid_levels: Vec<PriceLevel>,
}

impl OrderBookSnapshot {
    /// Lowest ask price.
    pub fn best_ask(&self) -> Option<Price> {
        self.ask_levels.iter().map(|l| l.price).min()
    }

    /// Highest bid price.
    pub fn best_bid(&self) -> Option<Price> {
        self.bid_levels.iter().map(|l| l.price).max()
    }

    /// Floored midpoint of best ask and best bid.
    pub fn mid_price(&self) -> Option<Price> {
        match (self.best_ask(), self.best_bid()) {
            (Some(ask), Some(bid)) => Some(Price::midpoint(ask, bid)),
            _ => None,
        }
    }

    /// Best ask minus best bid.
    pub fn spread(&self) -> Option<i64> {
        match (self.best_ask(), self.best_bid()) {
            (Some(ask), Some(bid)) => Some(ask.value().saturating_sub(bid.value())),
            _ => None,
        }
    }

    pub fn levels(&self, side: BookSide) -> &[PriceLevel] {
        match side {
            BookSide::Ask => &self.ask_levels,
            BookSide::Bid => &self.bid_levels,
        }
    }

    /// Level at an exact price on one side.
    pub fn level_at(&self, side: BookSide, price: Price) -> Option<&PriceLevel> {
        self.levels(side).iter().find(|l| l.price == price)
    }

    /// Check the ordering invariant on both sides.
    pub fn is_consistent(&self) -> bool {
        BookSide::Ask.is_strictly_ordered(&self.ask_levels)
            && BookSide::Bid.is_strictly_ordered(&self.bid_levels)
    }
}

/// Apply one feed message to the previous snapshot.
///
/// Returns a brand-new snapshot; `previous` is only read. Messages that are
/// not book data are rejected rather than turned into a no-op snapshot.
pub fn apply_message(
    previous: Option<&OrderBookSnapshot>,
    message: &FeedMessage,
) -> Result<OrderBookSnapshot, ReconcileError> {
    match message {
        FeedMessage::Delta(delta) => Ok(apply_delta(previous, delta)),
        FeedMessage::Snapshot(snapshot) => Ok(apply_snapshot(previous, snapshot)),
        FeedMessage::Unrecognized => Err(ReconcileError::Unrecognized),
        other => Err(ReconcileError::NotBookData {
            kind: other.kind_label(),
        }),
    }
}

fn apply_delta(previous: Option<&OrderBookSnapshot>, delta: &BookDelta) -> OrderBookSnapshot {
    let side = BookSide::from(delta.side);

    let (mut asks, mut bids) = match previous {
        Some(prev) => (prev.ask_levels.clone(), prev.bid_levels.clone()),
        None => (Vec::new(), Vec::new()),
    };

    let levels = match side {
        BookSide::Ask => &mut asks,
        BookSide::Bid => &mut bids,
    };

    match levels.iter().position(|l| l.price == delta.price) {
        Some(index) => levels[index] = levels[index].with_order(delta.quantity),
        None => levels.push(PriceLevel::single(delta.price, delta.quantity)),
    }
    levels.sort_by(|a, b| side.compare(a, b));

    let company_code = resolve_company_code(previous, delta.company_code.as_ref());
    finish(company_code, asks, bids, previous)
}

fn apply_snapshot(
    previous: Option<&OrderBookSnapshot>,
    snapshot: &BookSnapshotMessage,
) -> OrderBookSnapshot {
    let asks = normalize_side(&snapshot.sell_levels, BookSide::Ask);
    let bids = normalize_side(&snapshot.buy_levels, BookSide::Bid);

    let company_code = resolve_company_code(previous, snapshot.company_code.as_ref());
    finish(company_code, asks, bids, previous)
}

/// Sort a side best-first and merge duplicate prices.
///
/// Snapshot arrays come from the server in whatever order it likes; this
/// restores the unique, strictly ordered invariant.
pub fn normalize_side(levels: &[PriceLevel], side: BookSide) -> Vec<PriceLevel> {
    let mut sorted = levels.to_vec();
    sorted.sort_by(|a, b| side.compare(a, b));

    let mut merged: Vec<PriceLevel> = Vec::with_capacity(sorted.len());
    for level in sorted {
        match merged.last_mut() {
            Some(last) if last.price == level.price => *last = last.merged(&level),
            _ => merged.push(level),
        }
    }
    merged
}

/// Floored mid of the extreme prices, or 0 when a side is empty.
fn derive_current_price(asks: &[PriceLevel], bids: &[PriceLevel]) -> Price {
    let best_ask = asks.iter().map(|l| l.price).min();
    let best_bid = bids.iter().map(|l| l.price).max();
    match (best_ask, best_bid) {
        (Some(ask), Some(bid)) => Price::midpoint(ask, bid),
        _ => Price::ZERO,
    }
}

fn resolve_company_code(
    previous: Option<&OrderBookSnapshot>,
    incoming: Option<&CompanyCode>,
) -> CompanyCode {
    incoming
        .cloned()
        .or_else(|| previous.map(|p| p.company_code.clone()))
        .unwrap_or_else(CompanyCode::unknown)
}

fn finish(
    company_code: CompanyCode,
    ask_levels: Vec<PriceLevel>,
    bid_levels: Vec<PriceLevel>,
    previous: Option<&OrderBookSnapshot>,
) -> OrderBookSnapshot {
    let current_price = derive_current_price(&ask_levels, &bid_levels);
    // First tick shows no change.
    let prev_price = previous.map_or(current_price, |p| p.current_price);

    OrderBookSnapshot {
        company_code,
        current_price,
        prev_price,
        ask_levels,
        bid_levels,
    }
}

/// Holds the current and immediately previous snapshot for one
/// subscription scope.
///
/// Snapshots are handed out as `Arc`s so every reader shares the same
/// immutable value.
#[derive(Debug, Default)]
pub struct OrderBookReconciler {
    current: Option<Arc<OrderBookSnapshot>>,
    previous: Option<Arc<OrderBookSnapshot>>,
    updates_applied: u64,
}

impl OrderBookReconciler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a message and publish the resulting snapshot.
    ///
    /// On rejection the current/previous pair is left unchanged.
    pub fn apply(&mut self, message: &FeedMessage) -> Result<Arc<OrderBookSnapshot>, ReconcileError> {
        let next = Arc::new(apply_message(self.current.as_deref(), message)?);
        self.previous = self.current.replace(Arc::clone(&next));
        self.updates_applied += 1;
        Ok(next)
    }

    pub fn current(&self) -> Option<Arc<OrderBookSnapshot>> {
        self.current.clone()
    }

    pub fn previous(&self) -> Option<Arc<OrderBookSnapshot>> {
        self.previous.clone()
    }

    /// Number of snapshots published since creation or the last reset.
    pub fn updates_applied(&self) -> u64 {
        self.updates_applied
    }

    /// Forget all state (e.g. when the subscription switches symbol).
    pub fn reset(&mut self) {
        self.current = None;
        self.previous = None;
        self.updates_applied = 0;
    }
}
