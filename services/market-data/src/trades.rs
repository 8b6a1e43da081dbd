//! Trade history list
//!
//! Keeps the most recent trade prints newest-first for the trade-history
//! panel, assigns each a local monotonic sequence, and precomputes the
//! total amount (price × quantity).

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use types::ids::CompanyCode;
use types::numeric::{Price, Quantity};

/// Errors raised when a trade print cannot be recorded.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TradeError {
    #[error("trade price must be positive, got {0}")]
    NonPositivePrice(i64),

    #[error("trade quantity must be positive")]
    ZeroQuantity,

    #[error("trade amount overflows: {price} x {quantity}")]
    AmountOverflow { price: i64, quantity: i64 },
}

/// An executed trade as published on the feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradePrint {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_code: Option<CompanyCode>,
    pub price: Price,
    pub quantity: Quantity,
    /// Execution time as sent by the server; displayed verbatim.
    pub trade_date_time: String,
}

/// A trade accepted into the history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordedTrade {
    /// Local arrival sequence, starting at 1.
    pub sequence: u64,
    #[serde(flatten)]
    pub print: TradePrint,
    /// price × quantity
    pub total_amount: i64,
}

/// Bounded newest-first trade list.
#[derive(Debug)]
pub struct TradeHistory {
    sequence_counter: u64,
    /// Front = newest.
    history: VecDeque<RecordedTrade>,
    max_history: usize,
}

impl TradeHistory {
    pub fn new(max_history: usize) -> Self {
        Self {
            sequence_counter: 0,
            history: VecDeque::with_capacity(max_history),
            max_history,
        }
    }

    /// Record a trade print at the top of the list.
    ///
    /// Evicts the oldest entry when the list is full.
    pub fn record(&mut self, print: TradePrint) -> Result<RecordedTrade, TradeError> {
        let price = print.price.value();
        let quantity = print.quantity.value();

        if price <= 0 {
            return Err(TradeError::NonPositivePrice(price));
        }
        if quantity == 0 {
            return Err(TradeError::ZeroQuantity);
        }
        let total_amount = price
            .checked_mul(quantity)
            .ok_or(TradeError::AmountOverflow { price, quantity })?;

        self.sequence_counter += 1;
        let trade = RecordedTrade {
            sequence: self.sequence_counter,
            print,
            total_amount,
        };

        if self.max_history == 0 {
            return Ok(trade);
        }
        if self.history.len() >= self.max_history {
            self.history.pop_back();
        }
        self.history.push_front(trade.clone());

        Ok(trade)
    }

    /// Most recent trades, newest first.
    pub fn recent(&self, limit: usize) -> Vec<RecordedTrade> {
        self.history.iter().take(limit).cloned().collect()
    }

    /// The latest trade, if any.
    pub fn latest(&self) -> Option<&RecordedTrade> {
        self.history.front()
    }

    /// Sum of quantities currently held in the list.
    pub fn retained_volume(&self) -> i64 {
        self.history
            .iter()
            .fold(0i64, |acc, t| acc.saturating_add(t.print.quantity.value()))
    }

    pub fn current_sequence(&self) -> u64 {
        self.sequence_counter
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }
}
