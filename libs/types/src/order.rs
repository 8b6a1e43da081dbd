//! Order direction and pricing mode

use serde::{Deserialize, Serialize};
use std::fmt;

/// Order side (buyer or seller)
///
/// On the book, `Buy` orders rest on the bid side and `Sell` orders on the
/// ask side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    /// Buy order (bid)
    Buy,
    /// Sell order (ask)
    Sell,
}

impl Side {
    /// Parse the feed's side label. Case-insensitive; accepts both the
    /// buy/sell and bid/ask vocabularies.
    pub fn parse(label: &str) -> Option<Self> {
        match label.to_ascii_uppercase().as_str() {
            "BUY" | "BID" => Some(Side::Buy),
            "SELL" | "ASK" => Some(Side::Sell),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Buy => "BUY",
            Side::Sell => "SELL",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the order is priced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceType {
    /// Rest at the given price
    #[default]
    Limit,
    /// Execute at the best available price; sent with price 0
    Market,
}
