//! Feed message decoding
//!
//! The push channel delivers one JSON object per frame. Frames are not
//! tagged, so the shape decides what a frame is:
//!
//! - `{ "message": "..." }` → control message (connection acknowledgement)
//! - `sellLevels` / `buyLevels` present → full book snapshot
//! - numeric `price` + `quantity` + `tradeDateTime`, no `orderId` → trade print
//! - `orderId`, or `type` with `price`/`quantity` → single-order delta
//! - `currentPrice` + `time` → stock tick for the chart
//!
//! Decoding is total over JSON: missing or mistyped fields default to zero
//! or empty instead of failing. Only text that is not JSON at all is an
//! error. Shapes that match none of the above decode to
//! [`FeedMessage::Unrecognized`].

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use types::book::PriceLevel;
use types::ids::CompanyCode;
use types::numeric::{Price, Quantity};
use types::order::Side;

use crate::candles::StockTick;
use crate::trades::TradePrint;

/// Text of the acknowledgement the server sends right after connecting.
pub const CONNECTION_ACK: &str = "WebSocket connection successful";

/// Errors that can occur while decoding a frame.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error("frame is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Out-of-band status message from the server. Never book data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlMessage {
    pub message: String,
}

impl ControlMessage {
    /// Whether this is the post-connect acknowledgement.
    pub fn is_connection_ack(&self) -> bool {
        self.message == CONNECTION_ACK
    }
}

/// One order's effect on the book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookDelta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_code: Option<CompanyCode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    #[serde(rename = "type")]
    pub side: Side,
    pub price: Price,
    pub quantity: Quantity,
}

/// Full replacement of one or both book sides.
///
/// Absent arrays decode as empty: the side is cleared, not left as-is.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookSnapshotMessage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_code: Option<CompanyCode>,
    #[serde(default)]
    pub sell_levels: Vec<PriceLevel>,
    #[serde(default)]
    pub buy_levels: Vec<PriceLevel>,
}

/// A decoded feed frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedMessage {
    Control(ControlMessage),
    Delta(BookDelta),
    Snapshot(BookSnapshotMessage),
    Trade(TradePrint),
    Tick(StockTick),
    Unrecognized,
}

impl FeedMessage {
    /// Decode a raw text frame.
    pub fn decode(text: &str) -> Result<Self, FeedError> {
        let value: Value = serde_json::from_str(text)?;
        Ok(Self::from_value(&value))
    }

    /// Classify an already-parsed JSON value.
    pub fn from_value(value: &Value) -> Self {
        let Some(obj) = value.as_object() else {
            return FeedMessage::Unrecognized;
        };

        let has_levels = obj.contains_key("sellLevels") || obj.contains_key("buyLevels");

        if !has_levels && !obj.contains_key("type") {
            if let Some(Value::String(message)) = obj.get("message") {
                return FeedMessage::Control(ControlMessage {
                    message: message.clone(),
                });
            }
        }

        if has_levels {
            return FeedMessage::Snapshot(BookSnapshotMessage {
                company_code: company_code(obj),
                sell_levels: level_array(obj.get("sellLevels")),
                buy_levels: level_array(obj.get("buyLevels")),
            });
        }

        if !obj.contains_key("orderId")
            && obj.contains_key("tradeDateTime")
            && is_number(obj, "price")
            && is_number(obj, "quantity")
        {
            return FeedMessage::Trade(TradePrint {
                company_code: company_code(obj),
                price: Price::new(int_field(obj, "price")),
                quantity: Quantity::clamped(int_field(obj, "quantity")),
                trade_date_time: obj
                    .get("tradeDateTime")
                    .map(display_string)
                    .unwrap_or_default(),
            });
        }

        let has_order_fields = obj.contains_key("price") || obj.contains_key("quantity");
        if obj.contains_key("orderId") || (obj.contains_key("type") && has_order_fields) {
            return match obj.get("type").and_then(Value::as_str).and_then(Side::parse) {
                Some(side) => FeedMessage::Delta(BookDelta {
                    company_code: company_code(obj),
                    order_id: obj.get("orderId").and_then(id_string),
                    side,
                    price: Price::new(int_field(obj, "price")),
                    quantity: Quantity::clamped(int_field(obj, "quantity")),
                }),
                None => FeedMessage::Unrecognized,
            };
        }

        if obj.contains_key("currentPrice") && obj.contains_key("time") {
            return FeedMessage::Tick(StockTick {
                time: int_field(obj, "time"),
                current_price: Price::new(int_field(obj, "currentPrice")),
                volume: Quantity::clamped(int_field(obj, "volume")),
            });
        }

        FeedMessage::Unrecognized
    }

    /// Whether this frame carries order book data.
    pub fn is_book_data(&self) -> bool {
        matches!(self, FeedMessage::Delta(_) | FeedMessage::Snapshot(_))
    }

    /// Get the message kind as a string label for logging.
    pub fn kind_label(&self) -> &'static str {
        match self {
            FeedMessage::Control(_) => "Control",
            FeedMessage::Delta(_) => "Delta",
            FeedMessage::Snapshot(_) => "Snapshot",
            FeedMessage::Trade(_) => "Trade",
            FeedMessage::Tick(_) => "Tick",
            FeedMessage::Unrecognized => "Unrecognized",
        }
    }
}

fn company_code(obj: &Map<String, Value>) -> Option<CompanyCode> {
    obj.get("companyCode")
        .map(display_string)
        .and_then(|code| CompanyCode::new(code).ok())
}

/// Parse a level array, skipping entries that are not objects.
fn level_array(value: Option<&Value>) -> Vec<PriceLevel> {
    let Some(Value::Array(items)) = value else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(Value::as_object)
        .map(|level| {
            let quantity = if level.contains_key("totalQuantity") {
                int_field(level, "totalQuantity")
            } else {
                int_field(level, "quantity")
            };
            let order_count = int_field(level, "orderCount").clamp(0, u32::MAX as i64) as u32;
            PriceLevel::new(
                Price::new(int_field(level, "price")),
                Quantity::clamped(quantity),
                order_count,
            )
        })
        .collect()
}

fn is_number(obj: &Map<String, Value>, key: &str) -> bool {
    obj.get(key).is_some_and(Value::is_number)
}

fn int_field(obj: &Map<String, Value>, key: &str) -> i64 {
    obj.get(key).map(lossy_int).unwrap_or(0)
}

/// Read a JSON number (or numeric string) as a whole number.
///
/// Fractions are floored, out-of-range values saturate, anything else is 0.
fn lossy_int(value: &Value) -> i64 {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_u64().map(|u| i64::try_from(u).unwrap_or(i64::MAX)))
            .or_else(|| n.as_f64().map(|f| f.floor() as i64))
            .unwrap_or(0),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| {
                    s.parse::<f64>()
                        .ok()
                        .filter(|f| f.is_finite())
                        .map(|f| f.floor() as i64)
                })
                .unwrap_or(0)
        }
        _ => 0,
    }
}

fn id_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        other => Some(display_string(other)),
    }
}

fn display_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
