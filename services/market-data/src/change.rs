//! Change indicators for the presentation layer
//!
//! Pure comparisons used to trigger transient highlights: per-level price
//! and quantity changes between two snapshots, the current-price movement
//! (amount and percentage), and the relative width of quantity bars.
//!
//! Ratios use `Decimal` and are rounded to two places; a zero denominator
//! yields `None`/zero, never NaN or infinity.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use types::book::PriceLevel;
use types::numeric::{Price, Quantity};

use crate::order_book::OrderBookSnapshot;

/// Scale the dashboard uses for full-width quantity bars.
pub const DEFAULT_BAR_SCALE: i64 = 10_000;

/// Result of a three-way comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Change {
    Increase,
    Decrease,
    Unchanged,
}

impl Change {
    fn of<T: Ord>(current: T, previous: T) -> Self {
        match current.cmp(&previous) {
            std::cmp::Ordering::Greater => Change::Increase,
            std::cmp::Ordering::Less => Change::Decrease,
            std::cmp::Ordering::Equal => Change::Unchanged,
        }
    }
}

/// Which field of a level to compare.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeField {
    Price,
    Quantity,
}

/// Compare one field of a level against its previous observation.
///
/// No previous observation means `Unchanged`.
pub fn classify_change(
    current: &PriceLevel,
    previous: Option<&PriceLevel>,
    field: ChangeField,
) -> Change {
    let Some(previous) = previous else {
        return Change::Unchanged;
    };
    match field {
        ChangeField::Price => Change::of(current.price, previous.price),
        ChangeField::Quantity => Change::of(current.total_quantity, previous.total_quantity),
    }
}

/// Price and quantity change for one ladder row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelChange {
    pub price: Change,
    pub quantity: Change,
}

/// Classify every row of `current` against the row at the same index in
/// `previous`, matching how the ladder is laid out on screen.
pub fn side_changes(current: &[PriceLevel], previous: Option<&[PriceLevel]>) -> Vec<LevelChange> {
    current
        .iter()
        .enumerate()
        .map(|(index, level)| {
            let prior = previous.and_then(|side| side.get(index));
            LevelChange {
                price: classify_change(level, prior, ChangeField::Price),
                quantity: classify_change(level, prior, ChangeField::Quantity),
            }
        })
        .collect()
}

/// Direction of the current-price display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Same,
}

/// Current price versus previous price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceMovement {
    pub direction: Direction,
    /// current - previous
    pub amount: i64,
    /// Percent of previous price, 2dp. `None` when the previous price is 0.
    pub percent: Option<Decimal>,
}

impl PriceMovement {
    pub fn between(current: Price, previous: Price) -> Self {
        let amount = current.value().saturating_sub(previous.value());
        let direction = match Change::of(current, previous) {
            Change::Increase => Direction::Up,
            Change::Decrease => Direction::Down,
            Change::Unchanged => Direction::Same,
        };
        Self {
            direction,
            amount,
            percent: percent_of(amount, previous.value()),
        }
    }

    pub fn from_snapshot(snapshot: &OrderBookSnapshot) -> Self {
        Self::between(snapshot.current_price, snapshot.prev_price)
    }
}

fn percent_of(part: i64, whole: i64) -> Option<Decimal> {
    if whole == 0 {
        return None;
    }
    Decimal::from(part)
        .checked_mul(Decimal::ONE_HUNDRED)?
        .checked_div(Decimal::from(whole))
        .map(|pct| pct.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
}

/// Width of a quantity bar as a percentage of `scale`, capped at 100.
pub fn quantity_bar_percent(quantity: Quantity, scale: i64) -> Decimal {
    if scale <= 0 {
        return Decimal::ZERO;
    }
    percent_of(quantity.value(), scale)
        .unwrap_or(Decimal::ZERO)
        .min(Decimal::ONE_HUNDRED)
}
