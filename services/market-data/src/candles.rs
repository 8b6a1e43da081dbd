//! OHLCV Candle Builder
//!
//! Builds live OHLCV (Open, High, Low, Close, Volume) candles from stock
//! ticks for every chart timeframe at once.
//!
//! Candle boundaries are aligned to epoch seconds (e.g., 1m candles open on
//! minute boundaries). Tick timestamps may arrive in seconds or
//! milliseconds; anything above `10^10` is treated as milliseconds.

use std::collections::{BTreeMap, VecDeque};

use serde::{Deserialize, Serialize};
use types::numeric::{Price, Quantity};

/// Timestamps above this are milliseconds.
const MILLIS_THRESHOLD: i64 = 10_000_000_000;

/// A price tick from the stock-data feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockTick {
    /// Unix time in seconds or milliseconds.
    pub time: i64,
    pub current_price: Price,
    #[serde(default)]
    pub volume: Quantity,
}

impl StockTick {
    /// Tick time normalized to Unix seconds.
    pub fn unix_seconds(&self) -> i64 {
        if self.time > MILLIS_THRESHOLD {
            self.time / 1000
        } else {
            self.time
        }
    }
}

/// Chart timeframes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Timeframe {
    /// 1 minute
    M1,
    /// 5 minutes
    M5,
    /// 15 minutes
    M15,
    /// 30 minutes
    M30,
    /// 1 hour
    H1,
    /// 1 day
    D1,
}

impl Timeframe {
    /// Duration of this timeframe in seconds.
    pub fn duration_secs(&self) -> i64 {
        match self {
            Timeframe::M1 => 60,
            Timeframe::M5 => 5 * 60,
            Timeframe::M15 => 15 * 60,
            Timeframe::M30 => 30 * 60,
            Timeframe::H1 => 3600,
            Timeframe::D1 => 86400,
        }
    }

    pub fn all() -> &'static [Timeframe] {
        &[
            Timeframe::M1,
            Timeframe::M5,
            Timeframe::M15,
            Timeframe::M30,
            Timeframe::H1,
            Timeframe::D1,
        ]
    }

    /// Align a timestamp to this timeframe's boundary (floor).
    ///
    /// Saturates at `i64::MIN` for times before the earliest representable
    /// boundary.
    pub fn align_to_boundary(&self, unix_secs: i64) -> i64 {
        let duration = self.duration_secs();
        unix_secs.div_euclid(duration).saturating_mul(duration)
    }
}

/// A single OHLCV candle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candle {
    pub open: Price,
    pub high: Price,
    pub low: Price,
    pub close: Price,
    pub volume: Quantity,
    pub open_time: i64,
    pub close_time: i64,
    pub tick_count: u64,
    pub timeframe: Timeframe,
}

impl Candle {
    fn new(price: Price, volume: Quantity, open_time: i64, timeframe: Timeframe) -> Self {
        Self {
            open: price,
            high: price,
            low: price,
            close: price,
            volume,
            open_time,
            close_time: open_time.saturating_add(timeframe.duration_secs() - 1),
            tick_count: 1,
            timeframe,
        }
    }

    fn update(&mut self, price: Price, volume: Quantity) {
        self.high = self.high.max(price);
        self.low = self.low.min(price);
        self.close = price;
        self.volume = self.volume.saturating_add(volume);
        self.tick_count += 1;
    }

    /// Validate candle integrity (OHLCV invariants).
    pub fn is_valid(&self) -> bool {
        self.high >= self.open
            && self.high >= self.close
            && self.high >= self.low
            && self.low <= self.open
            && self.low <= self.close
            && self.close_time > self.open_time
    }
}

/// Builds candles for a single timeframe.
pub struct CandleBuilder {
    timeframe: Timeframe,
    /// Currently building candle (not yet closed).
    current: Option<Candle>,
    /// Closed candles, oldest first.
    closed: VecDeque<Candle>,
    max_history: usize,
}

impl CandleBuilder {
    pub fn new(timeframe: Timeframe, max_history: usize) -> Self {
        Self {
            timeframe,
            current: None,
            closed: VecDeque::new(),
            max_history,
        }
    }

    /// Process a tick: update or create the candle, closing at boundaries.
    ///
    /// Returns the closed candle if the tick crosses a boundary. Ticks older
    /// than the open candle are folded into it rather than reopening history.
    pub fn process_tick(&mut self, tick: &StockTick) -> Option<Candle> {
        let boundary = self.timeframe.align_to_boundary(tick.unix_seconds());

        let mut closed_candle = None;
        if let Some(current) = &self.current {
            if boundary > current.open_time {
                closed_candle = self.close_current();
            }
        }

        match &mut self.current {
            Some(candle) => candle.update(tick.current_price, tick.volume),
            None => {
                self.current = Some(Candle::new(
                    tick.current_price,
                    tick.volume,
                    boundary,
                    self.timeframe,
                ));
            }
        }

        closed_candle
    }

    /// Force-close the current candle.
    pub fn close_current(&mut self) -> Option<Candle> {
        let candle = self.current.take()?;
        self.closed.push_back(candle.clone());
        while self.closed.len() > self.max_history {
            self.closed.pop_front();
        }
        Some(candle)
    }

    /// Most recent closed candles, newest first.
    pub fn get_candles(&self, limit: usize) -> Vec<Candle> {
        self.closed.iter().rev().take(limit).cloned().collect()
    }

    pub fn current_candle(&self) -> Option<&Candle> {
        self.current.as_ref()
    }

    pub fn timeframe(&self) -> Timeframe {
        self.timeframe
    }
}

/// Candle builders across all chart timeframes for one symbol.
pub struct CandleSet {
    builders: BTreeMap<Timeframe, CandleBuilder>,
}

impl CandleSet {
    pub fn new(max_history_per_tf: usize) -> Self {
        let builders = Timeframe::all()
            .iter()
            .map(|&tf| (tf, CandleBuilder::new(tf, max_history_per_tf)))
            .collect();
        Self { builders }
    }

    /// Feed a tick to every timeframe; returns the candles it closed.
    pub fn process_tick(&mut self, tick: &StockTick) -> Vec<Candle> {
        self.builders
            .values_mut()
            .filter_map(|builder| builder.process_tick(tick))
            .collect()
    }

    pub fn get_candles(&self, timeframe: Timeframe, limit: usize) -> Vec<Candle> {
        self.builders
            .get(&timeframe)
            .map(|b| b.get_candles(limit))
            .unwrap_or_default()
    }

    pub fn current_candle(&self, timeframe: Timeframe) -> Option<&Candle> {
        self.builders.get(&timeframe).and_then(CandleBuilder::current_candle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tick(time: i64, price: i64, volume: i64) -> StockTick {
        StockTick {
            time,
            current_price: Price::new(price),
            volume: Quantity::clamped(volume),
        }
    }

    #[test]
    fn test_timeframe_alignment() {
        assert_eq!(Timeframe::M1.align_to_boundary(125), 120);
        assert_eq!(Timeframe::M5.align_to_boundary(599), 300);
        assert_eq!(Timeframe::D1.align_to_boundary(86_399), 0);
    }

    #[test]
    fn test_extreme_tick_times_do_not_overflow() {
        let mut set = CandleSet::new(10);
        assert!(set.process_tick(&tick(i64::MIN, 1, 1)).is_empty());
        let first = set.current_candle(Timeframe::M1).unwrap();
        assert_eq!(first.open_time, i64::MIN);
        assert_eq!(first.close_time, i64::MIN + 59);

        let closed = set.process_tick(&tick(i64::MAX, 2, 1));
        assert_eq!(closed.len(), Timeframe::all().len());
        let candle = set.current_candle(Timeframe::D1).unwrap();
        assert!(candle.close_time > candle.open_time);
        assert_eq!(Timeframe::D1.align_to_boundary(i64::MAX) % 86400, 0);
    }

    #[test]
    fn test_millisecond_ticks_normalized() {
        assert_eq!(tick(1_708_500_000_123, 1, 0).unix_seconds(), 1_708_500_000);
        assert_eq!(tick(1_708_500_000, 1, 0).unix_seconds(), 1_708_500_000);
    }

    #[test]
    fn test_candle_update() {
        let mut builder = CandleBuilder::new(Timeframe::M1, 10);
        builder.process_tick(&tick(60, 100, 1));
        builder.process_tick(&tick(70, 110, 2));
        builder.process_tick(&tick(80, 95, 3));
        builder.process_tick(&tick(90, 105, 4));

        let candle = builder.current_candle().unwrap();
        assert_eq!(candle.open, Price::new(100));
        assert_eq!(candle.high, Price::new(110));
        assert_eq!(candle.low, Price::new(95));
        assert_eq!(candle.close, Price::new(105));
        assert_eq!(candle.volume.value(), 10);
        assert_eq!(candle.tick_count, 4);
        assert!(candle.is_valid());
    }

    #[test]
    fn test_candle_close_at_boundary() {
        let mut builder = CandleBuilder::new(Timeframe::M1, 10);
        assert!(builder.process_tick(&tick(60, 100, 1)).is_none());

        let closed = builder.process_tick(&tick(125, 101, 1)).unwrap();
        assert_eq!(closed.open_time, 60);
        assert_eq!(closed.close_time, 119);
        assert_eq!(builder.current_candle().unwrap().open_time, 120);
        assert_eq!(builder.get_candles(10).len(), 1);
    }

    #[test]
    fn test_late_tick_folds_into_open_candle() {
        let mut builder = CandleBuilder::new(Timeframe::M1, 10);
        builder.process_tick(&tick(125, 100, 1));
        assert!(builder.process_tick(&tick(30, 90, 1)).is_none());
        let candle = builder.current_candle().unwrap();
        assert_eq!(candle.open_time, 120);
        assert_eq!(candle.low, Price::new(90));
    }

    #[test]
    fn test_history_is_bounded() {
        let mut builder = CandleBuilder::new(Timeframe::M1, 2);
        for minute in 0..5 {
            builder.process_tick(&tick(minute * 60, 100, 1));
        }
        let candles = builder.get_candles(10);
        assert_eq!(candles.len(), 2);
        assert_eq!(candles[0].open_time, 180);
    }

    #[test]
    fn test_candle_set_fans_out() {
        let mut set = CandleSet::new(10);
        set.process_tick(&tick(0, 100, 1));
        let closed = set.process_tick(&tick(300, 101, 1));

        // M1 and M5 both roll over at 300s
        assert_eq!(closed.len(), 2);
        assert_eq!(set.get_candles(Timeframe::M5, 10).len(), 1);
        assert_eq!(set.current_candle(Timeframe::D1).unwrap().tick_count, 2);
    }
}
