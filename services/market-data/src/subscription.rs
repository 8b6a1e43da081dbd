//! Feed subscription
//!
//! Drives the reconciler, trade history and candles from an injected feed
//! channel. Frames are applied strictly in arrival order, one at a time;
//! each new book snapshot is published through a `watch` channel so every
//! reader shares the same `Arc`.
//!
//! The channel itself (connect, reconnect, backoff) belongs to the caller:
//! anything implementing [`FeedSource`] can drive a subscription, which
//! keeps tests free of sockets.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};
use types::ids::CompanyCode;

use crate::candles::{Candle, CandleSet};
use crate::depth::{Ladder, DEFAULT_DEPTH};
use crate::feed::FeedMessage;
use crate::order_book::{OrderBookReconciler, OrderBookSnapshot};
use crate::trades::{RecordedTrade, TradeError, TradeHistory};

/// A source of already-framed text messages.
///
/// Returns `None` once the channel is closed for good.
#[async_trait]
pub trait FeedSource: Send {
    async fn next_frame(&mut self) -> Option<String>;
}

#[async_trait]
impl FeedSource for mpsc::Receiver<String> {
    async fn next_frame(&mut self) -> Option<String> {
        self.recv().await
    }
}

/// Configuration for a subscription.
#[derive(Debug, Clone)]
pub struct SubscriptionConfig {
    /// Only accept book data for this company, if set.
    pub company_code: Option<CompanyCode>,
    /// Rows per side in [`BookSubscription::ladder`].
    pub depth: usize,
    /// Maximum trades kept in the history list.
    pub trade_history: usize,
    /// Closed candles retained per timeframe.
    pub candle_history: usize,
}

impl Default for SubscriptionConfig {
    fn default() -> Self {
        Self {
            company_code: None,
            depth: DEFAULT_DEPTH,
            trade_history: 100,
            candle_history: 1000,
        }
    }
}

/// Why a frame was dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropReason {
    /// Not JSON.
    Malformed,
    /// JSON of no known shape.
    Unrecognized,
    /// Book data for a company this subscription does not follow.
    OtherCompany(CompanyCode),
    /// Trade print failed validation.
    InvalidTrade(TradeError),
}

/// What applying a frame did.
#[derive(Debug, Clone)]
pub enum FrameOutcome {
    Book(Arc<OrderBookSnapshot>),
    Trade(RecordedTrade),
    Tick { closed_candles: Vec<Candle> },
    Control,
    Dropped(DropReason),
}

/// Counters for a subscription's lifetime.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubscriptionStats {
    pub frames: u64,
    pub book_updates: u64,
    pub trades: u64,
    pub ticks: u64,
    pub control: u64,
    pub dropped: u64,
}

/// One subscription scope: a feed source plus the state it drives.
pub struct BookSubscription<S> {
    source: S,
    config: SubscriptionConfig,
    reconciler: OrderBookReconciler,
    trades: TradeHistory,
    candles: CandleSet,
    snapshot_tx: watch::Sender<Option<Arc<OrderBookSnapshot>>>,
    stats: SubscriptionStats,
}

impl<S: FeedSource> BookSubscription<S> {
    pub fn new(source: S, config: SubscriptionConfig) -> Self {
        info!(
            company_code = config.company_code.as_ref().map(CompanyCode::as_str),
            depth = config.depth,
            trade_history = config.trade_history,
            "BookSubscription initialized"
        );

        let (snapshot_tx, _) = watch::channel(None);
        Self {
            source,
            trades: TradeHistory::new(config.trade_history),
            candles: CandleSet::new(config.candle_history),
            config,
            reconciler: OrderBookReconciler::new(),
            snapshot_tx,
            stats: SubscriptionStats::default(),
        }
    }

    pub fn with_defaults(source: S) -> Self {
        Self::new(source, SubscriptionConfig::default())
    }

    /// Receiver that always holds the latest published snapshot.
    pub fn snapshots(&self) -> watch::Receiver<Option<Arc<OrderBookSnapshot>>> {
        self.snapshot_tx.subscribe()
    }

    /// Drain the source until it closes, applying frames in arrival order.
    pub async fn run(&mut self) -> SubscriptionStats {
        while let Some(frame) = self.source.next_frame().await {
            self.apply_frame(&frame);
        }
        info!(
            frames = self.stats.frames,
            book_updates = self.stats.book_updates,
            dropped = self.stats.dropped,
            "Feed closed, subscription finished"
        );
        self.stats.clone()
    }

    /// Decode and apply a single frame synchronously.
    pub fn apply_frame(&mut self, frame: &str) -> FrameOutcome {
        self.stats.frames += 1;

        let message = match FeedMessage::decode(frame) {
            Ok(message) => message,
            Err(err) => {
                warn!(error = %err, frame_len = frame.len(), "Dropping malformed frame");
                return self.drop_frame(DropReason::Malformed);
            }
        };

        match message {
            FeedMessage::Control(control) => {
                self.stats.control += 1;
                debug!(
                    message = %control.message,
                    connection_ack = control.is_connection_ack(),
                    "Control message discarded"
                );
                FrameOutcome::Control
            }
            FeedMessage::Trade(print) => match self.trades.record(print) {
                Ok(trade) => {
                    self.stats.trades += 1;
                    debug!(sequence = trade.sequence, price = %trade.print.price, "Trade recorded");
                    FrameOutcome::Trade(trade)
                }
                Err(err) => {
                    warn!(error = %err, "Dropping invalid trade print");
                    self.drop_frame(DropReason::InvalidTrade(err))
                }
            },
            FeedMessage::Tick(tick) => {
                self.stats.ticks += 1;
                let closed_candles = self.candles.process_tick(&tick);
                FrameOutcome::Tick { closed_candles }
            }
            FeedMessage::Unrecognized => {
                warn!("Dropping unrecognized feed message");
                self.drop_frame(DropReason::Unrecognized)
            }
            book @ (FeedMessage::Delta(_) | FeedMessage::Snapshot(_)) => {
                if let Some(other) = self.foreign_company(&book) {
                    debug!(company_code = %other, "Ignoring book data for another company");
                    return self.drop_frame(DropReason::OtherCompany(other));
                }
                self.apply_book(&book)
            }
        }
    }

    fn apply_book(&mut self, message: &FeedMessage) -> FrameOutcome {
        match self.reconciler.apply(message) {
            Ok(snapshot) => {
                self.stats.book_updates += 1;
                debug!(
                    kind = message.kind_label(),
                    current_price = %snapshot.current_price,
                    prev_price = %snapshot.prev_price,
                    ask_levels = snapshot.ask_levels.len(),
                    bid_levels = snapshot.bid_levels.len(),
                    "Book snapshot published"
                );
                self.snapshot_tx.send_replace(Some(Arc::clone(&snapshot)));
                FrameOutcome::Book(snapshot)
            }
            Err(err) => {
                warn!(error = %err, "Reconciler rejected message");
                self.drop_frame(DropReason::Unrecognized)
            }
        }
    }

    /// The message's company code, if it names one other than the filter.
    fn foreign_company(&self, message: &FeedMessage) -> Option<CompanyCode> {
        let wanted = self.config.company_code.as_ref()?;
        let incoming = match message {
            FeedMessage::Delta(delta) => delta.company_code.as_ref(),
            FeedMessage::Snapshot(snapshot) => snapshot.company_code.as_ref(),
            _ => None,
        }?;
        (incoming != wanted).then(|| incoming.clone())
    }

    fn drop_frame(&mut self, reason: DropReason) -> FrameOutcome {
        self.stats.dropped += 1;
        FrameOutcome::Dropped(reason)
    }

    /// Current snapshot at the configured depth.
    pub fn ladder(&self) -> Option<Ladder> {
        self.reconciler
            .current()
            .map(|snapshot| Ladder::from_snapshot(&snapshot, self.config.depth))
    }

    pub fn reconciler(&self) -> &OrderBookReconciler {
        &self.reconciler
    }

    pub fn trades(&self) -> &TradeHistory {
        &self.trades
    }

    pub fn candles(&self) -> &CandleSet {
        &self.candles
    }

    pub fn stats(&self) -> &SubscriptionStats {
        &self.stats
    }
}
