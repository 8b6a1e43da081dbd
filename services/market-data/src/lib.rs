//! Market Data client core
//!
//! Consumes the dashboard's push feed and produces:
//! - Order book snapshots rebuilt from full snapshots or single-order deltas
//! - Fixed-depth ladders with tagged placeholder rows
//! - Change indicators (per-level and current-price movement)
//! - A bounded trade history list
//! - Live OHLCV candles across chart timeframes
//!
//! Reconciliation is a pure function of `(previous snapshot, message)`;
//! everything stateful sits in [`subscription::BookSubscription`], which is
//! handed its feed channel explicitly.
//!
//! # Architecture
//!
//! ```text
//!   FeedSource (injected)
//!        │ text frames
//!    ┌───▼───┐
//!    │ feed  │  ← classify: control / delta / snapshot / trade / tick
//!    └───┬───┘
//!   ┌────┴──────────┬────────────┐
//!   │               │            │
//! ┌─▼─────────┐ ┌───▼───┐  ┌────▼────┐
//! │order_book │ │trades │  │candles  │
//! └─┬─────────┘ └───────┘  └─────────┘
//!   │ Arc<OrderBookSnapshot>
//! ┌─▼──────────────────────┐
//! │ watch → depth / change │  (read-only consumers)
//! └────────────────────────┘
//! ```

pub mod candles;
pub mod change;
pub mod depth;
pub mod feed;
pub mod order_book;
pub mod subscription;
pub mod trades;

