//! Types library for the trading dashboard
//!
//! Shared vocabulary between the market-data feed consumer and the
//! order-entry client. All prices and quantities are whole numbers
//! (the exchange quotes in integer ticks).
//!
//! # Modules
//! - `ids`: Identifiers (CompanyCode, UserId)
//! - `numeric`: Integer price and quantity newtypes
//! - `order`: Order direction and pricing mode
//! - `book`: Aggregated price level
//! - `errors`: Error taxonomy

pub mod book;
pub mod errors;
pub mod ids;
pub mod numeric;
pub mod order;
