//! Order entry for the trading dashboard
//!
//! Turns the order form (side, limit/market, price, quantity) into the
//! trading server's wire request and submits it over REST:
//!
//! ```text
//! POST /api/v1/orders
//! { "companyCode": "005930", "type": "BUY", "quantity": 10, "price": 58300, "userId": 1 }
//! ```
//!
//! Market orders are sent with `price: 0`. Submission failures come back as
//! a [`SubmitError`] instead of being swallowed.

mod client;
mod error;
mod models;

pub use client::{submit_form, OrderClient, OrderClientConfig, OrderSubmitter, ORDERS_PATH};
pub use error::{OrderError, SubmitError};
pub use models::{OrderForm, OrderRequest};
