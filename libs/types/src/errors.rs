//! Error types for the shared vocabulary
//!
//! Constructors that validate input return these; wire decoding clamps
//! instead of failing.

use thiserror::Error;

/// Invalid domain value
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid price: {0}")]
    InvalidPrice(i64),

    #[error("Invalid quantity: {0}")]
    InvalidQuantity(i64),

    #[error("Invalid company code: {0:?}")]
    InvalidCompanyCode(String),
}
