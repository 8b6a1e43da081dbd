use thiserror::Error;
use types::errors::DomainError;

/// The form cannot be turned into a request
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OrderError {
    #[error("Invalid order: {0}")]
    Invalid(#[from] DomainError),
}

/// Central error type for order submission
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error(transparent)]
    Order(#[from] OrderError),

    #[error("Order service unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Order rejected with status {status}: {body}")]
    Rejected { status: u16, body: String },
}

impl SubmitError {
    /// Whether retrying the same request could succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            SubmitError::Order(_) => false,
            SubmitError::Transport(_) => true,
            SubmitError::Rejected { status, .. } => *status >= 500 || *status == 429,
        }
    }
}
