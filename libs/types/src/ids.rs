//! Identifier types for dashboard entities
//!
//! Listed companies are keyed by their exchange ticker code (e.g. "005930").
//! Users are keyed by the numeric id the trading server assigns.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::DomainError;

/// Exchange ticker code of a listed company.
///
/// The feed carries it verbatim; an empty string is tolerated on decode
/// (see [`CompanyCode::unknown`]) so a malformed frame never aborts an update.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompanyCode(String);

impl CompanyCode {
    /// Create a CompanyCode, rejecting blank input.
    pub fn new(code: impl Into<String>) -> Result<Self, DomainError> {
        let code = code.into();
        if code.trim().is_empty() {
            return Err(DomainError::InvalidCompanyCode(code));
        }
        Ok(Self(code))
    }

    /// Placeholder for frames that omitted the code.
    pub fn unknown() -> Self {
        Self(String::new())
    }

    /// Whether this is the placeholder produced by [`CompanyCode::unknown`],
    /// or a blank code that slipped in through `From<&str>`.
    pub fn is_unknown(&self) -> bool {
        self.0.trim().is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CompanyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for CompanyCode {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Identifier of the user placing an order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(u64);

impl UserId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_company_code_creation() {
        let code = CompanyCode::new("005930").unwrap();
        assert_eq!(code.as_str(), "005930");
        assert!(!code.is_unknown());
    }

    #[test]
    fn test_company_code_rejects_blank() {
        assert!(matches!(
            CompanyCode::new("  "),
            Err(DomainError::InvalidCompanyCode(_))
        ));
    }

    #[test]
    fn test_company_code_unknown() {
        assert!(CompanyCode::unknown().is_unknown());
        assert_eq!(CompanyCode::default(), CompanyCode::unknown());
        assert!(CompanyCode::from("   ").is_unknown());
    }

    #[test]
    fn test_company_code_serializes_as_string() {
        let code = CompanyCode::from("005930");
        assert_eq!(serde_json::to_string(&code).unwrap(), "\"005930\"");
    }

    #[test]
    fn test_user_id_serializes_as_number() {
        let id = UserId::new(42);
        assert_eq!(serde_json::to_string(&id).unwrap(), "42");
        assert_eq!(id.to_string(), "42");
    }
}
