use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::Cents;

/// Maximum description length in bytes.
pub const MAX_DESCRIPTION_LEN: usize = 10;

/// Direction of a ledger movement. Closed set: once a command has been
/// validated, an invalid kind is unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionKind {
    #[serde(rename = "c")]
    Credit,
    #[serde(rename = "d")]
    Debit,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Credit => "c",
            TransactionKind::Debit => "d",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "c" => Some(TransactionKind::Credit),
            "d" => Some(TransactionKind::Debit),
            _ => None,
        }
    }
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Rejection reasons for raw transaction input. Validation is pure: no I/O
/// happens before a command has been accepted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("value must be a positive amount of cents")]
    NonPositiveValue,
    #[error("unknown transaction kind `{0}` (expected `c` or `d`)")]
    UnknownKind(String),
    #[error("description must be 1 to {MAX_DESCRIPTION_LEN} characters")]
    InvalidDescription,
}

/// A transaction request that has passed validation and is safe to hand to
/// the ledger engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionCommand {
    pub value_cents: Cents,
    pub kind: TransactionKind,
    pub description: String,
}

impl TransactionCommand {
    /// Validate untrusted input into a command.
    pub fn new(
        value_cents: Cents,
        kind: &str,
        description: &str,
    ) -> Result<Self, CommandError> {
        if value_cents <= 0 {
            return Err(CommandError::NonPositiveValue);
        }
        let kind =
            TransactionKind::from_str(kind).ok_or_else(|| CommandError::UnknownKind(kind.into()))?;
        if description.is_empty() || description.len() > MAX_DESCRIPTION_LEN {
            return Err(CommandError::InvalidDescription);
        }

        Ok(Self {
            value_cents,
            kind,
            description: description.to_string(),
        })
    }
}

/// A committed ledger entry. Immutable once recorded; corrections are made
/// by recording a compensating transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub value_cents: Cents,
    pub kind: TransactionKind,
    pub description: String,
    /// Commit-time timestamp assigned by the store, monotonic per account
    /// in insertion order.
    pub recorded_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_tokens_roundtrip() {
        for kind in [TransactionKind::Credit, TransactionKind::Debit] {
            assert_eq!(TransactionKind::from_str(kind.as_str()), Some(kind));
        }
        assert_eq!(TransactionKind::from_str("x"), None);
        assert_eq!(TransactionKind::from_str("C"), None);
        assert_eq!(TransactionKind::from_str(""), None);
    }

    #[test]
    fn test_valid_command() {
        let cmd = TransactionCommand::new(500, "c", "salary").unwrap();
        assert_eq!(cmd.value_cents, 500);
        assert_eq!(cmd.kind, TransactionKind::Credit);
        assert_eq!(cmd.description, "salary");
    }

    #[test]
    fn test_rejects_non_positive_value() {
        assert_eq!(
            TransactionCommand::new(0, "c", "x"),
            Err(CommandError::NonPositiveValue)
        );
        assert_eq!(
            TransactionCommand::new(-5, "d", "x"),
            Err(CommandError::NonPositiveValue)
        );
    }

    #[test]
    fn test_rejects_unknown_kind() {
        assert_eq!(
            TransactionCommand::new(5, "x", "ok"),
            Err(CommandError::UnknownKind("x".into()))
        );
    }

    #[test]
    fn test_rejects_bad_descriptions() {
        assert_eq!(
            TransactionCommand::new(5, "d", ""),
            Err(CommandError::InvalidDescription)
        );
        // 11 characters, one over the limit
        assert_eq!(
            TransactionCommand::new(5, "d", "12345678901"),
            Err(CommandError::InvalidDescription)
        );
        // exactly at the limit is fine
        assert!(TransactionCommand::new(5, "d", "1234567890").is_ok());
    }
}
