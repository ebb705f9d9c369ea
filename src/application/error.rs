use thiserror::Error;

use crate::domain::{AccountId, Cents, CommandError};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("invalid transaction: {0}")]
    InvalidCommand(#[from] CommandError),

    #[error("account not found: {0}")]
    AccountNotFound(AccountId),

    #[error(
        "debit of {requested} cents would breach the overdraft limit \
         (balance {balance}, limit {limit})"
    )]
    InsufficientLimit {
        limit: Cents,
        balance: Cents,
        requested: Cents,
    },

    #[error("account limit must be non-negative, got {0}")]
    InvalidLimit(Cents),

    #[error("storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

impl AppError {
    /// Whether the caller may safely retry the same request. Storage
    /// failures abort the whole unit of work without partial writes, so
    /// they are the only retryable kind; the rest are caused by the
    /// request itself and will fail again.
    pub fn is_retryable(&self) -> bool {
        matches!(self, AppError::Storage(_))
    }
}
