use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Cents, TransactionCommand, TransactionKind};

/// Accounts are keyed by a store-assigned integer identifier.
pub type AccountId = i64;

/// One ledger account: a fixed overdraft limit and a signed balance.
///
/// Invariant: `balance_cents >= -limit_cents` at every observable point.
/// The engine only rewrites `balance_cents`, and only under exclusive
/// access; `limit_cents` is fixed at creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub limit_cents: Cents,
    pub balance_cents: Cents,
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// Balance this account would hold after `command`, or `None` when a
    /// debit would push it below `-limit_cents`.
    pub fn balance_after(&self, command: &TransactionCommand) -> Option<Cents> {
        match command.kind {
            TransactionKind::Credit => Some(self.balance_cents + command.value_cents),
            TransactionKind::Debit => {
                let tentative = self.balance_cents - command.value_cents;
                (self.limit_cents + tentative >= 0).then_some(tentative)
            }
        }
    }
}
