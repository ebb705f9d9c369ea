use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Cents, TransactionRecord};

/// How many ledger entries a statement reports.
pub const STATEMENT_ENTRIES: usize = 10;

/// A balance statement: read-only snapshot of an account plus its most
/// recent movements, newest first. Recomputed on every read, never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Statement {
    pub limit_cents: Cents,
    pub balance_cents: Cents,
    /// Assigned when the statement is assembled, independent of any
    /// transaction timestamp.
    pub generated_at: DateTime<Utc>,
    pub transactions: Vec<TransactionRecord>,
}
