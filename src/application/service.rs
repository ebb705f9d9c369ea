use anyhow::Context;
use chrono::Utc;
use tracing::{info, warn};

use crate::domain::{
    Account, AccountId, Cents, Statement, TransactionCommand, STATEMENT_ENTRIES,
};
use crate::storage::Repository;

use super::AppError;

/// Application service providing the ledger operations. This is the primary
/// interface for any client (CLI, API, TUI, etc.).
pub struct LedgerService {
    repo: Repository,
}

/// The `(limit, balance)` pair returned by a successful apply, reflecting
/// exactly the state any subsequent read will observe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BalanceSnapshot {
    pub limit_cents: Cents,
    pub balance_cents: Cents,
}

impl LedgerService {
    /// Create a new ledger service with the given repository.
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    /// Initialize a new database at the given path.
    pub async fn init(database_path: &str) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}?mode=rwc", database_path);
        let repo = Repository::init(&db_url).await?;
        Ok(Self::new(repo))
    }

    /// Connect to an existing database.
    pub async fn connect(database_path: &str) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}", database_path);
        let repo = Repository::connect(&db_url).await?;
        Ok(Self::new(repo))
    }

    // ========================
    // Account operations
    // ========================

    /// Create a new account with the given overdraft limit and a zero
    /// balance.
    pub async fn create_account(&self, limit_cents: Cents) -> Result<Account, AppError> {
        if limit_cents < 0 {
            return Err(AppError::InvalidLimit(limit_cents));
        }
        let account = self.repo.create_account(limit_cents).await?;
        info!(account = account.id, limit = limit_cents, "account created");
        Ok(account)
    }

    /// Get an account by id.
    pub async fn get_account(&self, id: AccountId) -> Result<Account, AppError> {
        self.repo
            .get_account(id)
            .await?
            .ok_or(AppError::AccountNotFound(id))
    }

    /// List all accounts.
    pub async fn list_accounts(&self) -> Result<Vec<Account>, AppError> {
        Ok(self.repo.list_accounts().await?)
    }

    // ========================
    // Ledger engine
    // ========================

    /// Atomically apply a credit or debit to one account.
    ///
    /// The account is read, the overdraft decision made, the ledger entry
    /// appended and the balance rewritten all inside one unit of work that
    /// holds exclusive access to the row. Concurrent applies against the
    /// same account serialize on that hold; on any rejection or storage
    /// failure the transaction rolls back and nothing is observable.
    pub async fn apply_transaction(
        &self,
        account_id: AccountId,
        value_cents: Cents,
        kind: &str,
        description: &str,
    ) -> Result<BalanceSnapshot, AppError> {
        // Validation performs no I/O; a malformed request never reaches
        // the store.
        let command = TransactionCommand::new(value_cents, kind, description)?;

        let mut tx = self.repo.begin().await?;

        let account = self
            .repo
            .account_for_update(&mut tx, account_id)
            .await?
            .ok_or(AppError::AccountNotFound(account_id))?;

        let Some(new_balance) = account.balance_after(&command) else {
            warn!(
                account = account_id,
                value = command.value_cents,
                balance = account.balance_cents,
                limit = account.limit_cents,
                "debit rejected: insufficient limit"
            );
            return Err(AppError::InsufficientLimit {
                limit: account.limit_cents,
                balance: account.balance_cents,
                requested: command.value_cents,
            });
        };

        self.repo.append_entry(&mut tx, account_id, &command).await?;
        self.repo
            .update_balance(&mut tx, account_id, new_balance)
            .await?;

        tx.commit().await.context("Failed to commit transaction")?;

        info!(
            account = account_id,
            kind = %command.kind,
            value = command.value_cents,
            balance = new_balance,
            "transaction applied"
        );

        Ok(BalanceSnapshot {
            limit_cents: account.limit_cents,
            balance_cents: new_balance,
        })
    }

    // ========================
    // Statement builder
    // ========================

    /// Assemble a balance statement: current limit and balance plus the
    /// most recent movements, newest first. A best-effort snapshot; it
    /// does not take the writers' exclusive hold.
    pub async fn get_statement(&self, account_id: AccountId) -> Result<Statement, AppError> {
        let account = self.get_account(account_id).await?;
        let transactions = self
            .repo
            .recent_entries(account_id, STATEMENT_ENTRIES)
            .await?;

        Ok(Statement {
            limit_cents: account.limit_cents,
            balance_cents: account.balance_cents,
            generated_at: Utc::now(),
            transactions,
        })
    }
}
