use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Row, Sqlite, SqlitePool, Transaction};

use crate::domain::{Account, AccountId, Cents, TransactionCommand, TransactionKind, TransactionRecord};

use super::MIGRATION_001_INITIAL;

/// Repository for persisting accounts and their ledger entries.
///
/// The pool is capped at a single connection. SQLite has one writer at a
/// time anyway; capping the pool makes every unit of work obtained from
/// [`Repository::begin`] hold exclusive access to the account rows for its
/// whole lifetime, so read-decide-write sequences inside one transaction
/// cannot interleave. A backend with real row-level locking could relax
/// this to per-account exclusivity without changing the interface.
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    /// Create a new repository with the given SQLite connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect to a SQLite database at the given URL.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect(database_url)
            .await
            .context("Failed to connect to database")?;
        Ok(Self::new(pool))
    }

    /// Run database migrations.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(MIGRATION_001_INITIAL)
            .execute(&self.pool)
            .await
            .context("Failed to run migration 001")?;
        Ok(())
    }

    /// Initialize a new database (connect + migrate).
    pub async fn init(database_url: &str) -> Result<Self> {
        let repo = Self::connect(database_url).await?;
        repo.migrate().await?;
        Ok(repo)
    }

    // ========================
    // Account operations
    // ========================

    /// Insert a new account with a zero balance and return it with its
    /// store-assigned identifier.
    pub async fn create_account(&self, limit_cents: Cents) -> Result<Account> {
        let created_at = Utc::now();
        let row = sqlx::query(
            r#"
            INSERT INTO accounts (limit_cents, balance_cents, created_at)
            VALUES (?, 0, ?)
            RETURNING id
            "#,
        )
        .bind(limit_cents)
        .bind(created_at.to_rfc3339())
        .fetch_one(&self.pool)
        .await
        .context("Failed to create account")?;

        Ok(Account {
            id: row.get("id"),
            limit_cents,
            balance_cents: 0,
            created_at,
        })
    }

    /// Get an account by id, outside any unit of work.
    pub async fn get_account(&self, id: AccountId) -> Result<Option<Account>> {
        let row = sqlx::query(
            r#"
            SELECT id, limit_cents, balance_cents, created_at
            FROM accounts
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch account")?;

        match row {
            Some(row) => Ok(Some(Self::row_to_account(&row)?)),
            None => Ok(None),
        }
    }

    /// List all accounts, oldest first.
    pub async fn list_accounts(&self) -> Result<Vec<Account>> {
        let rows = sqlx::query(
            r#"
            SELECT id, limit_cents, balance_cents, created_at
            FROM accounts
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to list accounts")?;

        rows.iter().map(Self::row_to_account).collect()
    }

    // ========================
    // Unit of work
    // ========================

    /// Open an atomic unit of work. Dropping the returned transaction
    /// without committing rolls every write back, so an abort anywhere in
    /// the apply path leaves no partial state.
    pub async fn begin(&self) -> Result<Transaction<'static, Sqlite>> {
        self.pool
            .begin()
            .await
            .context("Failed to begin transaction")
    }

    /// Read an account inside the active unit of work, holding it for a
    /// later balance rewrite. A missing row is reported as `None`, never
    /// through error-message text.
    pub async fn account_for_update(
        &self,
        tx: &mut Transaction<'_, Sqlite>,
        id: AccountId,
    ) -> Result<Option<Account>> {
        let row = sqlx::query(
            r#"
            SELECT id, limit_cents, balance_cents, created_at
            FROM accounts
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&mut **tx)
        .await
        .context("Failed to fetch account for update")?;

        match row {
            Some(row) => Ok(Some(Self::row_to_account(&row)?)),
            None => Ok(None),
        }
    }

    /// Append a ledger entry within the active unit of work. The commit
    /// timestamp is assigned here, while the account row is held.
    pub async fn append_entry(
        &self,
        tx: &mut Transaction<'_, Sqlite>,
        account_id: AccountId,
        command: &TransactionCommand,
    ) -> Result<TransactionRecord> {
        let recorded_at = Utc::now();
        sqlx::query(
            r#"
            INSERT INTO entries (account_id, value_cents, kind, description, recorded_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(account_id)
        .bind(command.value_cents)
        .bind(command.kind.as_str())
        .bind(&command.description)
        .bind(recorded_at.to_rfc3339())
        .execute(&mut **tx)
        .await
        .context("Failed to append ledger entry")?;

        Ok(TransactionRecord {
            value_cents: command.value_cents,
            kind: command.kind,
            description: command.description.clone(),
            recorded_at,
        })
    }

    /// Overwrite an account's balance within the active unit of work.
    pub async fn update_balance(
        &self,
        tx: &mut Transaction<'_, Sqlite>,
        id: AccountId,
        balance_cents: Cents,
    ) -> Result<()> {
        sqlx::query("UPDATE accounts SET balance_cents = ? WHERE id = ?")
            .bind(balance_cents)
            .bind(id)
            .execute(&mut **tx)
            .await
            .context("Failed to update balance")?;
        Ok(())
    }

    // ========================
    // Ledger queries
    // ========================

    /// The most recent `k` ledger entries for an account, newest first.
    pub async fn recent_entries(
        &self,
        account_id: AccountId,
        k: usize,
    ) -> Result<Vec<TransactionRecord>> {
        let rows = sqlx::query(
            r#"
            SELECT value_cents, kind, description, recorded_at
            FROM entries
            WHERE account_id = ?
            ORDER BY seq DESC
            LIMIT ?
            "#,
        )
        .bind(account_id)
        .bind(k as i64)
        .fetch_all(&self.pool)
        .await
        .context("Failed to fetch recent entries")?;

        rows.iter().map(Self::row_to_record).collect()
    }

    /// Count all ledger entries for an account.
    pub async fn count_entries(&self, account_id: AccountId) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM entries WHERE account_id = ?")
            .bind(account_id)
            .fetch_one(&self.pool)
            .await
            .context("Failed to count entries")?;
        Ok(row.get("count"))
    }

    fn row_to_account(row: &sqlx::sqlite::SqliteRow) -> Result<Account> {
        let created_at_str: String = row.get("created_at");

        Ok(Account {
            id: row.get("id"),
            limit_cents: row.get("limit_cents"),
            balance_cents: row.get("balance_cents"),
            created_at: DateTime::parse_from_rfc3339(&created_at_str)
                .context("Invalid created_at timestamp")?
                .with_timezone(&Utc),
        })
    }

    fn row_to_record(row: &sqlx::sqlite::SqliteRow) -> Result<TransactionRecord> {
        let kind_str: String = row.get("kind");
        let recorded_at_str: String = row.get("recorded_at");

        Ok(TransactionRecord {
            value_cents: row.get("value_cents"),
            kind: TransactionKind::from_str(&kind_str)
                .ok_or_else(|| anyhow::anyhow!("Invalid transaction kind: {}", kind_str))?,
            description: row.get("description"),
            recorded_at: DateTime::parse_from_rfc3339(&recorded_at_str)
                .context("Invalid recorded_at timestamp")?
                .with_timezone(&Utc),
        })
    }
}
