use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::application::LedgerService;
use crate::domain::{format_cents, parse_cents, AccountId};

/// Crebito - per-account credit/debit ledger
#[derive(Parser)]
#[command(name = "crebito")]
#[command(about = "A concurrency-safe per-account credit/debit ledger with an overdraft limit")]
#[command(version)]
pub struct Cli {
    /// Database file path
    #[arg(short, long, default_value = "crebito.db")]
    pub database: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new database
    Init,

    /// Account management commands
    #[command(subcommand)]
    Account(AccountCommands),

    /// Apply a credit or debit to an account
    Transaction {
        /// Account id
        account: AccountId,

        /// Amount to apply (e.g., "50.00" or "50")
        amount: String,

        /// Transaction kind: "c" for credit, "d" for debit
        #[arg(short, long)]
        kind: String,

        /// Short description (1 to 10 characters)
        #[arg(long)]
        description: String,
    },

    /// Show the balance statement for an account
    Statement {
        /// Account id
        account: AccountId,

        /// Print the statement as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
pub enum AccountCommands {
    /// Create a new account with the given overdraft limit
    Create {
        /// Overdraft limit (e.g., "1000.00")
        limit: String,
    },

    /// List all accounts
    List,

    /// Show a single account
    Show {
        /// Account id
        account: AccountId,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Commands::Init => {
                LedgerService::init(&self.database).await?;
                println!("Database initialized: {}", self.database);
            }

            Commands::Account(account_cmd) => {
                let service = LedgerService::connect(&self.database).await?;
                run_account_command(&service, account_cmd).await?;
            }

            Commands::Transaction {
                account,
                amount,
                kind,
                description,
            } => {
                let service = LedgerService::connect(&self.database).await?;
                let value_cents =
                    parse_cents(&amount).context("Invalid amount format. Use '50.00' or '50'")?;

                let snapshot = service
                    .apply_transaction(account, value_cents, &kind, &description)
                    .await?;

                println!(
                    "Applied {} of {} to account {} (balance {}, limit {})",
                    if kind == "c" { "credit" } else { "debit" },
                    format_cents(value_cents),
                    account,
                    format_cents(snapshot.balance_cents),
                    format_cents(snapshot.limit_cents),
                );
            }

            Commands::Statement { account, json } => {
                let service = LedgerService::connect(&self.database).await?;
                let statement = service.get_statement(account).await?;

                if json {
                    println!("{}", serde_json::to_string_pretty(&statement)?);
                } else {
                    println!("Account {}", account);
                    println!("  Balance: {}", format_cents(statement.balance_cents));
                    println!("  Limit:   {}", format_cents(statement.limit_cents));
                    println!("  As of:   {}", statement.generated_at.to_rfc3339());

                    if statement.transactions.is_empty() {
                        println!("  No transactions recorded.");
                    } else {
                        println!("  Recent transactions (newest first):");
                        for record in &statement.transactions {
                            println!(
                                "    {}  {}  {:>12}  {}",
                                record.recorded_at.to_rfc3339(),
                                record.kind,
                                format_cents(record.value_cents),
                                record.description,
                            );
                        }
                    }
                }
            }
        }

        Ok(())
    }
}

async fn run_account_command(service: &LedgerService, command: AccountCommands) -> Result<()> {
    match command {
        AccountCommands::Create { limit } => {
            let limit_cents =
                parse_cents(&limit).context("Invalid limit format. Use '1000.00' or '1000'")?;
            let account = service.create_account(limit_cents).await?;
            println!(
                "Created account {} with limit {}",
                account.id,
                format_cents(account.limit_cents)
            );
        }

        AccountCommands::List => {
            let accounts = service.list_accounts().await?;
            if accounts.is_empty() {
                println!("No accounts yet. Create one with `crebito account create <limit>`.");
            } else {
                println!("{:>6}  {:>12}  {:>12}", "id", "balance", "limit");
                for account in accounts {
                    println!(
                        "{:>6}  {:>12}  {:>12}",
                        account.id,
                        format_cents(account.balance_cents),
                        format_cents(account.limit_cents),
                    );
                }
            }
        }

        AccountCommands::Show { account } => {
            let account = service.get_account(account).await?;
            println!("{:>6}  {:>12}  {:>12}  created", "id", "balance", "limit");
            println!(
                "{:>6}  {:>12}  {:>12}  {}",
                account.id,
                format_cents(account.balance_cents),
                format_cents(account.limit_cents),
                account.created_at.to_rfc3339(),
            );
        }
    }

    Ok(())
}
