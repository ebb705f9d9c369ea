use anyhow::Result;
use chrono::Utc;
use crebito::domain::TransactionKind;

mod common;
use common::test_service;

#[tokio::test]
async fn test_fresh_account_statement_is_empty() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let account = service.create_account(2_500).await?;

    let statement = service.get_statement(account.id).await?;
    assert_eq!(statement.limit_cents, 2_500);
    assert_eq!(statement.balance_cents, 0);
    assert!(statement.transactions.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_statement_caps_at_ten_newest_first() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let account = service.create_account(0).await?;

    for i in 1..=12i64 {
        service
            .apply_transaction(account.id, i, "c", &format!("t{i}"))
            .await?;
    }

    let statement = service.get_statement(account.id).await?;
    assert_eq!(statement.balance_cents, (1..=12).sum::<i64>());
    assert_eq!(statement.transactions.len(), 10);

    // the two oldest entries (t1, t2) have aged out; newest comes first
    for (pos, record) in statement.transactions.iter().enumerate() {
        let i = 12 - pos as i64;
        assert_eq!(record.value_cents, i);
        assert_eq!(record.description, format!("t{i}"));
        assert_eq!(record.kind, TransactionKind::Credit);
    }

    Ok(())
}

#[tokio::test]
async fn test_statement_reflects_committed_state() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let account = service.create_account(1_000).await?;

    service
        .apply_transaction(account.id, 700, "c", "pay")
        .await?;
    service
        .apply_transaction(account.id, 200, "d", "rent")
        .await?;

    let statement = service.get_statement(account.id).await?;
    assert_eq!(statement.balance_cents, 500);
    assert_eq!(statement.transactions.len(), 2);
    assert_eq!(statement.transactions[0].kind, TransactionKind::Debit);
    assert_eq!(statement.transactions[0].description, "rent");
    assert_eq!(statement.transactions[1].kind, TransactionKind::Credit);

    Ok(())
}

#[tokio::test]
async fn test_generated_at_is_assigned_at_read_time() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let account = service.create_account(0).await?;

    let before = Utc::now();
    let statement = service.get_statement(account.id).await?;
    let after = Utc::now();

    assert!(statement.generated_at >= before);
    assert!(statement.generated_at <= after);

    Ok(())
}

#[tokio::test]
async fn test_statement_serializes_with_short_kind_tokens() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let account = service.create_account(0).await?;
    service
        .apply_transaction(account.id, 150, "c", "pix")
        .await?;

    let statement = service.get_statement(account.id).await?;
    let json = serde_json::to_value(&statement)?;

    assert_eq!(json["balance_cents"], 150);
    assert_eq!(json["transactions"][0]["kind"], "c");
    assert_eq!(json["transactions"][0]["description"], "pix");

    Ok(())
}
