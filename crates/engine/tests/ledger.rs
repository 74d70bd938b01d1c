use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, Database, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter,
};

use engine::{
    BookingCmd, CustomerCmd, Engine, EngineError, Money, TransactionCmd, TransactionListFilter,
    TransactionStatus, TransactionUpdateCmd, customers, transactions,
};
use migration::MigratorTrait;
use uuid::Uuid;

async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    (engine, db)
}

fn credit(name: &str, date: &str, amount: i64) -> TransactionCmd {
    TransactionCmd::new(name, date, Money::ZERO, Money::from_major(amount))
}

fn debit(name: &str, date: &str, amount: i64) -> TransactionCmd {
    TransactionCmd::new(name, date, Money::from_major(amount), Money::ZERO)
}

#[tokio::test]
async fn running_balances_follow_date_order() {
    let (engine, _db) = engine_with_db().await;

    // Inserted out of date order on purpose.
    let paid = engine
        .create_transaction(debit("Sarah", "2024-01-05", 30))
        .await
        .unwrap();
    let deposit = engine
        .create_transaction(credit("Sarah", "2024-01-01", 100))
        .await
        .unwrap();
    assert_eq!(deposit.balance, Money::from_major(100));

    let paid = engine.transaction(paid.id).await.unwrap();
    assert_eq!(paid.balance, Money::from_major(70));

    let customer = engine.customer(paid.customer_id).await.unwrap();
    assert_eq!(customer.total_credit, Money::from_major(100));
    assert_eq!(customer.total_debit, Money::from_major(30));
    assert_eq!(customer.balance, Money::from_major(70));
}

#[tokio::test]
async fn delete_rederives_and_guard_blocks_customer_delete() {
    let (engine, db) = engine_with_db().await;

    let deposit = engine
        .create_transaction(credit("Sarah", "2024-01-01", 100))
        .await
        .unwrap();
    let paid = engine
        .create_transaction(debit("Sarah", "2024-01-05", 30))
        .await
        .unwrap();
    let customer_id = deposit.customer_id;

    engine.delete_transaction(deposit.id).await.unwrap();

    let paid = engine.transaction(paid.id).await.unwrap();
    assert_eq!(paid.balance, Money::from_major(-30));
    let customer = engine.customer(customer_id).await.unwrap();
    assert_eq!(customer.total_credit, Money::ZERO);
    assert_eq!(customer.total_debit, Money::from_major(30));
    assert_eq!(customer.balance, Money::from_major(-30));

    let err = engine.delete_customer(customer_id).await.unwrap_err();
    assert!(matches!(err, EngineError::BusinessRule(_)));
    assert_eq!(customers::Entity::find().count(&db).await.unwrap(), 1);
    assert_eq!(transactions::Entity::find().count(&db).await.unwrap(), 1);
}

#[tokio::test]
async fn idle_customer_delete_cascades() {
    let (engine, db) = engine_with_db().await;

    let zero = engine
        .create_transaction(TransactionCmd::new(
            "Omar",
            "2024-02-01",
            Money::ZERO,
            Money::ZERO,
        ))
        .await
        .unwrap();
    let customer = engine.customer(zero.customer_id).await.unwrap();
    assert!(!customer.has_activity());

    engine.delete_customer(customer.id).await.unwrap();

    assert_eq!(customers::Entity::find().count(&db).await.unwrap(), 0);
    assert_eq!(transactions::Entity::find().count(&db).await.unwrap(), 0);
    let err = engine.customer(customer.id).await.unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
}

#[tokio::test]
async fn customer_resolution_ignores_case() {
    let (engine, db) = engine_with_db().await;

    let first = engine
        .create_transaction(credit("Sarah Khan", "2024-01-01", 10))
        .await
        .unwrap();
    let second = engine
        .create_transaction(debit("  sarah   KHAN ", "2024-01-02", 4))
        .await
        .unwrap();

    assert_eq!(first.customer_id, second.customer_id);
    assert_eq!(second.customer_name, "Sarah Khan");
    assert_eq!(second.balance, Money::from_major(6));
    assert_eq!(customers::Entity::find().count(&db).await.unwrap(), 1);

    let found = engine.find_or_create_customer("SARAH KHAN").await.unwrap();
    assert_eq!(found.id, first.customer_id);

    let created = engine.find_or_create_customer("Bilal").await.unwrap();
    assert_ne!(created.id, first.customer_id);
    assert_eq!(created.balance, Money::ZERO);
    assert_eq!(customers::Entity::find().count(&db).await.unwrap(), 2);
}

#[tokio::test]
async fn recompute_is_idempotent_and_repairs_drift() {
    let (engine, db) = engine_with_db().await;

    let deposit = engine
        .create_transaction(credit("Sarah", "2024-01-01", 100))
        .await
        .unwrap();
    let paid = engine
        .create_transaction(debit("Sarah", "2024-01-05", 30))
        .await
        .unwrap();
    let customer_id = deposit.customer_id;

    // Corrupt the cached values behind the engine's back.
    transactions::ActiveModel {
        id: ActiveValue::Set(paid.id),
        balance: ActiveValue::Set(12345),
        ..Default::default()
    }
    .update(&db)
    .await
    .unwrap();
    customers::ActiveModel {
        id: ActiveValue::Set(customer_id),
        balance: ActiveValue::Set(-1),
        ..Default::default()
    }
    .update(&db)
    .await
    .unwrap();

    let first = engine.recompute_customer_ledger(customer_id).await.unwrap();
    let second = engine.recompute_customer_ledger(customer_id).await.unwrap();

    assert_eq!(first.balance, Money::from_major(70));
    assert_eq!(first.total_credit, second.total_credit);
    assert_eq!(first.total_debit, second.total_debit);
    assert_eq!(first.balance, second.balance);

    let stored: Vec<i64> = transactions::Entity::find()
        .filter(transactions::Column::CustomerId.eq(customer_id))
        .all(&db)
        .await
        .unwrap()
        .into_iter()
        .map(|model| model.balance)
        .collect();
    assert!(stored.contains(&10_000));
    assert!(stored.contains(&7_000));

    let err = engine
        .recompute_customer_ledger(Uuid::new_v4())
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
}

#[tokio::test]
async fn update_moves_entry_and_rederives() {
    let (engine, _db) = engine_with_db().await;

    let early = engine
        .create_transaction(credit("Sarah", "2024-01-01", 100))
        .await
        .unwrap();
    let late = engine
        .create_transaction(debit("Sarah", "2024-01-05", 30))
        .await
        .unwrap();

    // Move the debit before the credit.
    let moved = engine
        .update_transaction(
            late.id,
            TransactionUpdateCmd::new("2023-12-31", "Ticket", Money::from_major(30), Money::ZERO)
                .status(TransactionStatus::Pending),
        )
        .await
        .unwrap();
    assert_eq!(moved.balance, Money::from_major(-30));
    assert_eq!(moved.description, "Ticket");
    assert_eq!(moved.status, TransactionStatus::Pending);

    let blank = engine
        .update_transaction(
            late.id,
            TransactionUpdateCmd::new("2023-12-31", "  ", Money::from_major(30), Money::ZERO),
        )
        .await
        .unwrap();
    assert_eq!(blank.description, "Debit transaction");

    let early = engine.transaction(early.id).await.unwrap();
    assert_eq!(early.balance, Money::from_major(70));

    let err = engine
        .update_transaction(
            Uuid::new_v4(),
            TransactionUpdateCmd::new("2024-01-01", "x", Money::ZERO, Money::ZERO),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
}

#[tokio::test]
async fn overflowing_balance_is_rejected_and_rolled_back() {
    let (engine, db) = engine_with_db().await;
    let big = Money::parse_or_zero("90000000000000000");

    let first = engine
        .create_transaction(TransactionCmd::new("Sarah", "2024-01-01", Money::ZERO, big))
        .await
        .unwrap();
    assert_eq!(first.balance, big);

    let err = engine
        .create_transaction(TransactionCmd::new("Sarah", "2024-01-02", Money::ZERO, big))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::InvalidAmount("amount too large".to_string())
    );

    assert_eq!(transactions::Entity::find().count(&db).await.unwrap(), 1);
    let sarah = engine.customer(first.customer_id).await.unwrap();
    assert_eq!(sarah.total_credit, big);
    assert_eq!(sarah.balance, big);
}

#[tokio::test]
async fn descriptions_default_from_notes_or_side() {
    let (engine, _db) = engine_with_db().await;

    let noted = engine
        .create_transaction(credit("Sarah", "2024-01-01", 5).notes("cash deposit"))
        .await
        .unwrap();
    let bare_debit = engine
        .create_transaction(debit("Sarah", "2024-01-02", 5))
        .await
        .unwrap();
    let bare_credit = engine
        .create_transaction(credit("Sarah", "2024-01-03", 5))
        .await
        .unwrap();
    let explicit = engine
        .create_transaction(credit("Sarah", "2024-01-04", 5).description("Refund"))
        .await
        .unwrap();

    assert_eq!(noted.description, "cash deposit");
    assert_eq!(bare_debit.description, "Debit transaction");
    assert_eq!(bare_credit.description, "Credit transaction");
    assert_eq!(explicit.description, "Refund");
}

#[tokio::test]
async fn list_transactions_by_customer_newest_first() {
    let (engine, _db) = engine_with_db().await;

    let sarah = engine
        .create_transaction(credit("Sarah", "2024-01-01", 100))
        .await
        .unwrap();
    engine
        .create_transaction(debit("Sarah", "2024-01-05", 30))
        .await
        .unwrap();
    engine
        .create_transaction(credit("Bilal", "2024-01-03", 50))
        .await
        .unwrap();

    let all = engine
        .list_transactions(&TransactionListFilter::default())
        .await
        .unwrap();
    let dates: Vec<&str> = all.iter().map(|tx| tx.date.as_str()).collect();
    assert_eq!(dates, vec!["2024-01-05", "2024-01-03", "2024-01-01"]);

    let by_id = engine
        .list_transactions(&TransactionListFilter {
            customer_id: Some(sarah.customer_id),
            customer_name: Some("bilal".to_string()),
        })
        .await
        .unwrap();
    assert_eq!(by_id.len(), 2);
    assert!(by_id.iter().all(|tx| tx.customer_id == sarah.customer_id));

    let by_name = engine
        .list_transactions(&TransactionListFilter {
            customer_name: Some("BIL".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(by_name.len(), 1);
    assert_eq!(by_name[0].customer_name, "Bilal");
}

#[tokio::test]
async fn customer_crud_and_rename_refreshes_display_name() {
    let (engine, _db) = engine_with_db().await;

    let customer = engine
        .create_customer(CustomerCmd::new(" Sarah ").email("sarah@example.com"))
        .await
        .unwrap();
    assert_eq!(customer.name, "Sarah");
    assert_eq!(customer.balance, Money::ZERO);

    let tx = engine
        .create_transaction(credit("sarah", "2024-01-01", 10))
        .await
        .unwrap();
    assert_eq!(tx.customer_id, customer.id);

    let renamed = engine
        .update_customer(customer.id, CustomerCmd::new("Sarah Khan").phone("555"))
        .await
        .unwrap();
    assert_eq!(renamed.name, "Sarah Khan");
    assert_eq!(renamed.email, None);
    assert_eq!(renamed.phone.as_deref(), Some("555"));
    assert_eq!(renamed.total_credit, Money::from_major(10));

    let tx = engine.transaction(tx.id).await.unwrap();
    assert_eq!(tx.customer_name, "Sarah Khan");

    // The new name is now the resolution key.
    let again = engine
        .create_transaction(debit("sarah khan", "2024-01-02", 3))
        .await
        .unwrap();
    assert_eq!(again.customer_id, customer.id);

    engine
        .create_customer(CustomerCmd::new("Bilal"))
        .await
        .unwrap();
    let names: Vec<String> = engine
        .list_customers(None)
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.name)
        .collect();
    assert_eq!(names, vec!["Bilal", "Sarah Khan"]);

    let filtered = engine.list_customers(Some("KHAN")).await.unwrap();
    assert_eq!(filtered.len(), 1);

    let err = engine
        .create_customer(CustomerCmd::new("   "))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidName(_)));
}

#[tokio::test]
async fn overview_combines_both_ledgers() {
    let (engine, _db) = engine_with_db().await;

    engine
        .create_booking(
            BookingCmd::new("PNR-001", "Ayesha", "Dubai", "Karachi", Money::from_major(3650))
                .amount_received(Money::from_major(4000)),
        )
        .await
        .unwrap();
    engine
        .create_transaction(credit("Sarah", "2024-01-01", 100))
        .await
        .unwrap();
    engine
        .create_transaction(debit("Bilal", "2024-01-02", 40))
        .await
        .unwrap();

    let overview = engine.ledger_overview().await.unwrap();

    assert_eq!(overview.bookings.count, 1);
    assert_eq!(overview.bookings.total_profit, Money::from_major(350));
    assert_eq!(overview.customers.count, 2);
    assert_eq!(overview.customers.total_credit, Money::from_major(100));
    assert_eq!(overview.customers.total_debit, Money::from_major(40));
    assert_eq!(overview.customers.balance, Money::from_major(60));
    assert_eq!(overview.envelope.available_credit, Money::from_major(3360));
}
