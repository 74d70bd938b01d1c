use sea_orm::{Database, DatabaseConnection, EntityTrait, PaginatorTrait};

use engine::{
    BookingCmd, BookingListFilter, CreditTotalCmd, Engine, EngineError, Money, PaymentStatus,
    bookings, credit_envelope,
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

fn booking_cmd(reference: &str, cost: i64) -> BookingCmd {
    BookingCmd::new(reference, "Ayesha", "Dubai", "Karachi", Money::from_major(cost))
        .departure_date("2024-03-01")
}

#[tokio::test]
async fn envelope_is_created_lazily_with_default_total() {
    let (engine, db) = engine_with_db().await;
    assert_eq!(
        credit_envelope::Entity::find().count(&db).await.unwrap(),
        0
    );

    let envelope = engine.credit_envelope().await.unwrap();

    assert_eq!(envelope.total_credit, Money::from_major(7010));
    assert_eq!(envelope.used_credit, Money::ZERO);
    assert_eq!(envelope.available_credit, Money::from_major(7010));
    assert_eq!(
        credit_envelope::Entity::find().count(&db).await.unwrap(),
        1
    );
}

#[tokio::test]
async fn builder_overrides_default_total() {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db)
        .default_total_credit(Money::from_major(500))
        .build()
        .await
        .unwrap();

    let envelope = engine.credit_envelope().await.unwrap();
    assert_eq!(envelope.total_credit, Money::from_major(500));
}

#[tokio::test]
async fn booking_consumes_credit_and_over_limit_is_rejected() {
    let (engine, db) = engine_with_db().await;

    let booking = engine
        .create_booking(booking_cmd("PNR-001", 3650))
        .await
        .unwrap();
    assert_eq!(booking.due_balance, Money::from_major(3650));
    assert_eq!(booking.profit, Money::from_major(-3650));
    assert_eq!(booking.short_description, "Ayesha - Dubai → Karachi");

    let envelope = engine.credit_envelope().await.unwrap();
    assert_eq!(envelope.used_credit, Money::from_major(3650));
    assert_eq!(envelope.available_credit, Money::from_major(3360));

    let err = engine
        .create_booking(booking_cmd("PNR-002", 4000))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::InsufficientCredit {
            available: Money::from_major(3360),
            requested: Money::from_major(4000),
            shortfall: Money::from_major(640),
        }
    );

    // Nothing was written by the rejected create.
    assert_eq!(bookings::Entity::find().count(&db).await.unwrap(), 1);
    let envelope = engine.credit_envelope().await.unwrap();
    assert_eq!(envelope.used_credit, Money::from_major(3650));
    assert_eq!(envelope.available_credit, Money::from_major(3360));
}

#[tokio::test]
async fn exact_available_credit_is_accepted() {
    let (engine, _db) = engine_with_db().await;

    engine
        .create_booking(booking_cmd("PNR-001", 7010))
        .await
        .unwrap();

    let envelope = engine.credit_envelope().await.unwrap();
    assert_eq!(envelope.available_credit, Money::ZERO);

    let err = engine
        .create_booking(booking_cmd("PNR-002", 0).ticket_cost(Money::new(1)))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InsufficientCredit { .. }));
}

#[tokio::test]
async fn update_checks_only_the_cost_increase() {
    let (engine, _db) = engine_with_db().await;

    let first = engine
        .create_booking(booking_cmd("PNR-001", 3000))
        .await
        .unwrap();
    engine
        .create_booking(booking_cmd("PNR-002", 3000))
        .await
        .unwrap();
    // available: 1010

    let updated = engine
        .update_booking(
            first.id,
            booking_cmd("PNR-001", 4000).amount_received(Money::from_major(4500)),
        )
        .await
        .unwrap();
    assert_eq!(updated.id, first.id);
    assert_eq!(updated.due_balance, Money::from_major(-500));
    assert_eq!(updated.profit, Money::from_major(500));

    let envelope = engine.credit_envelope().await.unwrap();
    assert_eq!(envelope.used_credit, Money::from_major(7000));
    assert_eq!(envelope.available_credit, Money::from_major(10));

    let err = engine
        .update_booking(first.id, booking_cmd("PNR-001", 4011))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::InsufficientCredit {
            available: Money::from_major(10),
            requested: Money::from_major(11),
            shortfall: Money::from_major(1),
        }
    );

    // A decrease always passes.
    engine
        .update_booking(first.id, booking_cmd("PNR-001", 1000))
        .await
        .unwrap();
    let envelope = engine.credit_envelope().await.unwrap();
    assert_eq!(envelope.available_credit, Money::from_major(3010));
}

#[tokio::test]
async fn delete_releases_credit() {
    let (engine, db) = engine_with_db().await;

    let booking = engine
        .create_booking(booking_cmd("PNR-001", 3650))
        .await
        .unwrap();
    engine.delete_booking(booking.id).await.unwrap();

    assert_eq!(bookings::Entity::find().count(&db).await.unwrap(), 0);
    let envelope = engine.credit_envelope().await.unwrap();
    assert_eq!(envelope.used_credit, Money::ZERO);
    assert_eq!(envelope.available_credit, Money::from_major(7010));

    let err = engine.delete_booking(booking.id).await.unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
}

#[tokio::test]
async fn envelope_refresh_is_idempotent() {
    let (engine, _db) = engine_with_db().await;
    engine
        .create_booking(booking_cmd("PNR-001", 1200))
        .await
        .unwrap();
    engine
        .create_booking(booking_cmd("PNR-002", 800))
        .await
        .unwrap();

    let first = engine.credit_envelope().await.unwrap();
    let second = engine.credit_envelope().await.unwrap();

    assert_eq!(first.total_credit, second.total_credit);
    assert_eq!(first.used_credit, second.used_credit);
    assert_eq!(first.available_credit, second.available_credit);
    assert_eq!(second.used_credit, Money::from_major(2000));
    assert_eq!(
        second.available_credit,
        second.total_credit - second.used_credit
    );
}

#[tokio::test]
async fn lowering_total_may_leave_negative_available() {
    let (engine, _db) = engine_with_db().await;
    engine
        .create_booking(booking_cmd("PNR-001", 3650))
        .await
        .unwrap();

    let envelope = engine
        .set_credit_total(CreditTotalCmd::new(Money::from_major(3000)).notes("  cut  "))
        .await
        .unwrap();
    assert_eq!(envelope.total_credit, Money::from_major(3000));
    assert_eq!(envelope.used_credit, Money::from_major(3650));
    assert_eq!(envelope.available_credit, Money::from_major(-650));
    assert_eq!(envelope.notes.as_deref(), Some("cut"));

    // Creates stay blocked while over-extended.
    let err = engine
        .create_booking(booking_cmd("PNR-002", 1))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InsufficientCredit { .. }));

    let stored = engine.credit_envelope().await.unwrap();
    assert_eq!(stored.total_credit, Money::from_major(3000));
    assert_eq!(stored.notes.as_deref(), Some("cut"));
}

#[tokio::test]
async fn set_total_creates_missing_envelope() {
    let (engine, db) = engine_with_db().await;

    let envelope = engine
        .set_credit_total(CreditTotalCmd::new(Money::from_major(10000)))
        .await
        .unwrap();

    assert_eq!(envelope.available_credit, Money::from_major(10000));
    assert_eq!(
        credit_envelope::Entity::find().count(&db).await.unwrap(),
        1
    );
}

#[tokio::test]
async fn list_filters_and_summary() {
    let (engine, _db) = engine_with_db().await;
    engine
        .create_booking(
            booking_cmd("PNR-001", 1000)
                .agent("Imran")
                .amount_received(Money::from_major(1000))
                .payment_status(PaymentStatus::Paid),
        )
        .await
        .unwrap();
    engine
        .create_booking(
            BookingCmd::new("PNR-002", "Bilal", "Lahore", "Jeddah", Money::from_major(2000))
                .agent("Sana")
                .amount_received(Money::from_major(500)),
        )
        .await
        .unwrap();

    let all = engine
        .list_bookings(&BookingListFilter::default())
        .await
        .unwrap();
    assert_eq!(all.len(), 2);

    let jeddah = engine
        .list_bookings(&BookingListFilter {
            search: Some("JEDDAH".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(jeddah.len(), 1);
    assert_eq!(jeddah[0].reference_number, "PNR-002");

    let paid = engine
        .list_bookings(&BookingListFilter {
            payment_status: Some(PaymentStatus::Paid),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(paid.len(), 1);
    assert_eq!(paid[0].agent, "Imran");

    let summary = engine
        .booking_summary(&BookingListFilter::default())
        .await
        .unwrap();
    assert_eq!(summary.count, 2);
    assert_eq!(summary.total_ticket_cost, Money::from_major(3000));
    assert_eq!(summary.total_amount_received, Money::from_major(1500));
    assert_eq!(summary.total_due, Money::from_major(1500));
    assert_eq!(summary.total_profit, Money::from_major(-1500));
}

#[tokio::test]
async fn blank_fields_are_stored_and_missing_ids_are_rejected() {
    let (engine, _db) = engine_with_db().await;

    let created = engine
        .create_booking(BookingCmd::new(
            "  ",
            "Ayesha",
            "",
            " Karachi ",
            Money::from_major(10),
        ))
        .await
        .unwrap();
    assert_eq!(created.reference_number, "");
    assert_eq!(created.departure_place, "");
    assert_eq!(created.destination, "Karachi");
    assert_eq!(created.short_description, "Ayesha -  → Karachi");
    let stored = engine.booking(created.id).await.unwrap();
    assert_eq!(stored.reference_number, "");

    let err = engine.booking(Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));

    let err = engine
        .update_booking(Uuid::new_v4(), booking_cmd("PNR-001", 10))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
}

#[tokio::test]
async fn out_of_range_envelope_is_rejected_and_rolled_back() {
    let (engine, db) = engine_with_db().await;
    engine
        .set_credit_total(CreditTotalCmd::new(Money::new(i64::MAX)))
        .await
        .unwrap();

    // A negative cost passes the credit check but would push available past i64::MAX.
    let err = engine
        .create_booking(booking_cmd("PNR-NEG", 0).ticket_cost(Money::new(-1)))
        .await
        .unwrap_err();

    assert_eq!(
        err,
        EngineError::InvalidAmount("amount too large".to_string())
    );
    assert_eq!(bookings::Entity::find().count(&db).await.unwrap(), 0);
    let envelope = engine.credit_envelope().await.unwrap();
    assert_eq!(envelope.available_credit, Money::new(i64::MAX));
    assert_eq!(envelope.used_credit, Money::ZERO);
}

#[tokio::test]
async fn round_trip_description_is_stored() {
    let (engine, _db) = engine_with_db().await;
    let created = engine
        .create_booking(booking_cmd("PNR-001", 100).return_date("2024-03-10"))
        .await
        .unwrap();

    let stored = engine.booking(created.id).await.unwrap();
    assert_eq!(stored.id, created.id);
    assert_eq!(stored.full_description, created.full_description);
    assert!(
        stored
            .full_description
            .starts_with("Ayesha - Round Trip Flight\nDubai → Karachi\n")
    );
}
