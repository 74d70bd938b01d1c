//! Initial schema.
//!
//! - `air_bookings`: booking ledger leaves
//! - `credit_settings`: the singleton credit envelope (row id 1)
//! - `customers`: customer ledger owners with cached totals
//! - `money_transactions`: customer ledger leaves with running balances
//!
//! Amounts are stored as `BIGINT` minor units.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// ─────────────────────────────────────────────────────────────────────────────
// Table identifiers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Iden)]
enum AirBookings {
    Table,
    Id,
    ReferenceNumber,
    CustomerName,
    Email,
    Phone,
    DeparturePlace,
    Destination,
    DepartureDate,
    ReturnDate,
    ShortDescription,
    FullDescription,
    TicketCost,
    AmountReceived,
    DueBalance,
    Profit,
    Agent,
    PaymentStatus,
    Notes,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum CreditSettings {
    Table,
    Id,
    TotalCredit,
    UsedCredit,
    AvailableCredit,
    Notes,
    LastUpdated,
}

#[derive(Iden)]
enum Customers {
    Table,
    Id,
    Name,
    NameNorm,
    Email,
    Phone,
    TotalCredit,
    TotalDebit,
    Balance,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum MoneyTransactions {
    Table,
    Id,
    CustomerId,
    CustomerName,
    Date,
    Description,
    Debit,
    Credit,
    Balance,
    Status,
    Notes,
    CreatedAt,
    UpdatedAt,
}

// ─────────────────────────────────────────────────────────────────────────────
// Migration implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ───────────────────────────────────────────────────────────────────
        // 1. Air bookings
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(AirBookings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AirBookings::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(AirBookings::ReferenceNumber)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(AirBookings::CustomerName).string().not_null())
                    .col(ColumnDef::new(AirBookings::Email).string())
                    .col(ColumnDef::new(AirBookings::Phone).string())
                    .col(
                        ColumnDef::new(AirBookings::DeparturePlace)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(AirBookings::Destination).string().not_null())
                    .col(ColumnDef::new(AirBookings::DepartureDate).string())
                    .col(ColumnDef::new(AirBookings::ReturnDate).string())
                    .col(
                        ColumnDef::new(AirBookings::ShortDescription)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AirBookings::FullDescription)
                            .text()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AirBookings::TicketCost)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AirBookings::AmountReceived)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(AirBookings::DueBalance)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(AirBookings::Profit).big_integer().not_null())
                    .col(
                        ColumnDef::new(AirBookings::Agent)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(AirBookings::PaymentStatus)
                            .string()
                            .not_null()
                            .default("Unpaid"),
                    )
                    .col(ColumnDef::new(AirBookings::Notes).text())
                    .col(
                        ColumnDef::new(AirBookings::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AirBookings::UpdatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-air_bookings-created_at")
                    .table(AirBookings::Table)
                    .col(AirBookings::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 2. Credit envelope
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(CreditSettings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CreditSettings::Id)
                            .integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(CreditSettings::TotalCredit)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CreditSettings::UsedCredit)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(CreditSettings::AvailableCredit)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(CreditSettings::Notes).text())
                    .col(
                        ColumnDef::new(CreditSettings::LastUpdated)
                            .timestamp()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 3. Customers
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Customers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Customers::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Customers::Name).string().not_null())
                    .col(ColumnDef::new(Customers::NameNorm).string().not_null())
                    .col(ColumnDef::new(Customers::Email).string())
                    .col(ColumnDef::new(Customers::Phone).string())
                    .col(
                        ColumnDef::new(Customers::TotalCredit)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Customers::TotalDebit)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Customers::Balance)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Customers::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Customers::UpdatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        // Lookup key for case-insensitive resolution; names are not unique.
        manager
            .create_index(
                Index::create()
                    .name("idx-customers-name_norm")
                    .table(Customers::Table)
                    .col(Customers::NameNorm)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 4. Money transactions
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(MoneyTransactions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MoneyTransactions::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(MoneyTransactions::CustomerId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MoneyTransactions::CustomerName)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(MoneyTransactions::Date).string().not_null())
                    .col(
                        ColumnDef::new(MoneyTransactions::Description)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MoneyTransactions::Debit)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(MoneyTransactions::Credit)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(MoneyTransactions::Balance)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(MoneyTransactions::Status)
                            .string()
                            .not_null()
                            .default("completed"),
                    )
                    .col(ColumnDef::new(MoneyTransactions::Notes).text())
                    .col(
                        ColumnDef::new(MoneyTransactions::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MoneyTransactions::UpdatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-money_transactions-customer_id")
                            .from(MoneyTransactions::Table, MoneyTransactions::CustomerId)
                            .to(Customers::Table, Customers::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-money_transactions-customer_id-date")
                    .table(MoneyTransactions::Table)
                    .col(MoneyTransactions::CustomerId)
                    .col(MoneyTransactions::Date)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop in reverse order of creation (respecting FK dependencies)
        manager
            .drop_table(Table::drop().table(MoneyTransactions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Customers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CreditSettings::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(AirBookings::Table).to_owned())
            .await?;
        Ok(())
    }
}
