//! Initial schema.
//!
//! - `expenses`: expense records, dates stored as `YYYY-MM-DD` text
//! - `net_worth`: the net worth singleton
//! - `net_worth_entries`: every delta applied to the net worth
//! - `budgets`: spent total per month
//! - `category_budgets`: spent total per month and category

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// ─────────────────────────────────────────────────────────────────────────────
// Table identifiers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Iden)]
enum Expenses {
    Table,
    Id,
    Name,
    Description,
    Date,
    PriceMinor,
    Currency,
    ExchangeRate,
    Category,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum NetWorth {
    Table,
    Id,
    TotalMinor,
    UpdatedAt,
}

#[derive(Iden)]
enum NetWorthEntries {
    Table,
    Id,
    NetWorthId,
    DeltaMinor,
    OccurredOn,
    IsExpense,
    CreatedAt,
}

#[derive(Iden)]
enum Budgets {
    Table,
    Year,
    Month,
    SpentMinor,
}

#[derive(Iden)]
enum CategoryBudgets {
    Table,
    Year,
    Month,
    Category,
    SpentMinor,
}

// ─────────────────────────────────────────────────────────────────────────────
// Migration implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Expenses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Expenses::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Expenses::Name).string().not_null())
                    .col(ColumnDef::new(Expenses::Description).string())
                    .col(ColumnDef::new(Expenses::Date).string().not_null())
                    .col(ColumnDef::new(Expenses::PriceMinor).big_integer().not_null())
                    .col(ColumnDef::new(Expenses::Currency).string().not_null())
                    .col(ColumnDef::new(Expenses::ExchangeRate).string().not_null())
                    .col(ColumnDef::new(Expenses::Category).string().not_null())
                    .col(
                        ColumnDef::new(Expenses::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Expenses::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_expenses_date_updated_at")
                    .table(Expenses::Table)
                    .col(Expenses::Date)
                    .col(Expenses::UpdatedAt)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(NetWorth::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(NetWorth::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(NetWorth::TotalMinor)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(NetWorth::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(NetWorthEntries::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(NetWorthEntries::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(NetWorthEntries::NetWorthId).string().not_null())
                    .col(
                        ColumnDef::new(NetWorthEntries::DeltaMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(NetWorthEntries::OccurredOn).string().not_null())
                    .col(
                        ColumnDef::new(NetWorthEntries::IsExpense)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(NetWorthEntries::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_net_worth_entries_net_worth")
                            .from(NetWorthEntries::Table, NetWorthEntries::NetWorthId)
                            .to(NetWorth::Table, NetWorth::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Budgets::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Budgets::Year).integer().not_null())
                    .col(ColumnDef::new(Budgets::Month).integer().not_null())
                    .col(
                        ColumnDef::new(Budgets::SpentMinor)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .primary_key(Index::create().col(Budgets::Year).col(Budgets::Month))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CategoryBudgets::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(CategoryBudgets::Year).integer().not_null())
                    .col(ColumnDef::new(CategoryBudgets::Month).integer().not_null())
                    .col(ColumnDef::new(CategoryBudgets::Category).string().not_null())
                    .col(
                        ColumnDef::new(CategoryBudgets::SpentMinor)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .primary_key(
                        Index::create()
                            .col(CategoryBudgets::Year)
                            .col(CategoryBudgets::Month)
                            .col(CategoryBudgets::Category),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CategoryBudgets::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Budgets::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(NetWorthEntries::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(NetWorth::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Expenses::Table).to_owned())
            .await?;
        Ok(())
    }
}
