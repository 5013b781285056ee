//! Net worth and budget aggregates.
//!
//! Every mutation is a single atomic statement (`x = x + delta`) executed on
//! the caller's connection, so expense writes can apply them inside their own
//! DB transaction.

use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveValue, ConnectionTrait, QueryOrder, TransactionTrait,
    prelude::*,
    sea_query::{Expr, IntoColumnRef, OnConflict, SimpleExpr},
};
use uuid::Uuid;

use crate::{
    BudgetPeriod, BudgetSpent, EngineError, MoneyCents, NetWorth, NetWorthEntry, ResultEngine,
    budgets::{by_category, monthly},
    expenses::format_date,
    net_worth::{self, entries},
};

use super::{Engine, with_tx};

pub(crate) fn net_worth_not_found() -> EngineError {
    EngineError::NotFound("Net worth not found".to_string())
}

fn max_balance_reached(what: String) -> EngineError {
    EngineError::MaxBalanceReached(format!("{what} cannot absorb the change"))
}

/// Holds while `column + delta` still fits in an `i64`.
///
/// SQLite widens an overflowing integer sum to REAL, so the bound is checked
/// before the addition.
fn stays_in_range<T: IntoColumnRef>(column: T, delta: MoneyCents) -> SimpleExpr {
    let delta = delta.cents();
    if delta > 0 {
        Expr::col(column).lte(i64::MAX - delta)
    } else {
        Expr::col(column).gte(i64::MIN - delta)
    }
}

/// Loads the net worth singleton.
pub(crate) async fn require_net_worth<C: ConnectionTrait>(db: &C) -> ResultEngine<NetWorth> {
    net_worth::Entity::find()
        .one(db)
        .await?
        .ok_or_else(net_worth_not_found)
        .and_then(NetWorth::try_from)
}

/// Adds `delta` to the net worth total and records the adjustment.
pub(crate) async fn update_net_worth<C: ConnectionTrait>(
    db: &C,
    net_worth_id: Uuid,
    delta: MoneyCents,
    date: NaiveDate,
    is_expense: bool,
) -> ResultEngine<()> {
    if delta.is_zero() {
        return Ok(());
    }
    let now = Utc::now();

    let result = net_worth::Entity::update_many()
        .col_expr(
            net_worth::Column::TotalMinor,
            Expr::col(net_worth::Column::TotalMinor).add(delta.cents()),
        )
        .col_expr(net_worth::Column::UpdatedAt, Expr::value(now))
        .filter(net_worth::Column::Id.eq(net_worth_id.to_string()))
        .filter(stays_in_range(net_worth::Column::TotalMinor, delta))
        .exec(db)
        .await?;
    if result.rows_affected == 0 {
        let exists = net_worth::Entity::find_by_id(net_worth_id.to_string())
            .one(db)
            .await?
            .is_some();
        return Err(if exists {
            max_balance_reached("net worth total".to_string())
        } else {
            net_worth_not_found()
        });
    }

    entries::ActiveModel {
        id: ActiveValue::Set(Uuid::new_v4().to_string()),
        net_worth_id: ActiveValue::Set(net_worth_id.to_string()),
        delta_minor: ActiveValue::Set(delta.cents()),
        occurred_on: ActiveValue::Set(format_date(date)),
        is_expense: ActiveValue::Set(is_expense),
        created_at: ActiveValue::Set(now),
    }
    .insert(db)
    .await?;

    tracing::debug!("net worth adjusted by {delta} on {date}");
    Ok(())
}

/// Adds `delta` to the month's spent total, creating the row if needed.
pub(crate) async fn update_budget_spent<C: ConnectionTrait>(
    db: &C,
    period: BudgetPeriod,
    delta: MoneyCents,
) -> ResultEngine<()> {
    if delta.is_zero() {
        return Ok(());
    }

    let row = monthly::ActiveModel {
        year: ActiveValue::Set(period.year()),
        month: ActiveValue::Set(period.month() as i32),
        spent_minor: ActiveValue::Set(delta.cents()),
    };
    let spent = (monthly::Entity, monthly::Column::SpentMinor);
    let rows = monthly::Entity::insert(row)
        .on_conflict(
            OnConflict::columns([monthly::Column::Year, monthly::Column::Month])
                .value(
                    monthly::Column::SpentMinor,
                    Expr::col(spent).add(delta.cents()),
                )
                .action_and_where(stays_in_range(spent, delta))
                .to_owned(),
        )
        .exec_without_returning(db)
        .await?;
    if rows == 0 {
        return Err(max_balance_reached(format!(
            "budget {}-{:02}",
            period.year(),
            period.month()
        )));
    }

    tracing::debug!(
        "budget {}-{:02} spent adjusted by {delta}",
        period.year(),
        period.month()
    );
    Ok(())
}

/// Adds `delta` to the month's spent total for `category`, creating the row if needed.
pub(crate) async fn update_category_budget_spent<C: ConnectionTrait>(
    db: &C,
    period: BudgetPeriod,
    category: &str,
    delta: MoneyCents,
) -> ResultEngine<()> {
    if delta.is_zero() {
        return Ok(());
    }

    let row = by_category::ActiveModel {
        year: ActiveValue::Set(period.year()),
        month: ActiveValue::Set(period.month() as i32),
        category: ActiveValue::Set(category.to_string()),
        spent_minor: ActiveValue::Set(delta.cents()),
    };
    let spent = (by_category::Entity, by_category::Column::SpentMinor);
    let rows = by_category::Entity::insert(row)
        .on_conflict(
            OnConflict::columns([
                by_category::Column::Year,
                by_category::Column::Month,
                by_category::Column::Category,
            ])
            .value(by_category::Column::SpentMinor, Expr::col(spent).add(delta.cents()))
            .action_and_where(stays_in_range(spent, delta))
            .to_owned(),
        )
        .exec_without_returning(db)
        .await?;
    if rows == 0 {
        return Err(max_balance_reached(format!(
            "budget {}-{:02}/{category}",
            period.year(),
            period.month()
        )));
    }

    tracing::debug!(
        "category budget {}-{:02}/{category} spent adjusted by {delta}",
        period.year(),
        period.month()
    );
    Ok(())
}

impl Engine {
    /// Creates the net worth singleton with an opening total.
    pub async fn create_net_worth(&self, total: MoneyCents) -> ResultEngine<NetWorth> {
        with_tx!(self, |db_tx| {
            if net_worth::Entity::find().one(&db_tx).await?.is_some() {
                return Err(EngineError::ExistingKey("net worth".to_string()));
            }

            let model = net_worth::ActiveModel {
                id: ActiveValue::Set(Uuid::new_v4().to_string()),
                total_minor: ActiveValue::Set(total.cents()),
                updated_at: ActiveValue::Set(Utc::now()),
            }
            .insert(&db_tx)
            .await?;
            NetWorth::try_from(model)
        })
    }

    /// Returns the net worth singleton.
    pub async fn net_worth(&self) -> ResultEngine<NetWorth> {
        require_net_worth(&self.database).await
    }

    /// Returns every net worth adjustment, newest first.
    pub async fn net_worth_history(&self) -> ResultEngine<Vec<NetWorthEntry>> {
        let net_worth = require_net_worth(&self.database).await?;
        entries::Entity::find()
            .filter(entries::Column::NetWorthId.eq(net_worth.id.to_string()))
            .order_by_desc(entries::Column::CreatedAt)
            .all(&self.database)
            .await?
            .into_iter()
            .map(NetWorthEntry::try_from)
            .collect()
    }

    /// Spent total of a month. Months nothing was spent in report zero.
    pub async fn budget_spent(&self, period: BudgetPeriod) -> ResultEngine<BudgetSpent> {
        let spent = monthly::Entity::find_by_id((period.year(), period.month() as i32))
            .one(&self.database)
            .await?
            .map_or(MoneyCents::ZERO, |row| MoneyCents::new(row.spent_minor));
        Ok(BudgetSpent {
            period,
            category: None,
            spent,
        })
    }

    /// Spent total of a month for one category.
    pub async fn category_budget_spent(
        &self,
        period: BudgetPeriod,
        category: &str,
    ) -> ResultEngine<BudgetSpent> {
        let category = category.trim();
        let spent = by_category::Entity::find_by_id((
            period.year(),
            period.month() as i32,
            category.to_string(),
        ))
        .one(&self.database)
        .await?
        .map_or(MoneyCents::ZERO, |row| MoneyCents::new(row.spent_minor));
        Ok(BudgetSpent {
            period,
            category: Some(category.to_string()),
            spent,
        })
    }
}
