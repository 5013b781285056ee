use chrono::NaiveDate;
use sea_orm::{Condition, QueryFilter, QueryOrder, QuerySelect, Select, prelude::*};

use crate::{
    BudgetPeriod, EngineError, Expense, ExpenseFilter, ResultEngine,
    expenses::{self, format_date},
};

use super::Engine;

/// Default page size of [`Engine::list_expenses_page`].
pub const DEFAULT_PAGE_LIMIT: u64 = 10;

/// Newest first: by date, then by last write.
fn newest_first(select: Select<expenses::Entity>) -> Select<expenses::Entity> {
    select
        .order_by_desc(expenses::Column::Date)
        .order_by_desc(expenses::Column::UpdatedAt)
}

fn non_empty(items: Vec<Expense>, message: &str) -> ResultEngine<Vec<Expense>> {
    if items.is_empty() {
        return Err(EngineError::NotFound(message.to_string()));
    }
    Ok(items)
}

impl Engine {
    async fn fetch_expenses(&self, select: Select<expenses::Entity>) -> ResultEngine<Vec<Expense>> {
        newest_first(select)
            .all(&self.database)
            .await?
            .into_iter()
            .map(Expense::try_from)
            .collect()
    }

    /// Every expense, newest first.
    pub async fn list_expenses(&self) -> ResultEngine<Vec<Expense>> {
        let items = self.fetch_expenses(expenses::Entity::find()).await?;
        non_empty(items, "No expenses have been found.")
    }

    /// Expenses dated within `period`.
    pub async fn list_expenses_by_month(&self, period: BudgetPeriod) -> ResultEngine<Vec<Expense>> {
        let select = expenses::Entity::find()
            .filter(expenses::Column::Date.starts_with(period.date_prefix()));
        let items = self.fetch_expenses(select).await?;
        non_empty(
            items,
            "No expenses have been found for the given month and year.",
        )
    }

    /// One page of expenses, newest first.
    pub async fn list_expenses_page(&self, limit: u64, offset: u64) -> ResultEngine<Vec<Expense>> {
        let select = expenses::Entity::find().limit(limit).offset(offset);
        let items = self.fetch_expenses(select).await?;
        non_empty(
            items,
            "No expenses have been found with the given conditions.",
        )
    }

    /// Expenses dated in `[start, end)`.
    pub async fn list_expenses_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> ResultEngine<Vec<Expense>> {
        let select = expenses::Entity::find().filter(
            Condition::all()
                .add(expenses::Column::Date.gte(format_date(start)))
                .add(expenses::Column::Date.lt(format_date(end))),
        );
        let items = self.fetch_expenses(select).await?;
        non_empty(
            items,
            "No expenses have been found between the given dates.",
        )
    }

    /// Expenses matching every field set on `filter`.
    pub async fn find_expenses(&self, filter: &ExpenseFilter) -> ResultEngine<Vec<Expense>> {
        let select = expenses::Entity::find().filter(filter.condition());
        let items = self.fetch_expenses(select).await?;
        non_empty(
            items,
            "No expenses have been found for the given field name and value.",
        )
    }
}
