use chrono::Utc;
use sea_orm::{ActiveValue, ConnectionTrait, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    BudgetPeriod, EngineError, Expense, ExpenseDraft, ExpensePatch, MoneyCents, ResultEngine,
    expenses::{self, format_date, format_rate},
};

use super::{
    Engine,
    aggregates::{
        require_net_worth, update_budget_spent, update_category_budget_spent, update_net_worth,
    },
    with_tx,
};

pub(crate) fn expense_not_found(id: Uuid) -> EngineError {
    EngineError::NotFound(format!("Expense with id {id} not found"))
}

async fn require_expense<C: ConnectionTrait>(db: &C, id: Uuid) -> ResultEngine<Expense> {
    expenses::Entity::find_by_id(id.to_string())
        .one(db)
        .await?
        .ok_or_else(|| expense_not_found(id))
        .and_then(Expense::try_from)
}

/// Budget contribution of an expense: `price` spent in `category` during `period`.
#[derive(Clone, Debug, PartialEq, Eq)]
struct Contribution {
    period: BudgetPeriod,
    category: String,
    price: MoneyCents,
}

impl From<&Expense> for Contribution {
    fn from(expense: &Expense) -> Self {
        Self {
            period: expense.period(),
            category: expense.category.clone(),
            price: expense.price,
        }
    }
}

/// Moves the monthly and per-category budget totals from `old` to `new`.
///
/// When both contributions land in the same bucket only the price difference
/// is applied; otherwise the old bucket loses `old.price` and the new one
/// gains `new.price`.
async fn move_budget_contribution<C: ConnectionTrait>(
    db: &C,
    old: &Contribution,
    new: &Contribution,
) -> ResultEngine<()> {
    if old.period == new.period {
        update_budget_spent(db, new.period, new.price - old.price).await?;
    } else {
        update_budget_spent(db, old.period, -old.price).await?;
        update_budget_spent(db, new.period, new.price).await?;
    }

    if old.period == new.period && old.category == new.category {
        update_category_budget_spent(db, new.period, &new.category, new.price - old.price).await?;
    } else {
        update_category_budget_spent(db, old.period, &old.category, -old.price).await?;
        update_category_budget_spent(db, new.period, &new.category, new.price).await?;
    }
    Ok(())
}

impl Engine {
    /// Returns a single expense.
    pub async fn expense(&self, id: Uuid) -> ResultEngine<Expense> {
        require_expense(&self.database, id).await
    }

    /// Records a new expense.
    ///
    /// The draft is validated first; a rejected draft leaves every aggregate
    /// untouched. Then, in one DB transaction:
    /// - net worth decreases by the price (expense-flagged, dated as the expense)
    /// - the month's budget and the month/category budget increase by the price
    /// - the expense is inserted with its frozen exchange rate
    pub async fn create_expense(&self, draft: ExpenseDraft) -> ResultEngine<Expense> {
        let valid = draft.validate()?;
        let exchange_rate = self.resolve_exchange_rate(&valid.currency).await?;

        let now = Utc::now();
        let expense = Expense {
            id: Uuid::new_v4(),
            name: valid.name,
            description: valid.description,
            date: valid.date,
            price: valid.price,
            currency: valid.currency,
            exchange_rate,
            category: valid.category,
            created_at: now,
            updated_at: now,
        };

        with_tx!(self, |db_tx| {
            let net_worth = require_net_worth(&db_tx).await?;

            update_net_worth(&db_tx, net_worth.id, -expense.price, expense.date, true).await?;
            update_budget_spent(&db_tx, expense.period(), expense.price).await?;
            update_category_budget_spent(&db_tx, expense.period(), &expense.category, expense.price)
                .await?;

            expenses::ActiveModel::from(&expense).insert(&db_tx).await?;
            tracing::info!("expense {} created ({} {})", expense.id, expense.price, expense.currency);
            Ok(expense)
        })
    }

    /// Applies a partial update to an expense.
    ///
    /// Net worth moves by `old_price - new_price`. Budgets follow the
    /// expense: the difference when it stays in the same month and category,
    /// a full move otherwise. A supplied currency re-resolves the exchange
    /// rate. An empty patch returns the stored expense unchanged once both
    /// the expense and the net worth are known to exist.
    pub async fn update_expense(&self, id: Uuid, patch: ExpensePatch) -> ResultEngine<Expense> {
        let patch = patch.validate()?;

        // Fail fast on unknown ids and a missing net worth before asking for a rate.
        let current = require_expense(&self.database, id).await?;
        require_net_worth(&self.database).await?;
        if patch.is_empty() {
            return Ok(current);
        }

        let exchange_rate = match &patch.currency {
            Some(currency) => Some(self.resolve_exchange_rate(currency).await?),
            None => None,
        };

        with_tx!(self, |db_tx| {
            let old = require_expense(&db_tx, id).await?;
            let net_worth = require_net_worth(&db_tx).await?;

            let mut new = old.clone();
            if let Some(name) = patch.name.clone() {
                new.name = name;
            }
            if let Some(description) = patch.description.clone() {
                new.description = description;
            }
            if let Some(date) = patch.date {
                new.date = date;
            }
            if let Some(price) = patch.price {
                new.price = price;
            }
            if let Some(currency) = patch.currency.clone() {
                new.currency = currency;
            }
            if let Some(rate) = exchange_rate {
                new.exchange_rate = rate;
            }
            if let Some(category) = patch.category.clone() {
                new.category = category;
            }
            new.updated_at = Utc::now();

            let price_change = old.price - new.price;
            update_net_worth(&db_tx, net_worth.id, price_change, new.date, true).await?;
            move_budget_contribution(&db_tx, &Contribution::from(&old), &Contribution::from(&new))
                .await?;

            let mut model = expenses::ActiveModel {
                id: ActiveValue::Unchanged(id.to_string()),
                updated_at: ActiveValue::Set(new.updated_at),
                ..Default::default()
            };
            if patch.name.is_some() {
                model.name = ActiveValue::Set(new.name.clone());
            }
            if patch.description.is_some() {
                model.description = ActiveValue::Set(new.description.clone());
            }
            if patch.date.is_some() {
                model.date = ActiveValue::Set(format_date(new.date));
            }
            if patch.price.is_some() {
                model.price_minor = ActiveValue::Set(new.price.cents());
            }
            if patch.currency.is_some() {
                model.currency = ActiveValue::Set(new.currency.code().to_string());
                model.exchange_rate = ActiveValue::Set(format_rate(new.exchange_rate));
            }
            if patch.category.is_some() {
                model.category = ActiveValue::Set(new.category.clone());
            }

            let stored = model.update(&db_tx).await.map_err(|err| match err {
                DbErr::RecordNotUpdated => expense_not_found(id),
                other => EngineError::from(other),
            })?;
            tracing::info!("expense {id} updated (price change {price_change})");
            Expense::try_from(stored)
        })
    }

    /// Deletes an expense and reverses its contribution to every aggregate.
    pub async fn delete_expense(&self, id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let expense = require_expense(&db_tx, id).await?;
            let net_worth = require_net_worth(&db_tx).await?;

            update_net_worth(&db_tx, net_worth.id, expense.price, expense.date, true).await?;
            update_budget_spent(&db_tx, expense.period(), -expense.price).await?;
            update_category_budget_spent(
                &db_tx,
                expense.period(),
                &expense.category,
                -expense.price,
            )
            .await?;

            let result = expenses::Entity::delete_by_id(id.to_string())
                .exec(&db_tx)
                .await?;
            if result.rows_affected == 0 {
                return Err(expense_not_found(id));
            }
            tracing::info!("expense {id} deleted");
            Ok(())
        })
    }
}
