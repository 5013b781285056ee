//! Expense records.
//!
//! An [`Expense`] is a single purchase. Its price is always a positive
//! magnitude in the expense currency; the exchange rate to the base currency
//! is frozen on the record at write time.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{ActiveValue, entity::prelude::*};
use uuid::Uuid;

use crate::{BudgetPeriod, Currency, EngineError, MoneyCents, ResultEngine};

/// Storage format of expense dates. Month queries match on its `YYYY-MM-` prefix.
pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Expense {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub date: NaiveDate,
    pub price: MoneyCents,
    pub currency: Currency,
    pub exchange_rate: Decimal,
    pub category: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Expense {
    /// Budget bucket this expense contributes to.
    pub fn period(&self) -> BudgetPeriod {
        BudgetPeriod::from(self.date)
    }
}

pub(crate) fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Canonical text form of an exchange rate, used for storage and equality filters.
pub(crate) fn format_rate(rate: Decimal) -> String {
    rate.normalize().to_string()
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub date: String,
    pub price_minor: i64,
    pub currency: String,
    pub exchange_rate: String,
    pub category: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Expense> for ActiveModel {
    fn from(expense: &Expense) -> Self {
        Self {
            id: ActiveValue::Set(expense.id.to_string()),
            name: ActiveValue::Set(expense.name.clone()),
            description: ActiveValue::Set(expense.description.clone()),
            date: ActiveValue::Set(format_date(expense.date)),
            price_minor: ActiveValue::Set(expense.price.cents()),
            currency: ActiveValue::Set(expense.currency.code().to_string()),
            exchange_rate: ActiveValue::Set(format_rate(expense.exchange_rate)),
            category: ActiveValue::Set(expense.category.clone()),
            created_at: ActiveValue::Set(expense.created_at),
            updated_at: ActiveValue::Set(expense.updated_at),
        }
    }
}

impl TryFrom<Model> for Expense {
    type Error = EngineError;

    fn try_from(model: Model) -> ResultEngine<Self> {
        let id = Uuid::parse_str(&model.id)
            .map_err(|_| EngineError::NotFound(format!("invalid expense id {}", model.id)))?;
        let date = NaiveDate::parse_from_str(&model.date, DATE_FORMAT)
            .map_err(|_| EngineError::InvalidDate(format!("stored date {}", model.date)))?;
        let exchange_rate = Decimal::from_str(&model.exchange_rate).map_err(|_| {
            EngineError::InvalidAmount(format!("stored exchange rate {}", model.exchange_rate))
        })?;

        Ok(Self {
            id,
            name: model.name,
            description: model.description,
            date,
            price: MoneyCents::new(model.price_minor),
            currency: Currency::try_from(model.currency.as_str())?,
            exchange_rate,
            category: model.category,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expense() -> Expense {
        let now = Utc::now();
        Expense {
            id: Uuid::new_v4(),
            name: "Groceries".to_string(),
            description: Some("weekly shop".to_string()),
            date: NaiveDate::from_ymd_opt(2023, 5, 1).unwrap(),
            price: MoneyCents::new(5000),
            currency: Currency::try_from("usd").unwrap(),
            exchange_rate: Decimal::new(13500, 4),
            category: "food".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn stores_date_as_iso_text() {
        let model: ActiveModel = (&expense()).into();
        assert_eq!(model.date, ActiveValue::Set("2023-05-01".to_string()));
    }

    #[test]
    fn stores_normalized_rate() {
        let model: ActiveModel = (&expense()).into();
        assert_eq!(model.exchange_rate, ActiveValue::Set("1.35".to_string()));
    }

    #[test]
    fn model_converts_back() {
        let original = expense();
        let model = Model {
            id: original.id.to_string(),
            name: original.name.clone(),
            description: original.description.clone(),
            date: "2023-05-01".to_string(),
            price_minor: 5000,
            currency: "USD".to_string(),
            exchange_rate: "1.35".to_string(),
            category: "food".to_string(),
            created_at: original.created_at,
            updated_at: original.updated_at,
        };
        let back = Expense::try_from(model).unwrap();
        assert_eq!(back.date, original.date);
        assert_eq!(back.exchange_rate, original.exchange_rate);
        assert_eq!(back.period(), BudgetPeriod::new(2023, 5).unwrap());
    }
}
