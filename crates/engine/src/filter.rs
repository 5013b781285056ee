//! Typed equality filter over expense fields.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, Condition};

use crate::{
    Currency, MoneyCents,
    expenses::{self, format_date, format_rate},
};

/// Equality filter built from whichever fields are supplied.
///
/// Every setter maps to exactly one column; unset fields do not constrain the
/// result. An empty filter matches every expense.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExpenseFilter {
    name: Option<String>,
    description: Option<String>,
    date: Option<NaiveDate>,
    price: Option<MoneyCents>,
    currency: Option<Currency>,
    exchange_rate: Option<Decimal>,
    category: Option<String>,
}

impl ExpenseFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn price(mut self, price: MoneyCents) -> Self {
        self.price = Some(price);
        self
    }

    pub fn currency(mut self, currency: Currency) -> Self {
        self.currency = Some(currency);
        self
    }

    pub fn exchange_rate(mut self, rate: Decimal) -> Self {
        self.exchange_rate = Some(rate);
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub(crate) fn condition(&self) -> Condition {
        use expenses::Column;

        Condition::all()
            .add_option(self.name.as_ref().map(|v| Column::Name.eq(v.as_str())))
            .add_option(
                self.description
                    .as_ref()
                    .map(|v| Column::Description.eq(v.as_str())),
            )
            .add_option(self.date.map(|v| Column::Date.eq(format_date(v))))
            .add_option(self.price.map(|v| Column::PriceMinor.eq(v.cents())))
            .add_option(self.currency.as_ref().map(|v| Column::Currency.eq(v.code())))
            .add_option(
                self.exchange_rate
                    .map(|v| Column::ExchangeRate.eq(format_rate(v))),
            )
            .add_option(
                self.category
                    .as_ref()
                    .map(|v| Column::Category.eq(v.as_str())),
            )
    }
}
