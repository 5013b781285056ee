//! Monthly spending totals.
//!
//! Two aggregates are kept per month: the overall `budgets` row and one
//! `category_budgets` row per category. Rows are created lazily on the first
//! delta that touches them.

use chrono::{Datelike, NaiveDate};

use crate::{EngineError, ResultEngine};

/// A calendar month, the key of every budget aggregate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BudgetPeriod {
    year: i32,
    month: u32,
}

impl BudgetPeriod {
    pub fn new(year: i32, month: u32) -> ResultEngine<Self> {
        if !(1..=12).contains(&month) {
            return Err(EngineError::InvalidDate(format!(
                "month must be between 1 and 12, got {month}"
            )));
        }
        if !(1..=9999).contains(&year) {
            return Err(EngineError::InvalidDate(format!(
                "year must be between 1 and 9999, got {year}"
            )));
        }
        Ok(Self { year, month })
    }

    pub fn year(self) -> i32 {
        self.year
    }

    pub fn month(self) -> u32 {
        self.month
    }

    /// Prefix shared by every stored date in this month (`YYYY-MM-`).
    pub(crate) fn date_prefix(self) -> String {
        format!("{:04}-{:02}-", self.year, self.month)
    }
}

impl From<NaiveDate> for BudgetPeriod {
    fn from(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }
}

/// Spent total of a month, optionally scoped to a category.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BudgetSpent {
    pub period: BudgetPeriod,
    pub category: Option<String>,
    pub spent: crate::MoneyCents,
}

pub(crate) mod monthly {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
    #[sea_orm(table_name = "budgets")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub year: i32,
        #[sea_orm(primary_key, auto_increment = false)]
        pub month: i32,
        pub spent_minor: i64,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

pub(crate) mod by_category {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
    #[sea_orm(table_name = "category_budgets")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub year: i32,
        #[sea_orm(primary_key, auto_increment = false)]
        pub month: i32,
        #[sea_orm(primary_key, auto_increment = false)]
        pub category: String,
        pub spent_minor: i64,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}
