use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod expense {
    use super::*;

    /// Body of `POST /expense/`.
    ///
    /// Every field is optional on the wire so that missing ones are reported
    /// together as field errors instead of a single deserialization failure.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct ExpenseNew {
        pub name: Option<String>,
        pub description: Option<String>,
        pub date: Option<NaiveDate>,
        pub price: Option<Decimal>,
        pub currency: Option<String>,
        pub category: Option<String>,
    }

    /// Body of `PUT /expense/{id}`. Only supplied fields are applied.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct ExpenseUpdate {
        pub name: Option<String>,
        pub description: Option<String>,
        pub date: Option<NaiveDate>,
        pub price: Option<Decimal>,
        pub currency: Option<String>,
        pub category: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Expense {
        pub id: Uuid,
        pub name: String,
        pub description: Option<String>,
        pub date: NaiveDate,
        pub price: Decimal,
        pub currency: String,
        pub exchange_rate: Decimal,
        pub category: String,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseDeleted {
        pub message: String,
    }

    /// Query of `GET /expense/limited/`.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct LimitedQuery {
        pub limit: Option<u64>,
        pub offset: Option<u64>,
    }

    /// Query of `GET /expense/specify/`. Empty values are ignored.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct SpecifyQuery {
        pub expense_name: Option<String>,
        pub expense_description: Option<String>,
        pub expense_date: Option<String>,
        pub expense_price: Option<String>,
        pub expense_currency: Option<String>,
        pub expense_exchange_rate: Option<String>,
        pub expense_category: Option<String>,
    }
}

pub mod net_worth {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct NetWorthNew {
        pub total: Decimal,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct NetWorth {
        pub id: Uuid,
        pub total: Decimal,
        pub updated_at: DateTime<Utc>,
    }

    /// One adjustment applied to the net worth.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct NetWorthEntry {
        pub id: Uuid,
        pub delta: Decimal,
        pub occurred_on: NaiveDate,
        pub is_expense: bool,
        pub created_at: DateTime<Utc>,
    }
}

pub mod budget {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetSpent {
        pub year: i32,
        pub month: u32,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub category: Option<String>,
        pub spent: Decimal,
    }
}

pub mod error {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct FieldError {
        pub field: String,
        /// `missing` or `invalid`.
        pub kind: String,
        pub message: String,
    }

    /// Body of every non-2xx response.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ErrorBody {
        pub error: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub detail: Option<Vec<FieldError>>,
    }
}
