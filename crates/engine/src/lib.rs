//! Expense tracking engine.
//!
//! The engine owns the expense records and keeps three aggregates in sync
//! with them: the net worth singleton, the monthly budget-spent totals and
//! the per-category budget-spent totals. Every write applies its expense
//! change and its aggregate deltas inside one DB transaction.

pub use budgets::{BudgetPeriod, BudgetSpent};
pub use commands::{ExpenseDraft, ExpensePatch, MAX_PRICE};
pub use currency::Currency;
pub use error::{EngineError, FieldError, FieldErrorKind};
pub use exchange::{ExchangeRateProvider, FRANKFURTER_URL, FixedRates, FrankfurterRates};
pub use expenses::Expense;
pub use filter::ExpenseFilter;
pub use money::MoneyCents;
pub use net_worth::{NetWorth, NetWorthEntry};
pub use ops::{DEFAULT_PAGE_LIMIT, Engine, EngineBuilder};

mod budgets;
mod commands;
mod currency;
mod error;
mod exchange;
mod expenses;
mod filter;
mod money;
mod net_worth;
mod ops;

type ResultEngine<T> = Result<T, EngineError>;
