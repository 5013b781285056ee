//! Expense API endpoints.

use std::str::FromStr;

use api_types::expense::{
    Expense, ExpenseDeleted, ExpenseNew, ExpenseUpdate, LimitedQuery, SpecifyQuery,
};
use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
};
use chrono::NaiveDate;
use engine::{
    BudgetPeriod, Currency, DEFAULT_PAGE_LIMIT, EngineError, ExpenseDraft, ExpenseFilter,
    ExpensePatch, MoneyCents,
};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

pub(crate) fn expense_view(expense: engine::Expense) -> Expense {
    Expense {
        id: expense.id,
        name: expense.name,
        description: expense.description,
        date: expense.date,
        price: expense.price.to_decimal(),
        currency: expense.currency.code().to_string(),
        exchange_rate: expense.exchange_rate,
        category: expense.category,
        created_at: expense.created_at,
        updated_at: expense.updated_at,
    }
}

fn views(expenses: Vec<engine::Expense>) -> Json<Vec<Expense>> {
    Json(expenses.into_iter().map(expense_view).collect())
}

pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<Expense>>, ServerError> {
    Ok(views(state.engine.list_expenses().await?))
}

pub async fn list_by_month(
    State(state): State<ServerState>,
    path: Result<Path<(i32, u32)>, PathRejection>,
) -> Result<Json<Vec<Expense>>, ServerError> {
    let Path((year, month)) = path?;
    let period = BudgetPeriod::new(year, month)?;
    Ok(views(state.engine.list_expenses_by_month(period).await?))
}

pub async fn get(
    State(state): State<ServerState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<Expense>, ServerError> {
    let Path(id) = path?;
    Ok(Json(expense_view(state.engine.expense(id).await?)))
}

pub async fn create(
    State(state): State<ServerState>,
    payload: Result<Json<ExpenseNew>, JsonRejection>,
) -> Result<(StatusCode, Json<Expense>), ServerError> {
    let Json(payload) = payload?;
    let expense = state
        .engine
        .create_expense(ExpenseDraft {
            name: payload.name,
            description: payload.description,
            date: payload.date,
            price: payload.price,
            currency: payload.currency,
            category: payload.category,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(expense_view(expense))))
}

pub async fn update(
    State(state): State<ServerState>,
    path: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<ExpenseUpdate>, JsonRejection>,
) -> Result<Json<Expense>, ServerError> {
    let Path(id) = path?;
    let Json(payload) = payload?;
    let expense = state
        .engine
        .update_expense(
            id,
            ExpensePatch {
                name: payload.name,
                description: payload.description,
                date: payload.date,
                price: payload.price,
                currency: payload.currency,
                category: payload.category,
            },
        )
        .await?;

    Ok(Json(expense_view(expense)))
}

pub async fn delete(
    State(state): State<ServerState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<ExpenseDeleted>, ServerError> {
    let Path(id) = path?;
    state.engine.delete_expense(id).await?;

    Ok(Json(ExpenseDeleted {
        message: format!("Expense with id {id} was successfully deleted"),
    }))
}

pub async fn list_limited(
    State(state): State<ServerState>,
    query: Result<Query<LimitedQuery>, QueryRejection>,
) -> Result<Json<Vec<Expense>>, ServerError> {
    let Query(query) = query?;
    let limit = query.limit.unwrap_or(DEFAULT_PAGE_LIMIT);
    let offset = query.offset.unwrap_or(0);
    Ok(views(state.engine.list_expenses_page(limit, offset).await?))
}

pub async fn list_ranged(
    State(state): State<ServerState>,
    path: Result<Path<(NaiveDate, NaiveDate)>, PathRejection>,
) -> Result<Json<Vec<Expense>>, ServerError> {
    let Path((start, end)) = path?;
    Ok(views(state.engine.list_expenses_between(start, end).await?))
}

pub async fn list_specified(
    State(state): State<ServerState>,
    query: Result<Query<SpecifyQuery>, QueryRejection>,
) -> Result<Json<Vec<Expense>>, ServerError> {
    let Query(query) = query?;
    let filter = specify_filter(query)?;
    Ok(views(state.engine.find_expenses(&filter).await?))
}

/// Drop absent and empty query values.
fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn parse_decimal(field: &str, raw: &str) -> Result<Decimal, EngineError> {
    Decimal::from_str(raw.trim())
        .map_err(|_| EngineError::InvalidAmount(format!("{field}: '{raw}' is not a number")))
}

fn specify_filter(query: SpecifyQuery) -> Result<ExpenseFilter, EngineError> {
    let mut filter = ExpenseFilter::new();

    if let Some(name) = present(query.expense_name) {
        filter = filter.name(name);
    }
    if let Some(description) = present(query.expense_description) {
        filter = filter.description(description);
    }
    if let Some(raw) = present(query.expense_date) {
        let date = NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| {
            EngineError::InvalidDate(format!("expense_date: '{raw}' is not a YYYY-MM-DD date"))
        })?;
        filter = filter.date(date);
    }
    if let Some(raw) = present(query.expense_price) {
        let price = MoneyCents::try_from(parse_decimal("expense_price", &raw)?)?;
        filter = filter.price(price);
    }
    if let Some(raw) = present(query.expense_currency) {
        filter = filter.currency(Currency::try_from(raw.as_str())?);
    }
    if let Some(raw) = present(query.expense_exchange_rate) {
        filter = filter.exchange_rate(parse_decimal("expense_exchange_rate", &raw)?);
    }
    if let Some(category) = present(query.expense_category) {
        filter = filter.category(category);
    }

    Ok(filter)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_values_are_ignored() {
        let filter = specify_filter(SpecifyQuery {
            expense_name: Some(String::new()),
            expense_category: Some("  ".to_string()),
            ..SpecifyQuery::default()
        })
        .unwrap();
        assert!(filter.is_empty());
    }

    #[test]
    fn bad_values_are_rejected() {
        let err = specify_filter(SpecifyQuery {
            expense_price: Some("abc".to_string()),
            ..SpecifyQuery::default()
        })
        .unwrap_err();
        assert!(matches!(err, EngineError::InvalidAmount(_)));

        let err = specify_filter(SpecifyQuery {
            expense_date: Some("2023-13-01".to_string()),
            ..SpecifyQuery::default()
        })
        .unwrap_err();
        assert!(matches!(err, EngineError::InvalidDate(_)));

        let err = specify_filter(SpecifyQuery {
            expense_currency: Some("dollars".to_string()),
            ..SpecifyQuery::default()
        })
        .unwrap_err();
        assert!(matches!(err, EngineError::InvalidCurrency(_)));
    }

    #[test]
    fn category_goes_to_the_category_filter() {
        let filter = specify_filter(SpecifyQuery {
            expense_category: Some("food".to_string()),
            ..SpecifyQuery::default()
        })
        .unwrap();
        assert_eq!(filter, ExpenseFilter::new().category("food"));
    }
}
