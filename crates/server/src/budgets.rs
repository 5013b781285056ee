//! Budget-spent API endpoints.

use api_types::budget::BudgetSpent;
use axum::{
    Json,
    extract::{Path, State, rejection::PathRejection},
};
use engine::BudgetPeriod;

use crate::{ServerError, server::ServerState};

fn budget_view(spent: engine::BudgetSpent) -> BudgetSpent {
    BudgetSpent {
        year: spent.period.year(),
        month: spent.period.month(),
        category: spent.category,
        spent: spent.spent.to_decimal(),
    }
}

pub async fn monthly(
    State(state): State<ServerState>,
    path: Result<Path<(i32, u32)>, PathRejection>,
) -> Result<Json<BudgetSpent>, ServerError> {
    let Path((year, month)) = path?;
    let period = BudgetPeriod::new(year, month)?;
    Ok(Json(budget_view(state.engine.budget_spent(period).await?)))
}

pub async fn by_category(
    State(state): State<ServerState>,
    path: Result<Path<(i32, u32, String)>, PathRejection>,
) -> Result<Json<BudgetSpent>, ServerError> {
    let Path((year, month, category)) = path?;
    let period = BudgetPeriod::new(year, month)?;
    Ok(Json(budget_view(
        state.engine.category_budget_spent(period, &category).await?,
    )))
}
