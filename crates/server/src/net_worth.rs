//! Net worth API endpoints.

use api_types::net_worth::{NetWorth, NetWorthEntry, NetWorthNew};
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use engine::MoneyCents;

use crate::{ServerError, server::ServerState};

fn net_worth_view(net_worth: engine::NetWorth) -> NetWorth {
    NetWorth {
        id: net_worth.id,
        total: net_worth.total.to_decimal(),
        updated_at: net_worth.updated_at,
    }
}

pub async fn create(
    State(state): State<ServerState>,
    payload: Result<Json<NetWorthNew>, JsonRejection>,
) -> Result<(StatusCode, Json<NetWorth>), ServerError> {
    let Json(payload) = payload?;
    let total = MoneyCents::try_from(payload.total)?;
    let net_worth = state.engine.create_net_worth(total).await?;

    Ok((StatusCode::CREATED, Json(net_worth_view(net_worth))))
}

pub async fn get(State(state): State<ServerState>) -> Result<Json<NetWorth>, ServerError> {
    Ok(Json(net_worth_view(state.engine.net_worth().await?)))
}

pub async fn history(
    State(state): State<ServerState>,
) -> Result<Json<Vec<NetWorthEntry>>, ServerError> {
    let entries = state.engine.net_worth_history().await?;

    Ok(Json(
        entries
            .into_iter()
            .map(|entry| NetWorthEntry {
                id: entry.id,
                delta: entry.delta.to_decimal(),
                occurred_on: entry.occurred_on,
                is_expense: entry.is_expense,
                created_at: entry.created_at,
            })
            .collect(),
    ))
}
