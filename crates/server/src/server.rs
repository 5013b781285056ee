use axum::{
    Router,
    routing::{get, post},
};

use std::{net::SocketAddr, sync::Arc};

use crate::{budgets, expenses, net_worth};
use engine::Engine;

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
}

pub fn router(state: ServerState) -> Router {
    Router::new()
        .route("/expenses/", get(expenses::list))
        .route("/expense/", post(expenses::create))
        .route(
            "/expense/{id}",
            get(expenses::get)
                .put(expenses::update)
                .delete(expenses::delete),
        )
        // The year segment shares its name with `/expense/{id}`.
        .route("/expense/{id}/{month}", get(expenses::list_by_month))
        .route("/expense/limited/", get(expenses::list_limited))
        .route("/expense/ranged/{start}/{end}", get(expenses::list_ranged))
        .route("/expense/specify/", get(expenses::list_specified))
        .route(
            "/net-worth/",
            post(net_worth::create).get(net_worth::get),
        )
        .route("/net-worth/history", get(net_worth::history))
        .route("/budget/{year}/{month}", get(budgets::monthly))
        .route(
            "/category-budget/{year}/{month}/{category}",
            get(budgets::by_category),
        )
        .with_state(state)
}

pub async fn run(engine: Engine, addr: SocketAddr) {
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind server listener on {addr}: {err}");
            return;
        }
    };
    if let Err(err) = run_with_listener(engine, listener).await {
        tracing::error!("server failed: {err}");
    }
}

async fn run_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    let state = ServerState {
        engine: Arc::new(engine),
    };

    axum::serve(listener, router(state)).await
}
