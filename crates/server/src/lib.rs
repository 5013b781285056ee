use api_types::error::{ErrorBody, FieldError};
use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::IntoResponse,
};
use engine::EngineError;

pub use server::{ServerState, router, run};

mod budgets;
mod expenses;
mod net_worth;
mod server;

pub enum ServerError {
    Engine(EngineError),
    /// A request axum could not extract; keeps its status.
    Rejection(StatusCode, String),
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::NotFound(_) => StatusCode::NOT_FOUND,
        EngineError::ExistingKey(_) => StatusCode::CONFLICT,
        EngineError::ExchangeRate(_) => StatusCode::BAD_GATEWAY,
        EngineError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        EngineError::Validation(_)
        | EngineError::InvalidAmount(_)
        | EngineError::InvalidCurrency(_)
        | EngineError::InvalidDate(_)
        | EngineError::MaxBalanceReached(_) => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

fn body_for_engine_error(err: EngineError) -> ErrorBody {
    match err {
        EngineError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            ErrorBody {
                error: "internal server error".to_string(),
                detail: None,
            }
        }
        EngineError::ExchangeRate(msg) => {
            tracing::warn!("exchange rate lookup failed: {msg}");
            ErrorBody {
                error: EngineError::ExchangeRate(msg).to_string(),
                detail: None,
            }
        }
        EngineError::Validation(fields) => ErrorBody {
            error: "Invalid input".to_string(),
            detail: Some(
                fields
                    .into_iter()
                    .map(|f| FieldError {
                        field: f.field.to_string(),
                        kind: f.kind.as_str().to_string(),
                        message: f.message,
                    })
                    .collect(),
            ),
        },
        other => ErrorBody {
            error: other.to_string(),
            detail: None,
        },
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, body) = match self {
            ServerError::Engine(err) => (status_for_engine_error(&err), body_for_engine_error(err)),
            ServerError::Rejection(status, error) => (status, ErrorBody { error, detail: None }),
        };

        (status, Json(body)).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}

impl From<JsonRejection> for ServerError {
    fn from(value: JsonRejection) -> Self {
        Self::Rejection(value.status(), value.body_text())
    }
}

impl From<PathRejection> for ServerError {
    fn from(value: PathRejection) -> Self {
        Self::Rejection(value.status(), value.body_text())
    }
}

impl From<QueryRejection> for ServerError {
    fn from(value: QueryRejection) -> Self {
        Self::Rejection(value.status(), value.body_text())
    }
}
