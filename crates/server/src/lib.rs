use api_types::ErrorBody;
use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::IntoResponse,
};
use engine::EngineError;
use sea_orm::DbErr;

pub use server::{CallerId, ServerState, router, run_with_listener, spawn_with_listener};

mod calculators;
mod history;
mod info;
mod server;
mod tips;

pub mod types {
    pub mod calculators {
        pub use api_types::calculators::{
            BudgetSimulationNew, ExpenseCategory, Expenses, LoanDurationNew, SavingsPlanNew,
            ZakatNew,
        };
        pub use engine::{BudgetResult, LoanDurationResult, SavingsPlanResult, ZakatResult};
    }

    pub mod history {
        pub use api_types::history::{
            CalculationType, CalculationView, HistoryQuery, HistoryResponse,
        };
    }

    pub mod tips {
        pub use api_types::tips::{TipView, TipsQuery, TipsResponse};
    }

    pub mod service {
        pub use api_types::service::{HealthStatus, ServiceIndex};
    }
}

#[derive(Debug)]
pub enum ServerError {
    Engine(EngineError),
    Database(DbErr),
    Unauthorized,
    NotFound,
    /// The request could not be decoded at all.
    Generic(String),
}

fn status_for_error(err: &ServerError) -> StatusCode {
    match err {
        ServerError::Engine(_) | ServerError::Generic(_) => StatusCode::BAD_REQUEST,
        ServerError::Unauthorized => StatusCode::UNAUTHORIZED,
        ServerError::NotFound => StatusCode::NOT_FOUND,
        ServerError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn body_for_error(err: ServerError) -> ErrorBody {
    let (error, kind) = match err {
        ServerError::Engine(err) => {
            let kind = err.kind();
            (err.to_string(), kind)
        }
        ServerError::Generic(err) => (err, "usage"),
        ServerError::Unauthorized => ("missing x-user-id header".to_string(), "unauthorized"),
        ServerError::NotFound => ("resource not found".to_string(), "not_found"),
        ServerError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            ("internal server error".to_string(), "internal")
        }
    };
    ErrorBody {
        error,
        kind: kind.to_string(),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let status = status_for_error(&self);
        (status, Json(body_for_error(self))).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}

impl From<DbErr> for ServerError {
    fn from(value: DbErr) -> Self {
        Self::Database(value)
    }
}

impl From<JsonRejection> for ServerError {
    fn from(value: JsonRejection) -> Self {
        Self::Generic(value.body_text())
    }
}

impl From<PathRejection> for ServerError {
    fn from(value: PathRejection) -> Self {
        Self::Generic(value.body_text())
    }
}

impl From<QueryRejection> for ServerError {
    fn from(value: QueryRejection) -> Self {
        Self::Generic(value.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_validation_maps_to_400() {
        let res = ServerError::from(EngineError::Validation("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn engine_domain_constraint_maps_to_400() {
        let res =
            ServerError::from(EngineError::DomainConstraint("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn engine_usage_maps_to_400() {
        let res = ServerError::from(EngineError::Usage("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn unauthorized_maps_to_401() {
        let res = ServerError::Unauthorized.into_response();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn not_found_maps_to_404() {
        let res = ServerError::NotFound.into_response();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        let body = body_for_error(ServerError::NotFound);
        assert_eq!(body.kind, "not_found");
    }

    #[test]
    fn database_maps_to_500() {
        let res = ServerError::from(DbErr::Custom("disk full".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn body_carries_engine_kind() {
        let body = body_for_error(ServerError::from(EngineError::DomainConstraint(
            "too long".to_string(),
        )));
        assert_eq!(body.error, "too long");
        assert_eq!(body.kind, "domain_constraint");
    }

    #[test]
    fn body_hides_database_details() {
        let body = body_for_error(ServerError::from(DbErr::Custom("secret".to_string())));
        assert_eq!(body.error, "internal server error");
        assert_eq!(body.kind, "internal");
    }
}
