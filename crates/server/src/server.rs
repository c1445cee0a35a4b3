use axum::{
    Router,
    extract::Request,
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
};
use axum_extra::headers::{Error as AxumError, Header};
use sea_orm::DatabaseConnection;

use std::sync::Arc;

use crate::{calculators, history, info, tips};
use engine::Calculator;

static USER_ID_HEADER: axum::http::HeaderName = axum::http::HeaderName::from_static("x-user-id");

const MAX_USER_ID_LEN: usize = 128;

#[derive(Clone)]
pub struct ServerState {
    pub calculator: Arc<Calculator>,
    pub db: DatabaseConnection,
}

/// `TypedHeader` for the caller identity.
///
/// Calculator calls carrying "x-user-id" are recorded in that caller's
/// history. The value is an opaque, non-empty string.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CallerId(pub String);

impl Header for CallerId {
    fn name() -> &'static axum::http::HeaderName {
        &USER_ID_HEADER
    }

    fn decode<'i, I>(values: &mut I) -> Result<Self, AxumError>
    where
        Self: Sized,
        I: Iterator<Item = &'i axum::http::HeaderValue>,
    {
        let value = values.next().ok_or_else(AxumError::invalid)?;
        let Ok(value) = value.to_str() else {
            return Err(AxumError::invalid());
        };
        let value = value.trim();
        if value.is_empty() || value.len() > MAX_USER_ID_LEN {
            return Err(AxumError::invalid());
        }

        Ok(CallerId(value.to_string()))
    }

    fn encode<E: Extend<axum::http::HeaderValue>>(&self, values: &mut E) {
        match axum::http::HeaderValue::from_str(&self.0) {
            Ok(value) => values.extend(std::iter::once(value)),
            Err(_) => tracing::error!("failed to encode x-user-id header"),
        }
    }
}

async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let response = next.run(request).await;
    tracing::debug!("{method} {path} -> {}", response.status());
    response
}

pub fn router(state: ServerState) -> Router {
    Router::new()
        .route("/", get(info::index))
        .route("/health", get(info::health))
        .route(
            "/api/calculators/savings-plan",
            post(calculators::savings_plan),
        )
        .route(
            "/api/calculators/loan-duration",
            post(calculators::loan_duration),
        )
        .route(
            "/api/calculators/budget-simulation",
            post(calculators::budget_simulation),
        )
        .route("/api/calculators/zakat", post(calculators::zakat))
        .route("/api/calculators/history", get(history::list))
        .route("/api/calculators/info", get(info::get))
        .route("/api/tips", get(tips::list))
        .route("/api/tips/{tip_id}", get(tips::detail))
        .route_layer(middleware::from_fn(log_request))
        .with_state(state)
}

pub async fn run_with_listener(
    calculator: Calculator,
    db: DatabaseConnection,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    let state = ServerState {
        calculator: Arc::new(calculator),
        db,
    };

    axum::serve(listener, router(state)).await
}

pub fn spawn_with_listener(
    calculator: Calculator,
    db: DatabaseConnection,
    listener: tokio::net::TcpListener,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(calculator, db, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}
