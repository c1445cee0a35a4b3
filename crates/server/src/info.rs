//! Service metadata: landing index, health check and calculator catalog.

use std::collections::BTreeMap;

use api_types::service::{HealthStatus, ServiceIndex};
use axum::{Json, extract::State};
use chrono::Utc;
use engine::CalculatorCatalog;

use crate::server::ServerState;

const APP_NAME: &str = "Finance-tips";
const APP_DESCRIPTION: &str = "Halal financial calculators for small businesses and individuals";

const ENDPOINTS: &[(&str, &[(&str, &str)])] = &[
    (
        "calculators",
        &[
            ("savings_plan", "/api/calculators/savings-plan"),
            ("loan_duration", "/api/calculators/loan-duration"),
            ("budget_simulation", "/api/calculators/budget-simulation"),
            ("zakat", "/api/calculators/zakat"),
            ("history", "/api/calculators/history"),
            ("info", "/api/calculators/info"),
        ],
    ),
    (
        "tips",
        &[("list", "/api/tips"), ("detail", "/api/tips/{tip_id}")],
    ),
    ("service", &[("health", "/health")]),
];

/// Describe the calculators and the limits in force.
pub async fn get(State(state): State<ServerState>) -> Json<CalculatorCatalog> {
    Json(state.calculator.catalog())
}

pub async fn health() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "healthy".to_string(),
        timestamp: Utc::now(),
    })
}

pub async fn index() -> Json<ServiceIndex> {
    let endpoints = ENDPOINTS
        .iter()
        .map(|(group, routes)| {
            let routes = routes
                .iter()
                .map(|(name, path)| (name.to_string(), path.to_string()))
                .collect::<BTreeMap<_, _>>();
            (group.to_string(), routes)
        })
        .collect();

    Json(ServiceIndex {
        app: APP_NAME.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        description: APP_DESCRIPTION.to_string(),
        endpoints,
    })
}
