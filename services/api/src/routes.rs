use crate::infra::AppState;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use lease_ledger::billing::{
    billing_router, schedule_csv, BillingService, ContractId, ContractRepository,
};
use lease_ledger::error::AppError;
use serde_json::json;
use std::sync::Arc;

/// Shared state for the CSV export endpoint: the service plus the currency
/// label from configuration.
pub(crate) struct ExportState<R> {
    pub(crate) service: Arc<BillingService<R>>,
    pub(crate) currency: Arc<str>,
}

impl<R> Clone for ExportState<R> {
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
            currency: self.currency.clone(),
        }
    }
}

pub(crate) fn with_billing_routes<R>(
    service: Arc<BillingService<R>>,
    currency: &str,
) -> axum::Router
where
    R: ContractRepository + 'static,
{
    let export_state = ExportState {
        service: service.clone(),
        currency: Arc::from(currency),
    };

    billing_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .merge(
            axum::Router::new()
                .route(
                    "/api/v1/billing/contracts/:contract_id/export",
                    axum::routing::get(export_endpoint::<R>),
                )
                .with_state(export_state),
        )
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

/// Download a contract's schedule as CSV for accounting hand-off.
pub(crate) async fn export_endpoint<R>(
    State(state): State<ExportState<R>>,
    Path(contract_id): Path<String>,
) -> Result<impl IntoResponse, AppError>
where
    R: ContractRepository + 'static,
{
    let id = ContractId(contract_id);
    let view = state.service.schedule(&id)?;
    let body = schedule_csv(&view, &state.currency)?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}-schedule.csv\"", view.contract_id.0),
            ),
        ],
        body,
    ))
}
