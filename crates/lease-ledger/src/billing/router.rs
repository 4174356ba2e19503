use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use serde_json::json;

use super::domain::{ContractId, ContractTerms, PeriodId};
use super::repository::{ContractRepository, RepositoryError};
use super::service::{BillingError, BillingService, ReschedulePlan};

/// Router builder exposing the billing service's function-level contract
/// over JSON: activation, schedule lookup, reschedule, and payment capture.
pub fn billing_router<R>(service: Arc<BillingService<R>>) -> Router
where
    R: ContractRepository + 'static,
{
    Router::new()
        .route("/api/v1/billing/contracts", post(activate_handler::<R>))
        .route(
            "/api/v1/billing/contracts/:contract_id",
            get(schedule_handler::<R>),
        )
        .route(
            "/api/v1/billing/contracts/:contract_id/reschedule",
            post(reschedule_handler::<R>),
        )
        .route(
            "/api/v1/billing/contracts/:contract_id/periods/:period_id/payment",
            post(payment_handler::<R>),
        )
        .with_state(service)
}

fn error_response(error: BillingError) -> Response {
    let status = match &error {
        BillingError::Schedule(_) => StatusCode::UNPROCESSABLE_ENTITY,
        BillingError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        BillingError::Repository(RepositoryError::Conflict)
        | BillingError::AlreadyPaid { .. } => StatusCode::CONFLICT,
        BillingError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}

pub(crate) async fn activate_handler<R>(
    State(service): State<Arc<BillingService<R>>>,
    axum::Json(terms): axum::Json<ContractTerms>,
) -> Response
where
    R: ContractRepository + 'static,
{
    let record = match service.activate(terms) {
        Ok(record) => record,
        Err(error) => return error_response(error),
    };

    match service.schedule(&record.contract_id) {
        Ok(view) => (StatusCode::CREATED, axum::Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn schedule_handler<R>(
    State(service): State<Arc<BillingService<R>>>,
    Path(contract_id): Path<String>,
) -> Response
where
    R: ContractRepository + 'static,
{
    let id = ContractId(contract_id);
    match service.schedule(&id) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn reschedule_handler<R>(
    State(service): State<Arc<BillingService<R>>>,
    Path(contract_id): Path<String>,
    axum::Json(plan): axum::Json<ReschedulePlan>,
) -> Response
where
    R: ContractRepository + 'static,
{
    let id = ContractId(contract_id);
    match service.reschedule(&id, plan) {
        Ok(outcome) => (StatusCode::OK, axum::Json(outcome)).into_response(),
        Err(error) => error_response(error),
    }
}

/// Optional payload for payment capture; defaults to today.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct PaymentRequest {
    #[serde(default)]
    pub(crate) paid_on: Option<NaiveDate>,
}

pub(crate) async fn payment_handler<R>(
    State(service): State<Arc<BillingService<R>>>,
    Path((contract_id, period_id)): Path<(String, String)>,
    payload: Option<axum::Json<PaymentRequest>>,
) -> Response
where
    R: ContractRepository + 'static,
{
    let contract = ContractId(contract_id);
    let period = PeriodId(period_id);
    let paid_on = payload
        .and_then(|axum::Json(request)| request.paid_on)
        .unwrap_or_else(|| Local::now().date_naive());

    match service.mark_paid(&contract, &period, paid_on) {
        Ok(updated) => (StatusCode::OK, axum::Json(updated)).into_response(),
        Err(error) => error_response(error),
    }
}
