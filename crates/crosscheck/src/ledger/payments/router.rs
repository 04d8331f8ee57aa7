use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;

use super::domain::{PaymentId, PaymentRequest, UserId};
use super::query::{DateWindow, PaymentFilter};
use super::repository::{LedgerDirectory, PaymentRepository};
use super::service::{LedgerError, PaymentLedgerService};

/// Header carrying the authenticated user id. The fronting auth layer is
/// expected to have validated the session and stamped this header.
pub const CALLER_HEADER: &str = "x-crosscheck-user";

/// Router builder exposing the payment resource.
pub fn payment_router<R, D>(service: Arc<PaymentLedgerService<R, D>>) -> Router
where
    R: PaymentRepository + 'static,
    D: LedgerDirectory + 'static,
{
    Router::new()
        .route(
            "/api/v1/payments",
            axum::routing::post(create_handler::<R, D>).get(list_handler::<R, D>),
        )
        .route(
            "/api/v1/payments/:payment_id",
            get(retrieve_handler::<R, D>)
                .put(update_handler::<R, D>)
                .delete(delete_handler::<R, D>),
        )
        .with_state(service)
}

/// Query-string parameters of the listing endpoint. `date` is a presence
/// flag: when supplied, the inclusive window is read from the request body.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ListParams {
    pub(crate) keyword: Option<String>,
    pub(crate) date: Option<String>,
}

pub(crate) async fn create_handler<R, D>(
    State(service): State<Arc<PaymentLedgerService<R, D>>>,
    headers: HeaderMap,
    Json(request): Json<PaymentRequest>,
) -> Response
where
    R: PaymentRepository + 'static,
    D: LedgerDirectory + 'static,
{
    let caller = match caller_from_headers(&headers) {
        Ok(caller) => caller,
        Err(rejection) => return rejection,
    };

    match service.record(caller, request) {
        Ok(view) => (StatusCode::CREATED, Json(view)).into_response(),
        Err(error) => error.status_response(),
    }
}

pub(crate) async fn list_handler<R, D>(
    State(service): State<Arc<PaymentLedgerService<R, D>>>,
    headers: HeaderMap,
    Query(params): Query<ListParams>,
    window: Option<Json<DateWindow>>,
) -> Response
where
    R: PaymentRepository + 'static,
    D: LedgerDirectory + 'static,
{
    let caller = match caller_from_headers(&headers) {
        Ok(caller) => caller,
        Err(rejection) => return rejection,
    };

    let window = match (params.date.as_deref(), window) {
        (Some(_), Some(Json(window))) => Some(window),
        (Some(_), None) => {
            let payload = json!({
                "error": "date filtering requires startDate and endDate in the request body",
            });
            return (StatusCode::BAD_REQUEST, Json(payload)).into_response();
        }
        (None, _) => None,
    };

    let filter = PaymentFilter {
        keyword: params.keyword,
        window,
    };

    match service.search(caller, &filter) {
        Ok(views) => (StatusCode::OK, Json(views)).into_response(),
        Err(error) => error.status_response(),
    }
}

pub(crate) async fn retrieve_handler<R, D>(
    State(service): State<Arc<PaymentLedgerService<R, D>>>,
    Path(payment_id): Path<i64>,
) -> Response
where
    R: PaymentRepository + 'static,
    D: LedgerDirectory + 'static,
{
    match service.retrieve(PaymentId(payment_id)) {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(error) => error.status_response(),
    }
}

pub(crate) async fn update_handler<R, D>(
    State(service): State<Arc<PaymentLedgerService<R, D>>>,
    headers: HeaderMap,
    Path(payment_id): Path<i64>,
    Json(request): Json<PaymentRequest>,
) -> Response
where
    R: PaymentRepository + 'static,
    D: LedgerDirectory + 'static,
{
    let caller = match caller_from_headers(&headers) {
        Ok(caller) => caller,
        Err(rejection) => return rejection,
    };

    match service.amend(caller, PaymentId(payment_id), request) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error.status_response(),
    }
}

pub(crate) async fn delete_handler<R, D>(
    State(service): State<Arc<PaymentLedgerService<R, D>>>,
    Path(payment_id): Path<i64>,
) -> Response
where
    R: PaymentRepository + 'static,
    D: LedgerDirectory + 'static,
{
    match service.remove(PaymentId(payment_id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error.status_response(),
    }
}

fn caller_from_headers(headers: &HeaderMap) -> Result<UserId, Response> {
    let raw = headers
        .get(CALLER_HEADER)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| unauthorized("missing caller identity"))?;

    raw.trim()
        .parse::<i64>()
        .map(UserId)
        .map_err(|_| unauthorized("caller identity must be a numeric user id"))
}

fn unauthorized(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "error": message })),
    )
        .into_response()
}

impl LedgerError {
    /// Maps the closed error set onto response classes: missing records are
    /// 404s, normalization failures are 400s, storage trouble is a 500.
    pub(crate) fn status_response(&self) -> Response {
        let status = match self {
            LedgerError::LandlordNotFound(_)
            | LedgerError::TenantNotFound(_)
            | LedgerError::PaymentTypeNotFound(_)
            | LedgerError::PaymentNotFound(_) => StatusCode::NOT_FOUND,
            LedgerError::InvalidAmount(_) | LedgerError::InvalidDate(_) => StatusCode::BAD_REQUEST,
            LedgerError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}
