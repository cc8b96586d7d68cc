use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;

use super::domain::{ApplicantId, ApplicantUpdate, IntakeSubmission, StallId};
use super::repository::{ActivityLog, AllocationStore, NotificationGateway};
use super::service::{AllocationServiceError, StallAllocationService};
use super::sessions::{BidOutcome, JoinOutcome, SessionId, SessionKind};

/// Router builder exposing the allocation operation surface.
pub fn allocation_router<S, N, L>(service: Arc<StallAllocationService<S, N, L>>) -> Router
where
    S: AllocationStore + 'static,
    N: NotificationGateway + 'static,
    L: ActivityLog + 'static,
{
    Router::new()
        .route("/api/v1/applicants", post(intake_handler::<S, N, L>))
        .route(
            "/api/v1/applicants/:applicant_id",
            get(get_applicant_handler::<S, N, L>)
                .patch(update_applicant_handler::<S, N, L>)
                .delete(delete_applicant_handler::<S, N, L>),
        )
        .route(
            "/api/v1/applications",
            post(stall_application_handler::<S, N, L>),
        )
        .route(
            "/api/v1/stalls/:stall_id/sessions",
            post(open_session_handler::<S, N, L>),
        )
        .route(
            "/api/v1/sessions/:session_id/participants",
            post(join_raffle_handler::<S, N, L>),
        )
        .route(
            "/api/v1/sessions/:session_id/bids",
            post(place_bid_handler::<S, N, L>),
        )
        .route(
            "/api/v1/sessions/:session_id/extend",
            post(extend_session_handler::<S, N, L>),
        )
        .route(
            "/api/v1/sessions/:session_id/cancel",
            post(cancel_session_handler::<S, N, L>),
        )
        .route(
            "/api/v1/sessions/:session_id/close",
            post(force_close_handler::<S, N, L>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct OpenSessionRequest {
    pub(crate) kind: SessionKind,
    pub(crate) deadline: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct JoinRequest {
    pub(crate) applicant_id: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct BidRequest {
    pub(crate) applicant_id: String,
    pub(crate) amount: u32,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ExtendRequest {
    pub(crate) deadline: DateTime<Utc>,
}

/// Map service failures onto the HTTP taxonomy. Storage detail never
/// reaches the response body.
fn error_response(error: AllocationServiceError) -> Response {
    let status = match &error {
        AllocationServiceError::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        AllocationServiceError::EligibilityDenied { .. }
        | AllocationServiceError::BidTooLow { .. } => StatusCode::BAD_REQUEST,
        AllocationServiceError::StallUnavailable | AllocationServiceError::SessionClosed => {
            StatusCode::CONFLICT
        }
        AllocationServiceError::NotFound { .. } => StatusCode::NOT_FOUND,
        AllocationServiceError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let payload = match &error {
        AllocationServiceError::Store(source) => {
            tracing::error!(error = %source, "storage failure surfaced to handler");
            json!({ "error": "storage failure" })
        }
        AllocationServiceError::Validation { field, .. } => {
            json!({ "error": error.to_string(), "field": field })
        }
        _ => json!({ "error": error.to_string() }),
    };

    (status, axum::Json(payload)).into_response()
}

pub(crate) async fn intake_handler<S, N, L>(
    State(service): State<Arc<StallAllocationService<S, N, L>>>,
    axum::Json(submission): axum::Json<IntakeSubmission>,
) -> Response
where
    S: AllocationStore + 'static,
    N: NotificationGateway + 'static,
    L: ActivityLog + 'static,
{
    match service.submit_intake(submission) {
        Ok(receipt) => (StatusCode::CREATED, axum::Json(receipt)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn stall_application_handler<S, N, L>(
    State(service): State<Arc<StallAllocationService<S, N, L>>>,
    axum::Json(submission): axum::Json<IntakeSubmission>,
) -> Response
where
    S: AllocationStore + 'static,
    N: NotificationGateway + 'static,
    L: ActivityLog + 'static,
{
    match service.submit_stall_application(submission) {
        Ok(receipt) => (StatusCode::CREATED, axum::Json(receipt)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn get_applicant_handler<S, N, L>(
    State(service): State<Arc<StallAllocationService<S, N, L>>>,
    Path(applicant_id): Path<String>,
) -> Response
where
    S: AllocationStore + 'static,
    N: NotificationGateway + 'static,
    L: ActivityLog + 'static,
{
    match service.get_applicant(&ApplicantId(applicant_id)) {
        Ok(dossier) => (StatusCode::OK, axum::Json(dossier)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn update_applicant_handler<S, N, L>(
    State(service): State<Arc<StallAllocationService<S, N, L>>>,
    Path(applicant_id): Path<String>,
    axum::Json(update): axum::Json<ApplicantUpdate>,
) -> Response
where
    S: AllocationStore + 'static,
    N: NotificationGateway + 'static,
    L: ActivityLog + 'static,
{
    match service.update_applicant(&ApplicantId(applicant_id), update) {
        Ok(dossier) => (StatusCode::OK, axum::Json(dossier)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn delete_applicant_handler<S, N, L>(
    State(service): State<Arc<StallAllocationService<S, N, L>>>,
    Path(applicant_id): Path<String>,
) -> Response
where
    S: AllocationStore + 'static,
    N: NotificationGateway + 'static,
    L: ActivityLog + 'static,
{
    match service.delete_applicant(&ApplicantId(applicant_id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn open_session_handler<S, N, L>(
    State(service): State<Arc<StallAllocationService<S, N, L>>>,
    Path(stall_id): Path<String>,
    axum::Json(request): axum::Json<OpenSessionRequest>,
) -> Response
where
    S: AllocationStore + 'static,
    N: NotificationGateway + 'static,
    L: ActivityLog + 'static,
{
    match service.open_session(&StallId(stall_id), request.kind, request.deadline) {
        Ok(view) => (StatusCode::CREATED, axum::Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn join_raffle_handler<S, N, L>(
    State(service): State<Arc<StallAllocationService<S, N, L>>>,
    Path(session_id): Path<String>,
    axum::Json(request): axum::Json<JoinRequest>,
) -> Response
where
    S: AllocationStore + 'static,
    N: NotificationGateway + 'static,
    L: ActivityLog + 'static,
{
    let session_id = SessionId(session_id);
    match service.join_raffle(&session_id, &ApplicantId(request.applicant_id)) {
        Ok(outcome) => {
            let result = match outcome {
                JoinOutcome::Joined => "joined",
                JoinOutcome::AlreadyJoined => "already_joined",
            };
            let payload = json!({ "session_id": session_id.0, "result": result });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn place_bid_handler<S, N, L>(
    State(service): State<Arc<StallAllocationService<S, N, L>>>,
    Path(session_id): Path<String>,
    axum::Json(request): axum::Json<BidRequest>,
) -> Response
where
    S: AllocationStore + 'static,
    N: NotificationGateway + 'static,
    L: ActivityLog + 'static,
{
    let session_id = SessionId(session_id);
    match service.place_bid(
        &session_id,
        &ApplicantId(request.applicant_id),
        request.amount,
    ) {
        Ok(outcome) => {
            let result = match outcome {
                BidOutcome::Placed => "placed",
                BidOutcome::Superseded => "superseded",
            };
            let payload = json!({ "session_id": session_id.0, "result": result });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn extend_session_handler<S, N, L>(
    State(service): State<Arc<StallAllocationService<S, N, L>>>,
    Path(session_id): Path<String>,
    axum::Json(request): axum::Json<ExtendRequest>,
) -> Response
where
    S: AllocationStore + 'static,
    N: NotificationGateway + 'static,
    L: ActivityLog + 'static,
{
    match service.extend_session(&SessionId(session_id), request.deadline) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn cancel_session_handler<S, N, L>(
    State(service): State<Arc<StallAllocationService<S, N, L>>>,
    Path(session_id): Path<String>,
) -> Response
where
    S: AllocationStore + 'static,
    N: NotificationGateway + 'static,
    L: ActivityLog + 'static,
{
    match service.cancel_session(&SessionId(session_id)) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn force_close_handler<S, N, L>(
    State(service): State<Arc<StallAllocationService<S, N, L>>>,
    Path(session_id): Path<String>,
) -> Response
where
    S: AllocationStore + 'static,
    N: NotificationGateway + 'static,
    L: ActivityLog + 'static,
{
    match service.force_close_session(&SessionId(session_id)) {
        Ok(closure) => (StatusCode::OK, axum::Json(closure)).into_response(),
        Err(error) => error_response(error),
    }
}
