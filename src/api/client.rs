//! Routes under `/client`: a client's own requests.

use axum::{
    Extension, Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
};
use std::sync::Arc;

use super::validation::{json_body, query_params};
use super::{ApiError, AppState};
use crate::domain::{Principal, RawRequestQuery, RequestId, Ticket, TicketChanges, TicketDraft};

/// POST /client/request/
pub async fn create_request(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    payload: Result<Json<TicketDraft>, JsonRejection>,
) -> Result<Json<Ticket>, ApiError> {
    let draft = json_body(payload)?;

    let ticket = state
        .request_service()
        .create_request(&principal, draft)
        .await?;

    Ok(Json(ticket))
}

/// GET /client/my-requests/
pub async fn list_my_requests(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    params: Result<Query<RawRequestQuery>, QueryRejection>,
) -> Result<Json<Vec<Ticket>>, ApiError> {
    let query = query_params(params)?;

    let tickets = state
        .request_service()
        .list_owned_requests(&principal, &query)
        .await?;

    Ok(Json(tickets))
}

/// GET /client/request/{id}
pub async fn get_request(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<i32>,
) -> Result<Json<Ticket>, ApiError> {
    let id = RequestId::new(id);

    let ticket = state
        .request_service()
        .get_owned_request(&principal, id)
        .await?;

    Ok(Json(ticket))
}

/// PUT /client/request/{id}
/// Only `type`, `request` and `priority` are applied; status stays with support
pub async fn update_request(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<i32>,
    payload: Result<Json<TicketChanges>, JsonRejection>,
) -> Result<Json<Ticket>, ApiError> {
    let id = RequestId::new(id);
    let changes = json_body(payload)?;

    let ticket = state
        .request_service()
        .update_owned_request(&principal, id, changes)
        .await?;

    Ok(Json(ticket))
}
