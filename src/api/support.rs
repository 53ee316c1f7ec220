//! Routes under `/support`: the shared queue.

use axum::{
    Extension, Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
};
use std::sync::Arc;

use super::validation::{json_body, query_params};
use super::{ApiError, AppState, StatusUpdateRequest};
use crate::domain::{Principal, RawRequestQuery, RequestId, Ticket};

/// GET /support/clients/
pub async fn list_clients(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<Vec<Principal>>, ApiError> {
    let clients = state.request_service().list_clients(&principal).await?;
    Ok(Json(clients))
}

/// GET /support/requests/
pub async fn list_requests(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    params: Result<Query<RawRequestQuery>, QueryRejection>,
) -> Result<Json<Vec<Ticket>>, ApiError> {
    let query = query_params(params)?;

    let tickets = state
        .request_service()
        .list_all_requests(&principal, &query)
        .await?;

    Ok(Json(tickets))
}

/// GET /support/request/{id}
/// Marks the request as viewed
pub async fn get_request(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<i32>,
) -> Result<Json<Ticket>, ApiError> {
    let id = RequestId::new(id);

    let ticket = state
        .request_service()
        .get_any_request(&principal, id)
        .await?;

    Ok(Json(ticket))
}

/// PUT /support/request/{id}/status
pub async fn update_status(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<i32>,
    payload: Result<Json<StatusUpdateRequest>, JsonRejection>,
) -> Result<Json<Ticket>, ApiError> {
    let id = RequestId::new(id);
    let update = json_body(payload)?;

    let ticket = state
        .request_service()
        .set_status(&principal, id, update.status)
        .await?;

    Ok(Json(ticket))
}
