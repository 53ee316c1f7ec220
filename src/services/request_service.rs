//! Domain service for the request lifecycle.
//!
//! Clients create and edit requests they own; support staff see everything,
//! mark requests viewed on first read and move them between statuses. Every
//! operation takes the calling [`Principal`] and checks its role first.

use thiserror::Error;

use crate::domain::{
    Forbidden, InvalidCode, Principal, RawRequestQuery, RequestId, RequestStatus, Ticket,
    TicketChanges, TicketDraft,
};

#[derive(Debug, Error)]
pub enum RequestError {
    #[error("Couldn't find request")]
    NotFound(RequestId),

    #[error(transparent)]
    Forbidden(#[from] Forbidden),

    #[error(transparent)]
    InvalidFilterValue(#[from] InvalidCode),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for RequestError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for RequestError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

#[async_trait::async_trait]
pub trait RequestService: Send + Sync {
    /// Creates a request owned by the calling client.
    async fn create_request(
        &self,
        client: &Principal,
        draft: TicketDraft,
    ) -> Result<Ticket, RequestError>;

    /// Requests owned by the client, filtered and sorted.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError::InvalidFilterValue`] if a filter code is out of range.
    async fn list_owned_requests(
        &self,
        client: &Principal,
        query: &RawRequestQuery,
    ) -> Result<Vec<Ticket>, RequestError>;

    /// A single owned request. Requests belonging to someone else are reported
    /// as not found.
    async fn get_owned_request(
        &self,
        client: &Principal,
        id: RequestId,
    ) -> Result<Ticket, RequestError>;

    /// Applies the provided fields to an owned request. Status and viewed are
    /// never touched here.
    async fn update_owned_request(
        &self,
        client: &Principal,
        id: RequestId,
        changes: TicketChanges,
    ) -> Result<Ticket, RequestError>;

    /// Every client account, for support staff.
    async fn list_clients(&self, support: &Principal) -> Result<Vec<Principal>, RequestError>;

    /// Every request, filtered and sorted. Does not mark anything viewed.
    async fn list_all_requests(
        &self,
        support: &Principal,
        query: &RawRequestQuery,
    ) -> Result<Vec<Ticket>, RequestError>;

    /// Fetches any request and marks it viewed.
    async fn get_any_request(
        &self,
        support: &Principal,
        id: RequestId,
    ) -> Result<Ticket, RequestError>;

    /// Overwrites the status. No transition rules apply.
    async fn set_status(
        &self,
        support: &Principal,
        id: RequestId,
        status: RequestStatus,
    ) -> Result<Ticket, RequestError>;
}
