//! `SeaORM` implementation of the `RequestService` trait.

use crate::db::Store;
use crate::domain::{
    Principal, RawRequestQuery, RequestId, RequestStatus, Role, Ticket, TicketChanges,
    TicketDraft,
};
use crate::services::request_service::{RequestError, RequestService};
use async_trait::async_trait;
use tracing::{debug, info};

pub struct SeaOrmRequestService {
    store: Store,
}

impl SeaOrmRequestService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }
}

#[async_trait]
impl RequestService for SeaOrmRequestService {
    async fn create_request(
        &self,
        client: &Principal,
        draft: TicketDraft,
    ) -> Result<Ticket, RequestError> {
        let client = client.require_role(Role::Client)?;

        let ticket = self.store.create_owned_request(client.id, &draft).await?;

        info!(
            request_id = %ticket.id,
            client_id = %client.id,
            "Request created"
        );
        Ok(ticket)
    }

    async fn list_owned_requests(
        &self,
        client: &Principal,
        query: &RawRequestQuery,
    ) -> Result<Vec<Ticket>, RequestError> {
        let client = client.require_role(Role::Client)?;
        let query = query.resolve()?;

        let tickets = self.store.list_owned_requests(client.id, &query).await?;
        debug!("Client {} listed {} requests", client.id, tickets.len());
        Ok(tickets)
    }

    async fn get_owned_request(
        &self,
        client: &Principal,
        id: RequestId,
    ) -> Result<Ticket, RequestError> {
        let client = client.require_role(Role::Client)?;

        self.store
            .get_owned_request(client.id, id)
            .await?
            .ok_or(RequestError::NotFound(id))
    }

    async fn update_owned_request(
        &self,
        client: &Principal,
        id: RequestId,
        changes: TicketChanges,
    ) -> Result<Ticket, RequestError> {
        let client = client.require_role(Role::Client)?;

        let ticket = self
            .store
            .update_owned_request(client.id, id, &changes)
            .await?
            .ok_or(RequestError::NotFound(id))?;

        info!(request_id = %id, client_id = %client.id, "Request updated");
        Ok(ticket)
    }

    async fn list_clients(&self, support: &Principal) -> Result<Vec<Principal>, RequestError> {
        support.require_role(Role::Support)?;

        Ok(self.store.list_users_by_role(Role::Client).await?)
    }

    async fn list_all_requests(
        &self,
        support: &Principal,
        query: &RawRequestQuery,
    ) -> Result<Vec<Ticket>, RequestError> {
        support.require_role(Role::Support)?;
        let query = query.resolve()?;

        Ok(self.store.list_requests(&query).await?)
    }

    async fn get_any_request(
        &self,
        support: &Principal,
        id: RequestId,
    ) -> Result<Ticket, RequestError> {
        support.require_role(Role::Support)?;

        self.store
            .get_request_and_mark_viewed(id)
            .await?
            .ok_or(RequestError::NotFound(id))
    }

    async fn set_status(
        &self,
        support: &Principal,
        id: RequestId,
        status: RequestStatus,
    ) -> Result<Ticket, RequestError> {
        let support = support.require_role(Role::Support)?;

        let ticket = self
            .store
            .set_request_status(id, status)
            .await?
            .ok_or(RequestError::NotFound(id))?;

        info!(
            request_id = %id,
            support_id = %support.id,
            status = status.label(),
            "Request status changed"
        );
        Ok(ticket)
    }
}
