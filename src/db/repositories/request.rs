use anyhow::{Context, Result};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, JoinType, Order, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, Select, Set, TransactionTrait,
};
use tracing::info;

use crate::domain::{
    RequestFilter, RequestId, RequestQuery, RequestStatus, SortField, Ticket, TicketChanges,
    TicketDraft, UserId,
};
use crate::entities::{client_requests, prelude::*, requests};

impl From<requests::Model> for Ticket {
    fn from(model: requests::Model) -> Self {
        Self {
            id: RequestId::new(model.id),
            request_type: model.request_type,
            body: model.body,
            status: model.status,
            priority: model.priority,
            viewed: model.viewed,
            created_at: model.created_at,
        }
    }
}

pub struct RequestRepository {
    conn: DatabaseConnection,
}

impl RequestRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Insert a request together with its ownership link in one transaction.
    pub async fn create_owned(&self, owner: UserId, draft: &TicketDraft) -> Result<Ticket> {
        let txn = self.conn.begin().await?;

        let model = requests::ActiveModel {
            request_type: Set(draft.request_type),
            body: Set(draft.body.clone()),
            status: Set(draft.status),
            priority: Set(draft.priority),
            viewed: Set(draft.viewed),
            created_at: Set(chrono::Utc::now()),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .context("Failed to insert request")?;

        client_requests::ActiveModel {
            client_id: Set(owner.value()),
            request_id: Set(model.id),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .context("Failed to link request to client")?;

        txn.commit().await?;

        info!("Client {} created request {}", owner, model.id);
        Ok(Ticket::from(model))
    }

    pub async fn get(&self, id: RequestId) -> Result<Option<Ticket>> {
        let model = Requests::find_by_id(id.value())
            .one(&self.conn)
            .await
            .context("Failed to query request by ID")?;

        Ok(model.map(Ticket::from))
    }

    /// The request, only if `owner` holds the ownership link for it.
    pub async fn get_owned(&self, owner: UserId, id: RequestId) -> Result<Option<Ticket>> {
        let model = Self::owned_select(owner)
            .filter(requests::Column::Id.eq(id.value()))
            .one(&self.conn)
            .await
            .context("Failed to query owned request")?;

        Ok(model.map(Ticket::from))
    }

    /// Apply the provided fields to a request owned by `owner`.
    pub async fn update_owned(
        &self,
        owner: UserId,
        id: RequestId,
        changes: &TicketChanges,
    ) -> Result<Option<Ticket>> {
        let txn = self.conn.begin().await?;

        let Some(model) = Self::owned_select(owner)
            .filter(requests::Column::Id.eq(id.value()))
            .one(&txn)
            .await
            .context("Failed to query owned request")?
        else {
            return Ok(None);
        };

        if changes.is_empty() {
            return Ok(Some(Ticket::from(model)));
        }

        let mut active: requests::ActiveModel = model.into();
        if let Some(request_type) = changes.request_type {
            active.request_type = Set(request_type);
        }
        if let Some(body) = &changes.body {
            active.body = Set(body.clone());
        }
        if let Some(priority) = changes.priority {
            active.priority = Set(priority);
        }

        let updated = active
            .update(&txn)
            .await
            .context("Failed to update request")?;
        txn.commit().await?;

        Ok(Some(Ticket::from(updated)))
    }

    /// Overwrite the status. Any status may follow any other.
    pub async fn set_status(&self, id: RequestId, status: RequestStatus) -> Result<Option<Ticket>> {
        let result = Requests::update_many()
            .col_expr(requests::Column::Status, Expr::value(status))
            .filter(requests::Column::Id.eq(id.value()))
            .exec(&self.conn)
            .await
            .context("Failed to update request status")?;

        if result.rows_affected == 0 {
            return Ok(None);
        }

        info!("Request {} status set to {}", id, status.label());
        self.get(id).await
    }

    /// Fetch a request and flip `viewed` to true if it was still false.
    pub async fn get_and_mark_viewed(&self, id: RequestId) -> Result<Option<Ticket>> {
        let Some(mut model) = Requests::find_by_id(id.value())
            .one(&self.conn)
            .await
            .context("Failed to query request by ID")?
        else {
            return Ok(None);
        };

        if !model.viewed {
            // Guarded on viewed = false so concurrent readers flip it once
            let result = Requests::update_many()
                .col_expr(requests::Column::Viewed, Expr::value(true))
                .filter(requests::Column::Id.eq(id.value()))
                .filter(requests::Column::Viewed.eq(false))
                .exec(&self.conn)
                .await
                .context("Failed to mark request as viewed")?;

            if result.rows_affected > 0 {
                info!("Request {} viewed by support for the first time", id);
            }
            model.viewed = true;
        }

        Ok(Some(Ticket::from(model)))
    }

    /// Every request matching `query`.
    pub async fn list(&self, query: &RequestQuery) -> Result<Vec<Ticket>> {
        let select = Self::apply_query(Requests::find(), query);

        let rows = select
            .all(&self.conn)
            .await
            .context("Failed to list requests")?;

        Ok(rows.into_iter().map(Ticket::from).collect())
    }

    /// Requests owned by `owner` matching `query`.
    pub async fn list_owned(&self, owner: UserId, query: &RequestQuery) -> Result<Vec<Ticket>> {
        let request_ids = self.owned_request_ids(owner).await?;
        if request_ids.is_empty() {
            return Ok(Vec::new());
        }

        let select = Self::apply_query(
            Requests::find().filter(requests::Column::Id.is_in(request_ids)),
            query,
        );

        let rows = select
            .all(&self.conn)
            .await
            .context("Failed to list owned requests")?;

        Ok(rows.into_iter().map(Ticket::from).collect())
    }

    pub async fn owned_request_ids(&self, owner: UserId) -> Result<Vec<i32>> {
        let links = ClientRequests::find()
            .filter(client_requests::Column::ClientId.eq(owner.value()))
            .all(&self.conn)
            .await
            .context("Failed to query ownership links")?;

        Ok(links.into_iter().map(|link| link.request_id).collect())
    }

    pub async fn count_links(&self, id: RequestId) -> Result<u64> {
        use sea_orm::PaginatorTrait;

        ClientRequests::find()
            .filter(client_requests::Column::RequestId.eq(id.value()))
            .count(&self.conn)
            .await
            .context("Failed to count ownership links")
    }

    fn owned_select(owner: UserId) -> Select<Requests> {
        Requests::find()
            .join(JoinType::InnerJoin, requests::Relation::ClientRequest.def())
            .filter(client_requests::Column::ClientId.eq(owner.value()))
    }

    fn apply_filter(mut select: Select<Requests>, filter: &RequestFilter) -> Select<Requests> {
        if let Some(request_type) = filter.request_type {
            select = select.filter(requests::Column::RequestType.eq(request_type));
        }
        if let Some(status) = filter.status {
            select = select.filter(requests::Column::Status.eq(status));
        }
        if let Some(priority) = filter.priority {
            select = select.filter(requests::Column::Priority.eq(priority));
        }
        if let Some(viewed) = filter.viewed {
            select = select.filter(requests::Column::Viewed.eq(viewed));
        }
        select
    }

    fn apply_query(select: Select<Requests>, query: &RequestQuery) -> Select<Requests> {
        let column = match query.sort.field {
            SortField::Priority => requests::Column::Priority,
            SortField::CreatedAt => requests::Column::CreatedAt,
        };
        let order = if query.sort.order.is_ascending() {
            Order::Asc
        } else {
            Order::Desc
        };

        // Ties keep insertion order
        Self::apply_filter(select, &query.filter)
            .order_by(column, order)
            .order_by_asc(requests::Column::Id)
    }
}
