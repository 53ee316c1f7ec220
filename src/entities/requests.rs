use sea_orm::entity::prelude::*;

use crate::domain::{Priority, RequestStatus, RequestType};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "requests")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(column_name = "type")]
    pub request_type: RequestType,

    /// Free-text description written by the client
    #[sea_orm(column_name = "request")]
    pub body: String,

    pub status: RequestStatus,

    pub priority: Priority,

    /// Set once, the first time a support agent opens the request.
    pub viewed: bool,

    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::client_requests::Entity")]
    ClientRequest,
}

impl Related<super::client_requests::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ClientRequest.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
