use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Priority, RequestId, RequestStatus, RequestType};

/// A support request as returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ticket {
    pub id: RequestId,
    #[serde(rename = "type")]
    pub request_type: RequestType,
    #[serde(rename = "request")]
    pub body: String,
    pub status: RequestStatus,
    pub priority: Priority,
    pub viewed: bool,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a request. Status and viewed may be supplied but
/// default to `Pending` and `false`.
#[derive(Debug, Clone, Deserialize)]
pub struct TicketDraft {
    #[serde(rename = "type")]
    pub request_type: RequestType,
    #[serde(rename = "request")]
    pub body: String,
    pub priority: Priority,
    #[serde(default)]
    pub status: RequestStatus,
    #[serde(default)]
    pub viewed: bool,
}

impl TicketDraft {
    #[must_use]
    pub fn new(request_type: RequestType, body: impl Into<String>, priority: Priority) -> Self {
        Self {
            request_type,
            body: body.into(),
            priority,
            status: RequestStatus::default(),
            viewed: false,
        }
    }
}

/// Partial update a client may apply to its own request. Status and viewed
/// are deliberately absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TicketChanges {
    #[serde(rename = "type")]
    pub request_type: Option<RequestType>,
    #[serde(rename = "request")]
    pub body: Option<String>,
    pub priority: Option<Priority>,
}

impl TicketChanges {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.request_type.is_none() && self.body.is_none() && self.priority.is_none()
    }
}
