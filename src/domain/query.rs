//! Filter and sort contract shared by the client and support listings.
//!
//! Filters arrive as small integers and are validated strictly: an unknown
//! code fails the whole listing. Sort parameters are the opposite, anything
//! unrecognised quietly becomes `created_at` / descending.

use serde::Deserialize;

use super::{InvalidCode, Priority, RequestStatus, RequestType, SortOrder};

/// Query string as received on the wire.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRequestQuery {
    #[serde(rename = "type")]
    pub request_type: Option<i32>,
    pub status: Option<i32>,
    pub priority: Option<i32>,
    pub viewed: Option<bool>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

/// Exact-match predicates, combined with AND. `None` means unconstrained.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RequestFilter {
    pub request_type: Option<RequestType>,
    pub status: Option<RequestStatus>,
    pub priority: Option<Priority>,
    pub viewed: Option<bool>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortField {
    Priority,
    #[default]
    CreatedAt,
}

impl SortField {
    /// `priority` sorts by priority; anything else sorts by creation time.
    #[must_use]
    pub fn parse_lenient(raw: Option<&str>) -> Self {
        match raw {
            Some("priority") => Self::Priority,
            _ => Self::CreatedAt,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RequestSort {
    pub field: SortField,
    pub order: SortOrder,
}

/// Fully resolved listing query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RequestQuery {
    pub filter: RequestFilter,
    pub sort: RequestSort,
}

impl RawRequestQuery {
    pub fn resolve(&self) -> Result<RequestQuery, InvalidCode> {
        let filter = RequestFilter {
            request_type: self.request_type.map(RequestType::try_from).transpose()?,
            status: self.status.map(RequestStatus::try_from).transpose()?,
            priority: self.priority.map(Priority::try_from).transpose()?,
            viewed: self.viewed,
        };

        let sort = RequestSort {
            field: SortField::parse_lenient(self.sort_by.as_deref()),
            order: SortOrder::parse_lenient(self.sort_order.as_deref()),
        };

        Ok(RequestQuery { filter, sort })
    }
}
