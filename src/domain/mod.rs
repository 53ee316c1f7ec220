//! Domain types for the helpdesk with strong typing.
//!
//! Identifiers follow the Newtype pattern so user and request ids cannot be
//! mixed. Every closed set of values (roles, request types, statuses,
//! priorities) is an enum with a fixed small-integer wire code that is
//! validated strictly at the boundary.

pub mod principal;
pub mod query;
pub mod ticket;

pub use principal::{Forbidden, Principal};
pub use query::{RawRequestQuery, RequestFilter, RequestQuery, RequestSort, SortField};
pub use ticket::{Ticket, TicketChanges, TicketDraft};

use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Unique identifier for a registered user (client or support agent).
///
/// # Examples
///
/// ```rust
/// use helpdesk::domain::UserId;
///
/// let id = UserId::new(7);
/// assert_eq!(id.value(), 7);
/// assert_eq!(id.to_string(), "7");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct UserId(i32);

impl UserId {
    #[must_use]
    pub const fn new(id: i32) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn value(&self) -> i32 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i32> for UserId {
    fn from(id: i32) -> Self {
        Self::new(id)
    }
}

impl Serialize for UserId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_i32(self.0)
    }
}

/// Unique identifier for a support request (ticket).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct RequestId(i32);

impl RequestId {
    #[must_use]
    pub const fn new(id: i32) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn value(&self) -> i32 {
        self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i32> for RequestId {
    fn from(id: i32) -> Self {
        Self::new(id)
    }
}

impl Serialize for RequestId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_i32(self.0)
    }
}

/// Raised when an integer does not map to any variant of a coded enum.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid value: {value} is not a valid {kind}")]
pub struct InvalidCode {
    pub kind: &'static str,
    pub value: i32,
}

/// Implements the integer wire code for an enum: `code()`, `label()`,
/// `TryFrom<i32>` and serde as a bare integer.
macro_rules! coded_enum {
    ($name:ident, $kind:literal, { $($variant:ident = $code:literal => $label:literal),+ $(,)? }) => {
        impl $name {
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            #[must_use]
            pub const fn code(self) -> i32 {
                match self {
                    $(Self::$variant => $code),+
                }
            }

            #[must_use]
            pub const fn label(self) -> &'static str {
                match self {
                    $(Self::$variant => $label),+
                }
            }
        }

        impl TryFrom<i32> for $name {
            type Error = InvalidCode;

            fn try_from(value: i32) -> Result<Self, Self::Error> {
                match value {
                    $($code => Ok(Self::$variant),)+
                    _ => Err(InvalidCode { kind: $kind, value }),
                }
            }
        }

        impl Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                serializer.serialize_i32(self.code())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let code = i32::deserialize(deserializer)?;
                Self::try_from(code).map_err(serde::de::Error::custom)
            }
        }
    };
}

/// Role of a principal. Fixed at signup, never changes afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "i32", db_type = "Integer")]
pub enum Role {
    #[sea_orm(num_value = 0)]
    Client,
    #[sea_orm(num_value = 1)]
    Support,
}

coded_enum!(Role, "user type", {
    Client = 0 => "Client",
    Support = 1 => "Support",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "i32", db_type = "Integer")]
pub enum RequestType {
    #[sea_orm(num_value = 0)]
    Review,
    #[sea_orm(num_value = 1)]
    Development,
    #[sea_orm(num_value = 2)]
    Discuss,
}

coded_enum!(RequestType, "request type", {
    Review = 0 => "Review",
    Development = 1 => "Development",
    Discuss = 2 => "Discuss",
});

/// Lifecycle state of a request. Support may set any value from any value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "i32", db_type = "Integer")]
pub enum RequestStatus {
    #[default]
    #[sea_orm(num_value = 0)]
    Pending,
    #[sea_orm(num_value = 1)]
    InProcess,
    #[sea_orm(num_value = 2)]
    Done,
}

coded_enum!(RequestStatus, "request status", {
    Pending = 0 => "Pending",
    InProcess = 1 => "In Process",
    Done = 2 => "Done",
});

/// Priority of a request. Codes grow with importance, so ordering by the
/// stored code orders by urgency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "i32", db_type = "Integer")]
pub enum Priority {
    #[sea_orm(num_value = 0)]
    CanWait,
    #[sea_orm(num_value = 1)]
    Middle,
    #[sea_orm(num_value = 2)]
    Important,
}

coded_enum!(Priority, "priority", {
    CanWait = 0 => "Can Wait",
    Middle = 1 => "Middle",
    Important = 2 => "Important",
});

/// Marker that routes a signup to the support role.
const SUPPORT_EMAIL_MARKER: &str = "@support";

/// Derives the role of a new account from its email address.
///
/// Any address containing `@support` (case-insensitive) belongs to a support
/// agent; everything else is a client.
#[must_use]
pub fn role_for_email(email: &str) -> Role {
    if email.to_lowercase().contains(SUPPORT_EMAIL_MARKER) {
        Role::Support
    } else {
        Role::Client
    }
}

/// Canonical form of an email used for storage and lookup.
#[must_use]
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Sort order enumeration to replace boolean blindness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Ascending,
    #[default]
    Descending,
}

impl SortOrder {
    /// Returns true if this is ascending order.
    #[must_use]
    pub const fn is_ascending(&self) -> bool {
        matches!(self, Self::Ascending)
    }

    /// `asc` is ascending; anything else, including nothing, is descending.
    #[must_use]
    pub fn parse_lenient(raw: Option<&str>) -> Self {
        match raw {
            Some("asc") => Self::Ascending,
            _ => Self::Descending,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_id_conversions() {
        let id = RequestId::new(42);
        assert_eq!(id.value(), 42);
        assert_eq!(id.to_string(), "42");
        assert_eq!(RequestId::from(42), id);
    }

    #[test]
    fn support_marker_in_email_yields_support_role() {
        assert_eq!(role_for_email("alice@support.example.com"), Role::Support);
        assert_eq!(role_for_email("bob@SUPPORT.example.com"), Role::Support);
        assert_eq!(role_for_email("Carol@Support"), Role::Support);
    }

    #[test]
    fn other_emails_yield_client_role() {
        assert_eq!(role_for_email("dave@example.com"), Role::Client);
        assert_eq!(role_for_email("support@example.com"), Role::Client);
        assert_eq!(role_for_email("erin@supp.example.com"), Role::Client);
    }

    #[test]
    fn normalize_email_trims_and_lowercases() {
        assert_eq!(normalize_email("  Alice@Example.COM "), "alice@example.com");
    }

    #[test]
    fn codes_round_trip_for_every_variant() {
        for status in RequestStatus::ALL {
            assert_eq!(RequestStatus::try_from(status.code()), Ok(*status));
        }
        for priority in Priority::ALL {
            assert_eq!(Priority::try_from(priority.code()), Ok(*priority));
        }
    }

    #[test]
    fn out_of_range_code_is_rejected() {
        let err = RequestStatus::try_from(5).unwrap_err();
        assert_eq!(err.value, 5);
        assert_eq!(err.kind, "request status");
        assert!(RequestType::try_from(-1).is_err());
        assert!(Priority::try_from(3).is_err());
    }

    #[test]
    fn enums_serialize_as_integers() {
        assert_eq!(serde_json::to_string(&Priority::Important).unwrap(), "2");
        assert_eq!(serde_json::to_string(&Role::Support).unwrap(), "1");
        let status: RequestStatus = serde_json::from_str("1").unwrap();
        assert_eq!(status, RequestStatus::InProcess);
        assert!(serde_json::from_str::<RequestType>("7").is_err());
    }

    #[test]
    fn sort_order_falls_back_to_descending() {
        assert!(SortOrder::parse_lenient(Some("asc")).is_ascending());
        assert!(!SortOrder::parse_lenient(Some("desc")).is_ascending());
        assert!(!SortOrder::parse_lenient(Some("sideways")).is_ascending());
        assert!(!SortOrder::parse_lenient(None).is_ascending());
    }
}
