//! Authenticated identities and the role gate every protected operation
//! passes through.

use serde::Serialize;
use thiserror::Error;

use super::{Role, UserId};

/// A registered user as seen by the rest of the system. Never carries the
/// password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Principal {
    pub id: UserId,
    pub name: String,
    pub email: String,
    #[serde(rename = "userType")]
    pub role: Role,
}

/// The caller's role does not allow the operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{} Authorization required", .0.label())]
pub struct Forbidden(pub Role);

impl Principal {
    /// Passes the principal through if it holds `role`.
    pub fn require_role(&self, role: Role) -> Result<&Self, Forbidden> {
        if self.role == role {
            Ok(self)
        } else {
            Err(Forbidden(role))
        }
    }
}
