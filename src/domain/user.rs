//! User roles and the authenticated caller identity.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role attached to every user account.
///
/// Stored as `TEXT` in the `users.role` column and carried on every
/// request via the `x-user-role` header from the upstream auth proxy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Role {
    /// Regular user: may only touch their own scan records and sessions.
    User,
    /// Administrator: full access, lot and catalog management.
    Admin,
}

impl Role {
    /// Returns the canonical lowercase string for this role.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "admin" => Ok(Self::Admin),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

/// Identity of the authenticated caller, as validated upstream.
///
/// Every `/api/v1` operation receives one of these; authorization checks
/// in the service layer are expressed against it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    /// The caller's user id.
    pub id: Uuid,
    /// The caller's role.
    pub role: Role,
}

impl AuthUser {
    /// Returns `true` when the caller holds the admin role.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self.role, Role::Admin)
    }

    /// Returns `true` when the caller may act on a record owned by
    /// `owner_id` (the owner themselves or any admin).
    #[must_use]
    pub fn may_access(&self, owner_id: Uuid) -> bool {
        self.is_admin() || self.id == owner_id
    }
}
