//! Lot lifecycle state.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle state of a [`Lot`](crate::persistence::models::LotRow).
///
/// One-way: `open → closed`. There is no transition back to open, and
/// `closed_at` is written exactly once on the transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum LotStatus {
    /// Accepting membership changes.
    Open,
    /// Terminal: settled batch, membership frozen.
    Closed,
}

impl LotStatus {
    /// Returns the canonical lowercase string for this status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
        }
    }
}

impl fmt::Display for LotStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
