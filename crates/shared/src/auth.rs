//! Claims carried in bearer tokens.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Access-token claims.
///
/// `sub` owns every budget, transaction and notification the request touches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Owner ID.
    pub sub: Uuid,
    /// Issued at, seconds since the epoch.
    pub iat: i64,
    /// Expires at, seconds since the epoch.
    pub exp: i64,
}

impl Claims {
    /// Claims for `owner` issued at `now`, valid for `ttl`.
    #[must_use]
    pub fn issued_at(owner: Uuid, now: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            sub: owner,
            iat: now.timestamp(),
            exp: now
                .checked_add_signed(ttl)
                .unwrap_or(DateTime::<Utc>::MAX_UTC)
                .timestamp(),
        }
    }

    /// The owner the token was issued to.
    #[must_use]
    pub const fn user_id(&self) -> Uuid {
        self.sub
    }
}
