//! Session claim carried inside a token.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifies a user in a room of a game, for a limited time.
///
/// Round-trips unchanged through token generation and parsing. `ttl` is the
/// literal lifetime given at issuance, never a recomputed remainder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionClaim {
    /// Game the session belongs to
    pub game_id: Uuid,
    /// Room within the game
    pub room_id: Uuid,
    /// User holding the session
    pub user_id: Uuid,
    /// Lifetime measured from issuance
    pub ttl: Duration,
}

impl SessionClaim {
    /// Create a claim.
    pub fn new(game_id: Uuid, room_id: Uuid, user_id: Uuid, ttl: Duration) -> Self {
        Self { game_id, room_id, user_id, ttl }
    }
}
