//! Player data structure and rating constants.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a player (used in matches and lookups).
pub type PlayerId = Uuid;

/// Starting rating for a new player without an explicit one.
pub const DEFAULT_RATING: f64 = 1500.0;

/// A player in the session roster.
///
/// `rating` and `matches_played` are only ever changed by the rating update
/// path; everything else is roster bookkeeping.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    /// ELO-style skill estimate. Unbounded, conventionally 0..=3000.
    pub rating: f64,
    pub matches_played: u32,
    /// When this player last had a processed match, if ever.
    pub last_played: Option<DateTime<Utc>>,
}

impl Player {
    /// Create a new player with the default 1500 rating.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_rating(name, DEFAULT_RATING)
    }

    /// Create a new player with a custom starting rating.
    pub fn with_rating(name: impl Into<String>, rating: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            rating,
            matches_played: 0,
            last_played: None,
        }
    }

    /// True when this player still gets the high (provisional) K-factor.
    pub fn is_provisional(&self) -> bool {
        self.matches_played < crate::logic::rating::PROVISIONAL_MATCHES
    }
}
