//! A skill tier: one contiguous bucket of similarly-rated players.

use crate::models::player::Player;
use serde::{Deserialize, Serialize};

/// One bucket of the roster, sorted ascending by rating relative to its
/// neighbors. Tiers partition the roster exactly; a tier may be empty when
/// more tiers than players were requested.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Tier {
    pub players: Vec<Player>,
}

impl Tier {
    pub fn new(players: Vec<Player>) -> Self {
        Self { players }
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Lowest rating in the tier, if non-empty.
    pub fn min_rating(&self) -> Option<f64> {
        self.players
            .iter()
            .map(|p| p.rating)
            .min_by(f64::total_cmp)
    }

    /// Highest rating in the tier, if non-empty.
    pub fn max_rating(&self) -> Option<f64> {
        self.players
            .iter()
            .map(|p| p.rating)
            .max_by(f64::total_cmp)
    }
}
