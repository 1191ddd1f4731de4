//! Match candidates, scheduled matches, and recorded results.

use crate::models::player::PlayerId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a scheduled match.
pub type MatchId = Uuid;

/// How a pair is labeled: two individuals, or two team representatives.
///
/// Pairing mechanics are identical for both; doubles does not model full
/// two-person teams, only one representative per side.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PairingMode {
    #[default]
    Singles,
    Doubles,
}

/// An unordered pair of players produced by the pairing engine.
/// Has no identity until assigned to a field.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct MatchCandidate {
    pub side_a: PlayerId,
    pub side_b: PlayerId,
}

/// A candidate that got a field: it now has an id and a 1-based field number.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ScheduledMatch {
    pub id: MatchId,
    pub field: u32,
    pub side_a: PlayerId,
    pub side_b: PlayerId,
    pub mode: PairingMode,
}

impl ScheduledMatch {
    pub fn new(candidate: MatchCandidate, field: u32, mode: PairingMode) -> Self {
        Self {
            id: Uuid::new_v4(),
            field,
            side_a: candidate.side_a,
            side_b: candidate.side_b,
            mode,
        }
    }

    /// True when `player` plays on either side of this match.
    pub fn involves(&self, player: PlayerId) -> bool {
        self.side_a == player || self.side_b == player
    }
}

/// Which side won, from side A's perspective.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    SideA,
    SideB,
    Draw,
}

impl Outcome {
    /// Derive the outcome from two (already validated, non-negative) scores.
    pub fn from_scores(score_a: i32, score_b: i32) -> Self {
        use std::cmp::Ordering::*;
        match score_a.cmp(&score_b) {
            Greater => Outcome::SideA,
            Less => Outcome::SideB,
            Equal => Outcome::Draw,
        }
    }
}

/// A completed match: the pairing, both scores, and the derived winner.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub match_id: MatchId,
    pub side_a: PlayerId,
    pub side_b: PlayerId,
    pub score_a: i32,
    pub score_b: i32,
    /// None on a draw.
    pub winner: Option<PlayerId>,
}

impl MatchResult {
    pub fn new(m: &ScheduledMatch, score_a: i32, score_b: i32) -> Self {
        let winner = match Outcome::from_scores(score_a, score_b) {
            Outcome::SideA => Some(m.side_a),
            Outcome::SideB => Some(m.side_b),
            Outcome::Draw => None,
        };
        Self {
            match_id: m.id,
            side_a: m.side_a,
            side_b: m.side_b,
            score_a,
            score_b,
            winner,
        }
    }
}
