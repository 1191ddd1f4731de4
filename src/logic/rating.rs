//! ELO-style rating update with an experience-based K-factor.

use crate::models::{MatchupError, Outcome, Player};

/// Matches played below which a player is still provisional.
pub const PROVISIONAL_MATCHES: u32 = 30;
/// K-factor while provisional.
pub const K_PROVISIONAL: f64 = 40.0;
/// K-factor once established.
pub const K_ESTABLISHED: f64 = 20.0;

const RATING_SCALE: f64 = 400.0;

/// New ratings and match counts for both players of one match.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RatingUpdate {
    pub rating_a: f64,
    pub rating_b: f64,
    pub matches_played_a: u32,
    pub matches_played_b: u32,
}

/// K-factor for a player who has `matches_played` matches behind them.
pub fn k_factor(matches_played: u32) -> f64 {
    if matches_played < PROVISIONAL_MATCHES {
        K_PROVISIONAL
    } else {
        K_ESTABLISHED
    }
}

/// Expected score of the first player against the second.
pub fn expected_score(rating_a: f64, rating_b: f64) -> f64 {
    1.0 / (1.0 + 10f64.powf((rating_b - rating_a) / RATING_SCALE))
}

/// Compute both players' new ratings from one match's scores.
///
/// Pure in its inputs: nothing is mutated, the caller persists the result
/// (both players together or not at all). Each player's K comes from their
/// own pre-match `matches_played`, so the two sides of one match can move
/// by different amounts. Negative scores are rejected up front.
pub fn update_ratings(
    a: &Player,
    b: &Player,
    score_a: i32,
    score_b: i32,
) -> Result<RatingUpdate, MatchupError> {
    for score in [score_a, score_b] {
        if score < 0 {
            return Err(MatchupError::InvalidScore(score));
        }
    }

    let (actual_a, actual_b) = match Outcome::from_scores(score_a, score_b) {
        Outcome::SideA => (1.0, 0.0),
        Outcome::SideB => (0.0, 1.0),
        Outcome::Draw => (0.5, 0.5),
    };

    let expected_a = expected_score(a.rating, b.rating);
    let expected_b = 1.0 - expected_a;

    Ok(RatingUpdate {
        rating_a: a.rating + k_factor(a.matches_played) * (actual_a - expected_a),
        rating_b: b.rating + k_factor(b.matches_played) * (actual_b - expected_b),
        matches_played_a: a.matches_played + 1,
        matches_played_b: b.matches_played + 1,
    })
}
