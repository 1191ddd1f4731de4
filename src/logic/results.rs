//! Round result processing: record scores, then apply rating updates.

use crate::models::{MatchId, MatchResult, MatchupError, ScheduledMatch, Session};
use chrono::{DateTime, Utc};

use super::rating::update_ratings;

/// What came out of processing one round: applied results in match order,
/// plus per-match failures that did not stop the rest of the round.
#[derive(Clone, Debug, PartialEq)]
pub struct ProcessedRound {
    pub applied: Vec<MatchResult>,
    pub failed: Vec<(MatchId, MatchupError)>,
}

/// Record the scores for one scheduled match of the current round.
/// Scores must be non-negative and the match must be in the round.
pub fn record_match_score(
    session: &mut Session,
    match_id: MatchId,
    score_a: i32,
    score_b: i32,
) -> Result<(), MatchupError> {
    for score in [score_a, score_b] {
        if score < 0 {
            return Err(MatchupError::InvalidScore(score));
        }
    }
    if !session.matches.iter().any(|m| m.id == match_id) {
        return Err(MatchupError::MatchNotFound(match_id));
    }
    session.pending_scores.insert(match_id, (score_a, score_b));
    Ok(())
}

/// Process the current round: apply the rating update for every scheduled
/// match, stamp `last_played`, append results to the session history, and
/// clear the round.
///
/// Every scheduled match must have a recorded score before processing
/// starts. A match whose player is no longer in the roster fails with
/// `UnknownPlayer` for that match only; the rest of the round still
/// applies. Within one match the two players update together or not at all.
pub fn process_session_results(
    session: &mut Session,
    now: DateTime<Utc>,
) -> Result<ProcessedRound, MatchupError> {
    if session.matches.is_empty() {
        return Err(MatchupError::NoMatchesGenerated);
    }
    for m in &session.matches {
        if !session.pending_scores.contains_key(&m.id) {
            return Err(MatchupError::IncompleteResults);
        }
    }

    let matches = std::mem::take(&mut session.matches);
    let mut round = ProcessedRound {
        applied: Vec::new(),
        failed: Vec::new(),
    };

    for m in &matches {
        let (score_a, score_b) = session.pending_scores[&m.id];
        match apply_match(session, m, score_a, score_b, now) {
            Ok(result) => round.applied.push(result),
            Err(e) => {
                log::warn!("Skipping match on field {}: {}", m.field, e);
                round.failed.push((m.id, e));
            }
        }
    }

    session.history.extend(round.applied.iter().cloned());
    session.bench.clear();
    session.pending_scores.clear();

    log::debug!(
        "Processed round for session '{}': {} applied, {} failed",
        session.name,
        round.applied.len(),
        round.failed.len()
    );
    Ok(round)
}

/// Apply one match's rating update to both players.
/// Both players are looked up before anything is written, so a missing
/// player leaves the other one untouched.
fn apply_match(
    session: &mut Session,
    m: &ScheduledMatch,
    score_a: i32,
    score_b: i32,
    now: DateTime<Utc>,
) -> Result<MatchResult, MatchupError> {
    let a = session
        .get_player(m.side_a)
        .ok_or(MatchupError::UnknownPlayer(m.side_a))?
        .clone();
    let b = session
        .get_player(m.side_b)
        .ok_or(MatchupError::UnknownPlayer(m.side_b))?
        .clone();

    let update = update_ratings(&a, &b, score_a, score_b)?;

    if let Some(p) = session.get_player_mut(m.side_a) {
        p.rating = update.rating_a;
        p.matches_played = update.matches_played_a;
        p.last_played = Some(now);
    }
    if let Some(p) = session.get_player_mut(m.side_b) {
        p.rating = update.rating_b;
        p.matches_played = update.matches_played_b;
        p.last_played = Some(now);
    }

    Ok(MatchResult::new(m, score_a, score_b))
}
