//! Sports session organizer: library with models and matchup logic.

pub mod logic;
pub mod models;

pub use logic::{
    build_tiers, expected_score, generate_matches, generate_session_matchups, k_factor,
    process_session_results, record_match_score, update_ratings, ProcessedRound, RatingUpdate,
};
pub use models::{
    MatchCandidate, MatchId, MatchResult, MatchupError, Outcome, PairingMode, Player, PlayerId,
    ScheduledMatch, Session, SessionConfig, SessionId, Tier, TierPolicy, DEFAULT_RATING,
};
