//! Data structures for session matchmaking: players, tiers, matches, sessions.

mod matchup;
mod player;
mod session;
mod tier;

pub use matchup::{MatchCandidate, MatchId, MatchResult, Outcome, PairingMode, ScheduledMatch};
pub use player::{Player, PlayerId, DEFAULT_RATING};
pub use session::{MatchupError, Session, SessionConfig, SessionId, TierPolicy};
pub use tier::Tier;
