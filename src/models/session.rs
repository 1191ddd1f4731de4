//! Session state, per-session configuration, and the error enum.

use crate::models::matchup::{MatchId, MatchResult, PairingMode, ScheduledMatch};
use crate::models::player::{Player, PlayerId, DEFAULT_RATING};
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Errors that can occur during matchup and rating operations.
#[derive(Clone, Debug, PartialEq)]
pub enum MatchupError {
    /// Empty roster or a tier count of zero.
    InvalidRoster,
    /// A score was negative.
    InvalidScore(i32),
    /// A match references a player id not in the roster.
    UnknownPlayer(PlayerId),
    /// Not all scheduled matches have a recorded score.
    IncompleteResults,
    /// Score recorded against a match id that is not in the current round.
    MatchNotFound(MatchId),
    /// A player with this name already exists (names are unique, case-insensitive).
    DuplicatePlayerName,
    /// Player name is empty or whitespace.
    InvalidPlayerName,
    /// Player id not found in the roster.
    PlayerNotFound(PlayerId),
    /// Submit requested with no generated matches.
    NoMatchesGenerated,
    /// Tier policy range is empty or starts at zero.
    InvalidTierPolicy,
    /// Roster CSV could not be parsed.
    RosterImport(String),
}

impl std::fmt::Display for MatchupError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchupError::InvalidRoster => {
                write!(f, "Roster is empty or tier count is zero")
            }
            MatchupError::InvalidScore(s) => write!(f, "Scores must be non-negative (got {})", s),
            MatchupError::UnknownPlayer(_) => write!(f, "Match references an unknown player"),
            MatchupError::IncompleteResults => write!(f, "Not all matches have a recorded score"),
            MatchupError::MatchNotFound(_) => write!(f, "Match not found in the current round"),
            MatchupError::DuplicatePlayerName => {
                write!(f, "A player with this name already exists")
            }
            MatchupError::InvalidPlayerName => write!(f, "Player name must not be empty"),
            MatchupError::PlayerNotFound(_) => write!(f, "Player not found"),
            MatchupError::NoMatchesGenerated => write!(f, "No matches have been generated"),
            MatchupError::InvalidTierPolicy => {
                write!(f, "Tier policy must have 1 <= min <= max")
            }
            MatchupError::RosterImport(msg) => write!(f, "Roster import failed: {}", msg),
        }
    }
}

impl std::error::Error for MatchupError {}

/// How many tiers to split the roster into for one generation run.
///
/// The range variant draws a fresh count per run from the injected rng, so
/// session generation stays reproducible under a seeded rng.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TierPolicy {
    Fixed { tiers: u32 },
    RandomRange { min: u32, max: u32 },
}

impl Default for TierPolicy {
    fn default() -> Self {
        TierPolicy::RandomRange { min: 2, max: 4 }
    }
}

impl TierPolicy {
    /// Pick the tier count for one generation run.
    pub fn resolve(&self, rng: &mut impl Rng) -> Result<usize, MatchupError> {
        match *self {
            TierPolicy::Fixed { tiers } if tiers >= 1 => Ok(tiers as usize),
            TierPolicy::RandomRange { min, max } if min >= 1 && min <= max => {
                Ok(rng.gen_range(min..=max) as usize)
            }
            _ => Err(MatchupError::InvalidTierPolicy),
        }
    }
}

/// Per-session matchup configuration.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    pub mode: PairingMode,
    /// Fields (courts, tables, lanes) available per round.
    pub num_fields: u32,
    pub tier_policy: TierPolicy,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            mode: PairingMode::Singles,
            num_fields: 4,
            tier_policy: TierPolicy::default(),
        }
    }
}

/// Unique identifier for a session.
pub type SessionId = Uuid;

/// One play session: a roster, the current round's matches and bench,
/// pending scores, and the results processed so far.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Session {
    pub id: SessionId,
    pub name: String,
    pub date: DateTime<Utc>,
    pub players: Vec<Player>,
    /// Current round's scheduled matches.
    pub matches: Vec<ScheduledMatch>,
    /// Players left out of the current round.
    pub bench: Vec<Player>,
    /// Scores entered for the current round, keyed by match id (before submit).
    pub pending_scores: HashMap<MatchId, (i32, i32)>,
    /// Completed matches from previous rounds of this session.
    pub history: Vec<MatchResult>,
    pub config: SessionConfig,
}

impl Session {
    /// Create a new empty session.
    pub fn new(name: impl Into<String>, config: SessionConfig) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            date: Utc::now(),
            players: Vec::new(),
            matches: Vec::new(),
            bench: Vec::new(),
            pending_scores: HashMap::new(),
            history: Vec::new(),
            config,
        }
    }

    /// Create a session with an initial roster.
    pub fn with_players(name: impl Into<String>, players: Vec<Player>, config: SessionConfig) -> Self {
        Self {
            players,
            ..Self::new(name, config)
        }
    }

    /// Reference to a roster player by id.
    pub fn get_player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    /// Mutable reference to a roster player by id.
    pub fn get_player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == id)
    }

    /// Add a player with an optional starting rating. Names must be unique
    /// (case-insensitive) and non-empty.
    pub fn add_player(
        &mut self,
        name: impl Into<String>,
        rating: Option<f64>,
    ) -> Result<PlayerId, MatchupError> {
        let name = name.into();
        let name_trimmed = name.trim();
        if name_trimmed.is_empty() {
            return Err(MatchupError::InvalidPlayerName);
        }
        let is_duplicate = self
            .players
            .iter()
            .any(|p| p.name.eq_ignore_ascii_case(name_trimmed));
        if is_duplicate {
            return Err(MatchupError::DuplicatePlayerName);
        }
        let player = Player::with_rating(name_trimmed, rating.unwrap_or(DEFAULT_RATING));
        let id = player.id;
        self.players.push(player);
        Ok(id)
    }

    /// Remove a player by id. Removing a player who is in a scheduled match
    /// makes that match fail with `UnknownPlayer` at submit time; other
    /// matches in the round are unaffected.
    pub fn remove_player(&mut self, player_id: PlayerId) -> Result<(), MatchupError> {
        let idx = self
            .players
            .iter()
            .position(|p| p.id == player_id)
            .ok_or(MatchupError::PlayerNotFound(player_id))?;
        self.players.remove(idx);
        self.bench.retain(|p| p.id != player_id);
        Ok(())
    }

    /// Bulk-add players from CSV rows of `name` or `name,rating` (no header).
    /// Returns how many players were added; the whole import fails on the
    /// first bad row or duplicate name, without adding any players.
    pub fn import_roster_csv(&mut self, data: &str) -> Result<usize, MatchupError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(data.as_bytes());

        let mut rows: Vec<(String, Option<f64>)> = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|e| MatchupError::RosterImport(e.to_string()))?;
            let name = match record.get(0) {
                Some(n) if !n.is_empty() => n.to_string(),
                _ => return Err(MatchupError::RosterImport("missing player name".into())),
            };
            let rating = match record.get(1) {
                Some("") | None => None,
                Some(r) => Some(r.parse::<f64>().map_err(|_| {
                    MatchupError::RosterImport(format!("bad rating for '{}'", name))
                })?),
            };
            rows.push((name, rating));
        }

        // Validate all names against the roster and each other before adding.
        for (i, (name, _)) in rows.iter().enumerate() {
            let dup_in_roster = self.players.iter().any(|p| p.name.eq_ignore_ascii_case(name));
            let dup_in_rows = rows[..i].iter().any(|(n, _)| n.eq_ignore_ascii_case(name));
            if dup_in_roster || dup_in_rows {
                return Err(MatchupError::DuplicatePlayerName);
            }
        }

        let added = rows.len();
        for (name, rating) in rows {
            self.players
                .push(Player::with_rating(name, rating.unwrap_or(DEFAULT_RATING)));
        }
        Ok(added)
    }

    /// Replace the session configuration. Takes effect on the next generation run.
    pub fn set_config(&mut self, config: SessionConfig) {
        self.config = config;
    }
}
