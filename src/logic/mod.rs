//! Matchup business logic: tier building, pairing, ratings, results.

pub mod pairing;
pub mod rating;
pub mod results;
pub mod tiers;

pub use pairing::{generate_matches, generate_session_matchups};
pub use rating::{expected_score, k_factor, update_ratings, RatingUpdate};
pub use results::{process_session_results, record_match_score, ProcessedRound};
pub use tiers::build_tiers;
