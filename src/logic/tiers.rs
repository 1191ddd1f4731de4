//! Tier builder: partition a roster into ordered skill buckets.

use crate::models::{MatchupError, Player, Tier};

/// Split `players` into `num_tiers` contiguous buckets sorted ascending by
/// rating.
///
/// The sort is stable, so players with equal ratings keep their roster
/// order. With `n` players, the first `n % num_tiers` tiers get one extra
/// player; tiers beyond the player count come back empty. An empty roster
/// or a tier count of zero is rejected.
pub fn build_tiers(players: &[Player], num_tiers: usize) -> Result<Vec<Tier>, MatchupError> {
    if players.is_empty() || num_tiers == 0 {
        return Err(MatchupError::InvalidRoster);
    }

    let mut sorted: Vec<Player> = players.to_vec();
    sorted.sort_by(|a, b| a.rating.total_cmp(&b.rating));

    let n = sorted.len();
    let base = n / num_tiers;
    let remainder = n % num_tiers;

    let mut tiers = Vec::with_capacity(num_tiers);
    let mut rest = sorted.as_slice();
    for i in 0..num_tiers {
        let size = if i < remainder { base + 1 } else { base };
        let (tier, tail) = rest.split_at(size);
        tiers.push(Tier::new(tier.to_vec()));
        rest = tail;
    }

    Ok(tiers)
}
