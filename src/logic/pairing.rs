//! Pairing engine: shuffle each tier, pair neighbors, assign fields.

use crate::models::{
    MatchCandidate, MatchupError, PairingMode, Player, ScheduledMatch, Session, Tier,
};
use rand::seq::SliceRandom;
use rand::Rng;

use super::tiers::build_tiers;

/// Pair up players tier by tier and schedule the pairs onto fields.
///
/// Per tier: shuffle with `rng`, then walk the shuffled order two at a time;
/// each consecutive pair is one candidate. An odd tier leaves its last
/// shuffled player on the bench. Candidates concatenate in tier order and
/// the first `num_fields` of them get fields `1..=k`; the players of any
/// candidates beyond that are benched too, so nobody is silently dropped.
///
/// Bench order: odd-tier leftovers in tier order, then overflow players in
/// candidate order.
pub fn generate_matches(
    tiers: &[Tier],
    mode: PairingMode,
    num_fields: u32,
    rng: &mut impl Rng,
) -> (Vec<ScheduledMatch>, Vec<Player>) {
    let mut pairs: Vec<(Player, Player)> = Vec::new();
    let mut bench: Vec<Player> = Vec::new();

    for tier in tiers {
        let mut members = tier.players.clone();
        members.shuffle(rng);
        if members.len() % 2 == 1 {
            if let Some(odd_one_out) = members.pop() {
                bench.push(odd_one_out);
            }
        }
        let mut members = members.into_iter();
        while let (Some(a), Some(b)) = (members.next(), members.next()) {
            pairs.push((a, b));
        }
    }

    let scheduled_count = (num_fields as usize).min(pairs.len());
    let overflow = pairs.split_off(scheduled_count);

    let matches: Vec<ScheduledMatch> = pairs
        .iter()
        .enumerate()
        .map(|(i, (a, b))| {
            let candidate = MatchCandidate {
                side_a: a.id,
                side_b: b.id,
            };
            ScheduledMatch::new(candidate, (i + 1) as u32, mode)
        })
        .collect();

    for (a, b) in overflow {
        bench.push(a);
        bench.push(b);
    }

    (matches, bench)
}

/// Generate a fresh round of matchups for a session.
///
/// Resolves the tier policy, builds tiers from the roster, pairs, and
/// replaces the session's current round (matches, bench, pending scores).
pub fn generate_session_matchups(
    session: &mut Session,
    rng: &mut impl Rng,
) -> Result<(), MatchupError> {
    let num_tiers = session.config.tier_policy.resolve(rng)?;
    let tiers = build_tiers(&session.players, num_tiers)?;
    let (matches, bench) = generate_matches(&tiers, session.config.mode, session.config.num_fields, rng);

    log::debug!(
        "Generated {} matches ({} benched) for session '{}' across {} tiers",
        matches.len(),
        bench.len(),
        session.name,
        num_tiers
    );

    session.matches = matches;
    session.bench = bench;
    session.pending_scores.clear();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PlayerId, SessionConfig, TierPolicy};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn roster(n: usize) -> Vec<Player> {
        (0..n)
            .map(|i| Player::with_rating(format!("P{i}"), 1200.0 + 50.0 * i as f64))
            .collect()
    }

    fn all_ids(matches: &[ScheduledMatch], bench: &[Player]) -> Vec<PlayerId> {
        let mut ids: Vec<PlayerId> = Vec::new();
        for m in matches {
            ids.push(m.side_a);
            ids.push(m.side_b);
        }
        ids.extend(bench.iter().map(|p| p.id));
        ids
    }

    #[test]
    fn every_player_lands_in_exactly_one_place() {
        let players = roster(11);
        let tiers = build_tiers(&players, 3).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        let (matches, bench) = generate_matches(&tiers, PairingMode::Singles, 10, &mut rng);

        let ids = all_ids(&matches, &bench);
        assert_eq!(ids.len(), players.len());
        let unique: HashSet<_> = ids.iter().collect();
        assert_eq!(unique.len(), players.len());
    }

    #[test]
    fn odd_tier_of_five_gives_two_matches_and_one_benched() {
        let players = roster(5);
        let tiers = build_tiers(&players, 1).unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        let (matches, bench) = generate_matches(&tiers, PairingMode::Singles, 10, &mut rng);
        assert_eq!(matches.len(), 2);
        assert_eq!(bench.len(), 1);
    }

    #[test]
    fn bench_per_tier_is_zero_or_one_without_overflow() {
        let players = roster(13);
        let tiers = build_tiers(&players, 4).unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        let (matches, bench) = generate_matches(&tiers, PairingMode::Doubles, 100, &mut rng);
        // 13 players over 4 tiers: sizes 4,3,3,3 -> 3 odd tiers bench one each.
        assert_eq!(bench.len(), 3);
        assert_eq!(matches.len(), 5);
    }

    #[test]
    fn fields_are_numbered_in_order_from_one() {
        let players = roster(8);
        let tiers = build_tiers(&players, 2).unwrap();
        let mut rng = StdRng::seed_from_u64(42);
        let (matches, _) = generate_matches(&tiers, PairingMode::Singles, 8, &mut rng);
        let fields: Vec<u32> = matches.iter().map(|m| m.field).collect();
        assert_eq!(fields, vec![1, 2, 3, 4]);
    }

    #[test]
    fn overflow_candidates_are_benched_not_dropped() {
        let players = roster(8);
        let tiers = build_tiers(&players, 2).unwrap();
        let mut rng = StdRng::seed_from_u64(5);
        let (matches, bench) = generate_matches(&tiers, PairingMode::Singles, 3, &mut rng);
        assert_eq!(matches.len(), 3);
        // One candidate overflows: both of its players bench.
        assert_eq!(bench.len(), 2);
        let ids = all_ids(&matches, &bench);
        let unique: HashSet<_> = ids.iter().collect();
        assert_eq!(unique.len(), players.len());
    }

    #[test]
    fn zero_fields_benches_everyone() {
        let players = roster(6);
        let tiers = build_tiers(&players, 2).unwrap();
        let mut rng = StdRng::seed_from_u64(9);
        let (matches, bench) = generate_matches(&tiers, PairingMode::Singles, 0, &mut rng);
        assert!(matches.is_empty());
        assert_eq!(bench.len(), 6);
    }

    #[test]
    fn same_seed_gives_same_pairing() {
        let players = roster(10);
        let tiers = build_tiers(&players, 3).unwrap();

        let gen = |seed: u64| {
            let mut rng = StdRng::seed_from_u64(seed);
            let (m, b) = generate_matches(&tiers, PairingMode::Singles, 10, &mut rng);
            let pairs: Vec<(PlayerId, PlayerId)> = m.iter().map(|x| (x.side_a, x.side_b)).collect();
            let bench: Vec<PlayerId> = b.iter().map(|p| p.id).collect();
            (pairs, bench)
        };

        assert_eq!(gen(123), gen(123));
    }

    #[test]
    fn session_generation_uses_tier_policy_and_resets_round() {
        let config = SessionConfig {
            mode: PairingMode::Singles,
            num_fields: 10,
            tier_policy: TierPolicy::Fixed { tiers: 2 },
        };
        let mut session = Session::with_players("Tuesday night", roster(9), config);
        session
            .pending_scores
            .insert(uuid::Uuid::new_v4(), (1, 0));

        let mut rng = StdRng::seed_from_u64(11);
        generate_session_matchups(&mut session, &mut rng).unwrap();

        // 9 players in 2 tiers (5 + 4): 4 matches, 1 benched.
        assert_eq!(session.matches.len(), 4);
        assert_eq!(session.bench.len(), 1);
        assert!(session.pending_scores.is_empty());
    }

    #[test]
    fn empty_roster_is_rejected_at_session_level() {
        let mut session = Session::new("empty", SessionConfig::default());
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(
            generate_session_matchups(&mut session, &mut rng),
            Err(MatchupError::InvalidRoster)
        );
    }
}
