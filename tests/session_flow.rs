//! Integration tests for a full session: roster, matchup generation,
//! scoring, and rating updates through the public API.

use chrono::Utc;
use rand::rngs::StdRng;
use rand::SeedableRng;
use sports_session_web::{
    generate_session_matchups, process_session_results, record_match_score, MatchupError,
    PairingMode, Player, Session, SessionConfig, TierPolicy,
};

fn config(tiers: u32, fields: u32) -> SessionConfig {
    SessionConfig {
        mode: PairingMode::Singles,
        num_fields: fields,
        tier_policy: TierPolicy::Fixed { tiers },
    }
}

fn session_with_ratings(ratings: &[f64], cfg: SessionConfig) -> Session {
    let players: Vec<Player> = ratings
        .iter()
        .enumerate()
        .map(|(i, &r)| Player::with_rating(format!("P{i}"), r))
        .collect();
    Session::with_players("Sunday league", players, cfg)
}

#[test]
fn full_round_trip_updates_ratings_and_history() {
    let ratings = [1200.0, 1250.0, 1300.0, 1350.0, 1400.0, 1450.0, 1500.0, 1550.0];
    let mut session = session_with_ratings(&ratings, config(2, 4));
    let mut rng = StdRng::seed_from_u64(99);

    generate_session_matchups(&mut session, &mut rng).unwrap();
    assert_eq!(session.matches.len(), 4);
    assert!(session.bench.is_empty());

    // Two tiers of four: matches 1-2 come from the low tier, 3-4 from the
    // high tier, so every matchup stays within its tier.
    for m in &session.matches[..2] {
        for side in [m.side_a, m.side_b] {
            let p = session.get_player(side).unwrap();
            assert!(p.rating <= 1350.0, "low-tier match had rating {}", p.rating);
        }
    }
    for m in &session.matches[2..] {
        for side in [m.side_a, m.side_b] {
            let p = session.get_player(side).unwrap();
            assert!(p.rating >= 1400.0, "high-tier match had rating {}", p.rating);
        }
    }

    for m in session.matches.clone() {
        record_match_score(&mut session, m.id, 21, 15).unwrap();
    }
    let now = Utc::now();
    let round = process_session_results(&mut session, now).unwrap();
    assert_eq!(round.applied.len(), 4);
    assert!(round.failed.is_empty());
    assert_eq!(session.history.len(), 4);

    for p in &session.players {
        assert_eq!(p.matches_played, 1);
        assert_eq!(p.last_played, Some(now));
    }
    // Total rating is conserved: every pair shared K=40.
    let total: f64 = session.players.iter().map(|p| p.rating).sum();
    let expected: f64 = ratings.iter().sum();
    assert!((total - expected).abs() < 1e-9);
}

#[test]
fn bench_then_play_next_round() {
    let mut session = session_with_ratings(&[1500.0; 5], config(1, 4));
    let mut rng = StdRng::seed_from_u64(1);

    generate_session_matchups(&mut session, &mut rng).unwrap();
    assert_eq!(session.matches.len(), 2);
    assert_eq!(session.bench.len(), 1);

    for m in session.matches.clone() {
        record_match_score(&mut session, m.id, 11, 9).unwrap();
    }
    process_session_results(&mut session, Utc::now()).unwrap();
    assert!(session.bench.is_empty());

    // The benched player is back in the pool for the next round.
    generate_session_matchups(&mut session, &mut rng).unwrap();
    let in_round = session.matches.len() * 2 + session.bench.len();
    assert_eq!(in_round, 5);
}

#[test]
fn roster_management_rules() {
    let mut session = Session::new("drop-in", config(1, 4));
    session.add_player("Alice", None).unwrap();
    session.add_player("Bob", Some(1700.0)).unwrap();
    assert_eq!(
        session.add_player("alice", None),
        Err(MatchupError::DuplicatePlayerName)
    );

    let bob = session.players[1].clone();
    assert_eq!(bob.rating, 1700.0);
    session.remove_player(bob.id).unwrap();
    assert_eq!(
        session.remove_player(bob.id),
        Err(MatchupError::PlayerNotFound(bob.id))
    );
    assert_eq!(session.players.len(), 1);
}

#[test]
fn csv_import_adds_everyone_or_no_one() {
    let mut session = Session::new("import", SessionConfig::default());
    let added = session
        .import_roster_csv("Alice,1600\nBob\nCarol,1450.5\n")
        .unwrap();
    assert_eq!(added, 3);
    assert_eq!(session.players[0].rating, 1600.0);
    assert_eq!(session.players[1].rating, 1500.0);
    assert_eq!(session.players[2].rating, 1450.5);

    // A bad row fails the whole import and leaves the roster untouched.
    assert!(matches!(
        session.import_roster_csv("Dave,notanumber\nErin\n"),
        Err(MatchupError::RosterImport(_))
    ));
    assert!(matches!(
        session.import_roster_csv("Frank\nalice,1200\n"),
        Err(MatchupError::DuplicatePlayerName)
    ));
    assert_eq!(session.players.len(), 3);
}

#[test]
fn random_range_tier_policy_is_validated() {
    let mut rng = StdRng::seed_from_u64(0);
    let bad = TierPolicy::RandomRange { min: 0, max: 4 };
    assert_eq!(bad.resolve(&mut rng), Err(MatchupError::InvalidTierPolicy));
    let inverted = TierPolicy::RandomRange { min: 5, max: 2 };
    assert_eq!(
        inverted.resolve(&mut rng),
        Err(MatchupError::InvalidTierPolicy)
    );

    let ok = TierPolicy::RandomRange { min: 2, max: 4 };
    for _ in 0..50 {
        let n = ok.resolve(&mut rng).unwrap();
        assert!((2..=4).contains(&n));
    }
}
