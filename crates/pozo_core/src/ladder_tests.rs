use super::*;
use crate::types::{MatchStatus, Team};

fn pair(id: &str, court: u32) -> Pair {
    let a = Participant::new(&format!("{id}1"), &format!("{id} one"));
    let b = Participant::new(&format!("{id}2"), &format!("{id} two"));
    Pair::new(id, &a, &b, court)
}

fn pair_match(round: u32, court: u32, a: &Pair, b: &Pair, score_a: u32, score_b: u32) -> Match {
    let team = |p: &Pair| Team {
        pair_id: Some(p.id.clone()),
        ids: p.players.iter().map(|m| m.id.clone()).collect(),
        names: p.players.iter().map(|m| m.name.clone()).collect(),
    };
    Match {
        round,
        court,
        team_a: team(a),
        team_b: team(b),
        score_a,
        score_b,
        status: MatchStatus::Finished,
        quality: None,
    }
}

fn player_match(court: u32, a: [&str; 2], b: [&str; 2], score_a: u32, score_b: u32) -> Match {
    let team = |ids: [&str; 2]| Team {
        pair_id: None,
        ids: ids.iter().map(|s| s.to_string()).collect(),
        names: Vec::new(),
    };
    Match {
        round: 1,
        court,
        team_a: team(a),
        team_b: team(b),
        score_a,
        score_b,
        status: MatchStatus::Finished,
        quality: None,
    }
}

fn court_of<U: LadderUnit>(units: &[U], id: &str) -> u32 {
    units
        .iter()
        .find(|u| u.id() == id)
        .map(|u| u.current_court())
        .unwrap()
}

#[test]
fn fixed_pairs_climb_and_drop_one_court() {
    let (a, b, c, d) = (pair("A", 1), pair("B", 1), pair("C", 2), pair("D", 2));
    let matches = vec![
        pair_match(1, 1, &a, &b, 6, 0),
        pair_match(1, 2, &c, &d, 6, 0),
    ];
    let pairs = vec![a, b, c, d];

    let outcome = LadderMover::new(2).apply_results(&pairs, &matches);

    let ids: Vec<&str> = outcome.units.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["A", "C", "B", "D"]);
    assert_eq!(court_of(&outcome.units, "A"), 1);
    assert_eq!(court_of(&outcome.units, "C"), 1);
    assert_eq!(court_of(&outcome.units, "B"), 2);
    assert_eq!(court_of(&outcome.units, "D"), 2);

    let a = &outcome.units[0];
    assert_eq!((a.wins, a.losses, a.games_won, a.games_lost), (1, 0, 6, 0));
    let b = &outcome.units[2];
    assert_eq!((b.wins, b.losses, b.games_won, b.games_lost), (0, 1, 0, 6));
}

#[test]
fn inputs_are_left_untouched() {
    let (a, b) = (pair("A", 1), pair("B", 1));
    let matches = vec![pair_match(1, 1, &a, &b, 6, 2)];
    let pairs = vec![a, b];
    let before = pairs.clone();

    LadderMover::new(1).apply_results(&pairs, &matches);

    assert_eq!(pairs, before);
}

#[test]
fn tie_keeps_both_pairs_in_place() {
    let (a, b, c, d) = (pair("A", 1), pair("B", 1), pair("C", 2), pair("D", 2));
    let matches = vec![
        pair_match(1, 1, &a, &b, 5, 5),
        pair_match(1, 2, &c, &d, 3, 3),
    ];
    let pairs = vec![a, b, c, d];

    let outcome = LadderMover::new(2).apply_results(&pairs, &matches);

    for m in &outcome.movements {
        assert_eq!(m.outcome, Outcome::Neutral);
        assert_eq!(m.from, m.to);
    }
    assert!(outcome.units.iter().all(|p| p.wins == 0 && p.losses == 0));
    assert_eq!(outcome.units[0].games_won, 5);
}

#[test]
fn scheduled_matches_are_ignored() {
    let (a, b, c, d) = (pair("A", 1), pair("B", 1), pair("C", 2), pair("D", 2));
    let mut m = pair_match(1, 2, &c, &d, 6, 1);
    m.status = MatchStatus::Scheduled;
    let pairs = vec![a, b, c, d];

    let outcome = LadderMover::new(3).apply_results(&pairs, &[m]);

    assert!(outcome.movements.iter().all(|m| m.outcome == Outcome::Idle && m.from == m.to));
    assert!(outcome.units.iter().all(|p| p.games_won == 0));
}

#[test]
fn pairs_are_found_by_members_without_pair_id() {
    let (a, b) = (pair("A", 2), pair("B", 2));
    let mut m = pair_match(1, 2, &a, &b, 2, 6);
    m.team_a.pair_id = None;
    m.team_b.pair_id = None;
    let pairs = vec![a, b];

    let outcome = LadderMover::new(2).apply_results(&pairs, &[m]);

    assert_eq!(outcome.units[0].id, "B");
    assert_eq!(outcome.movements[0].outcome, Outcome::Won);
    assert_eq!(outcome.units[0].current_court, 1);
    assert_eq!(outcome.units[1].current_court, 2);
}

#[test]
fn courts_stay_within_bounds() {
    let (a, b) = (pair("A", 1), pair("B", 1));
    let (c, d) = (pair("C", 3), pair("D", 3));
    let matches = vec![
        pair_match(1, 1, &a, &b, 6, 4),
        pair_match(1, 3, &c, &d, 6, 4),
    ];
    let pairs = vec![a, b, c, d];

    let outcome = LadderMover::new(3).apply_results(&pairs, &matches);

    assert!(outcome
        .units
        .iter()
        .all(|p| (1..=3).contains(&p.current_court)));
}

#[test]
fn idle_units_sort_between_winners_and_losers() {
    let (a, b, c) = (pair("A", 1), pair("B", 1), pair("C", 1));
    let matches = vec![pair_match(1, 1, &a, &b, 6, 3)];
    let pairs = vec![a, b, c];

    let outcome = LadderMover::new(2).apply_results(&pairs, &matches);

    let order: Vec<(&str, Outcome)> = outcome
        .units
        .iter()
        .zip(&outcome.movements)
        .map(|(p, m)| (p.id.as_str(), m.outcome))
        .collect();
    assert_eq!(
        order,
        vec![("A", Outcome::Won), ("C", Outcome::Idle), ("B", Outcome::Lost)]
    );
    assert_eq!(court_of(&outcome.units, "B"), 2);
}

#[test]
fn trend_compares_against_starting_court() {
    let (a, b, c, d) = (pair("A", 1), pair("B", 1), pair("C", 2), pair("D", 2));
    let matches = vec![
        pair_match(1, 1, &a, &b, 6, 0),
        pair_match(1, 2, &c, &d, 6, 0),
    ];
    let pairs = vec![a, b, c, d];

    let outcome = LadderMover::new(2).apply_results(&pairs, &matches);

    let trend = |id: &str| outcome.movements.iter().find(|m| m.id == id).unwrap().trend;
    assert_eq!(trend("A"), Trend::Unchanged);
    assert_eq!(trend("C"), Trend::Promoted);
    assert_eq!(trend("B"), Trend::Relegated);
    assert_eq!(trend("D"), Trend::Unchanged);
}

#[test]
fn rotating_players_move_individually() {
    let players: Vec<Participant> = (1..=8)
        .map(|i| {
            let id = format!("p{i}");
            Participant::new(&id, &id).on_court(if i <= 4 { 1 } else { 2 })
        })
        .collect();
    let matches = vec![
        player_match(1, ["p1", "p2"], ["p3", "p4"], 6, 2),
        player_match(2, ["p5", "p6"], ["p7", "p8"], 6, 3),
    ];

    let outcome = LadderMover::new(2).apply_results(&players, &matches);

    for id in ["p1", "p2", "p5", "p6"] {
        assert_eq!(court_of(&outcome.units, id), 1, "{id}");
    }
    for id in ["p3", "p4", "p7", "p8"] {
        assert_eq!(court_of(&outcome.units, id), 2, "{id}");
    }
    assert!(outcome.balance.is_none());
}

#[test]
fn mixed_ladder_is_rebalanced_after_movement() {
    let genders = [
        Gender::Male,
        Gender::Female,
        Gender::Male,
        Gender::Female,
        Gender::Male,
        Gender::Female,
        Gender::Male,
        Gender::Female,
    ];
    let players: Vec<Participant> = genders
        .iter()
        .enumerate()
        .map(|(i, &g)| {
            let id = format!("p{}", i + 1);
            Participant::new(&id, &id)
                .with_gender(g)
                .on_court(if i < 4 { 1 } else { 2 })
        })
        .collect();
    // Both court-2 winners are men, so a plain resort puts three men on court 1.
    let matches = vec![
        player_match(1, ["p1", "p2"], ["p3", "p4"], 6, 2),
        player_match(2, ["p5", "p7"], ["p6", "p8"], 6, 3),
    ];

    let outcome = LadderMover::for_category(2, Category::Mixed).apply_results(&players, &matches);

    let report = outcome.balance.as_ref().unwrap();
    assert!(report.is_balanced());
    assert_eq!(report.swaps.len(), 1);
    for court in 1..=2 {
        let males = outcome
            .units
            .iter()
            .filter(|p| p.current_court == court && p.gender == Some(Gender::Male))
            .count();
        assert_eq!(males, 2, "court {court}");
    }
}

#[test]
fn mixed_overflow_is_not_reported_as_an_extra_court() {
    let players: Vec<Participant> = (0..10)
        .map(|i| {
            let id = format!("p{i}");
            let gender = if i % 2 == 0 { Gender::Male } else { Gender::Female };
            Participant::new(&id, &id)
                .with_gender(gender)
                .on_court(if i < 4 { 1 } else { 2 })
        })
        .collect();

    let outcome = LadderMover::for_category(2, Category::Mixed).apply_results(&players, &[]);

    let report = outcome.balance.as_ref().unwrap();
    assert!(report.is_balanced(), "{report:?}");
    assert!(outcome.units.iter().all(|p| p.current_court <= 2));
}
