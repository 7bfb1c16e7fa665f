use super::*;
use crate::level::MAX_LEVEL;
use crate::types::MatchStatus;

fn result(round: u32, a: [&str; 2], b: [&str; 2], score_a: u32, score_b: u32) -> Match {
    let team = |ids: [&str; 2]| Team {
        pair_id: None,
        ids: ids.iter().map(|s| s.to_string()).collect(),
        names: Vec::new(),
    };
    Match {
        round,
        court: 1,
        team_a: team(a),
        team_b: team(b),
        score_a,
        score_b,
        status: MatchStatus::Finished,
        quality: None,
    }
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn even_match_moves_both_sides_symmetrically() {
    assert!(close(side_delta(3.5, 3.5, 6, 4), 0.017));
    assert!(close(side_delta(3.5, 3.5, 4, 6), -0.017));
}

#[test]
fn upsets_move_further_than_expected_results() {
    let upset = side_delta(3.0, 4.0, 6, 4);
    let expected = side_delta(4.0, 3.0, 6, 4);
    assert!(close(upset, 0.033));
    assert!(close(expected, 0.017));

    assert!(close(side_delta(4.0, 3.0, 4, 6), -0.033));
}

#[test]
fn level_scores_leave_levels_alone() {
    assert_eq!(side_delta(3.0, 4.0, 5, 5), 0.0);
    assert_eq!(side_delta(3.0, 4.0, 0, 0), 0.0);
}

#[test]
fn process_match_updates_every_member() {
    let players: Vec<Participant> = ["a", "b", "c", "d"]
        .iter()
        .map(|id| Participant::new(id, id).with_level(3.5))
        .collect();
    let mut adjuster = LevelAdjuster::from_participants(&players, LevelResolver::default());

    let deltas = adjuster
        .process_match(&result(1, ["a", "b"], ["c", "d"], 6, 4))
        .unwrap();

    assert!(close(deltas.team_a, 0.017));
    assert!(close(adjuster.level("a"), 3.52));
    assert!(close(adjuster.level("b"), 3.52));
    assert!(close(adjuster.level("c"), 3.48));
    assert_eq!(adjuster.matches_counted("d"), 1);
}

#[test]
fn unfinished_and_empty_matches_are_skipped() {
    let mut adjuster = LevelAdjuster::new(LevelResolver::default());

    let mut pending = result(1, ["a", "b"], ["c", "d"], 6, 4);
    pending.status = MatchStatus::Scheduled;
    assert!(adjuster.process_match(&pending).is_none());
    assert!(adjuster.process_match(&result(1, ["a", "b"], ["c", "d"], 0, 0)).is_none());
    assert_eq!(adjuster.matches_counted("a"), 0);
}

#[test]
fn levels_stay_on_the_scale() {
    let players = vec![
        Participant::new("top", "top").with_level(MAX_LEVEL),
        Participant::new("mate", "mate").with_level(MAX_LEVEL),
        Participant::new("c", "c").with_level(1.0),
        Participant::new("d", "d").with_level(1.0),
    ];
    let mut adjuster = LevelAdjuster::from_participants(&players, LevelResolver::default());

    adjuster.process_match(&result(1, ["top", "mate"], ["c", "d"], 6, 0));

    assert_eq!(adjuster.level("top"), MAX_LEVEL);
}

#[test]
fn replay_processes_rounds_in_order() {
    let players: Vec<Participant> = ["a", "b", "c", "d"]
        .iter()
        .map(|id| Participant::new(id, id))
        .collect();
    let matches = vec![
        result(2, ["a", "c"], ["b", "d"], 6, 4),
        result(1, ["a", "b"], ["c", "d"], 6, 4),
    ];

    let replayed = LevelAdjuster::replay(&players, &matches, LevelResolver::default());

    let mut manual = LevelAdjuster::from_participants(&players, LevelResolver::default());
    manual.process_match(&matches[1]);
    manual.process_match(&matches[0]);
    for id in ["a", "b", "c", "d"] {
        assert_eq!(replayed.level(id), manual.level(id), "{id}");
    }

    let board = replayed.leaderboard();
    assert_eq!(board[0].0, "a");
    assert_eq!(board[0].2, 2);
}
