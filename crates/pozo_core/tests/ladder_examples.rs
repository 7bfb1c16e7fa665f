//! Worked examples of a Pozo ladder: fixed pairs, rotating players and an
//! americana standings row.

use pozo_core::{
    EventType, LadderMover, Match, MatchStatus, Pair, Participant, StandingsCalculator, Team,
};

fn finished(court: u32, team_a: Team, team_b: Team, score_a: u32, score_b: u32) -> Match {
    Match {
        round: 1,
        court,
        team_a,
        team_b,
        score_a,
        score_b,
        status: MatchStatus::Finished,
        quality: None,
    }
}

fn players_team(ids: [&str; 2]) -> Team {
    Team {
        pair_id: None,
        ids: ids.iter().map(|s| s.to_string()).collect(),
        names: ids.iter().map(|s| s.to_string()).collect(),
    }
}

fn pair_team(pair: &Pair) -> Team {
    Team {
        pair_id: Some(pair.id.clone()),
        ids: pair.players.iter().map(|p| p.id.clone()).collect(),
        names: pair.players.iter().map(|p| p.name.clone()).collect(),
    }
}

#[test]
fn fixed_pairs_winners_meet_on_court_one() {
    let pair = |id: &str, court: u32| {
        let a = Participant::new(&format!("{id}-1"), &format!("{id} left"));
        let b = Participant::new(&format!("{id}-2"), &format!("{id} right"));
        Pair::new(id, &a, &b, court)
    };
    let pairs = vec![pair("A", 1), pair("B", 1), pair("C", 2), pair("D", 2)];
    let matches = vec![
        finished(1, pair_team(&pairs[0]), pair_team(&pairs[1]), 6, 0),
        finished(2, pair_team(&pairs[2]), pair_team(&pairs[3]), 6, 0),
    ];

    let outcome = LadderMover::new(2).apply_results(&pairs, &matches);

    let on_court = |court: u32| -> Vec<&str> {
        outcome
            .units
            .iter()
            .filter(|p| p.current_court == court)
            .map(|p| p.id.as_str())
            .collect()
    };
    assert_eq!(on_court(1), vec!["A", "C"]);
    assert_eq!(on_court(2), vec!["B", "D"]);
}

#[test]
fn rotating_players_swap_courts_by_result() {
    let players: Vec<Participant> = (1..=8)
        .map(|i| {
            let id = format!("p{i}");
            Participant::new(&id, &id).on_court(if i <= 4 { 1 } else { 2 })
        })
        .collect();
    let matches = vec![
        finished(1, players_team(["p1", "p3"]), players_team(["p2", "p4"]), 6, 4),
        finished(2, players_team(["p5", "p8"]), players_team(["p6", "p7"]), 2, 6),
    ];

    let outcome = LadderMover::new(2).apply_results(&players, &matches);

    let court = |id: &str| {
        outcome
            .units
            .iter()
            .find(|p| p.id == id)
            .map(|p| p.current_court)
            .unwrap()
    };
    for id in ["p1", "p3", "p6", "p7"] {
        assert_eq!(court(id), 1, "{id} won and should be on court 1");
    }
    for id in ["p2", "p4", "p5", "p8"] {
        assert_eq!(court(id), 2, "{id} lost and should be on court 2");
    }
}

#[test]
fn americana_row_adds_up_games() {
    let matches = vec![
        finished(1, players_team(["x", "a"]), players_team(["b", "c"]), 6, 2),
        finished(2, players_team(["b", "d"]), players_team(["x", "c"]), 6, 4),
    ];

    let rows = StandingsCalculator::calculate(&matches, EventType::Americana);

    let x = rows.iter().find(|r| r.id == "x").unwrap();
    assert_eq!(x.played, 2);
    assert_eq!(x.won, 1);
    assert_eq!(x.lost, 1);
    assert_eq!(x.points, 10);
    assert_eq!(x.games_lost, 8);
    assert_eq!(x.diff, 2);
}
