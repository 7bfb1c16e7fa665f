//! Event standings
//!
//! Rows are keyed by participant id. Records without ids (older imports)
//! fall back to display names, so the same person must be spelled the same
//! way across matches in that case.

use std::cmp::Ordering;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::types::{EventType, Match, Team};

pub const POINTS_FOR_WIN: u32 = 3;
pub const POINTS_FOR_DRAW: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandingRow {
    pub id: String,
    pub name: String,
    pub played: u32,
    pub won: u32,
    pub lost: u32,
    pub draw: u32,
    /// Games won
    pub points: u32,
    pub games_lost: u32,
    pub diff: i64,
    pub league_points: u32,
    pub court1_count: u32,
    pub best_court: Option<u32>,
    pub last_match_court: Option<u32>,
    pub last_match_round: u32,
}

impl StandingRow {
    fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            played: 0,
            won: 0,
            lost: 0,
            draw: 0,
            points: 0,
            games_lost: 0,
            diff: 0,
            league_points: 0,
            court1_count: 0,
            best_court: None,
            last_match_court: None,
            last_match_round: 0,
        }
    }

    fn record(&mut self, m: &Match, own: u32, other: u32) {
        self.played += 1;
        self.points += own;
        self.games_lost += other;
        self.diff += own as i64 - other as i64;

        match own.cmp(&other) {
            Ordering::Greater => {
                self.won += 1;
                self.league_points += POINTS_FOR_WIN;
            }
            Ordering::Less => self.lost += 1,
            Ordering::Equal => {
                self.draw += 1;
                self.league_points += POINTS_FOR_DRAW;
            }
        }

        if m.court == 1 {
            self.court1_count += 1;
        }
        self.best_court = Some(self.best_court.map_or(m.court, |c| c.min(m.court)));
        if self.last_match_court.is_none() || m.round >= self.last_match_round {
            self.last_match_round = m.round;
            self.last_match_court = Some(m.court);
        }
    }
}

/// Whether a match counts towards standings: finished, or already carrying
/// a partial score.
pub fn counts_for_standings(m: &Match) -> bool {
    m.is_finished() || m.total_score() > 0
}

pub struct StandingsCalculator;

impl StandingsCalculator {
    pub fn calculate(matches: &[Match], event_type: EventType) -> Vec<StandingRow> {
        let mut rows: Vec<StandingRow> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for m in matches.iter().filter(|m| counts_for_standings(m)) {
            for (team, own, other) in [
                (&m.team_a, m.score_a, m.score_b),
                (&m.team_b, m.score_b, m.score_a),
            ] {
                for (key, name) in team_members(team) {
                    let slot = *index.entry(key.clone()).or_insert_with(|| {
                        rows.push(StandingRow::new(&key, &name));
                        rows.len() - 1
                    });
                    rows[slot].record(m, own, other);
                }
            }
        }

        // Stable sort keeps first-appearance order for full ties.
        rows.sort_by(|a, b| compare(a, b, event_type));
        debug!(rows = rows.len(), event_type = event_type.as_str(), "standings calculated");
        rows
    }
}

fn compare(a: &StandingRow, b: &StandingRow, event_type: EventType) -> Ordering {
    match event_type {
        EventType::Americana => b
            .points
            .cmp(&a.points)
            .then(b.won.cmp(&a.won))
            .then(b.diff.cmp(&a.diff)),
        EventType::Entreno | EventType::Pozo => b
            .won
            .cmp(&a.won)
            .then(b.court1_count.cmp(&a.court1_count))
            .then(court_rank(a.last_match_court).cmp(&court_rank(b.last_match_court)))
            .then(b.points.cmp(&a.points)),
    }
}

/// Lower courts rank higher; never having played sorts last.
fn court_rank(court: Option<u32>) -> u32 {
    court.unwrap_or(u32::MAX)
}

/// (key, display name) per member of a team. Ids win; names fill in for
/// records that have none. A combined "A / B" name is split into members.
fn team_members(team: &Team) -> Vec<(String, String)> {
    let names: Vec<String> = match team.names.as_slice() {
        [single] if team.ids.len() != 1 && single.contains(" / ") => {
            single.split(" / ").map(|s| s.trim().to_string()).collect()
        }
        names => names.to_vec(),
    };

    let count = team.ids.len().max(names.len());
    (0..count)
        .filter_map(|k| {
            let id = team.ids.get(k).filter(|id| !id.is_empty());
            let name = names.get(k).filter(|n| !n.is_empty());
            match (id, name) {
                (Some(id), Some(name)) => Some((id.clone(), name.clone())),
                (Some(id), None) => Some((id.clone(), id.clone())),
                (None, Some(name)) => Some((name.clone(), name.clone())),
                (None, None) => None,
            }
        })
        .collect()
}

#[cfg(test)]
#[path = "standings_tests.rs"]
mod standings_tests;
