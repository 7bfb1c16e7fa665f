//! Club-wide ranking across americanas and entrenos
//!
//! Built on top of per-event standings. Callers pass the rows of every event
//! of each kind, oldest event first; the last entreno row seen for a player
//! decides their ladder position tiebreak.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::standings::StandingRow;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalRow {
    pub id: String,
    pub name: String,
    pub events: u32,
    pub played: u32,
    pub league_points: u32,
    pub wins: u32,
    pub court1_count: u32,
    /// Court of the most recent entreno match
    pub entreno_last_court: Option<u32>,
    pub games_won: u32,
}

pub struct GlobalRanking;

impl GlobalRanking {
    pub fn combine(americana: &[StandingRow], entreno: &[StandingRow]) -> Vec<GlobalRow> {
        let mut rows: Vec<GlobalRow> = Vec::new();
        let mut index: HashMap<&str, usize> = HashMap::new();

        for (row, is_entreno) in americana
            .iter()
            .map(|r| (r, false))
            .chain(entreno.iter().map(|r| (r, true)))
        {
            let slot = *index.entry(row.id.as_str()).or_insert_with(|| {
                rows.push(GlobalRow {
                    id: row.id.clone(),
                    name: row.name.clone(),
                    events: 0,
                    played: 0,
                    league_points: 0,
                    wins: 0,
                    court1_count: 0,
                    entreno_last_court: None,
                    games_won: 0,
                });
                rows.len() - 1
            });

            let global = &mut rows[slot];
            global.events += 1;
            global.played += row.played;
            global.league_points += row.league_points;
            global.wins += row.won;
            global.court1_count += row.court1_count;
            global.games_won += row.points;
            if is_entreno && row.last_match_court.is_some() {
                global.entreno_last_court = row.last_match_court;
            }
        }

        rows.sort_by(|a, b| {
            b.league_points
                .cmp(&a.league_points)
                .then(b.wins.cmp(&a.wins))
                .then(b.court1_count.cmp(&a.court1_count))
                .then(
                    a.entreno_last_court
                        .unwrap_or(u32::MAX)
                        .cmp(&b.entreno_last_court.unwrap_or(u32::MAX)),
                )
                .then(b.games_won.cmp(&a.games_won))
        });
        rows
    }
}

#[cfg(test)]
#[path = "ranking_tests.rs"]
mod ranking_tests;
