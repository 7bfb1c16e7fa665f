//! Event results storage and reporting

use pozo_core::{level_label, EventConfig, EventType, Match, Movement, StandingRow};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::Result;

/// Complete results of a simulated event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TournamentResults {
    pub name: String,
    pub config: EventConfig,
    /// Seed the run can be reproduced with
    pub seed: u64,
    pub rounds_played: u32,
    pub matches: Vec<Match>,
    pub standings: Vec<StandingRow>,
    /// Ladder after the last round, with each unit's trend
    pub final_ladder: Vec<Movement>,
    /// Levels replayed from every result, highest first
    pub levels: Vec<LevelEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelEntry {
    pub id: String,
    pub level: f64,
    pub matches: u32,
}

impl TournamentResults {
    /// Save results to JSON file
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load results from JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Generate a text report
    pub fn generate_report(&self) -> String {
        let mut report = String::new();
        report.push_str(&format!("=== Event: {} ===\n\n", self.name));
        report.push_str(&format!(
            "Format: {} ({:?} pairs, {} category), {} rounds played, seed {}\n\n",
            self.config.event_type.as_str(),
            self.config.pair_mode,
            self.config.category.as_str(),
            self.rounds_played,
            self.seed
        ));

        report.push_str(&standings_table(&self.standings, self.config.event_type));

        if !self.final_ladder.is_empty() {
            report.push_str("\nFinal ladder:\n");
            report.push_str(&format!("{:<20} {:>5} {:>5}  {}\n", "Unit", "From", "To", "Trend"));
            report.push_str(&"-".repeat(42));
            report.push('\n');
            for m in &self.final_ladder {
                report.push_str(&format!(
                    "{:<20} {:>5} {:>5}  {}\n",
                    m.id,
                    m.from,
                    m.to,
                    m.trend.symbol()
                ));
            }
        }

        if !self.levels.is_empty() {
            report.push_str("\nLevels:\n");
            for entry in &self.levels {
                report.push_str(&format!(
                    "{:<20} {:>5.2}  {:<12} ({} matches)\n",
                    entry.id,
                    entry.level,
                    level_label(entry.level),
                    entry.matches
                ));
            }
        }

        report
    }

    /// Print report to stdout
    pub fn print_report(&self) {
        println!("{}", self.generate_report());
    }
}

/// Standings as a fixed-width table. Ladder events show court columns.
pub fn standings_table(rows: &[StandingRow], event_type: EventType) -> String {
    let mut table = String::new();
    let ladder = event_type != EventType::Americana;

    table.push_str(&format!(
        "{:>3} {:<20} {:>3} {:>3} {:>3} {:>3} {:>5} {:>5} {:>5} {:>4}",
        "#", "Player", "PJ", "W", "D", "L", "Games", "Lost", "Diff", "Pts"
    ));
    if ladder {
        table.push_str(&format!(" {:>4} {:>5}", "C1", "Last"));
    }
    table.push('\n');
    table.push_str(&"-".repeat(if ladder { 72 } else { 61 }));
    table.push('\n');

    for (i, row) in rows.iter().enumerate() {
        table.push_str(&format!(
            "{:>3} {:<20} {:>3} {:>3} {:>3} {:>3} {:>5} {:>5} {:>+5} {:>4}",
            i + 1,
            row.name,
            row.played,
            row.won,
            row.draw,
            row.lost,
            row.points,
            row.games_lost,
            row.diff,
            row.league_points
        ));
        if ladder {
            let last = row
                .last_match_court
                .map_or_else(|| "-".to_string(), |c| c.to_string());
            table.push_str(&format!(" {:>4} {:>5}", row.court1_count, last));
        }
        table.push('\n');
    }

    table
}

#[cfg(test)]
#[path = "results_tests.rs"]
mod results_tests;
