//! Level adjustment from match results
//!
//! Small, bounded steps per match: a fixed step for the result, a nudge for
//! the score margin, and a larger step when the result goes against the
//! level gap (beating a stronger team, losing to a weaker one).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::level::{clamp_level, LevelResolver};
use crate::types::{Match, Participant, Team};

/// Step for winning (or losing) a match
pub const RESULT_STEP: f64 = 0.012;

/// Weight of the share of games won, centred on an even split
pub const MARGIN_WEIGHT: f64 = 0.01;

/// Weight of the level gap when the result is an upset
pub const UPSET_WEIGHT: f64 = 0.02;

/// Step for the expected result (beating a weaker team, losing to a stronger one)
pub const EXPECTED_STEP: f64 = 0.004;

/// Level change for one side of a finished match. Level scores give 0.
pub fn side_delta(own_level: f64, rival_level: f64, own: u32, other: u32) -> f64 {
    let total = own + other;
    if total == 0 || own == other {
        return 0.0;
    }

    let won = own > other;
    let share = own as f64 / total as f64;
    let performance = if won { RESULT_STEP } else { -RESULT_STEP } + (share - 0.5) * MARGIN_WEIGHT;

    let gap = rival_level - own_level;
    let difficulty = if won {
        if gap > 0.0 {
            gap * UPSET_WEIGHT
        } else {
            EXPECTED_STEP
        }
    } else if gap < 0.0 {
        gap * UPSET_WEIGHT
    } else {
        -EXPECTED_STEP
    };

    round_to(performance + difficulty, 3)
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Deltas applied to each member of the two sides.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelDeltas {
    pub team_a: f64,
    pub team_b: f64,
}

/// Running numeric levels per participant id
#[derive(Debug, Clone, Default)]
pub struct LevelAdjuster {
    levels: HashMap<String, f64>,
    matches_counted: HashMap<String, u32>,
    resolver: LevelResolver,
}

impl LevelAdjuster {
    pub fn new(resolver: LevelResolver) -> Self {
        Self {
            levels: HashMap::new(),
            matches_counted: HashMap::new(),
            resolver,
        }
    }

    /// Seed levels from the roster's declared levels.
    pub fn from_participants(participants: &[Participant], resolver: LevelResolver) -> Self {
        let mut adjuster = Self::new(resolver);
        for p in participants {
            adjuster
                .levels
                .insert(p.id.clone(), resolver.resolve(p.level.as_ref()));
        }
        adjuster
    }

    /// Rebuild levels from scratch by replaying matches in round order.
    pub fn replay(participants: &[Participant], matches: &[Match], resolver: LevelResolver) -> Self {
        let mut adjuster = Self::from_participants(participants, resolver);
        let mut ordered: Vec<&Match> = matches.iter().collect();
        ordered.sort_by_key(|m| (m.round, m.court));
        for m in ordered {
            adjuster.process_match(m);
        }
        adjuster
    }

    pub fn level(&self, id: &str) -> f64 {
        self.levels
            .get(id)
            .copied()
            .unwrap_or(self.resolver.default_level())
    }

    pub fn matches_counted(&self, id: &str) -> u32 {
        self.matches_counted.get(id).copied().unwrap_or(0)
    }

    fn team_level(&self, team: &Team) -> f64 {
        if team.ids.is_empty() {
            return self.resolver.default_level();
        }
        team.ids.iter().map(|id| self.level(id)).sum::<f64>() / team.ids.len() as f64
    }

    /// Apply one match. Returns `None` for unfinished or 0-0 matches.
    pub fn process_match(&mut self, m: &Match) -> Option<LevelDeltas> {
        if !m.is_finished() || m.total_score() == 0 {
            return None;
        }

        let level_a = self.team_level(&m.team_a);
        let level_b = self.team_level(&m.team_b);
        let deltas = LevelDeltas {
            team_a: side_delta(level_a, level_b, m.score_a, m.score_b),
            team_b: side_delta(level_b, level_a, m.score_b, m.score_a),
        };

        for (team, delta) in [(&m.team_a, deltas.team_a), (&m.team_b, deltas.team_b)] {
            for id in &team.ids {
                let current = self.level(id);
                let updated = round_to(clamp_level(current + delta), 2);
                self.levels.insert(id.clone(), updated);
                *self.matches_counted.entry(id.clone()).or_insert(0) += 1;
            }
        }

        debug!(
            round = m.round,
            court = m.court,
            delta_a = deltas.team_a,
            delta_b = deltas.team_b,
            "levels adjusted"
        );
        Some(deltas)
    }

    /// (id, level, matches counted), highest level first
    pub fn leaderboard(&self) -> Vec<(String, f64, u32)> {
        let mut entries: Vec<_> = self
            .levels
            .iter()
            .map(|(id, &level)| (id.clone(), level, self.matches_counted(id)))
            .collect();
        entries.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        entries
    }
}

#[cfg(test)]
#[path = "level_adjust_tests.rs"]
mod level_adjust_tests;
