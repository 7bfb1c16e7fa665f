//! Match history index
//!
//! The round generator asks the same questions about history for every
//! candidate it scores (have these two partnered before? where did this
//! player last play?), so the answers are precomputed once per round.

use std::collections::HashMap;

use crate::types::Match;

#[derive(Debug, Clone, Default)]
pub struct MatchHistory {
    partners: HashMap<(String, String), u32>,
    opponents: HashMap<(String, String), u32>,
    /// Most recent (round, court) per participant
    last_court: HashMap<String, (u32, u32)>,
    rounds_played: HashMap<String, u32>,
    cumulative_score: HashMap<String, u32>,
}

impl MatchHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_matches(matches: &[Match]) -> Self {
        let mut history = Self::new();
        for m in matches {
            history.record(m);
        }
        history
    }

    /// Add one match. Scheduled matches count as pairings already made;
    /// only played matches add to rounds played and score.
    pub fn record(&mut self, m: &Match) {
        for team in [&m.team_a, &m.team_b] {
            for (i, a) in team.ids.iter().enumerate() {
                for b in &team.ids[i + 1..] {
                    *self.partners.entry(pair_key(a, b)).or_insert(0) += 1;
                }
            }
        }

        for a in &m.team_a.ids {
            for b in &m.team_b.ids {
                *self.opponents.entry(pair_key(a, b)).or_insert(0) += 1;
            }
        }

        let played = m.is_finished() || m.total_score() > 0;
        for (team, own) in [(&m.team_a, m.score_a), (&m.team_b, m.score_b)] {
            for id in &team.ids {
                let entry = self.last_court.entry(id.clone()).or_insert((m.round, m.court));
                if m.round >= entry.0 {
                    *entry = (m.round, m.court);
                }
                if played {
                    *self.rounds_played.entry(id.clone()).or_insert(0) += 1;
                    *self.cumulative_score.entry(id.clone()).or_insert(0) += own;
                }
            }
        }
    }

    pub fn partner_count(&self, a: &str, b: &str) -> u32 {
        self.partners.get(&pair_key(a, b)).copied().unwrap_or(0)
    }

    pub fn opponent_count(&self, a: &str, b: &str) -> u32 {
        self.opponents.get(&pair_key(a, b)).copied().unwrap_or(0)
    }

    pub fn last_court(&self, id: &str) -> Option<u32> {
        self.last_court.get(id).map(|&(_, court)| court)
    }

    pub fn rounds_played(&self, id: &str) -> u32 {
        self.rounds_played.get(id).copied().unwrap_or(0)
    }

    pub fn cumulative_score(&self, id: &str) -> u32 {
        self.cumulative_score.get(id).copied().unwrap_or(0)
    }
}

fn pair_key(a: &str, b: &str) -> (String, String) {
    if a <= b {
        (a.to_string(), b.to_string())
    } else {
        (b.to_string(), a.to_string())
    }
}
