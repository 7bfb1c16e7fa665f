//! Ladder movement between rounds
//!
//! Winners climb one court, losers drop one, ties and idle units stay put.
//! Targets alone can overfill a court (two winners from courts 1 and 2 both
//! aim at court 1), so every update ends with a resort that refills courts
//! in order.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::gender::{BalanceReport, GenderBalancer};
use crate::types::{Category, Gender, Match, Pair, Participant, Side, Trend};

/// Result of a unit in the last round
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Won,
    Lost,
    /// Finished with level scores
    Neutral,
    /// Did not play
    Idle,
}

impl Outcome {
    /// Resort rank within a target court. Lower sorts first.
    pub fn rank(self) -> u8 {
        match self {
            Outcome::Won | Outcome::Neutral => 0,
            Outcome::Idle => 1,
            Outcome::Lost => 2,
        }
    }
}

/// Anything the ladder can move: a rotating participant or a fixed pair.
pub trait LadderUnit: Clone {
    fn id(&self) -> &str;
    fn current_court(&self) -> u32;
    fn set_current_court(&mut self, court: u32);
    fn initial_court(&self) -> u32;
    fn games_won(&self) -> u32;
    fn gender(&self) -> Option<Gender>;

    /// Units of this kind sharing one court.
    fn per_court() -> usize;

    /// Which side of the match this unit played on, if any.
    fn side_in(&self, m: &Match) -> Option<Side>;

    /// Add one finished match to the running tallies.
    fn record_result(&mut self, own: u32, other: u32, outcome: Outcome);
}

impl LadderUnit for Participant {
    fn id(&self) -> &str {
        &self.id
    }

    fn current_court(&self) -> u32 {
        self.current_court
    }

    fn set_current_court(&mut self, court: u32) {
        self.current_court = court;
    }

    fn initial_court(&self) -> u32 {
        self.initial_court
    }

    fn games_won(&self) -> u32 {
        self.games_won
    }

    fn gender(&self) -> Option<Gender> {
        self.gender
    }

    fn per_court() -> usize {
        4
    }

    fn side_in(&self, m: &Match) -> Option<Side> {
        [Side::A, Side::B]
            .into_iter()
            .find(|&side| m.team(side).contains(&self.id))
    }

    fn record_result(&mut self, own: u32, other: u32, outcome: Outcome) {
        self.games_won += own;
        self.games_lost += other;
        match outcome {
            Outcome::Won => self.wins += 1,
            Outcome::Lost => self.losses += 1,
            Outcome::Neutral | Outcome::Idle => {}
        }
    }
}

impl LadderUnit for Pair {
    fn id(&self) -> &str {
        &self.id
    }

    fn current_court(&self) -> u32 {
        self.current_court
    }

    fn set_current_court(&mut self, court: u32) {
        self.current_court = court;
    }

    fn initial_court(&self) -> u32 {
        self.initial_court
    }

    fn games_won(&self) -> u32 {
        self.games_won
    }

    fn gender(&self) -> Option<Gender> {
        None
    }

    fn per_court() -> usize {
        2
    }

    /// Matched by `pair_id`, or by both member ids for records without one.
    fn side_in(&self, m: &Match) -> Option<Side> {
        let sides = [Side::A, Side::B];
        sides
            .into_iter()
            .find(|&side| m.team(side).pair_id.as_deref() == Some(self.id.as_str()))
            .or_else(|| {
                sides.into_iter().find(|&side| {
                    let team = m.team(side);
                    self.players.iter().all(|p| team.contains(&p.id))
                })
            })
    }

    fn record_result(&mut self, own: u32, other: u32, outcome: Outcome) {
        self.games_won += own;
        self.games_lost += other;
        match outcome {
            Outcome::Won => self.wins += 1,
            Outcome::Lost => self.losses += 1,
            Outcome::Neutral | Outcome::Idle => {}
        }
    }
}

/// Where one unit went.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movement {
    pub id: String,
    pub from: u32,
    pub to: u32,
    pub outcome: Outcome,
    /// Direction relative to the unit's starting court
    pub trend: Trend,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LadderOutcome<U> {
    /// Updated units in ladder order (court 1 first)
    pub units: Vec<U>,
    /// One entry per unit, same order as `units`
    pub movements: Vec<Movement>,
    /// Present when gender balancing ran
    pub balance: Option<BalanceReport>,
}

#[derive(Debug, Clone, Copy)]
pub struct LadderMover {
    max_courts: u32,
    balance_genders: bool,
}

impl LadderMover {
    pub fn new(max_courts: u32) -> Self {
        Self {
            max_courts: max_courts.max(1),
            balance_genders: false,
        }
    }

    /// Mover for a category; mixed events rebalance genders after the resort.
    pub fn for_category(max_courts: u32, category: Category) -> Self {
        Self {
            balance_genders: category == Category::Mixed,
            ..Self::new(max_courts)
        }
    }

    /// Apply finished results to a snapshot of units. The input is left
    /// untouched; the returned units carry new courts and tallies.
    pub fn apply_results<U: LadderUnit>(&self, units: &[U], matches: &[Match]) -> LadderOutcome<U> {
        let mut updated = units.to_vec();
        let mut outcomes = vec![Outcome::Idle; updated.len()];
        let mut targets: Vec<u32> = updated
            .iter()
            .map(|u| u.current_court().clamp(1, self.max_courts))
            .collect();

        for m in matches.iter().filter(|m| m.is_finished()) {
            let winner = m.winner();
            let mut seen = 0;

            for (i, unit) in updated.iter_mut().enumerate() {
                let Some(side) = unit.side_in(m) else {
                    continue;
                };
                seen += 1;

                let (own, other) = m.scores_for(side);
                let outcome = match winner {
                    None => Outcome::Neutral,
                    Some(w) if w == side => Outcome::Won,
                    Some(_) => Outcome::Lost,
                };
                unit.record_result(own, other, outcome);

                targets[i] = match outcome {
                    Outcome::Won => targets[i].saturating_sub(1).max(1),
                    Outcome::Lost => (targets[i] + 1).min(self.max_courts),
                    Outcome::Neutral | Outcome::Idle => targets[i],
                };
                outcomes[i] = outcome;
            }

            if seen < U::per_court() {
                warn!(
                    round = m.round,
                    court = m.court,
                    found = seen,
                    expected = U::per_court(),
                    "match references units outside this ladder"
                );
            }
        }

        let mut order: Vec<usize> = (0..updated.len()).collect();
        order.sort_by(|&a, &b| {
            targets[a]
                .cmp(&targets[b])
                .then(outcomes[a].rank().cmp(&outcomes[b].rank()))
                .then(updated[b].games_won().cmp(&updated[a].games_won()))
        });

        let mut ladder: Vec<(U, Outcome, u32)> = order
            .into_iter()
            .map(|i| (updated[i].clone(), outcomes[i], units[i].current_court()))
            .collect();

        let balance = self
            .balance_genders
            .then(|| {
                GenderBalancer::new()
                    .with_courts(self.max_courts)
                    .balance_by(&mut ladder, |e| e.0.gender(), |e| e.0.id())
            });

        let per_court = U::per_court();
        let mut movements = Vec::with_capacity(ladder.len());
        let mut units_out = Vec::with_capacity(ladder.len());
        for (slot, (mut unit, outcome, from)) in ladder.into_iter().enumerate() {
            let to = ((slot / per_court) as u32 + 1).min(self.max_courts);
            unit.set_current_court(to);
            debug!(id = unit.id(), from, to, ?outcome, "ladder move");
            movements.push(Movement {
                id: unit.id().to_string(),
                from,
                to,
                outcome,
                trend: Trend::between(to, unit.initial_court()),
            });
            units_out.push(unit);
        }

        info!(
            units = units_out.len(),
            moved = movements.iter().filter(|m| m.from != m.to).count(),
            "ladder updated"
        );

        LadderOutcome {
            units: units_out,
            movements,
            balance,
        }
    }
}

#[cfg(test)]
#[path = "ladder_tests.rs"]
mod ladder_tests;
