//! Round generation
//!
//! One generator serves both pair modes. Units are first reduced to playing
//! slots (a fixed pair, or a single player when partners rotate), excess slots
//! are rested, and the rest are bucketed into courts. Every bucket of four
//! players is scored over its possible 2-vs-2 splits (man+woman teams only
//! on a mixed court with two of each); with open seeding several whole-round
//! shuffles are scored and the cheapest one wins.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::GeneratorConfig;
use crate::error::{EngineError, Result};
use crate::history::MatchHistory;
use crate::level::LevelResolver;
use crate::types::{
    Category, EventType, Gender, Match, MatchQuality, MatchStatus, Pair, Participant, Team,
};

/// Minimum number of players needed for a single match
pub const PLAYERS_PER_MATCH: usize = 4;

/// The three distinct ways to split four players into two teams.
const SPLITS: [([usize; 2], [usize; 2]); 3] = [([0, 1], [2, 3]), ([0, 2], [1, 3]), ([0, 3], [1, 2])];

/// Units taking part in a round, tagged by pair mode.
#[derive(Debug, Clone, Copy)]
pub enum Units<'a> {
    Fixed(&'a [Pair]),
    Rotating(&'a [Participant]),
}

impl Units<'_> {
    /// Units sharing a court: two pairs, or four individual players.
    pub fn units_per_court(&self) -> usize {
        match self {
            Units::Fixed(_) => 2,
            Units::Rotating(_) => 4,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Units::Fixed(pairs) => pairs.len(),
            Units::Rotating(players) => players.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// How playing units are grouped onto courts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Seeding {
    /// Group by current ladder court (Pozo, entrenos)
    #[default]
    Ladder,
    /// Sample random whole-round groupings (americanas)
    Open,
}

impl Seeding {
    pub fn for_event(event_type: EventType) -> Self {
        match event_type {
            EventType::Americana => Seeding::Open,
            EventType::Entreno | EventType::Pozo => Seeding::Ladder,
        }
    }
}

/// A proposed round. Nothing here is committed until the caller persists it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Round {
    pub round: u32,
    pub matches: Vec<Match>,
    /// Ids of units sitting this round out (pair ids in fixed mode)
    pub resting: Vec<String>,
    /// Total cost of the chosen lineup, without jitter
    pub cost: f64,
}

#[derive(Debug)]
struct Member<'a> {
    id: &'a str,
    name: &'a str,
    level: f64,
    gender: Option<Gender>,
}

#[derive(Debug)]
struct Slot<'a> {
    id: &'a str,
    pair_id: Option<&'a str>,
    members: Vec<Member<'a>>,
    court: u32,
    order: usize,
}

struct Lineup<'s, 'a> {
    court: u32,
    team_a: Vec<&'s Slot<'a>>,
    team_b: Vec<&'s Slot<'a>>,
    cost: f64,
}

/// Generates balanced rounds
#[derive(Debug, Clone)]
pub struct RoundGenerator {
    config: GeneratorConfig,
    category: Category,
    seeding: Seeding,
    resolver: LevelResolver,
}

impl RoundGenerator {
    pub fn new(config: GeneratorConfig, category: Category, seeding: Seeding) -> Self {
        let resolver = LevelResolver::new(config.default_level);
        Self {
            config,
            category,
            seeding,
            resolver,
        }
    }

    /// Generate one round.
    ///
    /// `history` should hold every earlier match of the event (and none of
    /// this round's, when regenerating). Units that cannot fit on
    /// `court_count` courts, or that would leave a court short, rest.
    pub fn generate_round<R: Rng + ?Sized>(
        &self,
        units: Units<'_>,
        history: &MatchHistory,
        court_count: u32,
        round: u32,
        rng: &mut R,
    ) -> Result<Round> {
        let per_court = units.units_per_court();
        let slots = self.slots(units);
        let players: usize = slots.iter().map(|s| s.members.len()).sum();

        if slots.len() < per_court {
            return Err(EngineError::NotEnoughParticipants {
                found: players,
                required: PLAYERS_PER_MATCH,
            });
        }
        if court_count == 0 {
            return Err(EngineError::NoCourts);
        }

        let capacity = court_count as usize * per_court;
        let playing_count = capacity.min(slots.len() / per_court * per_court);

        // Fewest rounds played first, then highest score, then ladder order.
        let mut by_priority: Vec<&Slot> = slots.iter().collect();
        by_priority.sort_by_key(|s| {
            let lead = s.members[0].id;
            (
                history.rounds_played(lead),
                std::cmp::Reverse(history.cumulative_score(lead)),
                s.court,
                s.order,
            )
        });
        let resting: Vec<String> = by_priority[playing_count..]
            .iter()
            .map(|s| s.id.to_string())
            .collect();
        let mut playing: Vec<&Slot> = by_priority[..playing_count].to_vec();
        playing.sort_by_key(|s| (s.court, s.order));

        let fixed = matches!(units, Units::Fixed(_));
        let mut best: Option<(Vec<Lineup>, f64)> = None;

        match self.seeding {
            Seeding::Ladder => {
                best = Some(self.plan(&playing, per_court, fixed, history, rng));
            }
            Seeding::Open => {
                let mut order = playing.clone();
                for candidate in 0..self.config.candidates.max(1) {
                    order.shuffle(rng);
                    let (lineups, total) = self.plan(&order, per_court, fixed, history, rng);
                    debug!(round, candidate, total, "scored candidate round");
                    if best.as_ref().map_or(true, |(_, best_total)| total < *best_total) {
                        best = Some((lineups, total));
                    }
                }
            }
        }

        let lineups = best.map(|(lineups, _)| lineups).unwrap_or_default();
        let cost: f64 = lineups.iter().map(|l| l.cost).sum();
        let matches: Vec<Match> = lineups
            .iter()
            .map(|l| self.to_match(l, round, fixed))
            .collect();

        info!(
            round,
            matches = matches.len(),
            resting = resting.len(),
            cost,
            "generated round"
        );

        Ok(Round {
            round,
            matches,
            resting,
            cost,
        })
    }

    /// Cost of a lineup, lower is better. `rotating` enables the partner
    /// repeat term, which is meaningless for fixed pairs.
    fn lineup_cost(
        &self,
        team_a: &[&Member],
        team_b: &[&Member],
        court: u32,
        rotating: bool,
        history: &MatchHistory,
    ) -> f64 {
        let w = &self.config.weights;
        let mut cost = 0.0;

        if rotating {
            for team in [team_a, team_b] {
                if let [first, second] = team {
                    cost += f64::from(history.partner_count(first.id, second.id)) * w.repeat_partner;
                }
            }
        }

        for a in team_a {
            for b in team_b {
                cost += f64::from(history.opponent_count(a.id, b.id)) * w.repeat_opponent;
            }
        }

        cost += (average_level(team_a) - average_level(team_b)).abs() * w.level_imbalance;

        for member in team_a.iter().chain(team_b) {
            if history.last_court(member.id) == Some(court) {
                cost += w.court_repetition;
            }
        }

        if self.category == Category::Mixed {
            for team in [team_a, team_b] {
                let male = team.iter().any(|m| m.gender == Some(Gender::Male));
                let female = team.iter().any(|m| m.gender == Some(Gender::Female));
                if !(male && female) {
                    cost += w.gender_mix;
                }
            }
        }

        cost
    }

    /// Split an ordered list of slots into courts and pick the best team
    /// split on each. Returns the lineups and their jittered total.
    fn plan<'s, 'a, R: Rng + ?Sized>(
        &self,
        order: &[&'s Slot<'a>],
        per_court: usize,
        fixed: bool,
        history: &MatchHistory,
        rng: &mut R,
    ) -> (Vec<Lineup<'s, 'a>>, f64) {
        let mut lineups = Vec::with_capacity(order.len() / per_court);
        let mut total = 0.0;

        for (index, bucket) in order.chunks_exact(per_court).enumerate() {
            let court = index as u32 + 1;
            let options: Vec<(Vec<&'s Slot<'a>>, Vec<&'s Slot<'a>>)> = if fixed {
                vec![(vec![bucket[0]], vec![bucket[1]])]
            } else {
                self.splits_for(bucket)
                    .iter()
                    .map(|(a, b)| {
                        (
                            a.iter().map(|&i| bucket[i]).collect(),
                            b.iter().map(|&i| bucket[i]).collect(),
                        )
                    })
                    .collect()
            };

            let mut chosen: Option<(Lineup<'s, 'a>, f64)> = None;
            for (team_a, team_b) in options {
                let cost = self.lineup_cost(
                    &members(&team_a),
                    &members(&team_b),
                    court,
                    !fixed,
                    history,
                );
                let jittered = cost + rng.gen::<f64>() * self.config.jitter;
                if chosen.as_ref().map_or(true, |(_, best)| jittered < *best) {
                    chosen = Some((
                        Lineup {
                            court,
                            team_a,
                            team_b,
                            cost,
                        },
                        jittered,
                    ));
                }
            }

            if let Some((lineup, jittered)) = chosen {
                total += jittered;
                lineups.push(lineup);
            }
        }

        (lineups, total)
    }

    /// Candidate splits of a four-player bucket. A mixed court holding two
    /// men and two women only considers man+woman teams.
    fn splits_for(&self, bucket: &[&Slot]) -> Vec<([usize; 2], [usize; 2])> {
        if self.category != Category::Mixed {
            return SPLITS.to_vec();
        }
        let gender = |i: usize| bucket[i].members.first().and_then(|m| m.gender);
        let mixed_team = |team: &[usize; 2]| {
            let genders = [gender(team[0]), gender(team[1])];
            genders.contains(&Some(Gender::Male)) && genders.contains(&Some(Gender::Female))
        };
        let mixed: Vec<_> = SPLITS
            .iter()
            .copied()
            .filter(|(a, b)| mixed_team(a) && mixed_team(b))
            .collect();
        if mixed.is_empty() {
            SPLITS.to_vec()
        } else {
            mixed
        }
    }

    fn to_match(&self, lineup: &Lineup, round: u32, fixed: bool) -> Match {
        let team = |slots: &[&Slot]| Team {
            pair_id: if fixed {
                slots.first().and_then(|s| s.pair_id).map(str::to_string)
            } else {
                None
            },
            ids: slots
                .iter()
                .flat_map(|s| s.members.iter().map(|m| m.id.to_string()))
                .collect(),
            names: slots
                .iter()
                .flat_map(|s| s.members.iter().map(|m| m.name.to_string()))
                .collect(),
        };

        let level_gap = average_level(&members(&lineup.team_a)) - average_level(&members(&lineup.team_b));

        Match {
            round,
            court: lineup.court,
            team_a: team(&lineup.team_a),
            team_b: team(&lineup.team_b),
            score_a: 0,
            score_b: 0,
            status: MatchStatus::Scheduled,
            quality: Some(MatchQuality {
                match_quality: (100.0 - lineup.cost / 100.0).clamp(0.0, 100.0),
                win_prob_a: win_probability(level_gap, self.config.win_probability_k),
            }),
        }
    }

    fn slots<'a>(&self, units: Units<'a>) -> Vec<Slot<'a>> {
        match units {
            Units::Fixed(pairs) => pairs
                .iter()
                .enumerate()
                .map(|(order, pair)| Slot {
                    id: &pair.id,
                    pair_id: Some(&pair.id),
                    members: pair
                        .players
                        .iter()
                        .map(|p| Member {
                            id: &p.id,
                            name: &p.name,
                            level: self.resolver.effective(p.level.as_ref(), p.reliability),
                            gender: p.gender,
                        })
                        .collect(),
                    court: pair.current_court,
                    order,
                })
                .collect(),
            Units::Rotating(players) => players
                .iter()
                .enumerate()
                .map(|(order, p)| Slot {
                    id: &p.id,
                    pair_id: None,
                    members: vec![Member {
                        id: &p.id,
                        name: &p.name,
                        level: self.resolver.effective(p.level.as_ref(), p.reliability),
                        gender: p.gender,
                    }],
                    court: p.current_court,
                    order,
                })
                .collect(),
        }
    }
}

/// Logistic win probability for a team `level_gap` points stronger.
pub fn win_probability(level_gap: f64, k: f64) -> f64 {
    1.0 / (1.0 + (-k * level_gap).exp())
}

fn members<'s, 'a>(slots: &[&'s Slot<'a>]) -> Vec<&'s Member<'a>> {
    slots.iter().flat_map(|s| s.members.iter()).collect()
}

fn average_level(team: &[&Member]) -> f64 {
    if team.is_empty() {
        return 0.0;
    }
    team.iter().map(|m| m.level).sum::<f64>() / team.len() as f64
}

#[cfg(test)]
#[path = "round_tests.rs"]
mod round_tests;
