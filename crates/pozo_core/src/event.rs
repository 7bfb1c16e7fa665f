//! Event orchestration
//!
//! `EventEngine` runs one step of an event over a snapshot: it validates the
//! request, works out how many courts to use, moves the ladder on the
//! previous round's results and generates the next round. The result is a
//! `RoundPlan`; nothing in the snapshot changes until the caller commits it.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::GeneratorConfig;
use crate::error::{EngineError, Result};
use crate::gender::{BalanceReport, GenderBalancer};
use crate::history::MatchHistory;
use crate::ladder::{LadderMover, LadderOutcome, LadderUnit, Movement};
use crate::level::LevelResolver;
use crate::round::{Round, RoundGenerator, Seeding, Units};
use crate::types::{Category, EventConfig, EventType, Gender, Match, Pair, PairMode, Participant};

/// Minutes budgeted per round: a 15 minute match plus changeover
pub const MINUTES_PER_ROUND: u32 = 18;

/// Fewest courts a timed event is scaled to
pub const MIN_TIMED_COURTS: u32 = 2;

/// Everything the engine needs to know about an event at one point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventSnapshot {
    pub config: EventConfig,
    #[serde(default)]
    pub participants: Vec<Participant>,
    #[serde(default)]
    pub pairs: Vec<Pair>,
    #[serde(default)]
    pub matches: Vec<Match>,
}

impl EventSnapshot {
    pub fn new(config: EventConfig, participants: Vec<Participant>) -> Self {
        Self {
            config,
            participants,
            pairs: Vec::new(),
            matches: Vec::new(),
        }
    }

    pub fn round_matches(&self, round: u32) -> impl Iterator<Item = &Match> {
        self.matches.iter().filter(move |m| m.round == round)
    }

    /// Highest round with any match, 0 before the event starts.
    pub fn last_round(&self) -> u32 {
        self.matches.iter().map(|m| m.round).max().unwrap_or(0)
    }

    /// Persist a plan: moved units replace the roster and the new matches
    /// are appended.
    pub fn commit(&mut self, plan: RoundPlan) {
        self.participants = plan.participants;
        self.pairs = plan.pairs;
        self.matches.extend(plan.round.matches);
    }
}

/// Proposal for one round: units after ladder movement plus the new matches.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoundPlan {
    pub round: Round,
    pub participants: Vec<Participant>,
    pub pairs: Vec<Pair>,
    pub movements: Vec<Movement>,
    pub balance: Option<BalanceReport>,
    /// Courts in use after scaling
    pub courts: u32,
}

#[derive(Debug, Clone, Default)]
pub struct EventEngine {
    config: GeneratorConfig,
    resolver: LevelResolver,
}

impl EventEngine {
    pub fn new(config: GeneratorConfig) -> Self {
        let resolver = LevelResolver::new(config.default_level);
        Self { config, resolver }
    }

    /// Round 1 court assignment: four players per court in roster order.
    /// Entrenos first sort by effective level so the strongest start on
    /// court 1; mixed events are gender balanced before courts are given out.
    pub fn seed_initial_courts(&self, participants: &[Participant], config: &EventConfig) -> Vec<Participant> {
        let mut seeded = participants.to_vec();
        if config.event_type == EventType::Entreno {
            seeded.sort_by(|a, b| {
                let level = |p: &Participant| self.resolver.effective(p.level.as_ref(), p.reliability);
                level(b).total_cmp(&level(a))
            });
        }
        if config.ladder_category() == Category::Mixed {
            GenderBalancer::new().balance(&mut seeded);
        }
        for (i, p) in seeded.iter_mut().enumerate() {
            let court = (i / 4) as u32 + 1;
            p.current_court = court;
            p.initial_court = court;
        }
        seeded
    }

    /// Build one round of the event.
    ///
    /// Rejects rounds past the event limit and rounds whose predecessor
    /// still has unfinished matches. From round 2 on the ladder is moved on
    /// the previous round's results before generating.
    pub fn next_round<R: Rng + ?Sized>(
        &self,
        snapshot: &EventSnapshot,
        round: u32,
        rng: &mut R,
    ) -> Result<RoundPlan> {
        let config = &snapshot.config;
        if round == 0 {
            return Err(EngineError::InvalidRound(round));
        }
        if round > config.rounds {
            return Err(EngineError::RoundLimitReached {
                requested: round,
                limit: config.rounds,
            });
        }
        check_eligibility(&snapshot.participants, config.category)?;

        let previous: Vec<Match> = snapshot.round_matches(round - 1).cloned().collect();
        let pending = previous.iter().filter(|m| !m.is_finished()).count();
        if round > 1 && pending > 0 {
            return Err(EngineError::UnfinishedRound {
                round: round - 1,
                pending,
            });
        }

        let history = MatchHistory::from_matches(
            &snapshot
                .matches
                .iter()
                .filter(|m| m.round < round)
                .cloned()
                .collect::<Vec<_>>(),
        );

        let category = config.ladder_category();
        let generator = RoundGenerator::new(self.config.clone(), category, Seeding::for_event(config.event_type));

        match config.pair_mode {
            PairMode::Fixed => {
                let mut pairs = snapshot.pairs.clone();
                if round == 1 && pairs.is_empty() {
                    let seeded = self.seed_initial_courts(&snapshot.participants, config);
                    pairs = create_fixed_pairs(&seeded, config.category, config.event_type == EventType::Entreno, rng);
                }
                for pair in &pairs {
                    for member in &pair.players {
                        if !config.category.admits(member.gender) {
                            return Err(ineligible(&member.id, config.category));
                        }
                    }
                }

                let courts = effective_courts(config, pairs.len());
                let moved = self.move_ladder(&pairs, &previous, round, LadderMover::new(courts));
                let generated = generator.generate_round(Units::Fixed(&moved.units), &history, courts, round, rng)?;
                info!(round, courts, pairs = moved.units.len(), "planned fixed-pair round");

                Ok(RoundPlan {
                    round: generated,
                    participants: snapshot.participants.clone(),
                    pairs: moved.units,
                    movements: moved.movements,
                    balance: moved.balance,
                    courts,
                })
            }
            PairMode::Rotating => {
                let courts = effective_courts(config, snapshot.participants.len());
                let roster = if round == 1 && !is_seeded(&snapshot.participants) {
                    self.seed_initial_courts(&snapshot.participants, config)
                } else {
                    snapshot.participants.clone()
                };
                let mover = LadderMover::for_category(courts, category);
                let moved = self.move_ladder(&roster, &previous, round, mover);
                let generated =
                    generator.generate_round(Units::Rotating(&moved.units), &history, courts, round, rng)?;
                info!(round, courts, players = moved.units.len(), "planned rotating round");

                Ok(RoundPlan {
                    round: generated,
                    participants: moved.units,
                    pairs: snapshot.pairs.clone(),
                    movements: moved.movements,
                    balance: moved.balance,
                    courts,
                })
            }
        }
    }

    fn move_ladder<U: LadderUnit>(
        &self,
        units: &[U],
        previous: &[Match],
        round: u32,
        mover: LadderMover,
    ) -> LadderOutcome<U> {
        if round > 1 {
            mover.apply_results(units, previous)
        } else {
            LadderOutcome {
                units: units.to_vec(),
                movements: Vec::new(),
                balance: None,
            }
        }
    }
}

/// Courts to use for an event with `unit_count` players (rotating) or pairs
/// (fixed). Never fewer than configured; grows to fit every unit and, for
/// timed events, to fit every round in the time slot.
pub fn effective_courts(config: &EventConfig, unit_count: usize) -> u32 {
    let players = match config.pair_mode {
        PairMode::Fixed => unit_count * 2,
        PairMode::Rotating => unit_count,
    };
    let by_players = (players / 4) as u32;

    let by_duration = match (config.start.as_deref(), config.end.as_deref()) {
        (Some(start), Some(end)) => duration_minutes(start, end).map(|minutes| {
            let needed = config.rounds * MINUTES_PER_ROUND;
            let parallel = if needed > minutes {
                needed.div_ceil(minutes)
            } else {
                0
            };
            parallel.max(by_players).max(MIN_TIMED_COURTS)
        }),
        _ => None,
    };

    let courts = config.max_courts.max(by_players).max(by_duration.unwrap_or(0));
    if courts != config.max_courts {
        info!(configured = config.max_courts, courts, players, "scaled court count");
    }
    courts
}

/// Minutes between two "HH:MM" times, `None` if unparsable or not positive.
fn duration_minutes(start: &str, end: &str) -> Option<u32> {
    let parse = |t: &str| -> Option<i64> {
        let (h, m) = t.trim().split_once(':')?;
        Some(h.parse::<i64>().ok()? * 60 + m.parse::<i64>().ok()?)
    };
    let minutes = parse(end)? - parse(start)?;
    u32::try_from(minutes).ok().filter(|&m| m > 0)
}

fn is_seeded(participants: &[Participant]) -> bool {
    participants.iter().any(|p| p.current_court > 1)
}

/// Pair up players for a fixed-pair event. Pairs fill courts two at a time
/// from court 1. Mixed events pair a man with a woman in roster order;
/// otherwise players are shuffled unless `preserve_order` is set.
pub fn create_fixed_pairs<R: Rng + ?Sized>(
    players: &[Participant],
    category: Category,
    preserve_order: bool,
    rng: &mut R,
) -> Vec<Pair> {
    let mut ordered: Vec<&Participant> = players.iter().collect();
    if category == Category::Mixed {
        ordered = interleave_genders(ordered);
    } else if !preserve_order {
        ordered.shuffle(rng);
    }

    if ordered.len() % 2 == 1 {
        if let Some(left_out) = ordered.last() {
            warn!(id = %left_out.id, "odd roster, player left without a pair");
        }
    }

    ordered
        .chunks_exact(2)
        .enumerate()
        .map(|(k, two)| Pair::new(&format!("pair_{}", k + 1), two[0], two[1], (k / 2) as u32 + 1))
        .collect()
}

/// Man, woman, man, woman... keeping roster order within each gender.
/// Whoever is left over (including unknown genders) follows.
fn interleave_genders(players: Vec<&Participant>) -> Vec<&Participant> {
    let (mut men, mut women, mut rest) = (Vec::new(), Vec::new(), Vec::new());
    for p in players {
        match p.gender {
            Some(Gender::Male) => men.push(p),
            Some(Gender::Female) => women.push(p),
            None => rest.push(p),
        }
    }

    let paired = men.len().min(women.len());
    let mut ordered = Vec::with_capacity(men.len() + women.len() + rest.len());
    for (m, w) in men.iter().zip(&women) {
        ordered.push(*m);
        ordered.push(*w);
    }
    ordered.extend(men.drain(paired..));
    ordered.extend(women.drain(paired..));
    ordered.append(&mut rest);
    ordered
}

/// Gendered events only admit players of that gender; unknowns are let in.
pub fn check_eligibility(participants: &[Participant], category: Category) -> Result<()> {
    match participants.iter().find(|p| !category.admits(p.gender)) {
        Some(p) => Err(ineligible(&p.id, category)),
        None => Ok(()),
    }
}

fn ineligible(id: &str, category: Category) -> EngineError {
    EngineError::IneligibleParticipant {
        id: id.to_string(),
        category: category.as_str().to_string(),
    }
}

/// Swap a participant out of every match not yet finished. Returns how many
/// matches changed.
pub fn substitute_participant(matches: &mut [Match], old_id: &str, replacement: &Participant) -> usize {
    let mut changed = 0;
    for m in matches.iter_mut().filter(|m| !m.is_finished()) {
        let mut touched = false;
        for team in [&mut m.team_a, &mut m.team_b] {
            if let Some(pos) = team.ids.iter().position(|id| id == old_id) {
                team.ids[pos] = replacement.id.clone();
                if let Some(name) = team.names.get_mut(pos) {
                    *name = replacement.name.clone();
                }
                touched = true;
            }
        }
        if touched {
            changed += 1;
        }
    }
    if changed > 0 {
        info!(old = old_id, new = %replacement.id, matches = changed, "participant substituted");
    }
    changed
}

/// Drop every match after `round`, for regenerating from that point.
/// Returns how many were removed.
pub fn purge_after(matches: &mut Vec<Match>, round: u32) -> usize {
    let before = matches.len();
    matches.retain(|m| m.round <= round);
    let removed = before - matches.len();
    if removed > 0 {
        info!(round, removed, "purged later rounds");
    }
    removed
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod event_tests;
