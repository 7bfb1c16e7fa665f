//! Event simulation
//!
//! Plays an event end to end with made-up scores so the engine can be
//! exercised without a club: each match is won by team A with its
//! level-based win probability, the winner takes `winning_games` and the
//! loser a random 0-4.

use pozo_core::{
    effective_courts, EventEngine, EventSnapshot, LadderMover, LevelAdjuster, LevelResolver, Match,
    Movement, PairMode, Participant, StandingsCalculator,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::info;

use crate::error::Result;
use crate::event_file::EventFile;
use crate::results::{LevelEntry, TournamentResults};

/// Configuration for a simulation run
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    /// Rounds to play (None = the event's round limit)
    pub rounds: Option<u32>,
    /// Seed for both round generation and scores
    pub seed: u64,
    /// Games the winning side scores
    pub winning_games: u32,
    /// Highest score the losing side can reach
    pub max_losing_games: u32,
    /// Print each result as it is played
    pub verbose: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            rounds: None,
            seed: 42,
            winning_games: 6,
            max_losing_games: 4,
            verbose: true,
        }
    }
}

/// Runs events round by round
pub struct Simulator {
    config: SimulationConfig,
}

impl Simulator {
    pub fn new(config: SimulationConfig) -> Self {
        Self { config }
    }

    /// Play the event in `file`, continuing after any rounds it already holds.
    pub fn run(&self, file: &EventFile) -> Result<TournamentResults> {
        let engine = EventEngine::new(file.generator.clone());
        let mut snapshot = file.snapshot();
        let mut rng = ChaCha8Rng::seed_from_u64(self.config.seed);
        let rounds = self.config.rounds.unwrap_or(snapshot.config.rounds);

        // Results missing from a resumed file are played first.
        let resumed = snapshot.last_round();
        self.play_round(&mut snapshot.matches, resumed, &mut rng);

        for round in resumed + 1..=rounds {
            let plan = engine.next_round(&snapshot, round, &mut rng)?;
            if self.config.verbose {
                println!(
                    "=== Round {} === ({} courts, {} resting)",
                    round,
                    plan.courts,
                    plan.round.resting.len()
                );
            }
            snapshot.commit(plan);
            self.play_round(&mut snapshot.matches, round, &mut rng);
        }

        let rounds_played = snapshot.last_round();
        info!(event = file.name(), rounds_played, matches = snapshot.matches.len(), "simulation finished");

        let standings = StandingsCalculator::calculate(&snapshot.matches, snapshot.config.event_type);
        let final_ladder = final_ladder(&snapshot);
        let resolver = LevelResolver::new(file.generator.default_level);
        let levels = LevelAdjuster::replay(&roster(&snapshot), &snapshot.matches, resolver)
            .leaderboard()
            .into_iter()
            .map(|(id, level, matches)| LevelEntry { id, level, matches })
            .collect();

        Ok(TournamentResults {
            name: file.name().to_string(),
            config: snapshot.config,
            seed: self.config.seed,
            rounds_played,
            matches: snapshot.matches,
            standings,
            final_ladder,
            levels,
        })
    }

    /// Score every unfinished match of `round`.
    fn play_round<R: Rng + ?Sized>(&self, matches: &mut [Match], round: u32, rng: &mut R) {
        for m in matches
            .iter_mut()
            .filter(|m| m.round == round && !m.is_finished())
        {
            let (score_a, score_b) = self.play_match(m, rng);
            m.finish(score_a, score_b);

            if self.config.verbose {
                println!(
                    "Court {}: {:<28} {}-{} {}",
                    m.court,
                    m.team_a.display_name(),
                    score_a,
                    score_b,
                    m.team_b.display_name()
                );
            }
        }
    }

    /// Simulated score as (team A, team B)
    fn play_match<R: Rng + ?Sized>(&self, m: &Match, rng: &mut R) -> (u32, u32) {
        let win_prob_a = m.quality.map_or(0.5, |q| q.win_prob_a).clamp(0.0, 1.0);
        let ceiling = self
            .config
            .max_losing_games
            .min(self.config.winning_games.saturating_sub(1));
        let losing = rng.gen_range(0..=ceiling);
        if rng.gen_bool(win_prob_a) {
            (self.config.winning_games, losing)
        } else {
            (losing, self.config.winning_games)
        }
    }
}

/// Ladder positions after the last round's results are applied.
fn final_ladder(snapshot: &EventSnapshot) -> Vec<Movement> {
    let last = snapshot.last_round();
    let results: Vec<Match> = snapshot.round_matches(last).cloned().collect();
    let config = &snapshot.config;

    match config.pair_mode {
        PairMode::Fixed => {
            let courts = effective_courts(config, snapshot.pairs.len());
            LadderMover::new(courts)
                .apply_results(&snapshot.pairs, &results)
                .movements
        }
        PairMode::Rotating => {
            let courts = effective_courts(config, snapshot.participants.len());
            LadderMover::for_category(courts, config.ladder_category())
                .apply_results(&snapshot.participants, &results)
                .movements
        }
    }
}

/// Everyone who can hold a level: the roster, or pair members when the
/// event file only lists pairs.
fn roster(snapshot: &EventSnapshot) -> Vec<Participant> {
    if !snapshot.participants.is_empty() {
        return snapshot.participants.clone();
    }
    snapshot
        .pairs
        .iter()
        .flat_map(|pair| pair.players.iter())
        .map(|member| {
            let mut p = Participant::new(&member.id, &member.name);
            p.level = member.level.clone();
            p
        })
        .collect()
}

#[cfg(test)]
#[path = "simulation_tests.rs"]
mod simulation_tests;
