//! Round generator configuration

use serde::{Deserialize, Serialize};

use crate::level::DEFAULT_LEVEL;

/// Weights of the round cost function (lower total cost is better).
///
/// Partner repeats dominate so that a repeated partnership only happens when
/// every alternative is worse. Level imbalance is multiplied by the absolute
/// gap in average team level, so a 0.5 gap costs roughly one repeated opponent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CostWeights {
    pub repeat_partner: f64,
    pub repeat_opponent: f64,
    pub level_imbalance: f64,
    pub court_repetition: f64,
    /// Only applied in mixed events
    pub gender_mix: f64,
}

impl Default for CostWeights {
    fn default() -> Self {
        Self {
            repeat_partner: 10_000.0,
            repeat_opponent: 1_200.0,
            level_imbalance: 2_500.0,
            court_repetition: 400.0,
            gender_mix: 1_500.0,
        }
    }
}

/// Configuration for round generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub weights: CostWeights,
    /// Whole-round candidates sampled when seeding is open
    pub candidates: u32,
    /// Upper bound of the random tie-break added to every cost
    pub jitter: f64,
    /// Steepness of the win probability curve per level point
    pub win_probability_k: f64,
    /// Level used for players without one
    pub default_level: f64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            weights: CostWeights::default(),
            candidates: 20,
            jitter: 1.0,
            win_probability_k: 1.5,
            default_level: DEFAULT_LEVEL,
        }
    }
}
