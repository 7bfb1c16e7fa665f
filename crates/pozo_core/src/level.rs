//! Level resolution
//!
//! Profiles store levels in several shapes: plain numbers, numeric strings,
//! descriptive labels ("Intermedio") and league categories ("4ª"). Everything
//! is mapped onto the 0.0-7.5 numeric scale so teams can be compared.

use crate::types::{Level, Reliability};

/// Mid-scale level used when a profile has none
pub const DEFAULT_LEVEL: f64 = 3.5;

pub const MIN_LEVEL: f64 = 0.0;
pub const MAX_LEVEL: f64 = 7.5;

/// Penalty for a player whose level has not been confirmed in 30-60 days
pub const DOUBTFUL_PENALTY: f64 = 0.10;

/// Penalty for a player inactive for more than 60 days
pub const RUSTY_PENALTY: f64 = 0.25;

/// Descriptive labels with the upper bound (exclusive) of their band.
const LABELS: [(&str, f64); 6] = [
    ("Iniciación", 2.0),
    ("Básico", 3.0),
    ("Intermedio", 4.0),
    ("Avanzado", 5.0),
    ("Experto", 6.0),
    ("Profesional", f64::INFINITY),
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelResolver {
    default_level: f64,
}

impl Default for LevelResolver {
    fn default() -> Self {
        Self::new(DEFAULT_LEVEL)
    }
}

impl LevelResolver {
    pub fn new(default_level: f64) -> Self {
        Self {
            default_level: clamp_level(default_level),
        }
    }

    pub fn default_level(&self) -> f64 {
        self.default_level
    }

    /// Map any level representation to the numeric scale.
    pub fn resolve(&self, level: Option<&Level>) -> f64 {
        match level {
            Some(Level::Numeric(value)) if value.is_finite() => clamp_level(*value),
            Some(Level::Category(raw)) => parse_category(raw)
                .map(clamp_level)
                .unwrap_or(self.default_level),
            _ => self.default_level,
        }
    }

    /// Level used for matchmaking: the resolved level minus a penalty when
    /// recent inactivity makes it less trustworthy.
    pub fn effective(&self, level: Option<&Level>, reliability: Option<Reliability>) -> f64 {
        let penalty = match reliability {
            Some(Reliability::Rusty) => RUSTY_PENALTY,
            Some(Reliability::Doubtful) => DOUBTFUL_PENALTY,
            Some(Reliability::Reliable) | None => 0.0,
        };
        clamp_level(self.resolve(level) - penalty)
    }
}

/// Descriptive label for a numeric level
pub fn level_label(level: f64) -> &'static str {
    LABELS
        .iter()
        .find(|(_, upper)| level < *upper)
        .map(|(label, _)| *label)
        .unwrap_or("Profesional")
}

pub fn clamp_level(level: f64) -> f64 {
    level.clamp(MIN_LEVEL, MAX_LEVEL)
}

fn parse_category(raw: &str) -> Option<f64> {
    let normalized: String = raw
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'á' => 'a',
            'é' => 'e',
            'í' => 'i',
            'ó' => 'o',
            'ú' => 'u',
            other => other,
        })
        .collect();

    match normalized.as_str() {
        "iniciacion" => return Some(1.5),
        "basico" => return Some(2.5),
        "intermedio" => return Some(3.5),
        "avanzado" => return Some(4.5),
        "experto" => return Some(5.5),
        "profesional" => return Some(6.5),
        _ => {}
    }

    // League categories: "4ª", "4a", "4º". 5ª is the lowest tier.
    let stripped = normalized.trim_end_matches(['ª', 'º', 'a', 'o']);
    if stripped.len() < normalized.len() {
        if let Ok(tier @ 1..=5) = stripped.trim().parse::<u8>() {
            return Some(7.5 - f64::from(tier));
        }
    }

    normalized.replace(',', ".").parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
#[path = "level_tests.rs"]
mod level_tests;
