//! Pozo engine for padel club events
//!
//! This crate provides the scheduling core behind americanas and entrenos:
//! - Generating balanced 2v2 rounds from a roster and its match history
//! - Moving participants up and down the court ladder ("Pozo") after each round
//! - Keeping mixed courts at two men and two women after every move
//! - Computing standings with format-specific tie-breaks
//! - Adjusting player levels from match results
//!
//! Everything here is a pure function over a snapshot: callers pass rosters,
//! history and an `rand::Rng`, and persist whatever comes back.
//!
//! # Usage
//!
//! ```ignore
//! let generator = RoundGenerator::new(GeneratorConfig::default(), Category::Open, Seeding::Ladder);
//! let history = MatchHistory::from_matches(&matches);
//! let round = generator.generate_round(Units::Rotating(&players), &history, 4, 2, &mut rng)?;
//! ```

mod config;
mod error;
mod event;
mod gender;
mod history;
mod ladder;
mod level;
mod level_adjust;
mod ranking;
mod round;
mod standings;
mod types;

pub use config::*;
pub use error::*;
pub use event::*;
pub use gender::*;
pub use history::*;
pub use ladder::*;
pub use level::*;
pub use level_adjust::*;
pub use ranking::*;
pub use round::*;
pub use standings::*;
pub use types::*;
