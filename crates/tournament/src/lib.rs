//! Event runner for the Pozo engine
//!
//! This crate provides infrastructure for:
//! - Loading events (config, generator weights, roster) from TOML files
//! - Simulating an event round by round with seeded scores
//! - Saving results and printing standings reports
//!
//! # Usage
//!
//! ```bash
//! # Simulate an event and keep the results
//! cargo run -p tournament -- simulate demos/friday_pozo.toml --seed 7 --out results.json
//!
//! # Standings from a list of matches
//! cargo run -p tournament -- standings results.json --type pozo
//! ```

mod error;
mod event_file;
mod results;
mod simulation;

pub use error::*;
pub use event_file::*;
pub use results::*;
pub use simulation::*;
