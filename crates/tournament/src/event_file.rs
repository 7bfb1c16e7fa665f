//! Event files
//!
//! An event is described in TOML:
//!
//! ```toml
//! [event]
//! name = "Friday Pozo"
//! event_type = "pozo"
//! pair_mode = "rotating"
//! category = "mixed"
//! max_courts = 3
//! rounds = 5
//!
//! [generator]
//! candidates = 40
//!
//! [[participants]]
//! id = "ana"
//! name = "Ana"
//! level = "Intermedio"
//! gender = "female"
//! ```

use std::path::Path;

use pozo_core::{EventConfig, EventSnapshot, GeneratorConfig, Match, Pair, Participant};
use serde::{Deserialize, Serialize};

use crate::error::Result;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventSection {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(flatten)]
    pub config: EventConfig,
}

fn default_name() -> String {
    "Unnamed event".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventFile {
    pub event: EventSection,
    #[serde(default)]
    pub generator: GeneratorConfig,
    #[serde(default)]
    pub participants: Vec<Participant>,
    #[serde(default)]
    pub pairs: Vec<Pair>,
    /// Results already played, when resuming an event
    #[serde(default)]
    pub matches: Vec<Match>,
}

impl EventFile {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    pub fn parse(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    pub fn name(&self) -> &str {
        &self.event.name
    }

    pub fn snapshot(&self) -> EventSnapshot {
        EventSnapshot {
            config: self.event.config.clone(),
            participants: self.participants.clone(),
            pairs: self.pairs.clone(),
            matches: self.matches.clone(),
        }
    }
}

/// Matches read from JSON: either a bare list or a saved results file.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum MatchFile {
    List(Vec<Match>),
    Results { matches: Vec<Match> },
}

pub fn load_matches(path: &Path) -> Result<Vec<Match>> {
    let contents = std::fs::read_to_string(path)?;
    let file: MatchFile = serde_json::from_str(&contents)?;
    Ok(match file {
        MatchFile::List(matches) | MatchFile::Results { matches } => matches,
    })
}

#[cfg(test)]
#[path = "event_file_tests.rs"]
mod event_file_tests;
