use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    #[serde(alias = "chico", alias = "hombre", alias = "masculino")]
    Male,
    #[serde(alias = "chica", alias = "mujer", alias = "femenino")]
    Female,
}

/// A player level as stored on a profile: either a number on the 0.0-7.5
/// scale or a label such as "Intermedio" or "4ª".
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Level {
    Numeric(f64),
    Category(String),
}

/// Confidence in a player's level, based on how recently they played.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Reliability {
    #[serde(alias = "green")]
    Reliable,
    #[serde(alias = "yellow")]
    Doubtful,
    #[serde(alias = "red")]
    Rusty,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PairMode {
    Fixed,
    #[default]
    Rotating,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Male,
    Female,
    Mixed,
    #[default]
    Open,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Male => "male",
            Category::Female => "female",
            Category::Mixed => "mixed",
            Category::Open => "open",
        }
    }

    /// Whether a participant of the given gender may sign up.
    /// Unknown genders are always admitted.
    pub fn admits(self, gender: Option<Gender>) -> bool {
        match (self, gender) {
            (Category::Male, Some(Gender::Female)) => false,
            (Category::Female, Some(Gender::Male)) => false,
            _ => true,
        }
    }
}

/// Event format, which selects seeding and standings tie-breaks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    #[default]
    Americana,
    Entreno,
    Pozo,
}

impl EventType {
    pub fn as_str(self) -> &'static str {
        match self {
            EventType::Americana => "americana",
            EventType::Entreno => "entreno",
            EventType::Pozo => "pozo",
        }
    }
}

fn first_court() -> u32 {
    1
}

fn default_rounds() -> u32 {
    6
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub level: Option<Level>,
    #[serde(default)]
    pub gender: Option<Gender>,
    #[serde(default)]
    pub reliability: Option<Reliability>,
    #[serde(default = "first_court")]
    pub current_court: u32,
    #[serde(default = "first_court")]
    pub initial_court: u32,
    #[serde(default)]
    pub wins: u32,
    #[serde(default)]
    pub losses: u32,
    #[serde(default)]
    pub games_won: u32,
    #[serde(default)]
    pub games_lost: u32,
}

impl Participant {
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            level: None,
            gender: None,
            reliability: None,
            current_court: 1,
            initial_court: 1,
            wins: 0,
            losses: 0,
            games_won: 0,
            games_lost: 0,
        }
    }

    pub fn with_level(mut self, level: f64) -> Self {
        self.level = Some(Level::Numeric(level));
        self
    }

    pub fn with_gender(mut self, gender: Gender) -> Self {
        self.gender = Some(gender);
        self
    }

    /// Places the participant on a court and records it as their starting court.
    pub fn on_court(mut self, court: u32) -> Self {
        self.current_court = court;
        self.initial_court = court;
        self
    }
}

/// One half of a fixed pair.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PairMember {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub level: Option<Level>,
    #[serde(default)]
    pub gender: Option<Gender>,
    #[serde(default)]
    pub reliability: Option<Reliability>,
}

impl From<&Participant> for PairMember {
    fn from(p: &Participant) -> Self {
        Self {
            id: p.id.clone(),
            name: p.name.clone(),
            level: p.level.clone(),
            gender: p.gender,
            reliability: p.reliability,
        }
    }
}

/// Two players that stay together for the whole event and climb the
/// ladder as one unit.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Pair {
    pub id: String,
    pub players: [PairMember; 2],
    #[serde(default)]
    pub wins: u32,
    #[serde(default)]
    pub losses: u32,
    #[serde(default)]
    pub games_won: u32,
    #[serde(default)]
    pub games_lost: u32,
    #[serde(default = "first_court")]
    pub current_court: u32,
    #[serde(default = "first_court")]
    pub initial_court: u32,
}

impl Pair {
    pub fn new(id: &str, first: &Participant, second: &Participant, court: u32) -> Self {
        Self {
            id: id.to_string(),
            players: [PairMember::from(first), PairMember::from(second)],
            wins: 0,
            losses: 0,
            games_won: 0,
            games_lost: 0,
            current_court: court,
            initial_court: court,
        }
    }

    pub fn display_name(&self) -> String {
        format!("{} / {}", self.players[0].name, self.players[1].name)
    }

    pub fn has_member(&self, id: &str) -> bool {
        self.players.iter().any(|p| p.id == id)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    #[default]
    Scheduled,
    Finished,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    A,
    B,
}

/// One side of a match. `names` is kept alongside `ids` because older
/// records only carry display names.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Team {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pair_id: Option<String>,
    #[serde(default)]
    pub ids: Vec<String>,
    #[serde(default)]
    pub names: Vec<String>,
}

impl Team {
    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|t| t == id)
    }

    pub fn display_name(&self) -> String {
        self.names.join(" / ")
    }
}

/// Informational balance estimate attached to generated matches.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchQuality {
    /// 0-100, higher is a more even and fresher matchup
    pub match_quality: f64,
    /// Probability that team A wins, from the level gap
    pub win_prob_a: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub round: u32,
    pub court: u32,
    pub team_a: Team,
    pub team_b: Team,
    #[serde(default)]
    pub score_a: u32,
    #[serde(default)]
    pub score_b: u32,
    #[serde(default)]
    pub status: MatchStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<MatchQuality>,
}

impl Match {
    pub fn is_finished(&self) -> bool {
        self.status == MatchStatus::Finished
    }

    pub fn total_score(&self) -> u32 {
        self.score_a + self.score_b
    }

    /// Winning side, or None when the scores are level.
    pub fn winner(&self) -> Option<Side> {
        if self.score_a > self.score_b {
            Some(Side::A)
        } else if self.score_b > self.score_a {
            Some(Side::B)
        } else {
            None
        }
    }

    pub fn team(&self, side: Side) -> &Team {
        match side {
            Side::A => &self.team_a,
            Side::B => &self.team_b,
        }
    }

    /// Score as (own, other) for the given side.
    pub fn scores_for(&self, side: Side) -> (u32, u32) {
        match side {
            Side::A => (self.score_a, self.score_b),
            Side::B => (self.score_b, self.score_a),
        }
    }

    /// Records the final score and marks the match finished.
    pub fn finish(&mut self, score_a: u32, score_b: u32) {
        self.score_a = score_a;
        self.score_b = score_b;
        self.status = MatchStatus::Finished;
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EventConfig {
    #[serde(default)]
    pub event_type: EventType,
    #[serde(default)]
    pub pair_mode: PairMode,
    #[serde(default)]
    pub category: Category,
    pub max_courts: u32,
    /// Round limit for the event
    #[serde(default = "default_rounds")]
    pub rounds: u32,
    /// Start time as "HH:MM"
    #[serde(default)]
    pub start: Option<String>,
    /// End time as "HH:MM"
    #[serde(default)]
    pub end: Option<String>,
}

impl EventConfig {
    pub fn new(event_type: EventType, pair_mode: PairMode, category: Category, max_courts: u32) -> Self {
        Self {
            event_type,
            pair_mode,
            category,
            max_courts,
            rounds: default_rounds(),
            start: None,
            end: None,
        }
    }

    /// Category used for ladder movement and pairing; entrenos ignore gender.
    pub fn ladder_category(&self) -> Category {
        match self.event_type {
            EventType::Entreno => Category::Open,
            EventType::Americana | EventType::Pozo => self.category,
        }
    }
}

/// Ladder direction of a unit relative to where it started the event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Promoted,
    Relegated,
    Unchanged,
}

impl Trend {
    pub fn between(current_court: u32, initial_court: u32) -> Trend {
        if current_court < initial_court {
            Trend::Promoted
        } else if current_court > initial_court {
            Trend::Relegated
        } else {
            Trend::Unchanged
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Trend::Promoted => "↑",
            Trend::Relegated => "↓",
            Trend::Unchanged => "=",
        }
    }
}

#[cfg(test)]
#[path = "types_tests.rs"]
mod types_tests;
