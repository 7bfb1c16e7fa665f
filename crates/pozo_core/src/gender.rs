//! Gender balancing for mixed ladders
//!
//! After a mixed rotating round the ladder is resorted purely on results,
//! which can leave three men on one court and three women on the next. The
//! balancer walks the ladder top-down and fixes each court by swapping with
//! the nearest suitable player below it, so a court that is already balanced
//! is never touched again and players move as few slots as possible.

use serde::Serialize;
use tracing::{debug, warn};

use crate::types::{Gender, Participant};

/// Outcome of a balancing pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BalanceReport {
    /// Swapped participant ids, in the order the swaps were made
    pub swaps: Vec<(String, String)>,
    /// Courts that still do not hold exactly two men and two women
    pub unbalanced_courts: Vec<u32>,
}

impl BalanceReport {
    pub fn is_balanced(&self) -> bool {
        self.unbalanced_courts.is_empty()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct GenderBalancer {
    court_size: usize,
    per_gender: usize,
    /// Courts in use; slots past the last one only feed swaps
    courts: Option<u32>,
}

impl Default for GenderBalancer {
    fn default() -> Self {
        Self {
            court_size: 4,
            per_gender: 2,
            courts: None,
        }
    }
}

impl GenderBalancer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only balance and report courts `1..=courts`.
    pub fn with_courts(mut self, courts: u32) -> Self {
        self.courts = Some(courts);
        self
    }

    /// Balance participants already in ladder order (court 1 first).
    pub fn balance(&self, ladder: &mut [Participant]) -> BalanceReport {
        self.balance_by(ladder, |p| p.gender, |p| p.id.as_str())
    }

    /// Balance any ladder given accessors for gender and id. Slot `i`
    /// belongs to court `i / court_size + 1`; with a court cap, slots beyond
    /// the last court are only used as swap partners.
    pub fn balance_by<T>(
        &self,
        ladder: &mut [T],
        gender: impl Fn(&T) -> Option<Gender>,
        id: impl Fn(&T) -> &str,
    ) -> BalanceReport {
        let mut report = BalanceReport::default();
        let len = ladder.len();
        let on_courts = self
            .courts
            .map_or(len, |courts| (courts as usize * self.court_size).min(len));

        for start in (0..on_courts).step_by(self.court_size) {
            let end = (start + self.court_size).min(on_courts);

            while let Some((out, incoming)) = self.next_swap(ladder, start, end, &gender) {
                debug!(
                    court = start / self.court_size + 1,
                    out = id(&ladder[out]),
                    incoming = id(&ladder[incoming]),
                    "gender swap"
                );
                report
                    .swaps
                    .push((id(&ladder[out]).to_string(), id(&ladder[incoming]).to_string()));
                ladder.swap(out, incoming);
            }

            let males = count_on(ladder, start, end, &gender, Some(Gender::Male));
            let females = count_on(ladder, start, end, &gender, Some(Gender::Female));
            if males != self.per_gender || females != self.court_size - self.per_gender {
                report.unbalanced_courts.push((start / self.court_size + 1) as u32);
            }
        }

        if !report.is_balanced() {
            let males = ladder.iter().filter(|p| gender(p) == Some(Gender::Male)).count();
            let females = ladder.iter().filter(|p| gender(p) == Some(Gender::Female)).count();
            warn!(
                males,
                females,
                unknown = len - males - females,
                courts = ?report.unbalanced_courts,
                "mixed ladder could not be fully balanced"
            );
        }

        report
    }

    /// Pick the next (on court, from below) swap for the court spanning
    /// `start..end`, or `None` when nothing below can improve it.
    ///
    /// A surplus gender sends its lowest-ranked member down in exchange for
    /// the missing gender, or an unknown when none is left. A shortage with
    /// an unknown on court pulls the missing gender up.
    fn next_swap<T>(
        &self,
        ladder: &[T],
        start: usize,
        end: usize,
        gender: &impl Fn(&T) -> Option<Gender>,
    ) -> Option<(usize, usize)> {
        let males = count_on(ladder, start, end, gender, Some(Gender::Male));
        let females = count_on(ladder, start, end, gender, Some(Gender::Female));
        let women_wanted = self.court_size - self.per_gender;

        let mut attempts = Vec::with_capacity(2);
        if males > self.per_gender {
            attempts.push((Some(Gender::Male), Gender::Female));
        }
        if females > women_wanted {
            attempts.push((Some(Gender::Female), Gender::Male));
        }
        if males < self.per_gender {
            attempts.push((None, Gender::Male));
        }
        if females < women_wanted {
            attempts.push((None, Gender::Female));
        }

        let below = end..ladder.len();
        for (leaving, wanted) in attempts {
            let Some(out) = (start..end).rev().find(|&i| gender(&ladder[i]) == leaving) else {
                continue;
            };
            let incoming = below
                .clone()
                .find(|&j| gender(&ladder[j]) == Some(wanted))
                .or_else(|| {
                    leaving.and(below.clone().find(|&j| gender(&ladder[j]).is_none()))
                });
            if let Some(incoming) = incoming {
                return Some((out, incoming));
            }
        }
        None
    }
}

fn count_on<T>(
    ladder: &[T],
    start: usize,
    end: usize,
    gender: &impl Fn(&T) -> Option<Gender>,
    wanted: Option<Gender>,
) -> usize {
    (start..end).filter(|&i| gender(&ladder[i]) == wanted).count()
}

#[cfg(test)]
#[path = "gender_tests.rs"]
mod gender_tests;
