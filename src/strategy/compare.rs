//! Multi-strategy comparison.
//!
//! Runs several strategies on the same problem concurrently and picks a
//! winner: highest fitness, then fewest conflicts, then earliest
//! registration. Unknown names produce an error report and never win.

use std::time::Instant;

use rayon::prelude::*;
use tracing::{debug, warn};

use super::{StrategyOutcome, StrategyRegistry};
use crate::config::SearchConfig;
use crate::error::TimetableError;
use crate::problem::TimetableProblem;

/// One strategy's entry in a comparison.
#[derive(Debug)]
pub struct StrategyReport {
    /// Requested name.
    pub algorithm: String,
    /// Registration index, `None` for unknown names.
    pub registration: Option<usize>,
    pub outcome: Result<StrategyOutcome, TimetableError>,
    pub elapsed_ms: u64,
}

/// All reports plus the index of the winning one.
#[derive(Debug)]
pub struct Comparison {
    /// Reports in request order.
    pub reports: Vec<StrategyReport>,
    pub winner: Option<usize>,
}

impl Comparison {
    /// Winning report.
    pub fn best(&self) -> Option<&StrategyReport> {
        self.winner.and_then(|i| self.reports.get(i))
    }
}

/// Runs the named strategies in parallel.
///
/// Every strategy receives the same configuration, including the seed.
pub fn compare(
    registry: &StrategyRegistry,
    names: &[String],
    problem: &TimetableProblem,
    config: &SearchConfig,
) -> Comparison {
    let reports: Vec<StrategyReport> = names
        .par_iter()
        .map(|name| {
            let started = Instant::now();
            let (registration, outcome) = match registry.get(name) {
                Some((index, strategy)) => (Some(index), Ok(strategy.run(problem, config))),
                None => {
                    warn!(algorithm = %name, "unknown algorithm in comparison");
                    (None, Err(TimetableError::AlgorithmNotFound(name.clone())))
                }
            };
            let elapsed_ms = started.elapsed().as_millis() as u64;
            if let Ok(outcome) = &outcome {
                debug!(
                    algorithm = %name,
                    fitness = outcome.fitness,
                    conflicts = outcome.conflicts.len(),
                    elapsed_ms,
                    "strategy finished"
                );
            }
            StrategyReport {
                algorithm: name.clone(),
                registration,
                outcome,
                elapsed_ms,
            }
        })
        .collect();
    let winner = select_winner(&reports);
    Comparison { reports, winner }
}

/// Index of the best successful report.
pub fn select_winner(reports: &[StrategyReport]) -> Option<usize> {
    let mut winner: Option<(usize, &StrategyOutcome, usize)> = None;
    for (i, report) in reports.iter().enumerate() {
        let (Ok(outcome), Some(registration)) = (&report.outcome, report.registration) else {
            continue;
        };
        let better = match winner {
            None => true,
            Some((_, best, best_registration)) => {
                match outcome.fitness.total_cmp(&best.fitness) {
                    std::cmp::Ordering::Greater => true,
                    std::cmp::Ordering::Less => false,
                    std::cmp::Ordering::Equal => {
                        (outcome.conflicts.len(), registration)
                            < (best.conflicts.len(), best_registration)
                    }
                }
            }
        };
        if better {
            winner = Some((i, outcome, registration));
        }
    }
    winner.map(|(i, _, _)| i)
}
