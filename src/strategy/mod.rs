//! Pluggable scheduling strategies.
//!
//! Every search algorithm implements [`SchedulingStrategy`] and is looked
//! up by name in a [`StrategyRegistry`]. The engine and the comparator
//! only ever talk to this trait.
//!
//! # Built-in strategies
//!
//! | Name | Type |
//! |------|------|
//! | `genetic` | [`GeneticStrategy`](crate::ga::GeneticStrategy) |
//! | `greedy-repair` | [`GreedyRepairScheduler`](crate::scheduler::GreedyRepairScheduler) |
//! | `backtracking` | [`BacktrackingScheduler`](crate::scheduler::BacktrackingScheduler) |

mod compare;

pub use compare::{compare, select_winner, Comparison, StrategyReport};

use crate::config::SearchConfig;
use crate::conflicts::ConflictDetector;
use crate::fitness::FitnessEvaluator;
use crate::ga::{Candidate, GenerationStats, GeneticStrategy};
use crate::models::ConflictRecord;
use crate::problem::TimetableProblem;
use crate::scheduler::{BacktrackingScheduler, GreedyRepairScheduler};

/// A search algorithm producing one candidate timetable.
pub trait SchedulingStrategy: Send + Sync {
    /// Registry name.
    fn name(&self) -> &str;

    /// Runs the search. Never fails: an infeasible problem yields a
    /// candidate with conflicts and placeholders.
    fn run(&self, problem: &TimetableProblem, config: &SearchConfig) -> StrategyOutcome;
}

/// Result of one strategy run.
#[derive(Debug, Clone)]
pub struct StrategyOutcome {
    pub candidate: Candidate,
    pub fitness: f64,
    pub conflicts: Vec<ConflictRecord>,
    pub history: Vec<GenerationStats>,
    /// The deadline or node budget stopped the search early.
    pub truncated: bool,
    pub seed: Option<u64>,
}

impl StrategyOutcome {
    /// Scores `candidate` and collects its conflicts.
    pub fn finalize(problem: &TimetableProblem, mut candidate: Candidate) -> Self {
        let fitness = FitnessEvaluator::new(problem).evaluate(&candidate.genes);
        candidate.fitness = fitness;
        let conflicts = ConflictDetector::new(problem).detect(&candidate.genes);
        Self {
            candidate,
            fitness,
            conflicts,
            history: Vec::new(),
            truncated: false,
            seed: None,
        }
    }

    pub fn with_history(mut self, history: Vec<GenerationStats>) -> Self {
        self.history = history;
        self
    }

    pub fn with_truncated(mut self, truncated: bool) -> Self {
        self.truncated = truncated;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// Named strategies in registration order.
pub struct StrategyRegistry {
    strategies: Vec<Box<dyn SchedulingStrategy>>,
}

impl Default for StrategyRegistry {
    fn default() -> Self {
        Self::new()
            .with_strategy(GeneticStrategy::default())
            .with_strategy(GreedyRepairScheduler)
            .with_strategy(BacktrackingScheduler)
    }
}

impl std::fmt::Debug for StrategyRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

impl StrategyRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            strategies: Vec::new(),
        }
    }

    /// Registers a strategy. A later registration under an existing name
    /// replaces the earlier one in place.
    pub fn with_strategy(mut self, strategy: impl SchedulingStrategy + 'static) -> Self {
        self.register(Box::new(strategy));
        self
    }

    /// Registers a boxed strategy.
    pub fn register(&mut self, strategy: Box<dyn SchedulingStrategy>) {
        match self.position(strategy.name()) {
            Some(i) => self.strategies[i] = strategy,
            None => self.strategies.push(strategy),
        }
    }

    /// Strategy and its registration index.
    pub fn get(&self, name: &str) -> Option<(usize, &dyn SchedulingStrategy)> {
        self.position(name).map(|i| (i, self.strategies[i].as_ref()))
    }

    /// Registered names in order.
    pub fn names(&self) -> Vec<&str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.strategies.iter().position(|s| s.name() == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Named(&'static str, f64);

    impl SchedulingStrategy for Named {
        fn name(&self) -> &str {
            self.0
        }

        fn run(&self, problem: &TimetableProblem, _config: &SearchConfig) -> StrategyOutcome {
            let mut outcome = StrategyOutcome::finalize(problem, Candidate::new(Vec::new()));
            outcome.fitness = self.1;
            outcome
        }
    }

    #[test]
    fn test_default_registry_order() {
        let registry = StrategyRegistry::default();
        assert_eq!(registry.names(), vec!["genetic", "greedy-repair", "backtracking"]);
        assert_eq!(registry.get("backtracking").map(|(i, _)| i), Some(2));
        assert!(registry.get("annealing").is_none());
    }

    #[test]
    fn test_register_replaces_in_place() {
        let registry = StrategyRegistry::new()
            .with_strategy(Named("a", 1.0))
            .with_strategy(Named("b", 2.0))
            .with_strategy(Named("a", 3.0));
        assert_eq!(registry.names(), vec!["a", "b"]);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_finalize_scores_candidate() {
        let problem = crate::fixtures::problem(crate::fixtures::single_division());
        let genes = vec![crate::ga::Placement::default(); problem.sessions().len()];
        let outcome = StrategyOutcome::finalize(&problem, Candidate::new(genes));
        assert_eq!(outcome.candidate.fitness, outcome.fitness);
        assert!(!outcome.conflicts.is_empty());
        assert!(!outcome.truncated);
        assert_eq!(outcome.seed, None);
    }
}
