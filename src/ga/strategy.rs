//! Genetic algorithm as a scheduling strategy.

use tracing::{info, instrument};

use super::operators::GeneticOperators;
use super::problem::TimetableGaProblem;
use super::runner::GaRunner;
use crate::config::SearchConfig;
use crate::problem::TimetableProblem;
use crate::strategy::{SchedulingStrategy, StrategyOutcome};

/// Registry name of [`GeneticStrategy`].
pub const GENETIC: &str = "genetic";

/// Population-based search over placement vectors.
#[derive(Debug, Clone, Default)]
pub struct GeneticStrategy {
    pub operators: GeneticOperators,
}

impl GeneticStrategy {
    pub fn with_operators(operators: GeneticOperators) -> Self {
        Self { operators }
    }
}

impl SchedulingStrategy for GeneticStrategy {
    fn name(&self) -> &str {
        GENETIC
    }

    #[instrument(skip_all, fields(sessions = problem.sessions().len()))]
    fn run(&self, problem: &TimetableProblem, config: &SearchConfig) -> StrategyOutcome {
        let ga = TimetableGaProblem::new(problem).with_operators(self.operators.clone());
        let result = GaRunner::run(&ga, config);
        info!(
            generations = result.generations,
            fitness = result.best_fitness,
            truncated = result.truncated,
            elapsed_ms = result.elapsed.as_millis() as u64,
            "genetic search finished"
        );
        StrategyOutcome::finalize(problem, result.best)
            .with_history(result.history)
            .with_truncated(result.truncated)
            .with_seed(result.seed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use crate::models::ConflictKind;

    #[test]
    fn test_genetic_strategy_outcome() {
        let problem = fixtures::problem(fixtures::single_division());
        let config = SearchConfig::default()
            .with_population_size(20)
            .with_max_generations(10)
            .with_seed(42);
        let outcome = GeneticStrategy::default().run(&problem, &config);
        assert_eq!(outcome.seed, Some(42));
        assert!(outcome.conflicts.is_empty());
        assert!(outcome.fitness >= 90.0);
        assert_eq!(
            outcome.history.last().map(|s| s.best_fitness),
            Some(outcome.fitness)
        );
    }

    #[test]
    fn test_overload_reported() {
        let problem = fixtures::problem(fixtures::single_division_with_budget(2));
        let config = SearchConfig::default()
            .with_population_size(10)
            .with_max_generations(5)
            .with_seed(42);
        let outcome = GeneticStrategy::default().run(&problem, &config);
        assert!(outcome
            .conflicts
            .iter()
            .any(|c| c.kind == ConflictKind::FacultyOverload));
        assert!(outcome.fitness < 100.0);
    }
}
