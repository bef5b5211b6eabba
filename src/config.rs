//! Search and scoring configuration.
//!
//! - [`SearchConfig`]: per-run knobs shared by every strategy (population,
//!   generations, rates, seed, deadline).
//! - [`PenaltyWeights`]: fitness penalty table. Weights are a tuning choice,
//!   so they are data rather than constants.
//! - [`EngineConfig`]: engine-wide defaults, loadable from TOML.
//!
//! # Example
//!
//! ```
//! use u_timetable::config::EngineConfig;
//!
//! let config = EngineConfig::from_toml_str(r#"
//!     parallel = false
//!     [weights]
//!     unresolved = 8.0
//! "#).unwrap();
//! assert!(!config.parallel);
//! assert_eq!(config.weights.unresolved, 8.0);
//! assert_eq!(config.weights.faculty_clash, 10.0);
//! ```

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::TimetableError;

/// Parameters for one strategy run.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Candidates per generation.
    pub population_size: usize,
    /// Generation cap (GA) or repair-round cap (greedy).
    pub max_generations: usize,
    /// Per-gene reassignment probability.
    pub mutation_rate: f64,
    /// Probability that a child is produced by crossover rather than cloning.
    pub crossover_rate: f64,
    /// Tournament size for parent selection.
    pub tournament_size: usize,
    /// Elite candidates carried unchanged. `None` = 10% of population (min 1).
    pub elite_count: Option<usize>,
    /// Stop after this many generations without improvement.
    pub stagnation_limit: Option<usize>,
    /// Random seed. `None` = drawn from the thread RNG.
    pub seed: Option<u64>,
    /// Evaluate candidates on the rayon pool.
    pub parallel: bool,
    /// Wall-clock budget per run.
    pub time_limit: Option<Duration>,
    /// Search-node budget for backtracking.
    pub node_limit: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            population_size: 50,
            max_generations: 100,
            mutation_rate: 0.1,
            crossover_rate: 0.8,
            tournament_size: 5,
            elite_count: None,
            stagnation_limit: None,
            seed: None,
            parallel: true,
            time_limit: None,
            node_limit: 50_000,
        }
    }
}

impl SearchConfig {
    /// Sets the population size.
    pub fn with_population_size(mut self, size: usize) -> Self {
        self.population_size = size;
        self
    }

    /// Sets the generation cap.
    pub fn with_max_generations(mut self, generations: usize) -> Self {
        self.max_generations = generations;
        self
    }

    /// Sets the mutation rate.
    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate;
        self
    }

    /// Sets the crossover rate.
    pub fn with_crossover_rate(mut self, rate: f64) -> Self {
        self.crossover_rate = rate;
        self
    }

    /// Sets the tournament size.
    pub fn with_tournament_size(mut self, size: usize) -> Self {
        self.tournament_size = size;
        self
    }

    /// Sets the number of elite candidates.
    pub fn with_elite_count(mut self, count: usize) -> Self {
        self.elite_count = Some(count);
        self
    }

    /// Sets the stagnation limit.
    pub fn with_stagnation_limit(mut self, generations: usize) -> Self {
        self.stagnation_limit = Some(generations);
        self
    }

    /// Sets the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Enables or disables parallel evaluation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the wall-clock budget.
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    /// Sets the backtracking node budget.
    pub fn with_node_limit(mut self, limit: usize) -> Self {
        self.node_limit = limit;
        self
    }

    /// Effective elite count, never larger than the population.
    pub fn effective_elite_count(&self) -> usize {
        let count = self
            .elite_count
            .unwrap_or_else(|| (self.population_size / 10).max(1));
        count.min(self.population_size)
    }

    /// Checks parameter ranges.
    pub fn validate(&self) -> Result<(), TimetableError> {
        if self.population_size == 0 {
            return Err(TimetableError::InvalidParameter(
                "populationSize must be greater than 0".into(),
            ));
        }
        if self.max_generations == 0 {
            return Err(TimetableError::InvalidParameter(
                "generations must be greater than 0".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(TimetableError::InvalidParameter(format!(
                "mutationRate must be within [0, 1], got {}",
                self.mutation_rate
            )));
        }
        if !(0.0..=1.0).contains(&self.crossover_rate) {
            return Err(TimetableError::InvalidParameter(format!(
                "crossoverRate must be within [0, 1], got {}",
                self.crossover_rate
            )));
        }
        if self.tournament_size == 0 {
            return Err(TimetableError::InvalidParameter(
                "tournamentSize must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}

/// Fitness penalty table.
///
/// Hard penalties are subtracted once per violation; soft weights scale
/// the imbalance measures. The score is clamped to `[0, ceiling]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PenaltyWeights {
    pub ceiling: f64,
    pub faculty_clash: f64,
    pub room_clash: f64,
    pub division_clash: f64,
    pub faculty_overload: f64,
    pub faculty_unavailable: f64,
    pub room_unsuitable: f64,
    pub unresolved: f64,
    /// Per unit of variance in a faculty member's daily hours.
    pub load_variance: f64,
    /// Per idle slot inside a division's teaching day.
    pub idle_gap: f64,
}

impl Default for PenaltyWeights {
    fn default() -> Self {
        Self {
            ceiling: 100.0,
            faculty_clash: 10.0,
            room_clash: 10.0,
            division_clash: 10.0,
            faculty_overload: 10.0,
            faculty_unavailable: 10.0,
            room_unsuitable: 10.0,
            unresolved: 5.0,
            load_variance: 0.5,
            idle_gap: 0.5,
        }
    }
}

/// Engine-wide defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub weights: PenaltyWeights,
    pub crossover_rate: f64,
    pub tournament_size: usize,
    pub elite_count: Option<usize>,
    pub stagnation_limit: Option<usize>,
    pub parallel: bool,
    pub time_limit_ms: Option<u64>,
    pub node_limit: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        let search = SearchConfig::default();
        Self {
            weights: PenaltyWeights::default(),
            crossover_rate: search.crossover_rate,
            tournament_size: search.tournament_size,
            elite_count: search.elite_count,
            stagnation_limit: search.stagnation_limit,
            parallel: search.parallel,
            time_limit_ms: None,
            node_limit: search.node_limit,
        }
    }
}

impl EngineConfig {
    /// Parses a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self, TimetableError> {
        Ok(toml::from_str(source)?)
    }

    /// Base search configuration; requests override population, generations,
    /// mutation rate and seed.
    pub fn search_config(&self) -> SearchConfig {
        SearchConfig {
            crossover_rate: self.crossover_rate,
            tournament_size: self.tournament_size,
            elite_count: self.elite_count,
            stagnation_limit: self.stagnation_limit,
            parallel: self.parallel,
            time_limit: self.time_limit_ms.map(Duration::from_millis),
            node_limit: self.node_limit,
            ..SearchConfig::default()
        }
    }
}
