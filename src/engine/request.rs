//! Request payloads.

use serde::{Deserialize, Serialize};

use crate::config::SearchConfig;
use crate::ga::GENETIC;
use crate::strategy::StrategyRegistry;

/// Run parameters shared by generate and compare requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RunParameters {
    /// Division to schedule; `None` schedules every division.
    pub division_id: Option<String>,
    pub population_size: usize,
    pub generations: usize,
    pub mutation_rate: f64,
    pub seed: Option<u64>,
    /// Overrides the engine's time limit.
    pub time_limit_ms: Option<u64>,
}

impl Default for RunParameters {
    fn default() -> Self {
        Self {
            division_id: None,
            population_size: 50,
            generations: 100,
            mutation_rate: 0.1,
            seed: None,
            time_limit_ms: None,
        }
    }
}

impl RunParameters {
    /// Overlays these parameters on an engine base configuration.
    pub fn apply(&self, base: SearchConfig) -> SearchConfig {
        let mut config = base
            .with_population_size(self.population_size)
            .with_max_generations(self.generations)
            .with_mutation_rate(self.mutation_rate);
        config.seed = self.seed;
        if let Some(ms) = self.time_limit_ms {
            config.time_limit = Some(std::time::Duration::from_millis(ms));
        }
        config
    }
}

/// Request to generate one timetable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    #[serde(default = "default_algorithm")]
    pub algorithm: String,
    #[serde(flatten)]
    pub params: RunParameters,
}

impl Default for GenerateRequest {
    fn default() -> Self {
        Self {
            algorithm: default_algorithm(),
            params: RunParameters::default(),
        }
    }
}

impl GenerateRequest {
    pub fn new(algorithm: impl Into<String>) -> Self {
        Self {
            algorithm: algorithm.into(),
            params: RunParameters::default(),
        }
    }

    pub fn with_division(mut self, division_id: impl Into<String>) -> Self {
        self.params.division_id = Some(division_id.into());
        self
    }

    pub fn with_population_size(mut self, size: usize) -> Self {
        self.params.population_size = size;
        self
    }

    pub fn with_generations(mut self, generations: usize) -> Self {
        self.params.generations = generations;
        self
    }

    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.params.mutation_rate = rate;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.params.seed = Some(seed);
        self
    }

    pub fn with_time_limit_ms(mut self, ms: u64) -> Self {
        self.params.time_limit_ms = Some(ms);
        self
    }
}

fn default_algorithm() -> String {
    GENETIC.to_string()
}

/// Strategies requested for a comparison: a list of names or the keyword
/// `"all"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AlgorithmSelection {
    Named(Vec<String>),
    Keyword(String),
}

impl Default for AlgorithmSelection {
    fn default() -> Self {
        Self::Keyword("all".into())
    }
}

impl AlgorithmSelection {
    /// Resolves to concrete names. `"all"` (any case) expands to every
    /// registered strategy; any other keyword is taken as a single name.
    pub fn resolve(&self, registry: &StrategyRegistry) -> Vec<String> {
        match self {
            Self::Named(names) => names.clone(),
            Self::Keyword(k) if k.eq_ignore_ascii_case("all") => {
                registry.names().into_iter().map(str::to_string).collect()
            }
            Self::Keyword(k) => vec![k.clone()],
        }
    }
}

/// Request to run several strategies and keep the best.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompareRequest {
    #[serde(default)]
    pub algorithms: AlgorithmSelection,
    #[serde(flatten)]
    pub params: RunParameters,
}

impl CompareRequest {
    pub fn new(algorithms: AlgorithmSelection) -> Self {
        Self {
            algorithms,
            params: RunParameters::default(),
        }
    }

    pub fn with_params(mut self, params: RunParameters) -> Self {
        self.params = params;
        self
    }
}
