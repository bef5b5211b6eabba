//! Request-level entry point.
//!
//! [`TimetableEngine`] holds an immutable [`EntitySnapshot`], the engine
//! configuration and the strategy registry. Every call builds its own
//! [`TimetableProblem`], so one engine can serve concurrent requests.
//!
//! # Error policy
//!
//! Input problems (unknown division, empty scope, invalid snapshot,
//! out-of-range parameters) and unknown algorithm names fail the request
//! before any search starts. Everything else is reported as data:
//! conflicts, unresolved-session and timeout warnings on a successful
//! response.
//!
//! # Example
//!
//! ```
//! use u_timetable::engine::{GenerateRequest, TimetableEngine};
//! use u_timetable::models::{weekday_hourly_grid, Division, EntitySnapshot, Faculty, Room, Subject};
//!
//! let slots = weekday_hourly_grid(9, 13);
//! let snapshot = EntitySnapshot::new()
//!     .with_division(Division::new("A", 30).with_subject("MATH"))
//!     .with_subject(Subject::theory("MATH", 3))
//!     .with_faculty(Faculty::new("F1", 10).with_subject("MATH").available_for_slots(&slots))
//!     .with_room(Room::classroom("R1", 30))
//!     .with_time_slots(slots);
//!
//! let engine = TimetableEngine::new(snapshot);
//! let request = GenerateRequest::default()
//!     .with_population_size(10)
//!     .with_generations(5)
//!     .with_seed(42);
//! let response = engine.handle_generate(&request);
//! assert!(response.success);
//! assert_eq!(response.schedule.len(), 3);
//! assert!(response.conflicts.is_empty());
//! ```

mod request;
mod response;

pub use request::{AlgorithmSelection, CompareRequest, GenerateRequest, RunParameters};
pub use response::{
    AlgorithmResult, CompareResponse, EngineWarning, GenerateResponse, WarningKind,
};

use std::sync::Arc;

use tracing::{info, instrument, warn};

use crate::config::{EngineConfig, SearchConfig};
use crate::error::TimetableError;
use crate::models::EntitySnapshot;
use crate::problem::TimetableProblem;
use crate::scheduler::TimetableKpi;
use crate::strategy::{compare, StrategyOutcome, StrategyRegistry, StrategyReport};

/// Timetable generation service over one entity snapshot.
#[derive(Debug)]
pub struct TimetableEngine {
    snapshot: Arc<EntitySnapshot>,
    config: EngineConfig,
    registry: StrategyRegistry,
}

impl TimetableEngine {
    /// Creates an engine with default configuration and strategies.
    pub fn new(snapshot: impl Into<Arc<EntitySnapshot>>) -> Self {
        Self {
            snapshot: snapshot.into(),
            config: EngineConfig::default(),
            registry: StrategyRegistry::default(),
        }
    }

    /// Replaces the engine configuration.
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Replaces the strategy registry.
    pub fn with_registry(mut self, registry: StrategyRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn snapshot(&self) -> &EntitySnapshot {
        &self.snapshot
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn registry(&self) -> &StrategyRegistry {
        &self.registry
    }

    /// Generates one timetable with the requested strategy.
    ///
    /// # Errors
    /// - [`TimetableError::AlgorithmNotFound`] for an unregistered name
    /// - any input error from [`TimetableProblem::new`] or
    ///   [`SearchConfig::validate`]
    #[instrument(skip_all, fields(algorithm = %request.algorithm))]
    pub fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse, TimetableError> {
        let Some((_, strategy)) = self.registry.get(&request.algorithm) else {
            return Err(TimetableError::AlgorithmNotFound(request.algorithm.clone()));
        };
        let (problem, config) = self.prepare(&request.params)?;
        let outcome = strategy.run(&problem, &config);
        info!(
            fitness = outcome.fitness,
            conflicts = outcome.conflicts.len(),
            truncated = outcome.truncated,
            "timetable generated"
        );
        Ok(success_response(&problem, strategy.name(), outcome))
    }

    /// Like [`generate`](Self::generate), folding errors into the failure
    /// payload.
    pub fn handle_generate(&self, request: &GenerateRequest) -> GenerateResponse {
        self.generate(request).unwrap_or_else(|e| {
            warn!(error = %e, "generation failed");
            GenerateResponse::failure(&request.algorithm, e)
        })
    }

    /// Runs several strategies and returns the best schedule together with
    /// every strategy's result.
    ///
    /// # Errors
    /// Input errors only; unknown algorithm names become error entries in
    /// `all_results`.
    #[instrument(skip_all)]
    pub fn compare(&self, request: &CompareRequest) -> Result<CompareResponse, TimetableError> {
        let names = request.algorithms.resolve(&self.registry);
        if names.is_empty() {
            return Err(TimetableError::InvalidParameter(
                "at least one algorithm must be requested".into(),
            ));
        }
        let (problem, config) = self.prepare(&request.params)?;
        let comparison = compare(&self.registry, &names, &problem, &config);

        let winner = comparison.winner;
        let mut all_results = Vec::with_capacity(comparison.reports.len());
        let mut best = None;
        for (i, report) in comparison.reports.into_iter().enumerate() {
            all_results.push(algorithm_result(&report));
            if Some(i) == winner {
                if let Ok(outcome) = report.outcome {
                    best = Some((report.algorithm, outcome));
                }
            }
        }

        let Some((algorithm, outcome)) = best else {
            warn!("no requested algorithm produced a schedule");
            return Ok(CompareResponse {
                all_results,
                ..CompareResponse::failure("no requested algorithm produced a schedule")
            });
        };
        info!(best = %algorithm, fitness = outcome.fitness, "comparison finished");
        let generated = success_response(&problem, &algorithm, outcome);
        Ok(CompareResponse {
            success: true,
            best_algorithm: Some(algorithm),
            schedule: generated.schedule,
            fitness_score: generated.fitness_score,
            conflicts: generated.conflicts,
            warnings: generated.warnings,
            all_results,
            error: None,
        })
    }

    /// Like [`compare`](Self::compare), folding errors into the failure
    /// payload.
    pub fn handle_compare(&self, request: &CompareRequest) -> CompareResponse {
        self.compare(request).unwrap_or_else(|e| {
            warn!(error = %e, "comparison failed");
            CompareResponse::failure(e)
        })
    }

    fn prepare(
        &self,
        params: &RunParameters,
    ) -> Result<(TimetableProblem, SearchConfig), TimetableError> {
        let config = params.apply(self.config.search_config());
        config.validate()?;
        let problem = TimetableProblem::new(
            Arc::clone(&self.snapshot),
            params.division_id.as_deref(),
            self.config.weights.clone(),
        )?;
        Ok((problem, config))
    }
}

fn success_response(
    problem: &TimetableProblem,
    algorithm: &str,
    outcome: StrategyOutcome,
) -> GenerateResponse {
    let genes = &outcome.candidate.genes;
    GenerateResponse {
        success: true,
        algorithm: algorithm.to_string(),
        schedule: problem.entries(genes),
        fitness_score: outcome.fitness,
        kpi: Some(TimetableKpi::calculate(problem, genes)),
        warnings: collect_warnings(problem, &outcome),
        conflicts: outcome.conflicts,
        generation_history: outcome.history,
        truncated: outcome.truncated,
        seed: outcome.seed,
        error: None,
    }
}

fn collect_warnings(problem: &TimetableProblem, outcome: &StrategyOutcome) -> Vec<EngineWarning> {
    let mut warnings = Vec::new();
    for (i, gene) in outcome.candidate.genes.iter().enumerate() {
        let missing = match (gene.faculty, gene.room) {
            (Some(_), Some(_)) => continue,
            (None, Some(_)) => "faculty",
            (Some(_), None) => "room",
            (None, None) => "faculty or room",
        };
        let label = problem.session_label(i);
        warn!(session = %label, missing, "session left unresolved");
        warnings.push(EngineWarning::unresolved(format!(
            "session {label} has no eligible {missing}"
        )));
    }
    if outcome.truncated {
        let rounds = outcome.history.len().saturating_sub(1);
        warnings.push(EngineWarning::timeout(format!(
            "search stopped early after {rounds} generations; returning the best schedule found"
        )));
    }
    warnings
}

fn algorithm_result(report: &StrategyReport) -> AlgorithmResult {
    match &report.outcome {
        Ok(outcome) => AlgorithmResult {
            algorithm: report.algorithm.clone(),
            fitness_score: Some(outcome.fitness),
            conflict_count: outcome.conflicts.len(),
            conflicts: outcome.conflicts.clone(),
            truncated: outcome.truncated,
            elapsed_ms: report.elapsed_ms,
            error: None,
        },
        Err(e) => AlgorithmResult {
            algorithm: report.algorithm.clone(),
            fitness_score: None,
            conflict_count: 0,
            conflicts: Vec::new(),
            truncated: false,
            elapsed_ms: report.elapsed_ms,
            error: Some(e.to_string()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use crate::models::{
        count_kind, weekday_hourly_grid, ConflictKind, Day, Division, Faculty, Room, SessionType,
        Subject,
    };

    fn request() -> GenerateRequest {
        GenerateRequest::default()
            .with_population_size(20)
            .with_generations(10)
            .with_seed(42)
    }

    #[test]
    fn test_single_division_scenario() {
        let engine = TimetableEngine::new(fixtures::single_division());
        let resp = engine.generate(&request().with_division("A")).unwrap();

        assert!(resp.success);
        assert_eq!(resp.algorithm, "genetic");
        assert_eq!(resp.schedule.len(), 4);
        assert!(resp.schedule.iter().all(|e| e.division_id == "A"));
        let theory = resp
            .schedule
            .iter()
            .filter(|e| e.session_type == SessionType::Theory)
            .count();
        assert_eq!(theory, 3);
        let lab: Vec<_> = resp
            .schedule
            .iter()
            .filter(|e| e.session_type == SessionType::Lab)
            .collect();
        assert_eq!(lab.len(), 1);
        assert_eq!(lab[0].duration_minutes(), 120);

        assert!(resp.conflicts.is_empty());
        assert!(resp.warnings.is_empty());
        assert!(resp.fitness_score >= 90.0);
        assert!(resp.fitness_score <= 100.0);
        assert_eq!(resp.seed, Some(42));
        assert!(resp.kpi.is_some());
    }

    #[test]
    fn test_overload_scenario() {
        let engine = TimetableEngine::new(fixtures::single_division_with_budget(2));
        let resp = engine.generate(&request()).unwrap();
        assert!(resp.success);
        assert_eq!(resp.schedule.len(), 4);
        assert!(count_kind(&resp.conflicts, ConflictKind::FacultyOverload) >= 1);
        assert!(resp.fitness_score < 100.0);
    }

    #[test]
    fn test_determinism() {
        let engine = TimetableEngine::new(fixtures::two_divisions());
        let a = serde_json::to_string(&engine.generate(&request()).unwrap()).unwrap();
        let b = serde_json::to_string(&engine.generate(&request()).unwrap()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_history_monotonic() {
        let engine = TimetableEngine::new(fixtures::two_divisions());
        let resp = engine.generate(&request()).unwrap();
        assert!(!resp.generation_history.is_empty());
        for pair in resp.generation_history.windows(2) {
            assert!(pair[1].best_fitness >= pair[0].best_fitness);
        }
    }

    #[test]
    fn test_no_double_booking() {
        let engine = TimetableEngine::new(fixtures::two_divisions());
        let resp = engine.generate(&request()).unwrap();
        for (i, a) in resp.schedule.iter().enumerate() {
            for b in &resp.schedule[i + 1..] {
                let overlap = a.day == b.day && a.start < b.end && b.start < a.end;
                if overlap {
                    assert_ne!(a.faculty_id, b.faculty_id);
                    assert_ne!(a.room_id, b.room_id);
                }
            }
        }
        // session-count conservation: A 3+2, B 3+1
        assert_eq!(resp.schedule.len(), 9);
    }

    #[test]
    fn test_capacity_respected() {
        let slots = weekday_hourly_grid(9, 17);
        let snapshot = EntitySnapshot::new()
            .with_division(Division::new("A", 50).with_subject("TH"))
            .with_subject(Subject::theory("TH", 4))
            .with_faculty(Faculty::new("F1", 20).with_subject("TH").available_for_slots(&slots))
            .with_room(Room::classroom("SMALL", 20))
            .with_room(Room::classroom("BIG", 60))
            .with_time_slots(slots);
        let engine = TimetableEngine::new(snapshot);
        let students = engine.snapshot().divisions[0].student_count;
        for algorithm in ["genetic", "greedy-repair", "backtracking"] {
            let req = GenerateRequest {
                algorithm: algorithm.to_string(),
                ..request()
            };
            let resp = engine.generate(&req).unwrap();
            assert_eq!(resp.schedule.len(), 4, "{algorithm}");
            assert!(resp.conflicts.is_empty(), "{algorithm}");
            for entry in &resp.schedule {
                let room = engine
                    .snapshot()
                    .rooms
                    .iter()
                    .find(|r| Some(&r.id) == entry.room_id.as_ref())
                    .unwrap();
                assert!(room.capacity >= students, "{algorithm}: {}", room.id);
            }
        }
    }

    #[test]
    fn test_budget_respected_when_feasible() {
        // F1 has spare hours on Monday only; F2 has none but is free all week
        let slots = weekday_hourly_grid(9, 17);
        let monday: Vec<_> = slots.iter().filter(|s| s.day == Day::Monday).cloned().collect();
        let snapshot = EntitySnapshot::new()
            .with_division(Division::new("A", 30).with_subject("TH"))
            .with_subject(Subject::theory("TH", 1))
            .with_faculty(Faculty::new("F1", 10).with_subject("TH").available_for_slots(&monday))
            .with_faculty(Faculty::new("F2", 0).with_subject("TH").available_for_slots(&slots))
            .with_room(Room::classroom("C1", 30))
            .with_time_slots(slots);
        let engine = TimetableEngine::new(snapshot);
        for algorithm in ["genetic", "greedy-repair", "backtracking"] {
            for seed in 0..20 {
                let req = GenerateRequest::new(algorithm)
                    .with_population_size(4)
                    .with_generations(2)
                    .with_seed(seed);
                let resp = engine.generate(&req).unwrap();
                assert_eq!(
                    count_kind(&resp.conflicts, ConflictKind::FacultyOverload),
                    0,
                    "{algorithm} seed {seed}"
                );
                assert_eq!(resp.schedule[0].faculty_id.as_deref(), Some("F1"));
                assert_eq!(resp.schedule[0].day, Day::Monday);
            }
        }
    }

    #[test]
    fn test_division_scope() {
        let engine = TimetableEngine::new(fixtures::two_divisions());
        let resp = engine.generate(&request().with_division("B")).unwrap();
        assert_eq!(resp.schedule.len(), 4);
        assert!(resp.schedule.iter().all(|e| e.division_id == "B"));
    }

    #[test]
    fn test_input_errors() {
        let engine = TimetableEngine::new(fixtures::single_division());

        let err = engine.generate(&request().with_division("Z")).unwrap_err();
        assert!(matches!(err, TimetableError::UnknownDivision(_)));
        assert!(err.is_input_error());

        let err = engine
            .generate(&request().with_population_size(0))
            .unwrap_err();
        assert!(matches!(err, TimetableError::InvalidParameter(_)));

        let err = engine.generate(&request().with_mutation_rate(1.5)).unwrap_err();
        assert!(err.is_input_error());

        let err = engine.generate(&GenerateRequest::new("annealing")).unwrap_err();
        assert!(matches!(err, TimetableError::AlgorithmNotFound(_)));
    }

    #[test]
    fn test_empty_scope_fails_fast() {
        let mut snapshot = fixtures::single_division();
        snapshot.rooms.clear();
        let engine = TimetableEngine::new(snapshot);
        let resp = engine.handle_generate(&request());
        assert!(!resp.success);
        assert!(resp.schedule.is_empty());
        assert_eq!(
            resp.error.as_deref(),
            Some("no rooms available for the requested scope")
        );
    }

    #[test]
    fn test_unresolved_warning() {
        let slots = weekday_hourly_grid(9, 11);
        let snapshot = EntitySnapshot::new()
            .with_division(Division::new("A", 10).with_subject("S").with_subject("T"))
            .with_subject(Subject::theory("S", 1))
            .with_subject(Subject::theory("T", 1))
            .with_faculty(Faculty::new("F", 10).with_subject("S").available_for_slots(&slots))
            .with_room(Room::classroom("C", 10))
            .with_time_slots(slots);
        let engine = TimetableEngine::new(snapshot);
        let resp = engine.generate(&request()).unwrap();
        assert!(resp.success);
        assert_eq!(resp.schedule.len(), 2);
        assert!(resp
            .warnings
            .iter()
            .any(|w| w.kind == WarningKind::UnresolvedSession));
        assert_eq!(count_kind(&resp.conflicts, ConflictKind::UnresolvedSession), 1);
        assert!(resp.schedule.iter().any(|e| e.faculty_id.is_none()));
    }

    #[test]
    fn test_timeout_warning() {
        let engine = TimetableEngine::new(fixtures::single_division());
        let resp = engine.generate(&request().with_time_limit_ms(0)).unwrap();
        assert!(resp.success);
        assert!(resp.truncated);
        assert!(resp.warnings.iter().any(|w| w.kind == WarningKind::Timeout));
        assert_eq!(resp.schedule.len(), 4);
    }

    #[test]
    fn test_engine_config_applies() {
        let config = EngineConfig::from_toml_str("parallel = false\n[weights]\nceiling = 50.0\n")
            .unwrap();
        let engine = TimetableEngine::new(fixtures::single_division()).with_config(config);
        let resp = engine.generate(&request()).unwrap();
        assert!(resp.fitness_score <= 50.0);
    }

    #[test]
    fn test_compare_all() {
        let engine = TimetableEngine::new(fixtures::single_division());
        let req = CompareRequest::new(AlgorithmSelection::Keyword("all".into())).with_params(
            RunParameters {
                population_size: 20,
                generations: 10,
                seed: Some(42),
                ..RunParameters::default()
            },
        );
        let resp = engine.compare(&req).unwrap();
        assert!(resp.success);
        assert_eq!(resp.all_results.len(), 3);
        assert!(resp.all_results.iter().all(|r| r.error.is_none()));
        let best = resp.best_algorithm.clone().unwrap();
        let best_score = resp
            .all_results
            .iter()
            .filter_map(|r| r.fitness_score)
            .fold(f64::NEG_INFINITY, f64::max);
        assert_eq!(resp.fitness_score, best_score);
        assert!(resp.all_results.iter().any(|r| r.algorithm == best));
        assert_eq!(resp.schedule.len(), 4);
    }

    #[test]
    fn test_compare_unknown_algorithm() {
        let engine = TimetableEngine::new(fixtures::single_division());
        let req = CompareRequest::new(AlgorithmSelection::Named(vec![
            "annealing".into(),
            "greedy-repair".into(),
        ]))
        .with_params(RunParameters {
            generations: 10,
            seed: Some(1),
            ..RunParameters::default()
        });
        let resp = engine.compare(&req).unwrap();
        assert_eq!(resp.best_algorithm.as_deref(), Some("greedy-repair"));
        assert_eq!(resp.all_results[0].error.as_deref(), Some("unknown algorithm 'annealing'"));
        assert_eq!(resp.all_results[0].fitness_score, None);

        let req = CompareRequest::new(AlgorithmSelection::Named(vec!["annealing".into()]));
        let resp = engine.handle_compare(&req);
        assert!(!resp.success);
        assert_eq!(resp.all_results.len(), 1);
        assert!(resp.schedule.is_empty());
    }
}
