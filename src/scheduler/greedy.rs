//! Greedy construction with iterative repair.
//!
//! # Algorithm
//!
//! 1. Order sessions most-constrained first (fewest faculty × room
//!    options, longest span first) and place them one by one with the
//!    candidate builder.
//! 2. Each round, re-place the sessions involved in hard violations
//!    against the bookings of all others. With no violations left, a random
//!    subset (per-gene probability `mutation_rate`) is re-placed instead to
//!    improve the soft score.
//! 3. A round's result is kept only if it scores strictly higher.
//! 4. Stop after `max_generations` rounds, at the ceiling, on stagnation or
//!    at the deadline.
//!
//! # Complexity
//! O(r · n · c) where r = rounds, n = sessions, c = candidate cells.
//!
//! # Reference
//! Schaerf (1999), "A Survey of Automated Timetabling", Sec. 3.1

use std::time::Instant;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, instrument, warn};

use super::{most_constrained_order, round_stats};
use crate::builder::CandidateBuilder;
use crate::config::SearchConfig;
use crate::fitness::FitnessEvaluator;
use crate::ga::{mutation_points, Candidate};
use crate::problem::TimetableProblem;
use crate::strategy::{SchedulingStrategy, StrategyOutcome};

/// Registry name of [`GreedyRepairScheduler`].
pub const GREEDY_REPAIR: &str = "greedy-repair";

/// Most-constrained-first construction plus hill-climbing repair.
///
/// # Example
///
/// ```
/// use u_timetable::config::{PenaltyWeights, SearchConfig};
/// use u_timetable::models::{weekday_hourly_grid, Division, EntitySnapshot, Faculty, Room, Subject};
/// use u_timetable::problem::TimetableProblem;
/// use u_timetable::scheduler::GreedyRepairScheduler;
/// use u_timetable::strategy::SchedulingStrategy;
///
/// let slots = weekday_hourly_grid(9, 12);
/// let snapshot = EntitySnapshot::new()
///     .with_division(Division::new("A", 30).with_subject("MATH"))
///     .with_subject(Subject::theory("MATH", 2))
///     .with_faculty(Faculty::new("F1", 10).with_subject("MATH").available_for_slots(&slots))
///     .with_room(Room::classroom("R1", 30))
///     .with_time_slots(slots);
/// let problem = TimetableProblem::new(snapshot, None, PenaltyWeights::default()).unwrap();
///
/// let outcome = GreedyRepairScheduler.run(&problem, &SearchConfig::default().with_seed(1));
/// assert!(outcome.conflicts.is_empty());
/// assert_eq!(outcome.candidate.len(), 2);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct GreedyRepairScheduler;

impl SchedulingStrategy for GreedyRepairScheduler {
    fn name(&self) -> &str {
        GREEDY_REPAIR
    }

    #[instrument(skip_all, fields(sessions = problem.sessions().len()))]
    fn run(&self, problem: &TimetableProblem, config: &SearchConfig) -> StrategyOutcome {
        let started = Instant::now();
        let seed = config.seed.unwrap_or_else(|| rand::rng().random());
        let deadline = config.time_limit.map(|limit| started + limit);
        let mut rng = SmallRng::seed_from_u64(seed);
        let builder = CandidateBuilder::new(problem);
        let evaluator = FitnessEvaluator::new(problem);
        let ceiling = evaluator.ceiling();

        let order = most_constrained_order(problem);
        let mut current = builder.build_ordered(&order, &mut rng);
        current.fitness = evaluator.evaluate(&current.genes);
        let mut history = vec![round_stats(0, current.fitness, current.fitness)];
        let mut stagnant = 0;
        let mut truncated = false;

        for round in 1..=config.max_generations {
            if current.is_empty() || current.fitness >= ceiling {
                break;
            }
            if deadline.is_some_and(|d| Instant::now() >= d) {
                truncated = true;
                warn!(round, fitness = current.fitness, "time limit reached");
                break;
            }

            let mut targets = evaluator.violating_genes(&current.genes);
            if targets.is_empty() {
                targets = mutation_points(current.len(), config.mutation_rate, &mut rng);
                if targets.is_empty() {
                    targets.push(rng.random_range(0..current.len()));
                }
            }

            let mut trial = current.genes.clone();
            builder.reassign(&mut trial, &targets, &mut rng);
            let fitness = evaluator.evaluate(&trial);
            if fitness > current.fitness {
                current = Candidate {
                    genes: trial,
                    fitness,
                };
                stagnant = 0;
            } else {
                stagnant += 1;
            }
            history.push(round_stats(round, current.fitness, fitness));

            if config.stagnation_limit.is_some_and(|limit| stagnant >= limit) {
                debug!(round, stagnant, "stagnation limit reached");
                break;
            }
        }

        info!(
            rounds = history.len() - 1,
            fitness = current.fitness,
            truncated,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "greedy repair finished"
        );
        StrategyOutcome::finalize(problem, current)
            .with_history(history)
            .with_truncated(truncated)
            .with_seed(seed)
    }
}
