//! Timetabling GA problem definition.
//!
//! Implements [`GaProblem`] for [`TimetableProblem`]. Bridges the
//! constructive builder, the genetic operators and the fitness evaluator
//! to the generic GA loop.
//!
//! Every child is repaired before evaluation, so the population only ever
//! holds candidates the builder could have produced.

use rand::Rng;

use super::chromosome::Candidate;
use super::operators::{GeneticOperators, MutationType};
use super::runner::GaProblem;
use crate::builder::CandidateBuilder;
use crate::fitness::FitnessEvaluator;
use crate::problem::TimetableProblem;

/// GA problem definition for timetable optimization.
///
/// # Example
/// ```
/// use u_timetable::config::{PenaltyWeights, SearchConfig};
/// use u_timetable::ga::{GaRunner, TimetableGaProblem};
/// use u_timetable::models::{weekday_hourly_grid, Division, EntitySnapshot, Faculty, Room, Subject};
/// use u_timetable::problem::TimetableProblem;
///
/// let slots = weekday_hourly_grid(9, 12);
/// let snapshot = EntitySnapshot::new()
///     .with_division(Division::new("A", 30).with_subject("MATH"))
///     .with_subject(Subject::theory("MATH", 2))
///     .with_faculty(Faculty::new("F1", 10).with_subject("MATH").available_for_slots(&slots))
///     .with_room(Room::classroom("C1", 30))
///     .with_time_slots(slots);
/// let problem = TimetableProblem::new(snapshot, None, PenaltyWeights::default()).unwrap();
///
/// let ga = TimetableGaProblem::new(&problem);
/// let result = GaRunner::run(&ga, &SearchConfig::default().with_seed(1).with_max_generations(5));
/// assert_eq!(result.best.genes.len(), 2);
/// ```
pub struct TimetableGaProblem<'p> {
    problem: &'p TimetableProblem,
    builder: CandidateBuilder<'p>,
    evaluator: FitnessEvaluator<'p>,
    operators: GeneticOperators,
}

impl<'p> TimetableGaProblem<'p> {
    /// Creates a GA problem with default operators.
    pub fn new(problem: &'p TimetableProblem) -> Self {
        Self {
            problem,
            builder: CandidateBuilder::new(problem),
            evaluator: FitnessEvaluator::new(problem),
            operators: GeneticOperators::default(),
        }
    }

    /// Sets the genetic operators.
    pub fn with_operators(mut self, operators: GeneticOperators) -> Self {
        self.operators = operators;
        self
    }

    pub fn problem(&self) -> &'p TimetableProblem {
        self.problem
    }
}

impl GaProblem for TimetableGaProblem<'_> {
    type Individual = Candidate;

    fn create_individual<R: Rng>(&self, rng: &mut R) -> Candidate {
        self.builder.build(rng)
    }

    fn evaluate(&self, individual: &Candidate) -> f64 {
        self.evaluator.evaluate(&individual.genes)
    }

    fn crossover<R: Rng>(&self, p1: &Candidate, p2: &Candidate, rng: &mut R) -> Candidate {
        let mut genes = self
            .operators
            .crossover(&p1.genes, &p2.genes, self.problem, rng);
        self.builder.repair(&mut genes, rng);
        Candidate::new(genes)
    }

    fn mutate<R: Rng>(&self, individual: &mut Candidate, rate: f64, rng: &mut R) {
        let touched = self
            .operators
            .mutate(&mut individual.genes, self.problem, rate, rng);
        if touched.is_empty() {
            return;
        }
        match self.operators.mutation_type {
            MutationType::Reassign => self.builder.reassign(&mut individual.genes, &touched, rng),
            MutationType::SlotSwap => {
                self.builder.repair(&mut individual.genes, rng);
            }
        }
    }

    fn is_optimal(&self, fitness: f64) -> bool {
        fitness >= self.evaluator.ceiling()
    }
}
