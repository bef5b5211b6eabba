//! Depth-first backtracking search.
//!
//! # Algorithm
//!
//! Sessions are assigned most-constrained first. For each session the
//! options (start cell × qualified faculty × suitable room) are shuffled
//! once with the run seed and tried in turn. An option is accepted only
//! under strict hard constraints: every covered slot free for the division,
//! faculty and room, faculty available, and faculty within budget. A dead
//! end undoes the previous assignment and tries its next option.
//!
//! The search is bounded by `node_limit` (options tried) and the deadline.
//! When it is cut off, or proves that no strict assignment exists, the
//! deepest partial assignment reached is completed by the candidate
//! builder, which relaxes the budget and falls back to placeholders.
//!
//! # Complexity
//! Exponential in the worst case; bounded by `node_limit`.
//!
//! # Reference
//! Carter & Laporte (1998), "Recent developments in practical course
//! timetabling", Sec. 4

use std::time::Instant;

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, instrument, warn};

use super::{most_constrained_order, round_stats};
use crate::builder::CandidateBuilder;
use crate::config::SearchConfig;
use crate::constraints::{within_budget, ResourceTracker};
use crate::ga::{Candidate, Placement};
use crate::problem::TimetableProblem;
use crate::strategy::{SchedulingStrategy, StrategyOutcome};

/// Registry name of [`BacktrackingScheduler`].
pub const BACKTRACKING: &str = "backtracking";

/// Deadline is polled once per this many nodes.
const DEADLINE_POLL: usize = 256;

/// Exhaustive depth-first search with a node budget.
#[derive(Debug, Clone, Copy, Default)]
pub struct BacktrackingScheduler;

impl SchedulingStrategy for BacktrackingScheduler {
    fn name(&self) -> &str {
        BACKTRACKING
    }

    #[instrument(skip_all, fields(sessions = problem.sessions().len(), node_limit = config.node_limit))]
    fn run(&self, problem: &TimetableProblem, config: &SearchConfig) -> StrategyOutcome {
        let started = Instant::now();
        let seed = config.seed.unwrap_or_else(|| rand::rng().random());
        let mut rng = SmallRng::seed_from_u64(seed);
        let builder = CandidateBuilder::new(problem);

        let order = most_constrained_order(problem);
        let options = order
            .iter()
            .map(|&index| {
                let mut opts = enumerate_options(problem, index);
                opts.shuffle(&mut rng);
                opts
            })
            .collect();

        let mut search = Search {
            builder,
            order: &order,
            options,
            tracker: ResourceTracker::new(),
            genes: vec![Placement::default(); order.len()],
            deepest: 0,
            deepest_genes: Vec::new(),
            nodes: 0,
            node_limit: config.node_limit,
            deadline: config.time_limit.map(|limit| started + limit),
            aborted: false,
        };
        let complete = search.descend(0);
        let (nodes, aborted) = (search.nodes, search.aborted);

        let genes = if complete {
            debug!(nodes, "complete assignment found");
            search.genes
        } else {
            if aborted {
                warn!(nodes, depth = search.deepest, "search budget exhausted");
            } else {
                debug!(nodes, depth = search.deepest, "no strict assignment exists");
            }
            let (kept, rest) = order.split_at(search.deepest);
            complete_partial(&builder, kept, search.deepest_genes, rest, &mut rng)
        };

        let outcome = StrategyOutcome::finalize(problem, Candidate::new(genes));
        info!(
            nodes,
            complete,
            fitness = outcome.fitness,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "backtracking finished"
        );
        let stats = round_stats(0, outcome.fitness, outcome.fitness);
        outcome
            .with_history(vec![stats])
            .with_truncated(aborted)
            .with_seed(seed)
    }
}

/// Every (cell, faculty, room) combination for session `index`.
fn enumerate_options(problem: &TimetableProblem, index: usize) -> Vec<Placement> {
    let session = problem.session(index);
    let cells = problem.placements(session.span);
    let mut options = Vec::with_capacity(cells.len() * session.faculty.len() * session.rooms.len());
    for &cell in cells {
        for &f in &session.faculty {
            if !problem.faculty_available(f, cell, session.span) {
                continue;
            }
            for &r in &session.rooms {
                options.push(Placement::new(cell, Some(f), Some(r)));
            }
        }
    }
    options
}

/// Books the kept prefix, then places the rest with the builder.
fn complete_partial<R: Rng>(
    builder: &CandidateBuilder,
    kept: &[usize],
    mut genes: Vec<Placement>,
    rest: &[usize],
    rng: &mut R,
) -> Vec<Placement> {
    let total = builder.problem().sessions().len();
    genes.resize(total, Placement::default());
    let mut tracker = ResourceTracker::new();
    for &index in kept {
        builder.occupy(index, &genes[index], &mut tracker);
    }
    for &index in rest {
        genes[index] = builder.place_session(index, &mut tracker, rng);
    }
    genes
}

struct Search<'a, 'p> {
    builder: CandidateBuilder<'p>,
    order: &'a [usize],
    /// Shuffled options per order position.
    options: Vec<Vec<Placement>>,
    tracker: ResourceTracker,
    genes: Vec<Placement>,
    /// Most sessions assigned at once, and the genes at that point.
    deepest: usize,
    deepest_genes: Vec<Placement>,
    nodes: usize,
    node_limit: usize,
    deadline: Option<Instant>,
    aborted: bool,
}

impl Search<'_, '_> {
    /// Assigns `order[depth..]`. Returns `true` on a complete assignment.
    fn descend(&mut self, depth: usize) -> bool {
        if depth > self.deepest || self.deepest_genes.is_empty() {
            self.deepest = depth;
            self.deepest_genes.clone_from(&self.genes);
        }
        if depth == self.order.len() {
            return true;
        }

        let index = self.order[depth];
        for k in 0..self.options[depth].len() {
            if self.out_of_budget() {
                self.aborted = true;
                return false;
            }
            self.nodes += 1;

            let placement = self.options[depth][k];
            if !self.accepts(index, &placement) {
                continue;
            }
            self.builder.occupy(index, &placement, &mut self.tracker);
            self.genes[index] = placement;
            if self.descend(depth + 1) {
                return true;
            }
            self.builder.release(index, &placement, &mut self.tracker);
            if self.aborted {
                return false;
            }
        }
        false
    }

    fn accepts(&self, index: usize, placement: &Placement) -> bool {
        let problem = self.builder.problem();
        let session = problem.session(index);
        placement.faculty.is_some_and(|f| {
            within_budget(problem.faculty(f), self.tracker.hours(f), session.hours)
        }) && self.builder.fits(index, placement, &self.tracker)
    }

    fn out_of_budget(&self) -> bool {
        if self.nodes >= self.node_limit {
            return true;
        }
        self.nodes % DEADLINE_POLL == 0 && self.deadline.is_some_and(|d| Instant::now() >= d)
    }
}
