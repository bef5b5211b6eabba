//! Generational GA loop.
//!
//! Elitist generational replacement with tournament selection:
//!
//! 1. Build and evaluate the initial population.
//! 2. Each generation: carry the elite over unchanged, then fill the rest
//!    with children (tournament parents, crossover with probability
//!    `crossover_rate`, mutation, evaluation).
//! 3. Stop at the generation cap, on stagnation, on reaching the optimum,
//!    or when the deadline passes (result marked truncated).
//!
//! Children of one generation are independent, so they are produced on
//! the rayon pool. Every child draws from its own RNG stream derived from
//! `(seed, generation, index)`, which keeps results identical whether the
//! loop runs in parallel or not.
//!
//! # Reference
//! - Goldberg (1989), "Genetic Algorithms in Search, Optimization and
//!   Machine Learning"
//! - Burke & Petrovic (2002), "Recent research directions in automated
//!   timetabling"

use std::ops::Range;
use std::time::{Duration, Instant};

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::SearchConfig;

/// A member of the population. Higher fitness = better.
pub trait Individual: Clone + Send + Sync {
    fn fitness(&self) -> f64;
    fn set_fitness(&mut self, fitness: f64);
}

/// Problem definition driven by [`GaRunner`].
pub trait GaProblem: Sync {
    type Individual: Individual;

    /// Creates a random individual.
    fn create_individual<R: Rng>(&self, rng: &mut R) -> Self::Individual;

    /// Scores an individual.
    fn evaluate(&self, individual: &Self::Individual) -> f64;

    /// Produces one child from two parents.
    fn crossover<R: Rng>(
        &self,
        p1: &Self::Individual,
        p2: &Self::Individual,
        rng: &mut R,
    ) -> Self::Individual;

    /// Mutates an individual in place.
    fn mutate<R: Rng>(&self, individual: &mut Self::Individual, rate: f64, rng: &mut R);

    /// Whether `fitness` cannot be improved upon.
    fn is_optimal(&self, _fitness: f64) -> bool {
        false
    }
}

/// Per-generation progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationStats {
    pub generation: usize,
    /// Best fitness seen so far (never decreases).
    pub best_fitness: f64,
    /// Best fitness in this generation's population.
    pub generation_best: f64,
    pub mean_fitness: f64,
}

/// Outcome of a GA run.
#[derive(Debug, Clone)]
pub struct GaResult<I> {
    pub best: I,
    pub best_fitness: f64,
    /// Generations completed after the initial population.
    pub generations: usize,
    /// Entry 0 describes the initial population.
    pub history: Vec<GenerationStats>,
    /// The deadline stopped the run early.
    pub truncated: bool,
    /// Seed actually used.
    pub seed: u64,
    pub elapsed: Duration,
}

/// Executes GA runs.
pub struct GaRunner;

impl GaRunner {
    /// Runs the GA to completion.
    pub fn run<P: GaProblem>(problem: &P, config: &SearchConfig) -> GaResult<P::Individual> {
        let started = Instant::now();
        let seed = config.seed.unwrap_or_else(|| rand::rng().random());
        let deadline = config.time_limit.map(|limit| started + limit);
        let size = config.population_size.max(1);
        let elite = config.effective_elite_count().max(1).min(size);
        let crossover_rate = config.crossover_rate.clamp(0.0, 1.0);
        let tournament = config.tournament_size.max(1);

        let mut population = par_map(config.parallel, 0..size, |i| {
            let mut rng = SmallRng::seed_from_u64(stream_seed(seed, 0, i));
            let mut individual = problem.create_individual(&mut rng);
            let fitness = problem.evaluate(&individual);
            individual.set_fitness(fitness);
            individual
        });
        sort_best_first(&mut population);

        let mut best = population[0].clone();
        let mut history = vec![stats(0, best.fitness(), &population)];
        let mut generations = 0;
        let mut stagnant = 0;
        let mut truncated = false;

        for generation in 1..=config.max_generations {
            if problem.is_optimal(best.fitness()) {
                debug!(generation, "optimum reached");
                break;
            }
            if deadline.is_some_and(|d| Instant::now() >= d) {
                truncated = true;
                info!(generation, best = best.fitness(), "time limit reached");
                break;
            }

            let parents = &population;
            let offspring = par_map(config.parallel, elite..size, |i| {
                let mut rng = SmallRng::seed_from_u64(stream_seed(seed, generation, i));
                let p1 = tournament_select(parents, tournament, &mut rng);
                let p2 = tournament_select(parents, tournament, &mut rng);
                let mut child = if rng.random_bool(crossover_rate) {
                    problem.crossover(p1, p2, &mut rng)
                } else {
                    p1.clone()
                };
                problem.mutate(&mut child, config.mutation_rate, &mut rng);
                let fitness = problem.evaluate(&child);
                child.set_fitness(fitness);
                child
            });

            let mut next: Vec<P::Individual> = population[..elite].to_vec();
            next.extend(offspring);
            sort_best_first(&mut next);
            population = next;
            generations = generation;

            if population[0].fitness() > best.fitness() {
                best = population[0].clone();
                stagnant = 0;
            } else {
                stagnant += 1;
            }
            history.push(stats(generation, best.fitness(), &population));

            if config.stagnation_limit.is_some_and(|limit| stagnant >= limit) {
                debug!(generation, stagnant, "stagnation limit reached");
                break;
            }
        }

        GaResult {
            best_fitness: best.fitness(),
            best,
            generations,
            history,
            truncated,
            seed,
            elapsed: started.elapsed(),
        }
    }
}

/// Derives an independent RNG seed for one `(generation, index)` pair.
pub(crate) fn stream_seed(seed: u64, generation: usize, index: usize) -> u64 {
    let mut z = seed
        ^ (generation as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)
        ^ (index as u64).wrapping_mul(0xD1B5_4A32_D192_ED03);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Maps `range` on the rayon pool or sequentially; output order follows
/// `range` either way.
pub(crate) fn par_map<T, F>(parallel: bool, range: Range<usize>, f: F) -> Vec<T>
where
    T: Send,
    F: Fn(usize) -> T + Sync + Send,
{
    if parallel {
        range.into_par_iter().map(f).collect()
    } else {
        range.map(f).collect()
    }
}

fn tournament_select<'a, I: Individual, R: Rng>(
    population: &'a [I],
    size: usize,
    rng: &mut R,
) -> &'a I {
    let mut winner = &population[rng.random_range(0..population.len())];
    for _ in 1..size {
        let challenger = &population[rng.random_range(0..population.len())];
        if challenger.fitness() > winner.fitness() {
            winner = challenger;
        }
    }
    winner
}

fn sort_best_first<I: Individual>(population: &mut [I]) {
    population.sort_by(|a, b| b.fitness().total_cmp(&a.fitness()));
}

fn stats<I: Individual>(generation: usize, best: f64, population: &[I]) -> GenerationStats {
    let total: f64 = population.iter().map(Individual::fitness).sum();
    GenerationStats {
        generation,
        best_fitness: best,
        generation_best: population.first().map_or(best, Individual::fitness),
        mean_fitness: total / population.len().max(1) as f64,
    }
}
