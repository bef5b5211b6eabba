//! Configurable genetic operators for timetabling.
//!
//! Provides runtime-selectable crossover and mutation strategies
//! via [`GeneticOperators`]. Operators only recombine or perturb genes;
//! the caller repairs the result with
//! [`CandidateBuilder`](crate::builder::CandidateBuilder).
//!
//! # Usage
//!
//! ```
//! use u_timetable::ga::operators::{CrossoverType, GeneticOperators, MutationType};
//!
//! let ops = GeneticOperators::default();
//! assert_eq!(ops.crossover_type, CrossoverType::DivisionBlock);
//! assert_eq!(ops.mutation_type, MutationType::Reassign);
//! ```

use rand::Rng;
use rand::prelude::IndexedRandom;

use super::chromosome::{
    block_crossover, mutation_points, one_point_crossover, uniform_crossover, Placement,
};
use crate::problem::TimetableProblem;

/// Crossover strategy for placement vectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrossoverType {
    /// Inherit each division's block whole from either parent.
    DivisionBlock,
    /// Single cut point over the whole vector.
    OnePoint,
    /// Per-gene coin flip.
    Uniform,
}

/// Mutation strategy for placement vectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationType {
    /// Chosen genes are re-placed from scratch.
    Reassign,
    /// Chosen genes swap start cells with another session of the same
    /// division and span.
    SlotSwap,
}

/// Runtime-selectable genetic operators for the timetabling GA.
#[derive(Debug, Clone)]
pub struct GeneticOperators {
    /// Crossover strategy.
    pub crossover_type: CrossoverType,
    /// Mutation strategy.
    pub mutation_type: MutationType,
}

impl Default for GeneticOperators {
    fn default() -> Self {
        Self {
            crossover_type: CrossoverType::DivisionBlock,
            mutation_type: MutationType::Reassign,
        }
    }
}

impl GeneticOperators {
    /// Recombines two parents into one child (unrepaired).
    pub fn crossover<R: Rng>(
        &self,
        p1: &[Placement],
        p2: &[Placement],
        problem: &TimetableProblem,
        rng: &mut R,
    ) -> Vec<Placement> {
        match self.crossover_type {
            CrossoverType::DivisionBlock => {
                block_crossover(p1, p2, problem.division_blocks(), rng)
            }
            CrossoverType::OnePoint => one_point_crossover(p1, p2, rng),
            CrossoverType::Uniform => uniform_crossover(p1, p2, rng),
        }
    }

    /// Perturbs genes and returns the indices touched.
    ///
    /// With [`MutationType::Reassign`] the genes are left as they are; the
    /// caller re-places the returned indices.
    pub fn mutate<R: Rng>(
        &self,
        genes: &mut [Placement],
        problem: &TimetableProblem,
        rate: f64,
        rng: &mut R,
    ) -> Vec<usize> {
        let points = mutation_points(genes.len(), rate, rng);
        match self.mutation_type {
            MutationType::Reassign => points,
            MutationType::SlotSwap => {
                let mut touched = Vec::new();
                for p in points {
                    let span = problem.session(p).span;
                    let Some(block) = problem
                        .division_blocks()
                        .iter()
                        .find(|b| b.contains(&p))
                    else {
                        continue;
                    };
                    let partners: Vec<usize> = block
                        .clone()
                        .filter(|&q| q != p && q < genes.len() && problem.session(q).span == span)
                        .collect();
                    if let Some(&q) = partners.choose(rng) {
                        let cell = genes[p].cell;
                        genes[p].cell = genes[q].cell;
                        genes[q].cell = cell;
                        touched.push(p);
                        touched.push(q);
                    }
                }
                touched
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::CandidateBuilder;
    use crate::fixtures;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[test]
    fn test_default_operators() {
        let ops = GeneticOperators::default();
        assert_eq!(ops.crossover_type, CrossoverType::DivisionBlock);
        assert_eq!(ops.mutation_type, MutationType::Reassign);
    }

    #[test]
    fn test_crossover_variants_keep_length() {
        let problem = fixtures::problem(fixtures::two_divisions());
        let builder = CandidateBuilder::new(&problem);
        let mut rng = SmallRng::seed_from_u64(42);
        let p1 = builder.build(&mut rng).genes;
        let p2 = builder.build(&mut rng).genes;
        for crossover_type in [
            CrossoverType::DivisionBlock,
            CrossoverType::OnePoint,
            CrossoverType::Uniform,
        ] {
            let ops = GeneticOperators {
                crossover_type,
                mutation_type: MutationType::Reassign,
            };
            let child = ops.crossover(&p1, &p2, &problem, &mut rng);
            assert_eq!(child.len(), p1.len());
            for (i, g) in child.iter().enumerate() {
                assert!(*g == p1[i] || *g == p2[i]);
            }
        }
    }

    #[test]
    fn test_reassign_returns_points_untouched() {
        let problem = fixtures::problem(fixtures::two_divisions());
        let builder = CandidateBuilder::new(&problem);
        let mut rng = SmallRng::seed_from_u64(42);
        let original = builder.build(&mut rng).genes;
        let mut genes = original.clone();
        let ops = GeneticOperators::default();
        let touched = ops.mutate(&mut genes, &problem, 1.0, &mut rng);
        assert_eq!(touched.len(), genes.len());
        assert_eq!(genes, original);
    }

    #[test]
    fn test_slot_swap_stays_within_division() {
        let problem = fixtures::problem(fixtures::two_divisions());
        let builder = CandidateBuilder::new(&problem);
        let mut rng = SmallRng::seed_from_u64(42);
        let original = builder.build(&mut rng).genes;
        let mut genes = original.clone();
        let ops = GeneticOperators {
            crossover_type: CrossoverType::DivisionBlock,
            mutation_type: MutationType::SlotSwap,
        };
        let touched = ops.mutate(&mut genes, &problem, 0.5, &mut rng);
        assert_eq!(touched.len() % 2, 0);

        // the multiset of cells per division is preserved
        for block in problem.division_blocks() {
            let mut before: Vec<_> = original[block.clone()].iter().map(|g| g.cell).collect();
            let mut after: Vec<_> = genes[block.clone()].iter().map(|g| g.cell).collect();
            before.sort();
            after.sort();
            assert_eq!(before, after);
        }
        // faculty and room stay with their session
        for (a, b) in original.iter().zip(&genes) {
            assert_eq!(a.faculty, b.faculty);
            assert_eq!(a.room, b.room);
        }
    }
}
