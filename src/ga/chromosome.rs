//! Placement-vector chromosome for timetabling.
//!
//! # Encoding
//!
//! One gene per required session, parallel to
//! [`TimetableProblem::sessions`](crate::problem::TimetableProblem::sessions).
//! A gene fixes the start cell, the faculty member and the room. `None`
//! for faculty or room is the unresolved placeholder.
//!
//! Genes of one division occupy a contiguous block, so division-level
//! crossover keeps every division's week intact.

use std::ops::Range;

use rand::Rng;

use super::runner::Individual;
use crate::constraints::Cell;

/// Placement of one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Placement {
    /// Start cell.
    pub cell: Cell,
    /// Assigned faculty index.
    pub faculty: Option<usize>,
    /// Assigned room index.
    pub room: Option<usize>,
}

impl Placement {
    pub fn new(cell: Cell, faculty: Option<usize>, room: Option<usize>) -> Self {
        Self {
            cell,
            faculty,
            room,
        }
    }

    /// Whether both faculty and room are assigned.
    pub fn is_resolved(&self) -> bool {
        self.faculty.is_some() && self.room.is_some()
    }
}

/// A candidate timetable.
///
/// Higher fitness = better (maximization, range `[0, 100]`).
#[derive(Debug, Clone)]
pub struct Candidate {
    /// One placement per required session.
    pub genes: Vec<Placement>,
    /// Fitness value; `NEG_INFINITY` until evaluated.
    pub fitness: f64,
}

impl Individual for Candidate {
    fn fitness(&self) -> f64 {
        self.fitness
    }

    fn set_fitness(&mut self, fitness: f64) {
        self.fitness = fitness;
    }
}

impl Candidate {
    /// Wraps genes into an unevaluated candidate.
    pub fn new(genes: Vec<Placement>) -> Self {
        Self {
            genes,
            fitness: f64::NEG_INFINITY,
        }
    }

    /// Number of genes.
    pub fn len(&self) -> usize {
        self.genes.len()
    }

    /// Whether the candidate has no genes.
    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    /// Number of genes holding a placeholder.
    pub fn unresolved_count(&self) -> usize {
        self.genes.iter().filter(|g| !g.is_resolved()).count()
    }
}

/// Division-block crossover.
///
/// Each division block is inherited whole from a randomly chosen parent.
/// With fewer than two blocks this degrades to [`one_point_crossover`].
pub fn block_crossover<R: Rng>(
    p1: &[Placement],
    p2: &[Placement],
    blocks: &[Range<usize>],
    rng: &mut R,
) -> Vec<Placement> {
    if blocks.len() < 2 {
        return one_point_crossover(p1, p2, rng);
    }
    let mut child = p1.to_vec();
    for block in blocks {
        if rng.random_bool(0.5) {
            let end = block.end.min(p2.len()).min(child.len());
            let start = block.start.min(end);
            child[start..end].copy_from_slice(&p2[start..end]);
        }
    }
    child
}

/// One-point crossover: genes before the cut from `p1`, the rest from `p2`.
pub fn one_point_crossover<R: Rng>(p1: &[Placement], p2: &[Placement], rng: &mut R) -> Vec<Placement> {
    let n = p1.len().min(p2.len());
    if n < 2 {
        return p1.to_vec();
    }
    let cut = rng.random_range(1..n);
    let mut child = Vec::with_capacity(n);
    child.extend_from_slice(&p1[..cut]);
    child.extend_from_slice(&p2[cut..n]);
    child
}

/// Uniform crossover: each gene from either parent with equal probability.
pub fn uniform_crossover<R: Rng>(p1: &[Placement], p2: &[Placement], rng: &mut R) -> Vec<Placement> {
    p1.iter()
        .zip(p2)
        .map(|(a, b)| if rng.random_bool(0.5) { *a } else { *b })
        .collect()
}

/// Picks each gene index independently with probability `rate`.
pub fn mutation_points<R: Rng>(len: usize, rate: f64, rng: &mut R) -> Vec<usize> {
    let rate = rate.clamp(0.0, 1.0);
    (0..len).filter(|_| rng.random_bool(rate)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn genes(tag: usize, n: usize) -> Vec<Placement> {
        (0..n)
            .map(|i| Placement::new(Cell::new(tag, i), Some(tag), Some(tag)))
            .collect()
    }

    #[test]
    fn test_candidate_defaults() {
        let c = Candidate::new(vec![
            Placement::new(Cell::new(0, 0), Some(0), Some(0)),
            Placement::new(Cell::new(0, 1), None, Some(0)),
        ]);
        assert_eq!(c.len(), 2);
        assert_eq!(c.unresolved_count(), 1);
        assert_eq!(c.fitness(), f64::NEG_INFINITY);
    }

    #[test]
    fn test_block_crossover_keeps_blocks_whole() {
        let p1 = genes(1, 6);
        let p2 = genes(2, 6);
        let blocks = vec![0..2, 2..4, 4..6];
        let mut rng = SmallRng::seed_from_u64(42);
        for _ in 0..20 {
            let child = block_crossover(&p1, &p2, &blocks, &mut rng);
            assert_eq!(child.len(), 6);
            for block in &blocks {
                let tag = child[block.start].cell.day;
                assert!(child[block.clone()].iter().all(|g| g.cell.day == tag));
            }
        }
    }

    #[test]
    fn test_one_point_crossover() {
        let p1 = genes(1, 5);
        let p2 = genes(2, 5);
        let mut rng = SmallRng::seed_from_u64(42);
        let child = one_point_crossover(&p1, &p2, &mut rng);
        assert_eq!(child.len(), 5);
        assert_eq!(child[0].cell.day, 1);
        assert_eq!(child[4].cell.day, 2);
        // single cut
        let switches = child.windows(2).filter(|w| w[0].cell.day != w[1].cell.day).count();
        assert_eq!(switches, 1);
    }

    #[test]
    fn test_short_parents_clone() {
        let p1 = genes(1, 1);
        let p2 = genes(2, 1);
        let mut rng = SmallRng::seed_from_u64(42);
        assert_eq!(one_point_crossover(&p1, &p2, &mut rng), p1);
        assert_eq!(block_crossover(&p1, &p2, &[0..1], &mut rng), p1);
    }

    #[test]
    fn test_uniform_crossover_mixes_in_place() {
        let p1 = genes(1, 40);
        let p2 = genes(2, 40);
        let mut rng = SmallRng::seed_from_u64(42);
        let child = uniform_crossover(&p1, &p2, &mut rng);
        for (i, g) in child.iter().enumerate() {
            assert_eq!(g.cell.slot, i);
        }
        assert!(child.iter().any(|g| g.cell.day == 1));
        assert!(child.iter().any(|g| g.cell.day == 2));
    }

    #[test]
    fn test_mutation_points_rate_bounds() {
        let mut rng = SmallRng::seed_from_u64(42);
        assert!(mutation_points(10, 0.0, &mut rng).is_empty());
        assert_eq!(mutation_points(10, 1.0, &mut rng).len(), 10);
        let some = mutation_points(1000, 0.1, &mut rng);
        assert!(some.len() > 40 && some.len() < 200);
    }
}
