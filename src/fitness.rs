//! Fitness evaluation.
//!
//! Score = `ceiling - hard penalties - soft penalties`, clamped to
//! `[0, ceiling]` with the ceiling capped at 100. Higher is better.
//!
//! # Hard penalties
//!
//! Each violation is charged once at its configured weight:
//! faculty / room / division double booking (once per clashing session),
//! faculty outside free periods or unqualified, unsuitable room,
//! unresolved placeholder, and one charge per overloaded faculty member.
//!
//! # Soft penalties
//!
//! Variance of each faculty member's daily hours across the grid days,
//! and idle gaps inside each division's teaching day.

use crate::config::PenaltyWeights;
use crate::constraints::{ResourceKind, ResourceTracker};
use crate::ga::Placement;
use crate::problem::TimetableProblem;

/// Itemized score of one candidate.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoreBreakdown {
    pub faculty_clashes: usize,
    pub room_clashes: usize,
    pub division_clashes: usize,
    pub overloaded_faculty: usize,
    pub unavailable: usize,
    pub unsuitable_rooms: usize,
    pub unresolved: usize,
    /// Sum of per-faculty daily-hour variances.
    pub load_variance: f64,
    pub idle_gaps: usize,
    pub hard_penalty: f64,
    pub soft_penalty: f64,
    pub score: f64,
}

impl ScoreBreakdown {
    /// Total number of hard violations.
    pub fn hard_violations(&self) -> usize {
        self.faculty_clashes
            + self.room_clashes
            + self.division_clashes
            + self.overloaded_faculty
            + self.unavailable
            + self.unsuitable_rooms
            + self.unresolved
    }
}

/// Scores candidates of one problem.
#[derive(Debug, Clone, Copy)]
pub struct FitnessEvaluator<'p> {
    problem: &'p TimetableProblem,
}

impl<'p> FitnessEvaluator<'p> {
    pub fn new(problem: &'p TimetableProblem) -> Self {
        Self { problem }
    }

    /// Fitness in `[0, 100]`.
    pub fn evaluate(&self, genes: &[Placement]) -> f64 {
        self.scan(genes).0.score
    }

    /// Full itemization.
    pub fn breakdown(&self, genes: &[Placement]) -> ScoreBreakdown {
        self.scan(genes).0
    }

    /// Indices of genes involved in any hard violation.
    ///
    /// For clashes only the later gene of each pair is listed.
    pub fn violating_genes(&self, genes: &[Placement]) -> Vec<usize> {
        let (_, flagged) = self.scan(genes);
        flagged
            .iter()
            .enumerate()
            .filter_map(|(i, &f)| f.then_some(i))
            .collect()
    }

    /// Upper bound of the score.
    pub fn ceiling(&self) -> f64 {
        self.problem.weights().ceiling.clamp(0.0, 100.0)
    }

    fn scan(&self, genes: &[Placement]) -> (ScoreBreakdown, Vec<bool>) {
        let problem = self.problem;
        let grid = problem.grid();
        let snapshot = problem.snapshot();
        let mut b = ScoreBreakdown::default();
        let mut flagged = vec![false; genes.len()];
        let mut tracker = ResourceTracker::new();

        let mut hours = vec![0u32; snapshot.faculty.len()];

        for (i, (gene, session)) in genes.iter().zip(problem.sessions()).enumerate() {
            let day = gene.cell.day;
            let (mut fc, mut rc, mut dc) = (false, false, false);
            for slot in grid.covered(gene.cell, session.span) {
                dc |= tracker
                    .occupy(ResourceKind::Division, session.division, day, slot, i)
                    .is_some();
                if let Some(f) = gene.faculty {
                    fc |= tracker.occupy(ResourceKind::Faculty, f, day, slot, i).is_some();
                }
                if let Some(r) = gene.room {
                    rc |= tracker.occupy(ResourceKind::Room, r, day, slot, i).is_some();
                }
            }
            b.faculty_clashes += usize::from(fc);
            b.room_clashes += usize::from(rc);
            b.division_clashes += usize::from(dc);
            flagged[i] |= fc || rc || dc;

            if let Some(f) = gene.faculty {
                if let Some(h) = hours.get_mut(f) {
                    *h += session.hours;
                }
                if !session.faculty.contains(&f)
                    || !problem.faculty_available(f, gene.cell, session.span)
                {
                    b.unavailable += 1;
                    flagged[i] = true;
                }
            }
            if let Some(r) = gene.room {
                if !session.rooms.contains(&r) {
                    b.unsuitable_rooms += 1;
                    flagged[i] = true;
                }
            }
            if !gene.is_resolved() {
                b.unresolved += 1;
                flagged[i] = true;
            }
        }

        let overloaded: Vec<bool> = hours
            .iter()
            .zip(&snapshot.faculty)
            .map(|(&h, f)| h > f.max_hours_per_week)
            .collect();
        b.overloaded_faculty = overloaded.iter().filter(|&&o| o).count();
        for (i, gene) in genes.iter().enumerate() {
            if gene
                .faculty
                .is_some_and(|f| overloaded.get(f).copied().unwrap_or(false))
            {
                flagged[i] = true;
            }
        }

        b.load_variance = problem.faculty_load_variances(genes).iter().sum();
        b.idle_gaps = problem.idle_gap_total(genes);

        let w: &PenaltyWeights = problem.weights();
        b.hard_penalty = w.faculty_clash * b.faculty_clashes as f64
            + w.room_clash * b.room_clashes as f64
            + w.division_clash * b.division_clashes as f64
            + w.faculty_overload * b.overloaded_faculty as f64
            + w.faculty_unavailable * b.unavailable as f64
            + w.room_unsuitable * b.unsuitable_rooms as f64
            + w.unresolved * b.unresolved as f64;
        b.soft_penalty = w.load_variance * b.load_variance + w.idle_gap * b.idle_gaps as f64;

        let ceiling = self.ceiling();
        b.score = (ceiling - b.hard_penalty - b.soft_penalty).clamp(0.0, ceiling);
        (b, flagged)
    }
}
