//! Randomized constructive placement.
//!
//! Places sessions one at a time against a [`ResourceTracker`]:
//!
//! 1. Shuffle the legal start cells for the session's span.
//! 2. Skip cells where the division is already busy.
//! 3. Collect faculty who are qualified, available and free in every
//!    covered slot, split by whether the session fits their weekly budget.
//! 4. Collect suitable, free rooms.
//! 5. The first cell with a room and an in-budget faculty member wins;
//!    both are picked uniformly at random and booked.
//!
//! The budget is honoured across the whole week: an over-budget faculty
//! member is booked only when no cell offers an in-budget one, and then
//! the cell with the smallest overrun is used. When no cell yields both a
//! faculty member and a room, the session gets the most complete option
//! seen (the unresolved placeholder). The same routine backs initial
//! construction, repair after crossover and mutation-time reassignment.

use rand::Rng;
use rand::prelude::IndexedRandom;
use rand::seq::SliceRandom;

use crate::constraints::{within_budget, Cell, ResourceKind, ResourceTracker};
use crate::ga::{Candidate, Placement};
use crate::problem::TimetableProblem;

/// Builds and repairs candidates for one problem.
#[derive(Debug, Clone, Copy)]
pub struct CandidateBuilder<'p> {
    problem: &'p TimetableProblem,
}

impl<'p> CandidateBuilder<'p> {
    pub fn new(problem: &'p TimetableProblem) -> Self {
        Self { problem }
    }

    pub fn problem(&self) -> &'p TimetableProblem {
        self.problem
    }

    /// Builds a candidate placing sessions in gene order.
    pub fn build<R: Rng>(&self, rng: &mut R) -> Candidate {
        let order: Vec<usize> = (0..self.problem.sessions().len()).collect();
        self.build_ordered(&order, rng)
    }

    /// Builds a candidate placing sessions in the given order.
    ///
    /// `order` should be a permutation of the gene indices; sessions it
    /// omits are left as placeholders at the first grid cell.
    pub fn build_ordered<R: Rng>(&self, order: &[usize], rng: &mut R) -> Candidate {
        let mut tracker = ResourceTracker::new();
        let mut genes = vec![Placement::default(); self.problem.sessions().len()];
        for &index in order {
            if index < genes.len() {
                genes[index] = self.place_session(index, &mut tracker, rng);
            }
        }
        Candidate::new(genes)
    }

    /// Chooses and books a placement for session `index`.
    pub fn place_session<R: Rng>(
        &self,
        index: usize,
        tracker: &mut ResourceTracker,
        rng: &mut R,
    ) -> Placement {
        let session = self.problem.session(index);
        let cells = self.problem.placements(session.span);
        let mut order: Vec<usize> = (0..cells.len()).collect();
        order.shuffle(rng);

        let mut overrun: Option<(u32, Placement)> = None;
        let mut partial: Option<Placement> = None;
        for &c in &order {
            let cell = cells[c];
            if !self.division_free(index, cell, tracker) {
                continue;
            }
            let (in_budget, over_budget) = self.eligible_faculty(index, cell, tracker);
            let room = self.pick_room(index, cell, tracker, rng);
            if room.is_some() {
                if let Some(&f) = in_budget.choose(rng) {
                    let placement = Placement::new(cell, Some(f), room);
                    self.occupy(index, &placement, tracker);
                    return placement;
                }
                let least = over_budget
                    .iter()
                    .map(|&f| (self.excess_hours(index, f, tracker), f))
                    .min();
                if let Some((excess, f)) = least {
                    if overrun.is_none_or(|(best, _)| excess < best) {
                        overrun = Some((excess, Placement::new(cell, Some(f), room)));
                    }
                    continue;
                }
            }
            let faculty = in_budget
                .choose(rng)
                .or_else(|| over_budget.choose(rng))
                .copied();
            let placement = Placement::new(cell, faculty, room);
            if partial.is_none_or(|p| completeness(&placement) > completeness(&p)) {
                partial = Some(placement);
            }
        }

        let placement = overrun
            .map(|(_, placement)| placement)
            .or(partial)
            .unwrap_or_else(|| {
                let cell = order.first().map(|&c| cells[c]).unwrap_or_default();
                Placement::new(cell, None, None)
            });
        self.occupy(index, &placement, tracker);
        placement
    }

    /// Faculty able to teach session `index` at `cell`, split into those
    /// within their weekly budget and those it would push over.
    fn eligible_faculty(
        &self,
        index: usize,
        cell: Cell,
        tracker: &ResourceTracker,
    ) -> (Vec<usize>, Vec<usize>) {
        let session = self.problem.session(index);
        let covered = self.problem.grid().covered(cell, session.span);
        session
            .faculty
            .iter()
            .copied()
            .filter(|&f| self.problem.faculty_available(f, cell, session.span))
            .filter(|&f| {
                covered
                    .clone()
                    .all(|slot| tracker.is_free(ResourceKind::Faculty, f, cell.day, slot))
            })
            .partition(|&f| within_budget(self.problem.faculty(f), tracker.hours(f), session.hours))
    }

    /// Hours over budget faculty `faculty` would reach by teaching `index`.
    fn excess_hours(&self, index: usize, faculty: usize, tracker: &ResourceTracker) -> u32 {
        let hours = self.problem.session(index).hours;
        tracker
            .hours(faculty)
            .saturating_add(hours)
            .saturating_sub(self.problem.faculty(faculty).max_hours_per_week)
    }

    fn pick_room<R: Rng>(
        &self,
        index: usize,
        cell: Cell,
        tracker: &ResourceTracker,
        rng: &mut R,
    ) -> Option<usize> {
        let session = self.problem.session(index);
        let covered = self.problem.grid().covered(cell, session.span);
        let free: Vec<usize> = session
            .rooms
            .iter()
            .copied()
            .filter(|&r| {
                covered
                    .clone()
                    .all(|slot| tracker.is_free(ResourceKind::Room, r, cell.day, slot))
            })
            .collect();
        free.choose(rng).copied()
    }

    fn division_free(&self, index: usize, cell: Cell, tracker: &ResourceTracker) -> bool {
        let session = self.problem.session(index);
        self.problem
            .grid()
            .covered(cell, session.span)
            .all(|slot| tracker.is_free(ResourceKind::Division, session.division, cell.day, slot))
    }

    /// Whether every resource of `placement` is free in the tracker.
    pub fn fits(&self, index: usize, placement: &Placement, tracker: &ResourceTracker) -> bool {
        let session = self.problem.session(index);
        let day = placement.cell.day;
        self.problem
            .grid()
            .covered(placement.cell, session.span)
            .all(|slot| {
                tracker.is_free(ResourceKind::Division, session.division, day, slot)
                    && placement
                        .faculty
                        .is_none_or(|f| tracker.is_free(ResourceKind::Faculty, f, day, slot))
                    && placement
                        .room
                        .is_none_or(|r| tracker.is_free(ResourceKind::Room, r, day, slot))
            })
    }

    /// Whether `placement` can stay as is: resolved, free, qualified,
    /// available and within the faculty budget.
    pub fn is_usable(&self, index: usize, placement: &Placement, tracker: &ResourceTracker) -> bool {
        let session = self.problem.session(index);
        let (Some(f), Some(r)) = (placement.faculty, placement.room) else {
            return false;
        };
        session.faculty.contains(&f)
            && session.rooms.contains(&r)
            && self.problem.faculty_available(f, placement.cell, session.span)
            && within_budget(self.problem.faculty(f), tracker.hours(f), session.hours)
            && self.fits(index, placement, tracker)
    }

    /// Books `placement` for session `index`.
    ///
    /// Returns `false` if any covered key was already held by another
    /// session; earlier occupants keep their keys.
    pub fn occupy(&self, index: usize, placement: &Placement, tracker: &mut ResourceTracker) -> bool {
        let session = self.problem.session(index);
        let day = placement.cell.day;
        let mut clean = true;
        for slot in self.problem.grid().covered(placement.cell, session.span) {
            clean &= tracker
                .occupy(ResourceKind::Division, session.division, day, slot, index)
                .is_none();
            if let Some(f) = placement.faculty {
                clean &= tracker.occupy(ResourceKind::Faculty, f, day, slot, index).is_none();
            }
            if let Some(r) = placement.room {
                clean &= tracker.occupy(ResourceKind::Room, r, day, slot, index).is_none();
            }
        }
        if let Some(f) = placement.faculty {
            tracker.add_hours(f, session.hours);
        }
        clean
    }

    /// Undoes [`occupy`](Self::occupy) for a placement that booked cleanly.
    pub fn release(&self, index: usize, placement: &Placement, tracker: &mut ResourceTracker) {
        let session = self.problem.session(index);
        let day = placement.cell.day;
        for slot in self.problem.grid().covered(placement.cell, session.span) {
            tracker.release(ResourceKind::Division, session.division, day, slot);
            if let Some(f) = placement.faculty {
                tracker.release(ResourceKind::Faculty, f, day, slot);
            }
            if let Some(r) = placement.room {
                tracker.release(ResourceKind::Room, r, day, slot);
            }
        }
        if let Some(f) = placement.faculty {
            tracker.remove_hours(f, session.hours);
        }
    }

    /// Re-places every gene that clashes with an earlier gene or is not
    /// usable. Returns the number of genes re-placed.
    pub fn repair<R: Rng>(&self, genes: &mut [Placement], rng: &mut R) -> usize {
        let mut tracker = ResourceTracker::new();
        let mut broken = Vec::new();
        for (index, gene) in genes.iter().enumerate() {
            if self.is_usable(index, gene, &tracker) {
                self.occupy(index, gene, &mut tracker);
            } else {
                broken.push(index);
            }
        }
        for &index in &broken {
            genes[index] = self.place_session(index, &mut tracker, rng);
        }
        broken.len()
    }

    /// Re-places the given genes against the bookings of all others.
    pub fn reassign<R: Rng>(&self, genes: &mut [Placement], indices: &[usize], rng: &mut R) {
        let mut chosen = vec![false; genes.len()];
        for &index in indices {
            if let Some(c) = chosen.get_mut(index) {
                *c = true;
            }
        }
        let mut tracker = ResourceTracker::new();
        for (index, gene) in genes.iter().enumerate() {
            if !chosen[index] {
                self.occupy(index, gene, &mut tracker);
            }
        }
        for &index in indices {
            if index < genes.len() {
                genes[index] = self.place_session(index, &mut tracker, rng);
            }
        }
    }
}

fn completeness(placement: &Placement) -> usize {
    usize::from(placement.faculty.is_some()) + usize::from(placement.room.is_some())
}
