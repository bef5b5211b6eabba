//! Hard-rule conflict reporting.
//!
//! Rescans a finished candidate and emits one [`ConflictRecord`] per
//! violation instance. This is independent of fitness scoring: fitness
//! only needs counts, reporting needs the entities involved.
//!
//! Clashes are reported once per pair of clashing sessions, however many
//! slots the two sessions share.

use std::collections::HashMap;

use chrono::NaiveTime;

use crate::constraints::{Cell, ResourceKind};
use crate::ga::Placement;
use crate::models::{ConflictKind, ConflictRecord, Day};
use crate::problem::TimetableProblem;

/// Produces conflict records for candidates of one problem.
#[derive(Debug, Clone, Copy)]
pub struct ConflictDetector<'p> {
    problem: &'p TimetableProblem,
}

impl<'p> ConflictDetector<'p> {
    pub fn new(problem: &'p TimetableProblem) -> Self {
        Self { problem }
    }

    /// Lists every hard violation in `genes`.
    ///
    /// Records appear in gene order, followed by weekly overloads and
    /// session-count mismatches.
    pub fn detect(&self, genes: &[Placement]) -> Vec<ConflictRecord> {
        let problem = self.problem;
        let grid = problem.grid();
        let mut records = Vec::new();
        let mut occupants: HashMap<(ResourceKind, usize, usize, usize), Vec<usize>> =
            HashMap::new();
        let mut hours = vec![0u32; problem.snapshot().faculty.len()];

        for (i, (gene, session)) in genes.iter().zip(problem.sessions()).enumerate() {
            let (Some(day), Some(first_slot)) = (grid.day(gene.cell.day), grid.slot(gene.cell)) else {
                continue;
            };
            let start = first_slot.start;
            let division = problem.division(session.division);
            let subject = problem.subject(session.subject);

            let resources = [
                (ConflictKind::DivisionClash, ResourceKind::Division, Some(session.division)),
                (ConflictKind::FacultyClash, ResourceKind::Faculty, gene.faculty),
                (ConflictKind::RoomClash, ResourceKind::Room, gene.room),
            ];
            let mut reported: Vec<(ConflictKind, usize)> = Vec::new();
            for slot in grid.covered(gene.cell, session.span) {
                let at = grid
                    .slot(Cell::new(gene.cell.day, slot))
                    .map_or(start, |s| s.start);
                for (kind, resource, id) in resources {
                    let Some(id) = id else {
                        continue;
                    };
                    let list = occupants
                        .entry((resource, id, gene.cell.day, slot))
                        .or_default();
                    for &other in list.iter() {
                        if !reported.contains(&(kind, other)) {
                            reported.push((kind, other));
                            records.push(self.clash(kind, id, other, i, day, at));
                        }
                    }
                    list.push(i);
                }
            }

            if let Some(f) = gene.faculty {
                if let Some(h) = hours.get_mut(f) {
                    *h += session.hours;
                }
                let faculty = problem.faculty(f);
                if !session.faculty.contains(&f) {
                    records.push(ConflictRecord::at(
                        ConflictKind::FacultyUnavailable,
                        day,
                        start,
                        vec![faculty.id.clone(), division.id.clone(), subject.id.clone()],
                        format!(
                            "Faculty '{}' is not qualified to teach {} to division '{}'",
                            faculty.id, subject.id, division.id
                        ),
                    ));
                } else if !problem.faculty_available(f, gene.cell, session.span) {
                    records.push(ConflictRecord::at(
                        ConflictKind::FacultyUnavailable,
                        day,
                        start,
                        vec![faculty.id.clone(), division.id.clone(), subject.id.clone()],
                        format!(
                            "Faculty '{}' is not available on {} at {} for {}",
                            faculty.id,
                            day,
                            start.format("%H:%M"),
                            problem.session_label(i)
                        ),
                    ));
                }
            }

            if let Some(r) = gene.room {
                if !session.rooms.contains(&r) {
                    let room = problem.room(r);
                    records.push(ConflictRecord::at(
                        ConflictKind::RoomUnsuitable,
                        day,
                        start,
                        vec![room.id.clone(), division.id.clone(), subject.id.clone()],
                        format!(
                            "Room '{}' ({:?}, capacity {}) cannot host {} for {} students",
                            room.id,
                            room.room_type,
                            room.capacity,
                            problem.session_label(i),
                            division.student_count
                        ),
                    ));
                }
            }

            if !gene.is_resolved() {
                let missing = match (gene.faculty, gene.room) {
                    (None, None) => "faculty and room",
                    (None, Some(_)) => "faculty",
                    _ => "room",
                };
                records.push(ConflictRecord::at(
                    ConflictKind::UnresolvedSession,
                    day,
                    start,
                    vec![division.id.clone(), subject.id.clone()],
                    format!("No {missing} could be assigned to {}", problem.session_label(i)),
                ));
            }
        }

        for (f, &booked) in hours.iter().enumerate() {
            let faculty = problem.faculty(f);
            if booked > faculty.max_hours_per_week {
                records.push(ConflictRecord::weekly(
                    ConflictKind::FacultyOverload,
                    vec![faculty.id.clone()],
                    format!(
                        "Faculty '{}' assigned {} hours, budget is {}",
                        faculty.id, booked, faculty.max_hours_per_week
                    ),
                ));
            }
        }

        records.extend(self.count_mismatches(genes));
        records
    }

    /// Compares the sessions that render as schedule entries against each
    /// subject's weekly hours. Missing genes and genes outside the grid
    /// both count as absent.
    fn count_mismatches(&self, genes: &[Placement]) -> Vec<ConflictRecord> {
        let problem = self.problem;
        let mut counts: HashMap<(String, String), u32> = HashMap::new();
        for entry in problem.entries(genes) {
            *counts.entry((entry.division_id, entry.subject_id)).or_insert(0) += 1;
        }

        let mut records = Vec::new();
        let mut checked = Vec::new();
        for session in problem.sessions() {
            let key = (session.division, session.subject);
            if checked.contains(&key) {
                continue;
            }
            checked.push(key);
            let subject = problem.subject(session.subject);
            let division = problem.division(session.division);
            let placed = counts
                .get(&(division.id.clone(), subject.id.clone()))
                .copied()
                .unwrap_or(0);
            if placed != subject.hours {
                records.push(ConflictRecord::weekly(
                    ConflictKind::SessionCountMismatch,
                    vec![division.id.clone(), subject.id.clone()],
                    format!(
                        "Division '{}' has {} sessions of {}, expected {}",
                        division.id, placed, subject.id, subject.hours
                    ),
                ));
            }
        }
        records
    }

    fn clash(
        &self,
        kind: ConflictKind,
        resource: usize,
        first: usize,
        second: usize,
        day: Day,
        at: NaiveTime,
    ) -> ConflictRecord {
        let problem = self.problem;
        let a = problem.division(problem.session(first).division);
        let b = problem.division(problem.session(second).division);
        let (label, resource_id) = match kind {
            ConflictKind::FacultyClash => ("Faculty", &problem.faculty(resource).id),
            ConflictKind::RoomClash => ("Room", &problem.room(resource).id),
            _ => ("Division", &problem.division(resource).id),
        };
        let mut entity_ids = vec![resource_id.clone()];
        for id in [&a.id, &b.id] {
            if !entity_ids.contains(id) {
                entity_ids.push(id.clone());
            }
        }
        ConflictRecord::at(
            kind,
            day,
            at,
            entity_ids,
            format!(
                "{label} '{resource_id}' double-booked on {day} at {}: {} and {}",
                at.format("%H:%M"),
                problem.session_label(first),
                problem.session_label(second)
            ),
        )
    }
}
