//! Timetabling problem definition.
//!
//! Expands an [`EntitySnapshot`] into the flat list of sessions that must
//! be placed, and precomputes everything the search loops look up
//! repeatedly: the weekly grid, qualified faculty and suitable rooms per
//! session, faculty availability per grid cell, and the legal start cells
//! for every session span.
//!
//! Sessions are ordered by division, then subject, then occurrence. A
//! candidate solution is a vector of placements parallel to this list, so
//! a session's index doubles as its gene index.

use std::collections::{HashMap, HashSet};
use std::ops::Range;
use std::sync::Arc;

use crate::config::PenaltyWeights;
use crate::constraints::{
    faculty_qualified, idle_gaps, load_variance, room_suitable, Cell, Grid,
};
use crate::error::TimetableError;
use crate::ga::Placement;
use crate::models::{Division, EntitySnapshot, Faculty, Room, ScheduleEntry, Subject};
use crate::validation::validate_snapshot;

/// One weekly session that must be placed.
#[derive(Debug, Clone)]
pub struct RequiredSession {
    /// Division index in the snapshot.
    pub division: usize,
    /// Subject index in the snapshot.
    pub subject: usize,
    /// Occurrence number within the week (0-based).
    pub occurrence: u32,
    /// Consecutive grid slots covered.
    pub span: usize,
    /// Hours charged to the assigned faculty.
    pub hours: u32,
    /// Faculty indices qualified to teach this session.
    pub faculty: Vec<usize>,
    /// Room indices able to host this session.
    pub rooms: Vec<usize>,
}

/// A scoped timetabling problem.
#[derive(Debug, Clone)]
pub struct TimetableProblem {
    snapshot: Arc<EntitySnapshot>,
    grid: Grid,
    divisions: Vec<usize>,
    sessions: Vec<RequiredSession>,
    blocks: Vec<Range<usize>>,
    /// `[faculty][day][slot]`
    availability: Vec<Vec<Vec<bool>>>,
    placements: HashMap<usize, Vec<Cell>>,
    single_cells: Vec<Cell>,
    weights: PenaltyWeights,
}

impl TimetableProblem {
    /// Builds the problem for one division, or for every division when
    /// `division_id` is `None`.
    ///
    /// # Errors
    /// - [`TimetableError::InvalidInput`] if the snapshot fails validation
    /// - [`TimetableError::UnknownDivision`] if `division_id` is not found
    /// - [`TimetableError::EmptyScope`] if divisions, time slots, rooms,
    ///   subjects or qualified faculty are missing for the scope
    pub fn new(
        snapshot: impl Into<Arc<EntitySnapshot>>,
        division_id: Option<&str>,
        weights: PenaltyWeights,
    ) -> Result<Self, TimetableError> {
        let snapshot = snapshot.into();
        validate_snapshot(&snapshot).map_err(TimetableError::InvalidInput)?;

        let divisions: Vec<usize> = match division_id {
            Some(id) => {
                let index = snapshot
                    .divisions
                    .iter()
                    .position(|d| d.id == id)
                    .ok_or_else(|| TimetableError::UnknownDivision(id.to_string()))?;
                vec![index]
            }
            None => (0..snapshot.divisions.len()).collect(),
        };
        if divisions.is_empty() {
            return Err(TimetableError::EmptyScope("divisions"));
        }
        if snapshot.time_slots.is_empty() {
            return Err(TimetableError::EmptyScope("time slots"));
        }
        if snapshot.rooms.is_empty() {
            return Err(TimetableError::EmptyScope("rooms"));
        }

        let grid = Grid::from_slots(&snapshot.time_slots);
        let subject_index: HashMap<&str, usize> = snapshot
            .subjects
            .iter()
            .enumerate()
            .map(|(i, s)| (s.id.as_str(), i))
            .collect();

        let mut sessions = Vec::new();
        let mut blocks = Vec::with_capacity(divisions.len());
        for &d in &divisions {
            let division = &snapshot.divisions[d];
            let block_start = sessions.len();
            let mut seen = HashSet::new();
            for subject_id in &division.subject_ids {
                if !seen.insert(subject_id.as_str()) {
                    continue;
                }
                let Some(&s) = subject_index.get(subject_id.as_str()) else {
                    continue;
                };
                let subject = &snapshot.subjects[s];
                let faculty: Vec<usize> = snapshot
                    .faculty
                    .iter()
                    .enumerate()
                    .filter(|(_, f)| faculty_qualified(f, subject, division))
                    .map(|(i, _)| i)
                    .collect();
                let rooms: Vec<usize> = snapshot
                    .rooms
                    .iter()
                    .enumerate()
                    .filter(|(_, r)| room_suitable(r, subject, division))
                    .map(|(i, _)| i)
                    .collect();
                for occurrence in 0..subject.hours {
                    sessions.push(RequiredSession {
                        division: d,
                        subject: s,
                        occurrence,
                        span: subject.span(),
                        hours: subject.hours_per_session,
                        faculty: faculty.clone(),
                        rooms: rooms.clone(),
                    });
                }
            }
            blocks.push(block_start..sessions.len());
        }

        if sessions.is_empty() {
            return Err(TimetableError::EmptyScope("subjects"));
        }
        if sessions.iter().all(|s| s.faculty.is_empty()) {
            return Err(TimetableError::EmptyScope("faculty"));
        }

        let availability = snapshot
            .faculty
            .iter()
            .map(|f| {
                grid.days()
                    .iter()
                    .map(|day| {
                        day.slots
                            .iter()
                            .map(|slot| f.is_available(day.day, slot.start))
                            .collect()
                    })
                    .collect()
            })
            .collect();

        let mut placements = HashMap::new();
        for session in &sessions {
            placements
                .entry(session.span)
                .or_insert_with(|| grid.placements(session.span));
        }
        let single_cells = grid.placements(1);

        Ok(Self {
            snapshot,
            grid,
            divisions,
            sessions,
            blocks,
            availability,
            placements,
            single_cells,
            weights,
        })
    }

    /// Source snapshot.
    pub fn snapshot(&self) -> &EntitySnapshot {
        &self.snapshot
    }

    /// Weekly grid.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Snapshot indices of the divisions in scope.
    pub fn divisions(&self) -> &[usize] {
        &self.divisions
    }

    /// Sessions to place, in gene order.
    pub fn sessions(&self) -> &[RequiredSession] {
        &self.sessions
    }

    /// Session by gene index.
    pub fn session(&self, index: usize) -> &RequiredSession {
        &self.sessions[index]
    }

    /// Contiguous gene ranges, one per division in scope.
    pub fn division_blocks(&self) -> &[Range<usize>] {
        &self.blocks
    }

    /// Fitness penalty table.
    pub fn weights(&self) -> &PenaltyWeights {
        &self.weights
    }

    pub fn division(&self, index: usize) -> &Division {
        &self.snapshot.divisions[index]
    }

    pub fn subject(&self, index: usize) -> &Subject {
        &self.snapshot.subjects[index]
    }

    pub fn faculty(&self, index: usize) -> &Faculty {
        &self.snapshot.faculty[index]
    }

    pub fn room(&self, index: usize) -> &Room {
        &self.snapshot.rooms[index]
    }

    /// Whether a session of `span` slots fits anywhere on the grid.
    pub fn has_placement(&self, span: usize) -> bool {
        self.placements.get(&span).is_some_and(|c| !c.is_empty())
    }

    /// Legal start cells for `span`.
    ///
    /// Falls back to every single-slot cell when the span fits nowhere;
    /// sessions placed that way are reported as unresolved.
    pub fn placements(&self, span: usize) -> &[Cell] {
        match self.placements.get(&span) {
            Some(cells) if !cells.is_empty() => cells,
            _ => &self.single_cells,
        }
    }

    /// Whether faculty `faculty` is free in every slot a session of `span`
    /// covers at `cell`.
    pub fn faculty_available(&self, faculty: usize, cell: Cell, span: usize) -> bool {
        if !self.grid.fits(cell, span) {
            return false;
        }
        let Some(day) = self
            .availability
            .get(faculty)
            .and_then(|days| days.get(cell.day))
        else {
            return false;
        };
        self.grid
            .covered(cell, span)
            .all(|slot| day.get(slot).copied().unwrap_or(false))
    }

    /// Short label for log and conflict messages, e.g. `A/MATH#2`.
    pub fn session_label(&self, index: usize) -> String {
        let session = &self.sessions[index];
        format!(
            "{}/{}#{}",
            self.division(session.division).id,
            self.subject(session.subject).id,
            session.occurrence + 1
        )
    }

    /// Occupied slots per division and day, indexed `[division][day][slot]`.
    pub fn division_busy(&self, genes: &[Placement]) -> Vec<Vec<Vec<bool>>> {
        let mut busy: Vec<Vec<Vec<bool>>> = (0..self.snapshot.divisions.len())
            .map(|_| {
                (0..self.grid.day_count())
                    .map(|d| vec![false; self.grid.slots_on(d)])
                    .collect()
            })
            .collect();
        for (gene, session) in genes.iter().zip(&self.sessions) {
            let Some(slots) = busy
                .get_mut(session.division)
                .and_then(|days| days.get_mut(gene.cell.day))
            else {
                continue;
            };
            for slot in self.grid.covered(gene.cell, session.span) {
                slots[slot] = true;
            }
        }
        busy
    }

    /// Idle gaps summed over every division-day in scope.
    pub fn idle_gap_total(&self, genes: &[Placement]) -> usize {
        let busy = self.division_busy(genes);
        self.divisions
            .iter()
            .filter_map(|&d| busy.get(d))
            .flat_map(|days| days.iter().map(|slots| idle_gaps(slots)))
            .sum()
    }

    /// Daily-hour variance of every faculty member with at least one
    /// session, in snapshot order.
    pub fn faculty_load_variances(&self, genes: &[Placement]) -> Vec<f64> {
        let mut daily = vec![vec![0.0f64; self.grid.day_count()]; self.snapshot.faculty.len()];
        let mut teaching = vec![false; self.snapshot.faculty.len()];
        for (gene, session) in genes.iter().zip(&self.sessions) {
            let Some(f) = gene.faculty else {
                continue;
            };
            if let Some(hours) = daily.get_mut(f).and_then(|days| days.get_mut(gene.cell.day)) {
                *hours += f64::from(session.hours);
                teaching[f] = true;
            }
        }
        daily
            .iter()
            .zip(&teaching)
            .filter(|(_, &t)| t)
            .map(|(days, _)| load_variance(days))
            .collect()
    }

    /// Converts genes to schedule entries sorted by division, day and start.
    pub fn entries(&self, genes: &[Placement]) -> Vec<ScheduleEntry> {
        let mut keyed: Vec<(usize, ScheduleEntry)> = genes
            .iter()
            .zip(&self.sessions)
            .filter_map(|(gene, session)| {
                let day = self.grid.day(gene.cell.day)?;
                let slot = self.grid.slot(gene.cell)?;
                let end = self.grid.end_of(gene.cell, session.span)?;
                let division = self.division(session.division);
                let subject = self.subject(session.subject);
                let faculty = gene.faculty.map(|f| self.faculty(f));
                let room = gene.room.map(|r| self.room(r));
                let entry = ScheduleEntry {
                    division_id: division.id.clone(),
                    division_name: division.name.clone(),
                    day,
                    start: slot.start,
                    end,
                    subject_id: subject.id.clone(),
                    subject_code: subject.code.clone(),
                    subject_name: subject.name.clone(),
                    faculty_id: faculty.map(|f| f.id.clone()),
                    faculty_name: faculty.map(|f| f.name.clone()),
                    room_id: room.map(|r| r.id.clone()),
                    room_number: room.map(|r| r.number.clone()),
                    building: room.map(|r| r.building.clone()),
                    session_type: subject.session_type,
                };
                Some((session.division, entry))
            })
            .collect();
        keyed.sort_by(|a, b| {
            a.0.cmp(&b.0)
                .then(a.1.day.cmp(&b.1.day))
                .then(a.1.start.cmp(&b.1.start))
                .then_with(|| a.1.subject_id.cmp(&b.1.subject_id))
        });
        keyed.into_iter().map(|(_, entry)| entry).collect()
    }
}
