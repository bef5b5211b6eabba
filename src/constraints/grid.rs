//! Weekly placement grid.
//!
//! Time slots grouped by day and ordered by start time. A grid *cell* is a
//! (day index, slot index) pair; a session of span `k` placed at a cell
//! covers that slot and the `k - 1` following ones, which must be
//! contiguous (each slot ends where the next begins).

use chrono::NaiveTime;
use std::collections::BTreeMap;
use std::ops::Range;

use crate::models::{Day, TimeSlot};

/// Start position of a session on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Cell {
    /// Index into [`Grid::days`].
    pub day: usize,
    /// Index into the day's ordered slots.
    pub slot: usize,
}

impl Cell {
    pub fn new(day: usize, slot: usize) -> Self {
        Self { day, slot }
    }
}

/// One slot of a grid day.
#[derive(Debug, Clone, PartialEq)]
pub struct GridSlot {
    pub id: String,
    pub start: NaiveTime,
    pub end: NaiveTime,
}

/// All slots of one day, ordered by start.
#[derive(Debug, Clone, PartialEq)]
pub struct GridDay {
    pub day: Day,
    pub slots: Vec<GridSlot>,
}

/// The weekly grid derived from time slot definitions.
#[derive(Debug, Clone, Default)]
pub struct Grid {
    days: Vec<GridDay>,
}

impl Grid {
    /// Builds the grid from slot definitions.
    pub fn from_slots(slots: &[TimeSlot]) -> Self {
        let mut by_day: BTreeMap<Day, Vec<GridSlot>> = BTreeMap::new();
        for slot in slots {
            by_day.entry(slot.day).or_default().push(GridSlot {
                id: slot.id.clone(),
                start: slot.start,
                end: slot.end,
            });
        }
        let days = by_day
            .into_iter()
            .map(|(day, mut slots)| {
                slots.sort_by(|a, b| a.start.cmp(&b.start).then_with(|| a.id.cmp(&b.id)));
                GridDay { day, slots }
            })
            .collect();
        Self { days }
    }

    /// Grid days in week order.
    pub fn days(&self) -> &[GridDay] {
        &self.days
    }

    /// Number of days with at least one slot.
    pub fn day_count(&self) -> usize {
        self.days.len()
    }

    /// Number of slots on a day.
    pub fn slots_on(&self, day: usize) -> usize {
        self.days.get(day).map_or(0, |d| d.slots.len())
    }

    /// Total number of slots.
    pub fn slot_count(&self) -> usize {
        self.days.iter().map(|d| d.slots.len()).sum()
    }

    /// Weekday of a day index.
    pub fn day(&self, day: usize) -> Option<Day> {
        self.days.get(day).map(|d| d.day)
    }

    /// Slot at a cell.
    pub fn slot(&self, cell: Cell) -> Option<&GridSlot> {
        self.days.get(cell.day)?.slots.get(cell.slot)
    }

    /// Whether a session of `span` slots fits contiguously at `cell`.
    pub fn fits(&self, cell: Cell, span: usize) -> bool {
        let Some(day) = self.days.get(cell.day) else {
            return false;
        };
        let end = cell.slot + span.max(1);
        if end > day.slots.len() {
            return false;
        }
        day.slots[cell.slot..end]
            .windows(2)
            .all(|pair| pair[0].end == pair[1].start)
    }

    /// Slot indices covered by a session at `cell`, clamped to the day.
    pub fn covered(&self, cell: Cell, span: usize) -> Range<usize> {
        let len = self.slots_on(cell.day);
        let start = cell.slot.min(len);
        start..(cell.slot + span.max(1)).min(len)
    }

    /// End time of a session at `cell` (end of the last covered slot).
    pub fn end_of(&self, cell: Cell, span: usize) -> Option<NaiveTime> {
        let covered = self.covered(cell, span);
        let last = covered.end.checked_sub(1)?;
        self.days
            .get(cell.day)?
            .slots
            .get(last.max(covered.start))
            .map(|s| s.end)
    }

    /// Every cell where a session of `span` slots fits, in week order.
    pub fn placements(&self, span: usize) -> Vec<Cell> {
        let mut cells = Vec::new();
        for (d, day) in self.days.iter().enumerate() {
            for s in 0..day.slots.len() {
                let cell = Cell::new(d, s);
                if self.fits(cell, span) {
                    cells.push(cell);
                }
            }
        }
        cells
    }

    /// Locates the cell of a (day, start) pair.
    pub fn find(&self, day: Day, start: NaiveTime) -> Option<Cell> {
        let d = self.days.iter().position(|g| g.day == day)?;
        let s = self.days[d].slots.iter().position(|slot| slot.start == start)?;
        Some(Cell::new(d, s))
    }
}
