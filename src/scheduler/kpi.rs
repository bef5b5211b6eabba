//! Timetable quality metrics (KPIs).
//!
//! Computes reporting indicators from a finished candidate.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Resolved Rate | Sessions with both faculty and room / all sessions |
//! | Faculty Hours | Weekly hours booked per faculty member |
//! | Faculty Load Rate | Booked hours / weekly budget |
//! | Room Utilization | Occupied slots / grid slots, per room |
//! | Idle Gaps | Empty slots inside division teaching days |
//! | Load Variance | Mean daily-hour variance over teaching faculty |
//!
//! # Reference
//! Schaerf (1999), "A Survey of Automated Timetabling", Sec. 2

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::ga::Placement;
use crate::models::Day;
use crate::problem::TimetableProblem;

/// Timetable performance indicators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimetableKpi {
    pub total_sessions: usize,
    pub resolved_sessions: usize,
    /// Fraction of sessions fully resolved (0.0..1.0).
    pub resolved_rate: f64,
    /// Faculty id → booked weekly hours (teaching faculty only).
    pub faculty_hours: BTreeMap<String, u32>,
    /// Faculty id → booked hours / budget.
    pub faculty_load_rate: BTreeMap<String, f64>,
    /// Room id → fraction of grid slots occupied.
    pub room_utilization: BTreeMap<String, f64>,
    /// Mean of `room_utilization` over all rooms.
    pub avg_room_utilization: f64,
    pub sessions_per_day: BTreeMap<Day, usize>,
    pub idle_gaps: usize,
    pub avg_load_variance: f64,
}

impl TimetableKpi {
    /// Computes KPIs for `genes`.
    pub fn calculate(problem: &TimetableProblem, genes: &[Placement]) -> Self {
        let snapshot = problem.snapshot();
        let grid = problem.grid();
        let mut hours = vec![0u32; snapshot.faculty.len()];
        let mut room_slots = vec![0usize; snapshot.rooms.len()];
        let mut sessions_per_day = BTreeMap::new();
        let mut resolved_sessions = 0;

        for (gene, session) in genes.iter().zip(problem.sessions()) {
            if gene.is_resolved() {
                resolved_sessions += 1;
            }
            if let Some(day) = grid.day(gene.cell.day) {
                *sessions_per_day.entry(day).or_insert(0) += 1;
            }
            if let Some(h) = gene.faculty.and_then(|f| hours.get_mut(f)) {
                *h += session.hours;
            }
            if let Some(slots) = gene.room.and_then(|r| room_slots.get_mut(r)) {
                *slots += grid.covered(gene.cell, session.span).len();
            }
        }

        let mut faculty_hours = BTreeMap::new();
        let mut faculty_load_rate = BTreeMap::new();
        for (faculty, &booked) in snapshot.faculty.iter().zip(&hours) {
            if booked == 0 {
                continue;
            }
            faculty_hours.insert(faculty.id.clone(), booked);
            let rate = if faculty.max_hours_per_week == 0 {
                f64::INFINITY
            } else {
                f64::from(booked) / f64::from(faculty.max_hours_per_week)
            };
            faculty_load_rate.insert(faculty.id.clone(), rate);
        }

        let capacity = grid.slot_count().max(1) as f64;
        let room_utilization: BTreeMap<String, f64> = snapshot
            .rooms
            .iter()
            .zip(&room_slots)
            .map(|(room, &slots)| (room.id.clone(), slots as f64 / capacity))
            .collect();
        let avg_room_utilization = if room_utilization.is_empty() {
            0.0
        } else {
            room_utilization.values().sum::<f64>() / room_utilization.len() as f64
        };

        let variances = problem.faculty_load_variances(genes);
        let avg_load_variance = if variances.is_empty() {
            0.0
        } else {
            variances.iter().sum::<f64>() / variances.len() as f64
        };

        let total_sessions = problem.sessions().len();
        let resolved_rate = if total_sessions == 0 {
            1.0
        } else {
            resolved_sessions as f64 / total_sessions as f64
        };

        Self {
            total_sessions,
            resolved_sessions,
            resolved_rate,
            faculty_hours,
            faculty_load_rate,
            room_utilization,
            avg_room_utilization,
            sessions_per_day,
            idle_gaps: problem.idle_gap_total(genes),
            avg_load_variance,
        }
    }

    /// Whether the timetable meets the given quality thresholds.
    pub fn meets_thresholds(&self, max_idle_gaps: usize, min_resolved_rate: f64) -> bool {
        self.idle_gaps <= max_idle_gaps && self.resolved_rate >= min_resolved_rate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraints::Cell;
    use crate::fixtures;

    fn place(day: usize, slot: usize, faculty: usize, room: usize) -> Placement {
        Placement::new(Cell::new(day, slot), Some(faculty), Some(room))
    }

    #[test]
    fn test_kpi_basic() {
        let problem = fixtures::problem(fixtures::single_division());
        let genes = vec![place(0, 0, 0, 0), place(0, 3, 0, 0), place(1, 0, 0, 0), place(2, 0, 0, 1)];
        let kpi = TimetableKpi::calculate(&problem, &genes);

        assert_eq!(kpi.total_sessions, 4);
        assert_eq!(kpi.resolved_sessions, 4);
        assert!((kpi.resolved_rate - 1.0).abs() < 1e-10);
        assert_eq!(kpi.faculty_hours["F1"], 5);
        assert!((kpi.faculty_load_rate["F1"] - 0.25).abs() < 1e-10);
        // C1: 3 of 40 slots, L1: 2 of 40
        assert!((kpi.room_utilization["C1"] - 0.075).abs() < 1e-10);
        assert!((kpi.room_utilization["L1"] - 0.05).abs() < 1e-10);
        assert!((kpi.avg_room_utilization - 0.0625).abs() < 1e-10);
        assert_eq!(kpi.sessions_per_day[&Day::Monday], 2);
        assert_eq!(kpi.sessions_per_day.get(&Day::Friday), None);
        assert_eq!(kpi.idle_gaps, 2);
    }

    #[test]
    fn test_kpi_unresolved() {
        let problem = fixtures::problem(fixtures::single_division());
        let mut genes = vec![place(0, 0, 0, 0), place(1, 0, 0, 0), place(2, 0, 0, 0), place(3, 0, 0, 1)];
        genes[3].faculty = None;
        let kpi = TimetableKpi::calculate(&problem, &genes);
        assert_eq!(kpi.resolved_sessions, 3);
        assert!((kpi.resolved_rate - 0.75).abs() < 1e-10);
        assert_eq!(kpi.faculty_hours["F1"], 3);
        assert!(kpi.meets_thresholds(0, 0.75));
        assert!(!kpi.meets_thresholds(0, 0.8));
    }

    #[test]
    fn test_kpi_serializes_camel_case() {
        let problem = fixtures::problem(fixtures::single_division());
        let genes = vec![place(0, 0, 0, 0), place(1, 0, 0, 0), place(2, 0, 0, 0), place(3, 0, 0, 1)];
        let kpi = TimetableKpi::calculate(&problem, &genes);
        let json = serde_json::to_value(&kpi).unwrap();
        assert!(json.get("avgRoomUtilization").is_some());
        assert!(json["sessionsPerDay"].is_object());
    }
}
