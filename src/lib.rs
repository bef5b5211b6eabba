//! Academic timetable generation.
//!
//! Places every weekly session a division needs onto a day × slot grid,
//! assigning a qualified faculty member and a suitable room, then scores
//! and reports the result.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Division`, `Subject`, `Faculty`, `Room`,
//!   `TimeSlot`, `EntitySnapshot`, `ScheduleEntry`, `ConflictRecord`
//! - **`validation`**: Input integrity checks (duplicate IDs, dangling
//!   references, malformed slots)
//! - **`constraints`**: Time grid, occupancy tracker, eligibility rules
//! - **`problem`**: Scoped problem: required sessions and lookup tables
//! - **`builder`**: Randomized constructive placement and repair
//! - **`fitness`**: Penalty-based 0-100 score
//! - **`conflicts`**: Hard-rule violation report
//! - **`ga`**: Genetic search
//! - **`scheduler`**: Greedy-repair and backtracking searches, KPIs
//! - **`strategy`**: Strategy trait, registry and comparison
//! - **`engine`**: Request/response entry point
//!
//! # Architecture
//!
//! Entity data arrives as an immutable [`EntitySnapshot`](models::EntitySnapshot).
//! Each request builds its own [`TimetableProblem`](problem::TimetableProblem);
//! each candidate owns its own occupancy tracker and RNG stream, so runs
//! share no mutable state.
//!
//! # References
//!
//! - Schaerf (1999), "A Survey of Automated Timetabling"
//! - Burke & Petrovic (2002), "Recent research directions in automated
//!   timetabling"

pub mod builder;
pub mod config;
pub mod conflicts;
pub mod constraints;
pub mod engine;
pub mod error;
pub mod fitness;
pub mod ga;
pub mod models;
pub mod problem;
pub mod scheduler;
pub mod strategy;
pub mod validation;

#[cfg(test)]
mod fixtures;

pub use config::{EngineConfig, PenaltyWeights, SearchConfig};
pub use engine::{CompareRequest, CompareResponse, GenerateRequest, GenerateResponse, TimetableEngine};
pub use error::TimetableError;
