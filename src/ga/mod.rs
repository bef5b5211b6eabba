//! GA-based timetable optimization.
//!
//! A generic elitist GA loop ([`GaRunner`]) plus the timetabling-specific
//! encoding, operators and problem bridge.
//!
//! # Encoding
//!
//! One gene per required session: start cell, faculty, room. Genes are
//! grouped into contiguous per-division blocks.
//!
//! # Submodules
//!
//! - [`operators`]: Runtime-selectable crossover and mutation strategies
//!
//! # Reference
//! - Colorni, Dorigo & Maniezzo (1998), "Metaheuristics for high school
//!   timetabling"
//! - Burke, Elliman & Weare (1994), "A genetic algorithm based university
//!   timetabling system"

mod chromosome;
pub mod operators;
mod problem;
mod runner;
mod strategy;

pub use chromosome::{
    block_crossover, mutation_points, one_point_crossover, uniform_crossover, Candidate,
    Placement,
};
pub use problem::TimetableGaProblem;
pub use runner::{GaProblem, GaResult, GaRunner, GenerationStats, Individual};
pub(crate) use runner::{par_map, stream_seed};
pub use strategy::{GeneticStrategy, GENETIC};
