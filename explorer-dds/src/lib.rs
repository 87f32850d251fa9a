//! Double-dummy analysis through an external solver.
//!
//! The solver itself is a separate program. This crate formats positions
//! for it, parses what comes back into typed results and remembers every
//! answer for the lifetime of a [`DoubleDummy`] value.

mod adapter;
mod annotate;
mod backend;
mod wire;

pub use adapter::{DoubleDummy, NextPlaysQuery};
pub use annotate::{annotate, AnnotatedPlay};
pub use backend::{ProcessSolver, SolverBackend, SolverError};
pub use wire::{DdTable, NextPlays, PlayOption, SolverRequest, TrickCounts};
