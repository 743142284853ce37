//! Carbon- and price-aware scheduling of deferrable energy workloads.

/// Discovery-response catalog models.
pub mod catalog;
pub mod config;
pub mod error;
pub mod io;
pub mod runner;
/// Profile building, scoring, placement and refinement.
pub mod sched;

pub use error::Error;
