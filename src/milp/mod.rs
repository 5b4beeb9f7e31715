//! Exact offline baseline for the admission problem.
//!
//! Where the online policies decide tick by tick under uncertainty, this
//! module sees the whole order set at once and solves for the
//! revenue-maximizing action assignment plus a feasible processing
//! schedule, as one mixed-integer program. The optimal objective serves as
//! the clairvoyant upper bound the online policies are measured against.
//!
//! # Key Features
//! - Binary action indicators with an exactly-one constraint per order
//! - Start-time indicators tied to the Accept indicator over each order's
//!   feasible window
//! - Per-tick machine capacity constraints
//! - Non-optimal solver statuses surfaced, never papered over

mod solution;
mod solver;

pub use solution::{MilpOutcome, PlannedOrder, SolveStatus};
pub use solver::MilpSolver;
