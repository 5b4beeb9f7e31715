//! Admission-control policy evaluation for a capacity-limited resource.
//!
//! Orders arrive over discrete time, each with a revenue, a processing
//! time, a delivery due date, and a decision deadline; a controller must
//! choose Accept, Reject, Postpone, or Outsource for every order while at
//! most a few accepted orders process concurrently. The crate provides the
//! pieces to run and compare admission policies:
//!
//! - **Simulation (`sim`)**: Time-stepped decision loop with a
//!   finite-capacity machine, deadline narrowing, a capacity guard, and
//!   per-tick traces.
//! - **Policies (`policy`)**: Gaussian Thompson sampling, a contextual
//!   bootstrap-tree learner behind a swappable model seam, and a
//!   uniform-random floor, all behind one `Policy` trait.
//! - **Reward estimation (`reward`)**: One configurable estimator pricing
//!   every action from revenue, deadlines, capacity scarcity, and future
//!   order expectations.
//! - **Exact baseline (`milp`)**: The same admission/scheduling problem
//!   solved clairvoyantly as a mixed-integer program, for upper-bound
//!   comparisons.
//! - **Claims and accounting (`claim`, `report`)**: Post-run claim
//!   settlement with drifting probabilities, realized-revenue accounting,
//!   and export-shaped records.
//!
//! # Architecture
//!
//! Everything shares one data model (`order`): the generator produces an
//! order set, the simulation mutates its own copy while driving a policy
//! through the reward estimator, and the exact baseline consumes a fresh
//! copy independently. Learning state lives in explicit policy/estimator
//! instances passed into the loop, never in globals, so comparative runs
//! cannot leak signal into each other.

pub mod claim;
pub mod error;
pub mod milp;
pub mod order;
pub mod policy;
pub mod report;
pub mod reward;
pub mod sim;

mod rng;
