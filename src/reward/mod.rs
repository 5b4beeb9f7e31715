//! Reward model shared by the online policies and the exact baseline.
//!
//! Each candidate action on a pending order is priced by a single
//! estimator that combines immediate revenue, a late-finish penalty, a
//! capacity-scarcity cost, and the expected value of orders yet to arrive.
//! The bandit policies learn from these estimates; the exact baseline uses
//! the capacity-free subset of the same terms as its objective
//! coefficients.
//!
//! # Key Features
//! - One configurable estimator covering all four actions
//! - Scarcity cost tied to live machine availability
//! - Fixed or data-driven (running average) future-order value
//! - Optional risk discount and postpone-lateness terms

mod config;
mod estimator;

pub use config::{FutureValue, RewardConfig};
pub use estimator::RewardEstimator;
