//! Online decision policies.
//!
//! A policy proposes one of the four admission actions for each pending
//! order, tick by tick, and learns from the estimated reward of the action
//! the engine actually takes. Two learning policies are provided — a
//! context-free Gaussian Thompson sampler and a contextual bootstrap-tree
//! learner — plus a uniform-random floor for comparisons.
//!
//! # Key Features
//! - Common [`Policy`] trait consumed by the simulation loop
//! - Gaussian Thompson sampling with running-mean posteriors
//! - Bootstrap-resampled regression trees behind a swappable
//!   [`ContextModel`] seam
//! - Deterministic behavior under fixed seeds
//!
//! # References
//! - Thompson, W. R. (1933). On the likelihood that one unknown probability
//!   exceeds another in view of the evidence of two samples.
//! - Chapelle, O., & Li, L. (2011). An empirical evaluation of Thompson
//!   sampling.
//! - Breiman, L. (1996). Bagging predictors.
//! - Breiman, L., Friedman, J., Olshen, R., & Stone, C. (1984).
//!   Classification and Regression Trees.

mod cart;
mod random;
mod thompson;
mod tree;
mod types;

pub use cart::{RegressionTree, TreeParams};
pub use random::RandomPolicy;
pub use thompson::{ActionBelief, GaussianThompson, ThompsonConfig};
pub use tree::{BootstrapTreeModel, ContextModel, TreeBootstrap, TreeBootstrapConfig};
pub use types::{DecisionContext, Policy};
