//! Orders: the decision subjects of admission control.
//!
//! An order arrives at a tick, carries model-derived attributes
//! (processing time, revenue, risk) and two deadlines: a decision due date
//! after which postponing is no longer allowed, and a delivery due date
//! after which revenue is penalized. This module defines the order type,
//! the action vocabulary, input validation, and a reproducible stream
//! generator for experiments.
//!
//! # Key Features
//! - Four-way action vocabulary (Accept / Reject / Postpone / Outsource)
//! - Full per-order event history, including every Postpone round
//! - Validation of order sets before a run (the only fatal input path)
//! - Seeded generator: warm-start batch plus Bernoulli-batch arrivals

mod generator;
mod types;

pub use generator::{
    default_catalog, default_initial_orders, GeneratorConfig, ModelSpec, OrderGenerator,
};
pub use types::{validate_orders, Action, Order, OrderEvent};
