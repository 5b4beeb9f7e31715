//! Post-run claim settlement with drifting per-model probabilities.

use crate::order::{Action, Order};
use crate::rng::create_rng;
use rand::rngs::StdRng;
use rand::Rng;
use std::collections::BTreeMap;
use tracing::debug;

/// Built-in per-model claim probabilities.
pub fn default_claim_probabilities() -> BTreeMap<String, f64> {
    let mut probabilities = BTreeMap::new();
    probabilities.insert("15-EB11".to_string(), 0.05);
    probabilities.insert("25-EX20".to_string(), 0.10);
    probabilities.insert("30-EX20".to_string(), 0.08);
    probabilities.insert("20-EB20".to_string(), 0.13);
    probabilities.insert("35-EB10".to_string(), 0.16);
    probabilities.insert("40-EX10".to_string(), 0.07);
    probabilities.insert("45-EB30".to_string(), 0.09);
    probabilities.insert("50-EX30".to_string(), 0.10);
    probabilities.insert("55-EB40".to_string(), 0.12);
    probabilities.insert("60-EX40".to_string(), 0.15);
    probabilities
}

/// Configuration for [`ClaimBook`].
#[derive(Debug, Clone)]
pub struct ClaimConfig {
    /// Starting per-model claim probability. Unknown models never claim.
    pub probabilities: BTreeMap<String, f64>,
    /// Flat handling cost charged per occurred claim.
    pub processing_cost: f64,
    /// Probability bump after an occurred claim, clamped at 1.
    pub drift_up: f64,
    /// Probability decay after a claim-free delivery, clamped at 0.
    pub drift_down: f64,
    /// Random seed for reproducibility (None = random seed).
    pub seed: Option<u64>,
}

impl Default for ClaimConfig {
    fn default() -> Self {
        Self {
            probabilities: default_claim_probabilities(),
            processing_cost: 150.0,
            drift_up: 0.01,
            drift_down: 0.005,
            seed: None,
        }
    }
}

impl ClaimConfig {
    /// Creates a new config with default parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the probability table.
    pub fn with_probabilities(mut self, probabilities: BTreeMap<String, f64>) -> Self {
        self.probabilities = probabilities;
        self
    }

    /// Sets the per-claim handling cost.
    pub fn with_processing_cost(mut self, cost: f64) -> Self {
        self.processing_cost = cost;
        self
    }

    /// Sets both drift rates (up after a claim, down after a clean delivery).
    pub fn with_drift(mut self, up: f64, down: f64) -> Self {
        self.drift_up = up;
        self.drift_down = down;
        self
    }

    /// Sets the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates configuration parameters.
    pub fn validate(&self) -> Result<(), String> {
        if self.processing_cost < 0.0 {
            return Err(format!(
                "processing_cost must be non-negative, got {}",
                self.processing_cost
            ));
        }
        if self.drift_up < 0.0 || self.drift_down < 0.0 {
            return Err("drift rates must be non-negative".to_string());
        }
        for (model, p) in &self.probabilities {
            if !(0.0..=1.0).contains(p) {
                return Err(format!("claim probability for {model} must be in [0, 1], got {p}"));
            }
        }
        Ok(())
    }
}

/// One order's claim verdict.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClaimDecision {
    pub order_no: u32,
    /// Some(true/false) for delivered orders, None for orders that were
    /// never exposed to claims (rejected, postponed, undecided).
    pub claimed: Option<bool>,
}

/// Result of settling one order set.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClaimOutcome {
    /// One entry per order, in input order.
    pub decisions: Vec<ClaimDecision>,
    /// Total handling cost of all occurred claims.
    pub total_cost: f64,
}

impl ClaimOutcome {
    /// Verdict for one order, if it was part of the settlement.
    pub fn claimed(&self, order_no: u32) -> Option<bool> {
        self.decisions
            .iter()
            .find(|d| d.order_no == order_no)
            .and_then(|d| d.claimed)
    }
}

/// Settles claims against delivered orders after a run.
///
/// Only delivered orders (final action Accept or Outsource) are exposed.
/// Each assessment draws against the model's current probability, then
/// drifts it: up after a claim, down after a clean delivery. The drifted
/// table persists across settlements on the same book, so later runs face
/// the claim rates earlier runs produced.
pub struct ClaimBook {
    config: ClaimConfig,
    probabilities: BTreeMap<String, f64>,
    rng: StdRng,
}

impl ClaimBook {
    pub fn new(config: ClaimConfig) -> Self {
        config.validate().expect("invalid ClaimConfig");
        let rng = match config.seed {
            Some(seed) => create_rng(seed),
            None => create_rng(rand::random()),
        };
        let probabilities = config.probabilities.clone();
        Self {
            config,
            probabilities,
            rng,
        }
    }

    /// Current claim probability of a model (0 for unknown models).
    pub fn probability(&self, model: &str) -> f64 {
        self.probabilities.get(model).copied().unwrap_or(0.0)
    }

    /// Assesses one delivery of the given model and drifts its probability.
    pub fn assess(&mut self, model: &str) -> bool {
        let p = self.probability(model);
        let occurred = self.rng.random_bool(p);
        let drifted = if occurred {
            (p + self.config.drift_up).min(1.0)
        } else {
            (p - self.config.drift_down).max(0.0)
        };
        self.probabilities.insert(model.to_string(), drifted);
        occurred
    }

    /// Settles every order in the set, in input order.
    pub fn settle(&mut self, orders: &[Order]) -> ClaimOutcome {
        let mut outcome = ClaimOutcome::default();
        for order in orders {
            let claimed = match order.final_action {
                Some(Action::Accept) | Some(Action::Outsource) => {
                    let occurred = self.assess(&order.model_name);
                    if occurred {
                        outcome.total_cost += self.config.processing_cost;
                    }
                    Some(occurred)
                }
                _ => None,
            };
            outcome.decisions.push(ClaimDecision {
                order_no: order.order_no,
                claimed,
            });
        }
        debug!(
            orders = orders.len(),
            cost = outcome.total_cost,
            "claims settled"
        );
        outcome
    }

    /// Restores the starting probability table.
    pub fn reset(&mut self) {
        self.probabilities = self.config.probabilities.clone();
    }
}
