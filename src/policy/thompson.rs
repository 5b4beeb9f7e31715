//! Gaussian Thompson sampling over the four admission actions.

use crate::order::Action;
use crate::policy::types::{DecisionContext, Policy};
use crate::rng::create_rng;
use rand::rngs::StdRng;
use rand_distr::{Distribution, Normal};

/// Configuration for [`GaussianThompson`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThompsonConfig {
    /// Prior mean of every action's reward belief.
    pub prior_mean: f64,
    /// Prior variance of every action's reward belief. A wide prior keeps
    /// never-tried actions competitive during early exploration.
    pub prior_variance: f64,
    /// Lower bound applied to the posterior variance after each update.
    pub variance_floor: f64,
    /// Random seed for reproducibility (None = random seed).
    pub seed: Option<u64>,
}

impl Default for ThompsonConfig {
    fn default() -> Self {
        Self {
            prior_mean: 0.0,
            prior_variance: 1000.0,
            variance_floor: 1e-9,
            seed: None,
        }
    }
}

impl ThompsonConfig {
    /// Creates a new config with default parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the prior mean.
    pub fn with_prior_mean(mut self, mean: f64) -> Self {
        self.prior_mean = mean;
        self
    }

    /// Sets the prior variance.
    pub fn with_prior_variance(mut self, variance: f64) -> Self {
        self.prior_variance = variance;
        self
    }

    /// Sets the variance floor.
    pub fn with_variance_floor(mut self, floor: f64) -> Self {
        self.variance_floor = floor;
        self
    }

    /// Sets the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates configuration parameters.
    pub fn validate(&self) -> Result<(), String> {
        if self.prior_variance <= 0.0 {
            return Err(format!(
                "prior_variance must be positive, got {}",
                self.prior_variance
            ));
        }
        if self.variance_floor <= 0.0 {
            return Err(format!(
                "variance_floor must be positive, got {}",
                self.variance_floor
            ));
        }
        Ok(())
    }
}

/// Posterior state of one action.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActionBelief {
    /// Posterior mean; equals the arithmetic mean of observed rewards once
    /// at least one reward has been seen.
    pub mean: f64,
    /// Posterior variance (population variance of observed rewards, floored).
    pub variance: f64,
    /// Number of rewards observed.
    pub count: u64,
}

impl ActionBelief {
    fn from_prior(config: &ThompsonConfig) -> Self {
        Self {
            mean: config.prior_mean,
            variance: config.prior_variance,
            count: 0,
        }
    }
}

/// Thompson sampling with an independent Gaussian belief per action.
///
/// Selection samples one value from each belief and takes the argmax; ties
/// break toward the earlier action in [`Action::ALL`]. The prior carries no
/// observation weight, so the first reward replaces the prior mean outright
/// and the posterior mean thereafter tracks the running arithmetic mean.
/// The decision context is ignored: beliefs are per action, not per order.
pub struct GaussianThompson {
    config: ThompsonConfig,
    beliefs: [ActionBelief; 4],
    rng: StdRng,
}

impl GaussianThompson {
    pub fn new(config: ThompsonConfig) -> Self {
        config.validate().expect("invalid ThompsonConfig");
        let rng = match config.seed {
            Some(seed) => create_rng(seed),
            None => create_rng(rand::random()),
        };
        Self {
            config,
            beliefs: [ActionBelief::from_prior(&config); 4],
            rng,
        }
    }

    /// Returns the posterior state of one action.
    pub fn belief_for(&self, action: Action) -> ActionBelief {
        self.beliefs[action.index()]
    }

    fn sample(&mut self, belief: ActionBelief) -> f64 {
        match Normal::new(belief.mean, belief.variance.sqrt()) {
            Ok(normal) => normal.sample(&mut self.rng),
            Err(_) => belief.mean,
        }
    }
}

impl Policy for GaussianThompson {
    fn name(&self) -> &str {
        "thompson"
    }

    fn select(&mut self, _context: &DecisionContext<'_>) -> Action {
        let mut best = Action::ALL[0];
        let mut best_score = f64::NEG_INFINITY;
        for action in Action::ALL {
            let belief = self.beliefs[action.index()];
            let score = self.sample(belief);
            if score > best_score {
                best_score = score;
                best = action;
            }
        }
        best
    }

    fn learn(&mut self, action: Action, _context: &DecisionContext<'_>, reward: f64) {
        let belief = &mut self.beliefs[action.index()];
        let n = belief.count as f64;
        let delta = reward - belief.mean;
        let new_mean = belief.mean + delta / (n + 1.0);
        let new_variance = (n * belief.variance + delta * (reward - new_mean)) / (n + 1.0);
        belief.mean = new_mean;
        belief.variance = new_variance.max(self.config.variance_floor);
        belief.count += 1;
    }

    fn belief(&self, action: Action) -> f64 {
        self.beliefs[action.index()].mean
    }

    /// Restores the prior on every action. The random stream keeps rolling,
    /// so back-to-back runs stay statistically independent.
    fn reset(&mut self) {
        self.beliefs = [ActionBelief::from_prior(&self.config); 4];
    }
}
