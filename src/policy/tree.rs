//! Bootstrap-tree policy: per-action value prediction from resampled
//! regression trees.

use crate::order::Action;
use crate::policy::cart::{RegressionTree, TreeParams};
use crate::policy::types::{DecisionContext, Policy};
use crate::rng::create_rng;
use rand::rngs::StdRng;
use rand::Rng;

/// A learned mapping from decision contexts to per-action values.
///
/// [`TreeBootstrap`] is generic over this seam, so the default
/// bootstrap-tree learner can be swapped for any other context model
/// without touching the policy or the simulation loop.
pub trait ContextModel {
    /// Predicted value of each action (indexed by [`Action::index`]) for one
    /// context. Takes `&mut self` because randomized learners draw from
    /// their own stream per query.
    fn predict(&mut self, context: &[f64]) -> [f64; 4];

    /// Records one observed (action, context, reward) triple.
    fn update(&mut self, action: Action, context: &[f64], reward: f64);

    /// Arithmetic mean of the rewards stored for an action, if any.
    fn mean_reward(&self, action: Action) -> Option<f64>;

    /// Drops all stored observations.
    fn clear(&mut self);
}

/// Configuration for [`BootstrapTreeModel`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TreeBootstrapConfig {
    /// Observations an action needs before trees are consulted; below this
    /// the model answers with `neutral_value`.
    pub min_observations: usize,
    /// Value reported for data-starved actions.
    pub neutral_value: f64,
    /// Growth limits of the per-query trees.
    pub tree: TreeParams,
    /// Random seed for reproducibility (None = random seed).
    pub seed: Option<u64>,
}

impl Default for TreeBootstrapConfig {
    fn default() -> Self {
        Self {
            min_observations: 5,
            neutral_value: 0.5,
            tree: TreeParams::default(),
            seed: None,
        }
    }
}

impl TreeBootstrapConfig {
    /// Creates a new config with default parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the per-action observation threshold.
    pub fn with_min_observations(mut self, min_observations: usize) -> Self {
        self.min_observations = min_observations;
        self
    }

    /// Sets the value reported below the observation threshold.
    pub fn with_neutral_value(mut self, neutral_value: f64) -> Self {
        self.neutral_value = neutral_value;
        self
    }

    /// Sets the tree growth limits.
    pub fn with_tree_params(mut self, tree: TreeParams) -> Self {
        self.tree = tree;
        self
    }

    /// Sets the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates configuration parameters.
    pub fn validate(&self) -> Result<(), String> {
        if self.min_observations == 0 {
            return Err("min_observations must be at least 1".to_string());
        }
        if self.tree.min_split < 2 {
            return Err(format!(
                "tree min_split must be at least 2, got {}",
                self.tree.min_split
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
struct ActionData {
    contexts: Vec<Vec<f64>>,
    rewards: Vec<f64>,
}

/// Default [`ContextModel`]: one observation pool per action, one bootstrap
/// resample and one freshly fitted [`RegressionTree`] per prediction.
///
/// Refitting per query keeps the learner honest about uncertainty the same
/// way posterior sampling does: two predictions for the same context may
/// differ, and the spread shrinks as the pools grow.
pub struct BootstrapTreeModel {
    config: TreeBootstrapConfig,
    observations: [ActionData; 4],
    rng: StdRng,
}

impl BootstrapTreeModel {
    pub fn new(config: TreeBootstrapConfig) -> Self {
        config.validate().expect("invalid TreeBootstrapConfig");
        let rng = match config.seed {
            Some(seed) => create_rng(seed),
            None => create_rng(rand::random()),
        };
        Self {
            config,
            observations: std::array::from_fn(|_| ActionData::default()),
            rng,
        }
    }

    /// Number of observations stored for an action.
    pub fn observation_count(&self, action: Action) -> usize {
        self.observations[action.index()].rewards.len()
    }

    fn bootstrap_value(&mut self, action: Action, context: &[f64]) -> f64 {
        let data = &self.observations[action.index()];
        let n = data.rewards.len();
        if n < self.config.min_observations {
            return self.config.neutral_value;
        }
        let rng = &mut self.rng;
        let mut rows = Vec::with_capacity(n);
        let mut targets = Vec::with_capacity(n);
        for _ in 0..n {
            let pick = rng.random_range(0..n);
            rows.push(data.contexts[pick].clone());
            targets.push(data.rewards[pick]);
        }
        RegressionTree::fit(&rows, &targets, self.config.tree).predict(context)
    }
}

impl ContextModel for BootstrapTreeModel {
    fn predict(&mut self, context: &[f64]) -> [f64; 4] {
        let mut values = [0.0; 4];
        for action in Action::ALL {
            values[action.index()] = self.bootstrap_value(action, context);
        }
        values
    }

    fn update(&mut self, action: Action, context: &[f64], reward: f64) {
        let data = &mut self.observations[action.index()];
        data.contexts.push(context.to_vec());
        data.rewards.push(reward);
    }

    fn mean_reward(&self, action: Action) -> Option<f64> {
        let rewards = &self.observations[action.index()].rewards;
        if rewards.is_empty() {
            None
        } else {
            Some(rewards.iter().sum::<f64>() / rewards.len() as f64)
        }
    }

    fn clear(&mut self) {
        self.observations = std::array::from_fn(|_| ActionData::default());
    }
}

/// Contextual policy built on a [`ContextModel`]: select the argmax of the
/// predicted per-action values (ties toward the earlier action), learn by
/// storing the realized reward.
pub struct TreeBootstrap<M: ContextModel = BootstrapTreeModel> {
    model: M,
}

impl TreeBootstrap<BootstrapTreeModel> {
    pub fn new(config: TreeBootstrapConfig) -> Self {
        Self {
            model: BootstrapTreeModel::new(config),
        }
    }
}

impl<M: ContextModel> TreeBootstrap<M> {
    /// Wraps a caller-provided context model.
    pub fn with_model(model: M) -> Self {
        Self { model }
    }

    /// Returns the underlying model.
    pub fn model(&self) -> &M {
        &self.model
    }
}

impl<M: ContextModel> Policy for TreeBootstrap<M> {
    fn name(&self) -> &str {
        "tree-bootstrap"
    }

    fn select(&mut self, context: &DecisionContext<'_>) -> Action {
        let values = self.model.predict(&context.features());
        let mut best = Action::ALL[0];
        let mut best_value = f64::NEG_INFINITY;
        for action in Action::ALL {
            let value = values[action.index()];
            if value > best_value {
                best_value = value;
                best = action;
            }
        }
        best
    }

    fn learn(&mut self, action: Action, context: &DecisionContext<'_>, reward: f64) {
        self.model.update(action, &context.features(), reward);
    }

    fn belief(&self, action: Action) -> f64 {
        self.model.mean_reward(action).unwrap_or(0.5)
    }

    fn reset(&mut self) {
        self.model.clear();
    }
}
