//! Synthetic order-stream generation.
//!
//! Produces reproducible order sets for experiments: a fixed warm-start
//! batch plus Bernoulli-batch arrivals drawn from a model catalog.

use crate::order::types::Order;
use crate::rng::create_rng;
use rand::Rng;
use std::collections::BTreeMap;

/// Catalog entry: the per-model attributes stamped onto generated orders.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ModelSpec {
    /// Machine ticks required when accepted.
    pub processing_time: u32,
    /// Revenue when delivered.
    pub revenue: f64,
    /// Risk scalar (percent scale).
    pub risk: f64,
}

impl ModelSpec {
    pub fn new(processing_time: u32, revenue: f64, risk: f64) -> Self {
        Self {
            processing_time,
            revenue,
            risk,
        }
    }
}

/// The built-in ten-model catalog.
pub fn default_catalog() -> BTreeMap<String, ModelSpec> {
    let mut catalog = BTreeMap::new();
    catalog.insert("15-EB11".to_string(), ModelSpec::new(8, 250.0, 0.0));
    catalog.insert("25-EX20".to_string(), ModelSpec::new(9, 300.0, 61.55));
    catalog.insert("30-EX20".to_string(), ModelSpec::new(11, 200.0, 3.49));
    catalog.insert("20-EB20".to_string(), ModelSpec::new(15, 220.0, 0.0));
    catalog.insert("35-EB10".to_string(), ModelSpec::new(5, 180.0, 10.0));
    catalog.insert("40-EX10".to_string(), ModelSpec::new(10, 280.0, 20.0));
    catalog.insert("45-EB30".to_string(), ModelSpec::new(12, 320.0, 30.0));
    catalog.insert("50-EX30".to_string(), ModelSpec::new(9, 350.0, 40.0));
    catalog.insert("55-EB40".to_string(), ModelSpec::new(14, 400.0, 50.0));
    catalog.insert("60-EX40".to_string(), ModelSpec::new(7, 500.0, 70.0));
    catalog
}

/// The built-in warm-start batch of seven orders.
///
/// Order 2 carries a shorter processing time than its catalog model; the
/// warm-start attributes stand on their own and are not re-derived from the
/// catalog.
pub fn default_initial_orders() -> Vec<Order> {
    vec![
        Order::new(1, 0, 5, "15-EB11", 8, 12, 250.0, 0.0),
        Order::new(2, 10, 15, "25-EX20", 7, 25, 300.0, 61.55),
        Order::new(3, 10, 15, "25-EX20", 9, 25, 300.0, 61.55),
        Order::new(4, 10, 15, "25-EX20", 9, 25, 300.0, 61.55),
        Order::new(5, 23, 30, "30-EX20", 11, 32, 200.0, 3.49),
        Order::new(6, 26, 29, "20-EB20", 15, 38, 220.0, 0.0),
        Order::new(7, 30, 35, "15-EB11", 8, 45, 250.0, 0.0),
    ]
}

/// Configuration for [`OrderGenerator`].
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Last tick at which new orders may arrive (inclusive).
    pub horizon: u32,
    /// Per-tick probability that an arrival batch occurs.
    pub arrival_probability: f64,
    /// Largest batch size; batch sizes are uniform on `1..=max_batch`.
    pub max_batch: u32,
    /// Inclusive bounds on `decision_due_date - order_date`.
    pub decision_window: (u32, u32),
    /// Inclusive bounds on the slack added beyond `order_date + processing_time`
    /// to obtain the due date.
    pub due_slack: (u32, u32),
    /// Model catalog new arrivals are drawn from.
    pub catalog: BTreeMap<String, ModelSpec>,
    /// Orders present before random arrivals start.
    pub initial_orders: Vec<Order>,
    /// Random seed for reproducibility (None = random seed).
    pub seed: Option<u64>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            horizon: 200,
            arrival_probability: 0.2,
            max_batch: 5,
            decision_window: (3, 10),
            due_slack: (2, 15),
            catalog: default_catalog(),
            initial_orders: default_initial_orders(),
            seed: None,
        }
    }
}

impl GeneratorConfig {
    /// Creates a new config with default parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the arrival horizon.
    pub fn with_horizon(mut self, horizon: u32) -> Self {
        self.horizon = horizon;
        self
    }

    /// Sets the per-tick arrival probability.
    pub fn with_arrival_probability(mut self, probability: f64) -> Self {
        self.arrival_probability = probability;
        self
    }

    /// Sets the maximum batch size.
    pub fn with_max_batch(mut self, max_batch: u32) -> Self {
        self.max_batch = max_batch;
        self
    }

    /// Sets the decision-window bounds.
    pub fn with_decision_window(mut self, min: u32, max: u32) -> Self {
        self.decision_window = (min, max);
        self
    }

    /// Sets the due-date slack bounds.
    pub fn with_due_slack(mut self, min: u32, max: u32) -> Self {
        self.due_slack = (min, max);
        self
    }

    /// Replaces the model catalog.
    pub fn with_catalog(mut self, catalog: BTreeMap<String, ModelSpec>) -> Self {
        self.catalog = catalog;
        self
    }

    /// Replaces the warm-start orders.
    pub fn with_initial_orders(mut self, orders: Vec<Order>) -> Self {
        self.initial_orders = orders;
        self
    }

    /// Sets the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates configuration parameters.
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.arrival_probability) {
            return Err(format!(
                "arrival_probability must be in [0, 1], got {}",
                self.arrival_probability
            ));
        }
        if self.max_batch == 0 {
            return Err("max_batch must be at least 1".to_string());
        }
        if self.decision_window.0 > self.decision_window.1 {
            return Err(format!(
                "decision_window min {} exceeds max {}",
                self.decision_window.0, self.decision_window.1
            ));
        }
        if self.due_slack.0 > self.due_slack.1 {
            return Err(format!(
                "due_slack min {} exceeds max {}",
                self.due_slack.0, self.due_slack.1
            ));
        }
        if self.catalog.is_empty() {
            return Err("catalog must contain at least one model".to_string());
        }
        for (name, spec) in &self.catalog {
            if spec.processing_time == 0 {
                return Err(format!("model {name} has zero processing time"));
            }
            if spec.revenue < 0.0 {
                return Err(format!("model {name} has negative revenue"));
            }
        }
        Ok(())
    }
}

/// Order-stream generator.
pub struct OrderGenerator;

impl OrderGenerator {
    /// Generates a complete order set: warm-start orders plus random
    /// arrivals, sorted by arrival tick and densely renumbered from 1.
    pub fn generate(config: &GeneratorConfig) -> Vec<Order> {
        config.validate().expect("invalid GeneratorConfig");

        let mut rng = match config.seed {
            Some(seed) => create_rng(seed),
            None => create_rng(rand::random()),
        };

        let models: Vec<(&String, ModelSpec)> =
            config.catalog.iter().map(|(name, spec)| (name, *spec)).collect();

        let mut orders = config.initial_orders.clone();
        let mut tmp_no: u32 = 100;

        for t in 0..=config.horizon {
            if !rng.random_bool(config.arrival_probability) {
                continue;
            }
            let batch = rng.random_range(1..=config.max_batch);
            for _ in 0..batch {
                tmp_no += 1;
                let (name, spec) = models[rng.random_range(0..models.len())];
                let decision_due_date =
                    t + rng.random_range(config.decision_window.0..=config.decision_window.1);
                let due_date = t
                    + spec.processing_time
                    + rng.random_range(config.due_slack.0..=config.due_slack.1);
                orders.push(Order::new(
                    tmp_no,
                    t,
                    decision_due_date,
                    name.clone(),
                    spec.processing_time,
                    due_date,
                    spec.revenue,
                    spec.risk,
                ));
            }
        }

        // Stable sort keeps warm-start orders ahead of same-tick arrivals.
        orders.sort_by_key(|o| o.order_date);
        for (i, order) in orders.iter_mut().enumerate() {
            order.order_no = (i + 1) as u32;
        }
        orders
    }
}
