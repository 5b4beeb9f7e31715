//! Per-action reward estimation.

use crate::order::{Action, Order};
use crate::reward::config::{FutureValue, RewardConfig};

/// Prices each action for an order at a given tick.
///
/// The estimate is a pure function of the order, the action, the tick, the
/// machine availability passed by the caller, and the arrival revenues this
/// estimator has been shown via [`observe_arrival`](Self::observe_arrival).
/// No other run state leaks in, so the same inputs always price the same.
///
/// Two shared ingredients feed every action:
/// - an opportunity cost `revenue * (1 - available_ratio) * scarcity_weight`,
///   charged only on Accept and Outsource (the capacity-touching actions),
/// - a future-opportunity value
///   `future_order_probability * max(0, typical_revenue - revenue)`,
///   charged as regret on Accept and Reject and credited as a bonus on
///   Outsource and Postpone.
pub struct RewardEstimator {
    config: RewardConfig,
    arrival_revenues: Vec<f64>,
}

impl RewardEstimator {
    pub fn new(config: RewardConfig) -> Self {
        config.validate().expect("invalid RewardConfig");
        Self {
            config,
            arrival_revenues: Vec::new(),
        }
    }

    /// Returns the reward configuration.
    pub fn config(&self) -> &RewardConfig {
        &self.config
    }

    /// Records the revenue of a newly arrived order. Only used by the
    /// running-average future-value mode; harmless otherwise.
    pub fn observe_arrival(&mut self, revenue: f64) {
        self.arrival_revenues.push(revenue);
    }

    /// Clears the arrival history for a fresh run.
    pub fn reset(&mut self) {
        self.arrival_revenues.clear();
    }

    /// Estimated reward of taking `action` on `order` at tick `t` with the
    /// given machine availability (1.0 = fully free).
    pub fn estimate(&self, order: &Order, action: Action, t: u32, available_ratio: f64) -> f64 {
        let cfg = &self.config;
        let opportunity_cost = order.revenue * (1.0 - available_ratio) * cfg.scarcity_weight;
        let future_opportunity =
            cfg.future_order_probability * (self.typical_revenue() - order.revenue).max(0.0);

        match action {
            Action::Accept => {
                let finish_est = t + order.processing_time;
                let mut base = order.revenue * self.risk_factor(order.risk);
                if finish_est > order.due_date {
                    base -= cfg.penalty;
                }
                base - opportunity_cost - cfg.lambda_accept * future_opportunity
            }
            Action::Outsource => {
                order.revenue * cfg.outsource_fraction * self.risk_factor(order.risk)
                    - opportunity_cost
                    + cfg.lambda_outsource * future_opportunity
            }
            Action::Reject => {
                -cfg.reject_rate * order.revenue - cfg.lambda_reject * future_opportunity
            }
            Action::Postpone => {
                let overshoot =
                    (t + 1 + order.processing_time).saturating_sub(order.due_date) as f64;
                -cfg.postpone_rate * order.revenue + cfg.lambda_postpone * future_opportunity
                    - cfg.postpone_lateness_weight * overshoot
            }
        }
    }

    fn typical_revenue(&self) -> f64 {
        match self.config.future_value {
            FutureValue::Fixed { revenue } => revenue,
            FutureValue::RunningAverage => {
                if self.arrival_revenues.is_empty() {
                    0.0
                } else {
                    self.arrival_revenues.iter().sum::<f64>() / self.arrival_revenues.len() as f64
                }
            }
        }
    }

    fn risk_factor(&self, risk: f64) -> f64 {
        if self.config.risk_discount {
            (1.0 - risk / 100.0).max(0.0)
        } else {
            1.0
        }
    }
}
