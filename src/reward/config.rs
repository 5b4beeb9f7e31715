//! Reward-estimation configuration.

/// How the typical revenue of a hypothetical future order is obtained.
///
/// The estimator compares each order against this value to price the
/// opportunity of keeping capacity free.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FutureValue {
    /// A fixed expected revenue for future arrivals.
    Fixed { revenue: f64 },
    /// The running arithmetic mean of all arrival revenues observed so far
    /// in the current run (0 until the first arrival).
    RunningAverage,
}

/// Configuration for [`RewardEstimator`](crate::reward::RewardEstimator).
///
/// Every term of the reward model sits behind a named parameter, so
/// variants (no risk discount, data-driven future value, lateness-aware
/// postponing) are plain configuration rather than separate estimators.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RewardConfig {
    /// Flat deduction when an accepted order is projected to finish late.
    pub penalty: f64,
    /// Fraction of revenue retained when outsourcing.
    pub outsource_fraction: f64,
    /// Weight of the capacity-scarcity cost `revenue * (1 - available_ratio)`.
    pub scarcity_weight: f64,
    /// Fraction of revenue charged for rejecting.
    pub reject_rate: f64,
    /// Fraction of revenue charged for postponing.
    pub postpone_rate: f64,
    /// Probability that a better order arrives later.
    pub future_order_probability: f64,
    /// Source of the typical future-order revenue.
    pub future_value: FutureValue,
    /// Weight of the future-opportunity regret on Accept.
    pub lambda_accept: f64,
    /// Weight of the future-opportunity regret on Reject.
    pub lambda_reject: f64,
    /// Weight of the future-opportunity bonus on Outsource.
    pub lambda_outsource: f64,
    /// Weight of the future-opportunity bonus on Postpone.
    pub lambda_postpone: f64,
    /// Discount Accept/Outsource revenue by `max(0, 1 - risk / 100)`.
    pub risk_discount: bool,
    /// Weight of the projected-lateness deduction on Postpone. A postponed
    /// order decided one tick later finishes at `t + 1 + processing_time`;
    /// the overshoot past the due date is charged at this rate.
    pub postpone_lateness_weight: f64,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            penalty: 30.0,
            outsource_fraction: 0.6,
            scarcity_weight: 0.3,
            reject_rate: 0.1,
            postpone_rate: 0.05,
            future_order_probability: 0.5,
            future_value: FutureValue::Fixed { revenue: 300.0 },
            lambda_accept: 1.0,
            lambda_reject: 0.5,
            lambda_outsource: 0.5,
            lambda_postpone: 0.7,
            risk_discount: false,
            postpone_lateness_weight: 0.0,
        }
    }
}

impl RewardConfig {
    /// Creates a new config with default parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the late-finish penalty.
    pub fn with_penalty(mut self, penalty: f64) -> Self {
        self.penalty = penalty;
        self
    }

    /// Sets the outsourcing revenue fraction.
    pub fn with_outsource_fraction(mut self, fraction: f64) -> Self {
        self.outsource_fraction = fraction;
        self
    }

    /// Sets the capacity-scarcity weight.
    pub fn with_scarcity_weight(mut self, weight: f64) -> Self {
        self.scarcity_weight = weight;
        self
    }

    /// Sets the reject charge rate.
    pub fn with_reject_rate(mut self, rate: f64) -> Self {
        self.reject_rate = rate;
        self
    }

    /// Sets the postpone charge rate.
    pub fn with_postpone_rate(mut self, rate: f64) -> Self {
        self.postpone_rate = rate;
        self
    }

    /// Sets the future-order probability.
    pub fn with_future_order_probability(mut self, probability: f64) -> Self {
        self.future_order_probability = probability;
        self
    }

    /// Sets the future-value source.
    pub fn with_future_value(mut self, future_value: FutureValue) -> Self {
        self.future_value = future_value;
        self
    }

    /// Sets all four future-opportunity weights at once
    /// (accept, reject, outsource, postpone).
    pub fn with_lambdas(mut self, accept: f64, reject: f64, outsource: f64, postpone: f64) -> Self {
        self.lambda_accept = accept;
        self.lambda_reject = reject;
        self.lambda_outsource = outsource;
        self.lambda_postpone = postpone;
        self
    }

    /// Enables or disables the risk discount on Accept/Outsource revenue.
    pub fn with_risk_discount(mut self, enabled: bool) -> Self {
        self.risk_discount = enabled;
        self
    }

    /// Sets the projected-lateness weight on Postpone.
    pub fn with_postpone_lateness_weight(mut self, weight: f64) -> Self {
        self.postpone_lateness_weight = weight;
        self
    }

    /// Validates configuration parameters.
    pub fn validate(&self) -> Result<(), String> {
        if self.penalty < 0.0 {
            return Err(format!("penalty must be non-negative, got {}", self.penalty));
        }
        if !(0.0..=1.0).contains(&self.outsource_fraction) {
            return Err(format!(
                "outsource_fraction must be in [0, 1], got {}",
                self.outsource_fraction
            ));
        }
        if self.scarcity_weight < 0.0 {
            return Err(format!(
                "scarcity_weight must be non-negative, got {}",
                self.scarcity_weight
            ));
        }
        if self.reject_rate < 0.0 || self.postpone_rate < 0.0 {
            return Err("reject_rate and postpone_rate must be non-negative".to_string());
        }
        if !(0.0..=1.0).contains(&self.future_order_probability) {
            return Err(format!(
                "future_order_probability must be in [0, 1], got {}",
                self.future_order_probability
            ));
        }
        if let FutureValue::Fixed { revenue } = self.future_value {
            if revenue < 0.0 {
                return Err(format!(
                    "future value revenue must be non-negative, got {revenue}"
                ));
            }
        }
        if self.lambda_accept < 0.0
            || self.lambda_reject < 0.0
            || self.lambda_outsource < 0.0
            || self.lambda_postpone < 0.0
        {
            return Err("lambda weights must be non-negative".to_string());
        }
        if self.postpone_lateness_weight < 0.0 {
            return Err(format!(
                "postpone_lateness_weight must be non-negative, got {}",
                self.postpone_lateness_weight
            ));
        }
        Ok(())
    }
}
