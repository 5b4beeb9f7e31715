//! Policy interface and decision context.

use crate::order::{Action, Order};

/// Everything a policy may look at when deciding one order at one tick.
///
/// `available_ratio` is the tick-level availability computed once after the
/// machine advances, frozen for every decision in the same tick.
#[derive(Debug, Clone, Copy)]
pub struct DecisionContext<'a> {
    /// Current tick.
    pub timestep: u32,
    /// Free machine fraction at the start of the decision sweep (1.0 = idle).
    pub available_ratio: f64,
    /// The order under decision.
    pub order: &'a Order,
}

impl DecisionContext<'_> {
    /// Flattens the context into the fixed feature vector consumed by
    /// context-aware policies: tick, availability, then the order's arrival
    /// date, decision due date, processing time, due date, revenue, risk.
    pub fn features(&self) -> [f64; 8] {
        [
            self.timestep as f64,
            self.available_ratio,
            self.order.order_date as f64,
            self.order.decision_due_date as f64,
            self.order.processing_time as f64,
            self.order.due_date as f64,
            self.order.revenue,
            self.order.risk,
        ]
    }
}

/// A sequential decision policy over the four admission actions.
///
/// Policies always propose from the full action vocabulary; they are never
/// told which actions the engine will grant. When a proposal cannot be
/// granted (postponing past the decision deadline, accepting into a full
/// machine) the engine substitutes an allowed action and calls
/// [`learn`](Policy::learn) with the action actually taken, so the policy's
/// statistics follow realized decisions rather than wishes.
pub trait Policy {
    /// Short stable identifier, used in logs and reports.
    fn name(&self) -> &str;

    /// Proposes an action for one order.
    fn select(&mut self, context: &DecisionContext<'_>) -> Action;

    /// Feeds back the reward of the action actually taken.
    fn learn(&mut self, action: Action, context: &DecisionContext<'_>, reward: f64);

    /// Current scalar belief about an action's value, for trace snapshots.
    fn belief(&self, action: Action) -> f64 {
        let _ = action;
        0.5
    }

    /// Forgets all learned state for a fresh run.
    fn reset(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_features_layout() {
        let order = Order::new(3, 4, 9, "20-EB20", 15, 38, 220.0, 12.5);
        let context = DecisionContext {
            timestep: 6,
            available_ratio: 0.25,
            order: &order,
        };
        assert_eq!(
            context.features(),
            [6.0, 0.25, 4.0, 9.0, 15.0, 38.0, 220.0, 12.5]
        );
    }
}
