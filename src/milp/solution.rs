//! Plan data produced by the exact baseline.

use crate::order::{Action, Order};

/// Solver outcome classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolveStatus {
    /// A proven-optimal plan was found.
    Optimal,
    /// The model admits no feasible plan.
    Infeasible,
    /// The objective is unbounded; indicates a modeling bug.
    Unbounded,
    /// The backend failed for another reason.
    Error(String),
}

/// One order's entry in the clairvoyant plan.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlannedOrder {
    pub order_no: u32,
    pub action: Action,
    /// Scheduled processing start (scheduled accepts only).
    pub start_time: Option<u32>,
    /// Scheduled processing finish (scheduled accepts only).
    pub finish_time: Option<u32>,
    /// Objective contribution of this assignment.
    pub value: f64,
}

/// Result of one exact solve.
#[derive(Debug, Clone)]
pub struct MilpOutcome {
    pub status: SolveStatus,
    /// Total planned revenue, zero when no plan was found.
    pub objective: f64,
    /// One entry per order, in input order; empty when no plan was found.
    pub plan: Vec<PlannedOrder>,
    /// Wall-clock solve time in milliseconds.
    pub solve_time_ms: u64,
}

impl MilpOutcome {
    /// An outcome carrying no plan. Callers must report the status rather
    /// than fall back to a default schedule.
    pub fn failed(status: SolveStatus, solve_time_ms: u64) -> Self {
        Self {
            status,
            objective: 0.0,
            plan: Vec::new(),
            solve_time_ms,
        }
    }

    /// Whether a proven-optimal plan is present.
    pub fn is_optimal(&self) -> bool {
        self.status == SolveStatus::Optimal
    }

    /// Writes the planned decisions into `orders`, matched by order number:
    /// terminal actions and the scheduled interval for accepts. A planned
    /// Postpone (deferral past the horizon) leaves the order undecided.
    pub fn apply_to(&self, orders: &mut [Order]) {
        for planned in &self.plan {
            if let Some(order) = orders.iter_mut().find(|o| o.order_no == planned.order_no) {
                if planned.action.is_terminal() {
                    order.final_action = Some(planned.action);
                    order.is_completed = true;
                }
                order.start_time = planned.start_time;
                order.finish_time = planned.finish_time;
            }
        }
    }
}
