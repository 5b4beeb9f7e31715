//! Order data model and input validation.

use crate::error::OrderError;
use std::collections::HashSet;
use std::fmt;

/// Admission decision for one order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Action {
    Accept,
    Reject,
    Postpone,
    Outsource,
}

impl Action {
    /// All actions in canonical selection order. Argmax ties break toward the
    /// earlier entry, so this order is part of the decision semantics.
    pub const ALL: [Action; 4] = [
        Action::Accept,
        Action::Reject,
        Action::Postpone,
        Action::Outsource,
    ];

    /// The narrowed option set once an order's decision deadline has passed.
    pub const PAST_DEADLINE: [Action; 3] = [Action::Accept, Action::Reject, Action::Outsource];

    /// Position of this action in [`Action::ALL`].
    pub fn index(self) -> usize {
        match self {
            Action::Accept => 0,
            Action::Reject => 1,
            Action::Postpone => 2,
            Action::Outsource => 3,
        }
    }

    /// Whether this action resolves the order for good.
    pub fn is_terminal(self) -> bool {
        self != Action::Postpone
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Action::Accept => "Accept",
            Action::Reject => "Reject",
            Action::Postpone => "Postpone",
            Action::Outsource => "Outsource",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry in an order's decision history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OrderEvent {
    /// The order entered the system.
    Arrived,
    /// An action was chosen (or substituted by the engine) for the order.
    Decided(Action),
}

/// One admission-control decision subject.
///
/// Arrival attributes are fixed at construction; the decision state is
/// mutated only by the simulation loop (or by applying an exact-baseline
/// plan). The history records every event the order experienced, including
/// every Postpone.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Order {
    /// Unique number, densely assigned 1..N in ascending arrival order.
    pub order_no: u32,
    /// Tick at which the order enters the system.
    pub order_date: u32,
    /// First tick at which Postpone is no longer allowed.
    pub decision_due_date: u32,
    /// Product model identifier; also the claim-probability lookup key.
    pub model_name: String,
    /// Machine ticks required when accepted.
    pub processing_time: u32,
    /// Delivery deadline. Finishing later is possible and penalized.
    pub due_date: u32,
    /// Revenue when delivered.
    pub revenue: f64,
    /// Model-specific risk scalar (percent scale).
    pub risk: f64,

    /// Terminal action, once one is taken (`None` while pending or postponed).
    pub final_action: Option<Action>,
    /// Every event the order experienced, in tick order.
    pub decision_history: Vec<(u32, OrderEvent)>,
    /// Tick processing began (Accept only).
    pub start_time: Option<u32>,
    /// Tick processing finished (Accept only; forced to the horizon when
    /// still running at the end of a run).
    pub finish_time: Option<u32>,
    /// Whether the order has left the decision rounds for good.
    pub is_completed: bool,
}

impl Order {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        order_no: u32,
        order_date: u32,
        decision_due_date: u32,
        model_name: impl Into<String>,
        processing_time: u32,
        due_date: u32,
        revenue: f64,
        risk: f64,
    ) -> Self {
        Self {
            order_no,
            order_date,
            decision_due_date,
            model_name: model_name.into(),
            processing_time,
            due_date,
            revenue,
            risk,
            final_action: None,
            decision_history: Vec::new(),
            start_time: None,
            finish_time: None,
            is_completed: false,
        }
    }

    /// Whether the order awaits a decision at tick `t`: arrived, not yet
    /// completed, and without a terminal action.
    pub fn needs_decision(&self, t: u32) -> bool {
        !self.is_completed && self.final_action.is_none() && self.order_date <= t
    }
}

/// Checks an order set before a run.
///
/// This is the only fatal path: a set that fails here rejects the whole run
/// before the first tick.
pub fn validate_orders(orders: &[Order]) -> Result<(), OrderError> {
    let mut seen = HashSet::with_capacity(orders.len());
    for o in orders {
        if !seen.insert(o.order_no) {
            return Err(OrderError::DuplicateOrderNumber(o.order_no));
        }
        if o.processing_time == 0 {
            return Err(OrderError::ZeroProcessingTime(o.order_no));
        }
        if o.decision_due_date < o.order_date {
            return Err(OrderError::DecisionBeforeArrival {
                order_no: o.order_no,
                decision_due_date: o.decision_due_date,
                order_date: o.order_date,
            });
        }
        if o.revenue < 0.0 {
            return Err(OrderError::NegativeRevenue(o.order_no));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_order(order_no: u32) -> Order {
        Order::new(order_no, 0, 5, "15-EB11", 8, 12, 250.0, 0.0)
    }

    #[test]
    fn test_action_index_roundtrip() {
        for action in Action::ALL {
            assert_eq!(Action::ALL[action.index()], action);
        }
    }

    #[test]
    fn test_past_deadline_excludes_postpone() {
        assert!(!Action::PAST_DEADLINE.contains(&Action::Postpone));
        assert_eq!(Action::PAST_DEADLINE.len(), 3);
    }

    #[test]
    fn test_only_postpone_is_non_terminal() {
        for action in Action::ALL {
            assert_eq!(action.is_terminal(), action != Action::Postpone);
        }
    }

    #[test]
    fn test_needs_decision() {
        let mut o = sample_order(1);
        assert!(o.needs_decision(0));
        assert!(o.needs_decision(100));

        o.final_action = Some(Action::Reject);
        assert!(!o.needs_decision(100));

        let mut late = sample_order(2);
        late.order_date = 10;
        assert!(!late.needs_decision(9));
        assert!(late.needs_decision(10));

        let mut done = sample_order(3);
        done.is_completed = true;
        assert!(!done.needs_decision(0));
    }

    #[test]
    fn test_validate_accepts_well_formed_set() {
        let orders = vec![sample_order(1), sample_order(2), sample_order(3)];
        assert!(validate_orders(&orders).is_ok());
    }

    #[test]
    fn test_validate_rejects_duplicate_number() {
        let orders = vec![sample_order(1), sample_order(1)];
        assert_eq!(
            validate_orders(&orders),
            Err(OrderError::DuplicateOrderNumber(1))
        );
    }

    #[test]
    fn test_validate_rejects_zero_processing_time() {
        let mut bad = sample_order(1);
        bad.processing_time = 0;
        assert_eq!(
            validate_orders(&[bad]),
            Err(OrderError::ZeroProcessingTime(1))
        );
    }

    #[test]
    fn test_validate_rejects_deadline_before_arrival() {
        let mut bad = sample_order(7);
        bad.order_date = 10;
        bad.decision_due_date = 9;
        assert!(matches!(
            validate_orders(&[bad]),
            Err(OrderError::DecisionBeforeArrival { order_no: 7, .. })
        ));
    }

    #[test]
    fn test_validate_rejects_negative_revenue() {
        let mut bad = sample_order(1);
        bad.revenue = -1.0;
        assert_eq!(validate_orders(&[bad]), Err(OrderError::NegativeRevenue(1)));
    }

    #[test]
    fn test_action_display() {
        assert_eq!(Action::Accept.to_string(), "Accept");
        assert_eq!(Action::Outsource.to_string(), "Outsource");
    }
}
