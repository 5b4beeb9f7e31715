//! Input validation errors.
//!
//! Malformed order input is the only hard failure in the system: everything
//! past validation degrades softly (capacity guarding, deadline narrowing,
//! neutral defaults, explicit solver statuses).

use thiserror::Error;

/// Rejection reasons for a malformed order set.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OrderError {
    /// Two orders share the same order number.
    #[error("duplicate order number {0}")]
    DuplicateOrderNumber(u32),

    /// An order declares a zero processing time.
    #[error("order {0} has zero processing time")]
    ZeroProcessingTime(u32),

    /// An order's decision deadline precedes its arrival.
    #[error("order {order_no}: decision due date {decision_due_date} precedes order date {order_date}")]
    DecisionBeforeArrival {
        order_no: u32,
        decision_due_date: u32,
        order_date: u32,
    },

    /// An order declares negative revenue.
    #[error("order {0} has negative revenue")]
    NegativeRevenue(u32),
}
