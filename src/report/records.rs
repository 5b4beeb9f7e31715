//! Per-order records and aggregate run accounting.

use crate::claim::ClaimOutcome;
use crate::milp::MilpOutcome;
use crate::order::{Action, Order, OrderEvent};
use crate::reward::{RewardConfig, RewardEstimator};

/// Flat, export-ready view of one order after a run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OrderRecord {
    pub order_no: u32,
    pub order_date: u32,
    pub decision_due_date: u32,
    pub model_name: String,
    pub processing_time: u32,
    pub due_date: u32,
    pub revenue: f64,
    pub risk: f64,
    pub final_action: Option<Action>,
    pub start_time: Option<u32>,
    pub finish_time: Option<u32>,
    /// Realized (online) or planned (exact baseline) revenue; None when the
    /// order produced none.
    pub calculated_revenue: Option<f64>,
    /// Claim verdict for delivered orders, None otherwise.
    pub claimed: Option<bool>,
    pub decision_history: Vec<(u32, OrderEvent)>,
}

/// Aggregate accounting of one run.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RunSummary {
    /// Estimated reward of every final action, priced at the horizon with
    /// an exhausted machine.
    pub total_reward: f64,
    /// Realized revenue of delivered orders, before claims.
    pub total_revenue: f64,
    /// Handling cost of settled claims.
    pub total_claim_cost: f64,
    /// `total_revenue` minus `total_claim_cost`.
    pub net_revenue: f64,
}

/// Revenue an order's final action actually produced: full revenue for
/// on-time accepts, penalty-reduced for late (or never-finished) accepts,
/// the outsourcing fraction for outsources, nothing otherwise.
pub fn realized_revenue(order: &Order, reward: &RewardConfig) -> Option<f64> {
    match order.final_action {
        Some(Action::Accept) => {
            let on_time = order
                .finish_time
                .map_or(false, |finish| finish <= order.due_date);
            if on_time {
                Some(order.revenue)
            } else {
                Some(order.revenue - reward.penalty)
            }
        }
        Some(Action::Outsource) => Some(order.revenue * reward.outsource_fraction),
        _ => None,
    }
}

/// One record per order from a simulated run, joining in claim verdicts
/// when a settlement is supplied.
pub fn order_records(
    orders: &[Order],
    reward: &RewardConfig,
    claims: Option<&ClaimOutcome>,
) -> Vec<OrderRecord> {
    orders
        .iter()
        .map(|order| OrderRecord {
            order_no: order.order_no,
            order_date: order.order_date,
            decision_due_date: order.decision_due_date,
            model_name: order.model_name.clone(),
            processing_time: order.processing_time,
            due_date: order.due_date,
            revenue: order.revenue,
            risk: order.risk,
            final_action: order.final_action,
            start_time: order.start_time,
            finish_time: order.finish_time,
            calculated_revenue: realized_revenue(order, reward),
            claimed: claims.and_then(|c| c.claimed(order.order_no)),
            decision_history: order.decision_history.clone(),
        })
        .collect()
}

/// One record per order from a clairvoyant plan. Action and schedule come
/// from the plan; calculated revenue is the objective coefficient, so
/// reject and postpone charges show as negative values.
pub fn planned_records(
    orders: &[Order],
    outcome: &MilpOutcome,
    claims: Option<&ClaimOutcome>,
) -> Vec<OrderRecord> {
    orders
        .iter()
        .map(|order| {
            let planned = outcome.plan.iter().find(|p| p.order_no == order.order_no);
            OrderRecord {
                order_no: order.order_no,
                order_date: order.order_date,
                decision_due_date: order.decision_due_date,
                model_name: order.model_name.clone(),
                processing_time: order.processing_time,
                due_date: order.due_date,
                revenue: order.revenue,
                risk: order.risk,
                final_action: planned.map(|p| p.action),
                start_time: planned.and_then(|p| p.start_time),
                finish_time: planned.and_then(|p| p.finish_time),
                calculated_revenue: planned.map(|p| p.value),
                claimed: claims.and_then(|c| c.claimed(order.order_no)),
                decision_history: order.decision_history.clone(),
            }
        })
        .collect()
}

/// Aggregates a finished online run.
pub fn summarize(
    orders: &[Order],
    estimator: &RewardEstimator,
    horizon: u32,
    claims: Option<&ClaimOutcome>,
) -> RunSummary {
    let mut total_reward = 0.0;
    let mut total_revenue = 0.0;
    for order in orders {
        if let Some(action) = order.final_action {
            total_reward += estimator.estimate(order, action, horizon, 0.0);
        }
        if let Some(revenue) = realized_revenue(order, estimator.config()) {
            total_revenue += revenue;
        }
    }
    let total_claim_cost = claims.map_or(0.0, |c| c.total_cost);
    RunSummary {
        total_reward,
        total_revenue,
        total_claim_cost,
        net_revenue: total_revenue - total_claim_cost,
    }
}

/// Aggregates a clairvoyant plan: the objective doubles as both reward and
/// revenue, with settled claims charged against it.
pub fn plan_summary(outcome: &MilpOutcome, claims: Option<&ClaimOutcome>) -> RunSummary {
    let total_claim_cost = claims.map_or(0.0, |c| c.total_cost);
    RunSummary {
        total_reward: outcome.objective,
        total_revenue: outcome.objective,
        total_claim_cost,
        net_revenue: outcome.objective - total_claim_cost,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claim::ClaimDecision;
    use crate::milp::{PlannedOrder, SolveStatus};

    fn finished(
        order_no: u32,
        action: Action,
        revenue: f64,
        finish_time: Option<u32>,
    ) -> Order {
        let mut order = Order::new(order_no, 0, 5, "m", 5, 20, revenue, 0.0);
        order.final_action = Some(action);
        order.finish_time = finish_time;
        order.is_completed = true;
        order
    }

    #[test]
    fn test_realized_revenue_mapping() {
        let reward = RewardConfig::default();
        let on_time = finished(1, Action::Accept, 200.0, Some(18));
        assert_eq!(realized_revenue(&on_time, &reward), Some(200.0));

        let late = finished(2, Action::Accept, 200.0, Some(25));
        assert_eq!(realized_revenue(&late, &reward), Some(170.0));

        // Never finished counts as late.
        let unfinished = finished(3, Action::Accept, 200.0, None);
        assert_eq!(realized_revenue(&unfinished, &reward), Some(170.0));

        let outsourced = finished(4, Action::Outsource, 200.0, None);
        assert_eq!(realized_revenue(&outsourced, &reward), Some(120.0));

        let rejected = finished(5, Action::Reject, 200.0, None);
        assert_eq!(realized_revenue(&rejected, &reward), None);

        let undecided = Order::new(6, 0, 5, "m", 5, 20, 200.0, 0.0);
        assert_eq!(realized_revenue(&undecided, &reward), None);
    }

    #[test]
    fn test_summarize_accounts_rewards_revenue_and_claims() {
        let estimator = RewardEstimator::new(RewardConfig::default());
        let accepted = finished(1, Action::Accept, 200.0, Some(5));
        let outsourced = finished(2, Action::Outsource, 100.0, None);
        let orders = vec![accepted, outsourced];

        let claims = ClaimOutcome {
            decisions: vec![
                ClaimDecision {
                    order_no: 1,
                    claimed: Some(true),
                },
                ClaimDecision {
                    order_no: 2,
                    claimed: Some(false),
                },
            ],
            total_cost: 150.0,
        };

        let summary = summarize(&orders, &estimator, 10, Some(&claims));
        // Accept at the horizon with no capacity: 200 - 60 scarcity - 50
        // future = 90. Outsource: 60 - 30 scarcity + 50 future = 80.
        assert!((summary.total_reward - 170.0).abs() < 1e-10);
        assert!((summary.total_revenue - 260.0).abs() < 1e-10);
        assert!((summary.total_claim_cost - 150.0).abs() < 1e-10);
        assert!((summary.net_revenue - 110.0).abs() < 1e-10);
    }

    #[test]
    fn test_order_records_join_claim_verdicts() {
        let reward = RewardConfig::default();
        let orders = vec![
            finished(1, Action::Accept, 200.0, Some(10)),
            finished(2, Action::Reject, 100.0, None),
        ];
        let claims = ClaimOutcome {
            decisions: vec![
                ClaimDecision {
                    order_no: 1,
                    claimed: Some(true),
                },
                ClaimDecision {
                    order_no: 2,
                    claimed: None,
                },
            ],
            total_cost: 150.0,
        };

        let records = order_records(&orders, &reward, Some(&claims));
        assert_eq!(records[0].claimed, Some(true));
        let realized = records[0].calculated_revenue.unwrap();
        assert!((realized - 200.0).abs() < 1e-10);
        assert_eq!(records[1].claimed, None);
        assert_eq!(records[1].calculated_revenue, None);

        let without = order_records(&orders, &reward, None);
        assert_eq!(without[0].claimed, None);
    }

    #[test]
    fn test_planned_records_carry_coefficient_values() {
        let orders = vec![
            Order::new(1, 0, 5, "m", 3, 10, 100.0, 0.0),
            Order::new(2, 0, 5, "m", 3, 10, 100.0, 0.0),
        ];
        let outcome = MilpOutcome {
            status: SolveStatus::Optimal,
            objective: 90.0,
            plan: vec![
                PlannedOrder {
                    order_no: 1,
                    action: Action::Accept,
                    start_time: Some(0),
                    finish_time: Some(3),
                    value: 100.0,
                },
                PlannedOrder {
                    order_no: 2,
                    action: Action::Reject,
                    start_time: None,
                    finish_time: None,
                    value: -10.0,
                },
            ],
            solve_time_ms: 1,
        };

        let records = planned_records(&orders, &outcome, None);
        assert_eq!(records[0].final_action, Some(Action::Accept));
        assert_eq!(records[0].start_time, Some(0));
        let accepted = records[0].calculated_revenue.unwrap();
        assert!((accepted - 100.0).abs() < 1e-10);
        // Charges stay visible in plan records.
        assert_eq!(records[1].final_action, Some(Action::Reject));
        let rejected = records[1].calculated_revenue.unwrap();
        assert!((rejected + 10.0).abs() < 1e-10);
    }

    #[test]
    fn test_plan_summary_charges_claims() {
        let outcome = MilpOutcome {
            status: SolveStatus::Optimal,
            objective: 500.0,
            plan: Vec::new(),
            solve_time_ms: 2,
        };
        let claims = ClaimOutcome {
            decisions: Vec::new(),
            total_cost: 300.0,
        };
        let summary = plan_summary(&outcome, Some(&claims));
        assert!((summary.total_revenue - 500.0).abs() < 1e-10);
        assert!((summary.net_revenue - 200.0).abs() < 1e-10);

        let unclaimed = plan_summary(&outcome, None);
        assert!((unclaimed.net_revenue - 500.0).abs() < 1e-10);
    }
}
