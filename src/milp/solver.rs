//! Exact assignment-and-scheduling formulation.

use crate::error::OrderError;
use crate::milp::solution::{MilpOutcome, PlannedOrder, SolveStatus};
use crate::order::{validate_orders, Action, Order};
use crate::reward::RewardConfig;
use crate::sim::SimConfig;
use good_lp::{
    default_solver, variable, variables, Expression, ResolutionError, Solution, SolverModel,
    Variable,
};
use std::time::Instant;
use tracing::{debug, warn};

/// Clairvoyant baseline: one mixed-integer program over the whole horizon.
///
/// Decision variables are a binary action indicator per (order, action) and
/// a binary start indicator per (order, feasible start tick). Constraints:
/// exactly one action per order; Postpone excluded for orders whose
/// decision deadline falls inside the horizon; start indicators sum to the
/// Accept indicator over the window `[order_date, horizon − processing
/// time]` (Accept excluded when the window is empty); and at every tick the
/// scheduled intervals covering it stay within machine capacity.
///
/// The objective maximizes total revenue with the estimator's capacity-free
/// pricing: full (or penalty-reduced) revenue for scheduled accepts, the
/// outsourcing fraction for outsources, and the reject/postpone revenue
/// charges. Risk discounting never applies here. The model is built fresh
/// per call and discarded after extraction; nothing feeds back into online
/// learning state.
pub struct MilpSolver {
    sim: SimConfig,
    reward: RewardConfig,
}

impl MilpSolver {
    pub fn new(sim: SimConfig, reward: RewardConfig) -> Self {
        sim.validate().expect("invalid SimConfig");
        reward.validate().expect("invalid RewardConfig");
        Self { sim, reward }
    }

    /// Solves the admission plan for one order set.
    ///
    /// Solver failures are not errors: they come back as a non-optimal
    /// [`SolveStatus`] with an empty plan. The only `Err` is malformed
    /// input.
    pub fn solve(&self, orders: &[Order]) -> Result<MilpOutcome, OrderError> {
        validate_orders(orders)?;
        let horizon = self.sim.num_timesteps;
        let started = Instant::now();

        let mut vars = variables!();

        let action_vars: Vec<Vec<Variable>> = (0..orders.len())
            .map(|i| {
                Action::ALL
                    .iter()
                    .map(|a| vars.add(variable().binary().name(format!("x_{i}_{a}"))))
                    .collect()
            })
            .collect();

        let windows: Vec<Vec<u32>> = orders
            .iter()
            .map(|o| feasible_starts(o, horizon))
            .collect();

        let start_vars: Vec<Vec<Variable>> = windows
            .iter()
            .enumerate()
            .map(|(i, window)| {
                window
                    .iter()
                    .map(|t| vars.add(variable().binary().name(format!("y_{i}_{t}"))))
                    .collect()
            })
            .collect();

        let mut objective = Expression::from(0.0);
        for (i, order) in orders.iter().enumerate() {
            for (k, &start) in windows[i].iter().enumerate() {
                objective = objective + accept_value(order, start, &self.reward) * start_vars[i][k];
            }
            objective = objective
                + outsource_value(order, &self.reward) * action_vars[i][Action::Outsource.index()];
            objective = objective
                + reject_value(order, &self.reward) * action_vars[i][Action::Reject.index()];
            objective = objective
                + postpone_value(order, &self.reward) * action_vars[i][Action::Postpone.index()];
        }

        let mut problem = vars.maximise(objective).using(default_solver);

        for (i, order) in orders.iter().enumerate() {
            let one_action = action_vars[i]
                .iter()
                .fold(Expression::from(0.0), |acc, &v| acc + v);
            problem.add_constraint(one_action.eq(1.0));

            if order.decision_due_date <= horizon {
                problem.add_constraint(
                    Expression::from(action_vars[i][Action::Postpone.index()]).eq(0.0),
                );
            }

            let accept = action_vars[i][Action::Accept.index()];
            if windows[i].is_empty() {
                problem.add_constraint(Expression::from(accept).eq(0.0));
            } else {
                let starts_sum = start_vars[i]
                    .iter()
                    .fold(Expression::from(0.0), |acc, &v| acc + v);
                problem.add_constraint(starts_sum.eq(accept));
            }
        }

        for tau in 0..horizon {
            let mut covering = Expression::from(0.0);
            let mut any = false;
            for (i, order) in orders.iter().enumerate() {
                for (k, &start) in windows[i].iter().enumerate() {
                    if start <= tau && tau < start + order.processing_time {
                        covering = covering + start_vars[i][k];
                        any = true;
                    }
                }
            }
            if any {
                problem.add_constraint(covering.leq(self.sim.machine_capacity as f64));
            }
        }

        debug!(orders = orders.len(), horizon, "solving admission plan");

        let solution = match problem.solve() {
            Ok(solution) => solution,
            Err(err) => {
                let status = match err {
                    ResolutionError::Infeasible => SolveStatus::Infeasible,
                    ResolutionError::Unbounded => SolveStatus::Unbounded,
                    other => SolveStatus::Error(other.to_string()),
                };
                warn!(?status, "exact baseline solve failed");
                return Ok(MilpOutcome::failed(
                    status,
                    started.elapsed().as_millis() as u64,
                ));
            }
        };

        let mut plan = Vec::with_capacity(orders.len());
        let mut objective_value = 0.0;
        for (i, order) in orders.iter().enumerate() {
            let action = Action::ALL
                .into_iter()
                .find(|a| solution.value(action_vars[i][a.index()]) > 0.5)
                .unwrap_or(Action::Reject);

            let mut start_time = None;
            let mut finish_time = None;
            let value = match action {
                Action::Accept => {
                    let chosen = windows[i]
                        .iter()
                        .enumerate()
                        .find(|&(k, _)| solution.value(start_vars[i][k]) > 0.5);
                    match chosen {
                        Some((_, &start)) => {
                            start_time = Some(start);
                            finish_time = Some(start + order.processing_time);
                            accept_value(order, start, &self.reward)
                        }
                        None => 0.0,
                    }
                }
                Action::Outsource => outsource_value(order, &self.reward),
                Action::Reject => reject_value(order, &self.reward),
                Action::Postpone => postpone_value(order, &self.reward),
            };
            objective_value += value;
            plan.push(PlannedOrder {
                order_no: order.order_no,
                action,
                start_time,
                finish_time,
                value,
            });
        }

        let solve_time_ms = started.elapsed().as_millis() as u64;
        debug!(
            objective = objective_value,
            solve_time_ms, "admission plan found"
        );

        Ok(MilpOutcome {
            status: SolveStatus::Optimal,
            objective: objective_value,
            plan,
            solve_time_ms,
        })
    }
}

/// Feasible processing starts for an accepted order: no earlier than its
/// arrival, late enough starts excluded so processing ends by the horizon.
fn feasible_starts(order: &Order, horizon: u32) -> Vec<u32> {
    if order.processing_time > horizon {
        return Vec::new();
    }
    let latest = horizon - order.processing_time;
    if latest < order.order_date {
        return Vec::new();
    }
    (order.order_date..=latest).collect()
}

fn accept_value(order: &Order, start: u32, reward: &RewardConfig) -> f64 {
    if start + order.processing_time <= order.due_date {
        order.revenue
    } else {
        order.revenue - reward.penalty
    }
}

fn outsource_value(order: &Order, reward: &RewardConfig) -> f64 {
    order.revenue * reward.outsource_fraction
}

fn reject_value(order: &Order, reward: &RewardConfig) -> f64 {
    -reward.reject_rate * order.revenue
}

fn postpone_value(order: &Order, reward: &RewardConfig) -> f64 {
    -reward.postpone_rate * order.revenue
}
