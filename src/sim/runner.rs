//! Time-stepped admission simulation.

use crate::error::OrderError;
use crate::order::{validate_orders, Action, Order, OrderEvent};
use crate::policy::{DecisionContext, Policy};
use crate::reward::RewardEstimator;
use crate::rng::create_rng;
use crate::sim::config::SimConfig;
use crate::sim::machine::Machine;
use crate::sim::trace::{BeliefTrace, TickLog};
use rand::Rng;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, trace};

/// Outcome of one simulated run.
#[derive(Debug, Clone)]
pub struct SimulationResult {
    /// The order set with all decision state filled in.
    pub orders: Vec<Order>,
    /// One entry per tick, `0..=num_timesteps`.
    pub tick_logs: Vec<TickLog>,
    /// Per-action belief snapshots, one per tick.
    pub beliefs: BeliefTrace,
    /// Orders that arrived within the horizon.
    pub total_arrived: usize,
    /// Decision events taken (terminal actions and postpones alike).
    pub total_decisions: usize,
    /// Accepts converted by the capacity guard into Postpone or Reject.
    pub guard_substitutions: usize,
    /// Proposals outside the allowed set replaced by a uniform draw.
    pub fallback_substitutions: usize,
}

/// The discrete-time decision loop.
///
/// Each tick runs five phases in a fixed sequence:
/// 1. register arrivals whose order date equals the tick,
/// 2. advance the machine by one tick and retire finished orders,
/// 3. collect pending orders (arrived, no terminal action) and freeze the
///    availability ratio for the whole sweep,
/// 4. sweep the pending orders in input order: the policy proposes from the
///    full action vocabulary, the engine narrows (uniform redraw when the
///    proposal is not allowed, capacity guard on Accept against the live
///    machine), records and prices the action taken, feeds it back to the
///    policy, and applies the transition,
/// 5. snapshot the per-action beliefs and the machine occupancy.
///
/// After the last tick, accepted orders still on the machine are closed at
/// the horizon. The policy and estimator are borrowed mutably and keep
/// their learned state afterwards; reset them for an independent run.
pub struct Simulation {
    config: SimConfig,
}

impl Simulation {
    pub fn new(config: SimConfig) -> Self {
        config.validate().expect("invalid SimConfig");
        Self { config }
    }

    /// Returns the simulation configuration.
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Runs the loop over `orders` with the given policy and estimator.
    pub fn run<P: Policy + ?Sized>(
        &self,
        mut orders: Vec<Order>,
        policy: &mut P,
        estimator: &mut RewardEstimator,
    ) -> Result<SimulationResult, OrderError> {
        validate_orders(&orders)?;

        let horizon = self.config.num_timesteps;
        let mut rng = match self.config.seed {
            Some(seed) => create_rng(seed),
            None => create_rng(rand::random()),
        };

        let mut arrivals: BTreeMap<u32, Vec<usize>> = BTreeMap::new();
        let mut index_of: HashMap<u32, usize> = HashMap::with_capacity(orders.len());
        for (i, o) in orders.iter().enumerate() {
            arrivals.entry(o.order_date).or_default().push(i);
            index_of.insert(o.order_no, i);
        }

        let mut machine = Machine::new(self.config.machine_capacity);
        let mut tick_logs = Vec::with_capacity(horizon as usize + 1);
        let mut beliefs = BeliefTrace::default();
        let mut total_arrived = 0usize;
        let mut total_decisions = 0usize;
        let mut guard_substitutions = 0usize;
        let mut fallback_substitutions = 0usize;

        debug!(
            policy = policy.name(),
            orders = orders.len(),
            horizon,
            capacity = self.config.machine_capacity,
            "starting admission run"
        );

        for t in 0..=horizon {
            if let Some(batch) = arrivals.get(&t) {
                for &i in batch {
                    orders[i].decision_history.push((t, OrderEvent::Arrived));
                    estimator.observe_arrival(orders[i].revenue);
                    total_arrived += 1;
                }
            }

            for order_no in machine.advance() {
                if let Some(&i) = index_of.get(&order_no) {
                    orders[i].finish_time = Some(t);
                    orders[i].is_completed = true;
                }
            }

            let pending: Vec<usize> = orders
                .iter()
                .enumerate()
                .filter(|(_, o)| o.needs_decision(t))
                .map(|(i, _)| i)
                .collect();
            let active: Vec<u32> = pending.iter().map(|&i| orders[i].order_no).collect();

            // Frozen for every decision this tick; the guard below still
            // consults the live machine.
            let available_ratio = machine.available_ratio();

            for i in pending {
                let past_deadline = t >= orders[i].decision_due_date;

                let proposed = {
                    let context = DecisionContext {
                        timestep: t,
                        available_ratio,
                        order: &orders[i],
                    };
                    policy.select(&context)
                };

                let allowed: &[Action] = if past_deadline {
                    &Action::PAST_DEADLINE
                } else {
                    &Action::ALL
                };
                let mut action = proposed;
                if !allowed.contains(&action) {
                    action = allowed[rng.random_range(0..allowed.len())];
                    fallback_substitutions += 1;
                }

                if action == Action::Accept && machine.is_full() {
                    action = if past_deadline {
                        Action::Reject
                    } else {
                        Action::Postpone
                    };
                    guard_substitutions += 1;
                }

                orders[i]
                    .decision_history
                    .push((t, OrderEvent::Decided(action)));
                total_decisions += 1;

                {
                    let context = DecisionContext {
                        timestep: t,
                        available_ratio,
                        order: &orders[i],
                    };
                    let reward = estimator.estimate(context.order, action, t, available_ratio);
                    policy.learn(action, &context, reward);
                }

                if action != Action::Postpone {
                    orders[i].final_action = Some(action);
                    if action == Action::Accept {
                        orders[i].start_time = Some(t);
                        machine.load(orders[i].order_no, orders[i].processing_time);
                    } else {
                        orders[i].is_completed = true;
                    }
                }
            }

            beliefs.timesteps.push(t);
            for action in Action::ALL {
                beliefs
                    .means
                    .entry(action)
                    .or_default()
                    .push(policy.belief(action));
            }

            trace!(
                tick = t,
                pending = active.len(),
                in_progress = machine.in_progress(),
                "tick done"
            );

            tick_logs.push(TickLog {
                timestep: t,
                active_orders: active,
                machine: machine.snapshot(),
            });
        }

        for o in orders.iter_mut() {
            if o.final_action == Some(Action::Accept) && !o.is_completed {
                o.finish_time = Some(horizon);
                o.is_completed = true;
            }
        }

        debug!(
            arrived = total_arrived,
            decisions = total_decisions,
            guard = guard_substitutions,
            fallback = fallback_substitutions,
            "admission run finished"
        );

        Ok(SimulationResult {
            orders,
            tick_logs,
            beliefs,
            total_arrived,
            total_decisions,
            guard_substitutions,
            fallback_substitutions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order::{GeneratorConfig, OrderGenerator};
    use crate::policy::{GaussianThompson, RandomPolicy, ThompsonConfig};
    use crate::reward::RewardConfig;
    use proptest::prelude::*;

    struct AlwaysAccept;

    impl Policy for AlwaysAccept {
        fn name(&self) -> &str {
            "always-accept"
        }
        fn select(&mut self, _context: &DecisionContext<'_>) -> Action {
            Action::Accept
        }
        fn learn(&mut self, _action: Action, _context: &DecisionContext<'_>, _reward: f64) {}
        fn reset(&mut self) {}
    }

    struct AlwaysPostpone;

    impl Policy for AlwaysPostpone {
        fn name(&self) -> &str {
            "always-postpone"
        }
        fn select(&mut self, _context: &DecisionContext<'_>) -> Action {
            Action::Postpone
        }
        fn learn(&mut self, _action: Action, _context: &DecisionContext<'_>, _reward: f64) {}
        fn reset(&mut self) {}
    }

    /// Records every learn callback for assertions.
    struct Spy {
        taken: Vec<(u32, Action, f64)>,
    }

    impl Policy for Spy {
        fn name(&self) -> &str {
            "spy"
        }
        fn select(&mut self, _context: &DecisionContext<'_>) -> Action {
            Action::Accept
        }
        fn learn(&mut self, action: Action, context: &DecisionContext<'_>, reward: f64) {
            self.taken.push((context.timestep, action, reward));
        }
        fn reset(&mut self) {
            self.taken.clear();
        }
    }

    fn estimator() -> RewardEstimator {
        RewardEstimator::new(RewardConfig::default())
    }

    #[test]
    fn test_single_slot_resolves_identical_rivals_by_deadline() {
        // Two identical orders compete for one slot; the loser must reach a
        // terminal action once its decision deadline hits.
        let orders = vec![
            Order::new(1, 0, 2, "m", 3, 10, 100.0, 0.0),
            Order::new(2, 0, 2, "m", 3, 10, 100.0, 0.0),
        ];
        let sim = Simulation::new(
            SimConfig::new()
                .with_num_timesteps(10)
                .with_machine_capacity(1)
                .with_seed(1),
        );
        let result = sim
            .run(orders, &mut AlwaysAccept, &mut estimator())
            .unwrap();

        let first = &result.orders[0];
        assert_eq!(first.final_action, Some(Action::Accept));
        assert_eq!(first.start_time, Some(0));
        assert_eq!(first.finish_time, Some(3));
        assert!(first.is_completed);

        let second = &result.orders[1];
        assert_eq!(second.final_action, Some(Action::Reject));
        assert_eq!(
            second.decision_history,
            vec![
                (0, OrderEvent::Arrived),
                (0, OrderEvent::Decided(Action::Postpone)),
                (1, OrderEvent::Decided(Action::Postpone)),
                (2, OrderEvent::Decided(Action::Reject)),
            ]
        );
        assert_eq!(result.guard_substitutions, 3);
        assert_eq!(result.fallback_substitutions, 0);
    }

    #[test]
    fn test_deadline_forces_a_terminal_action() {
        let orders = vec![Order::new(1, 0, 3, "m", 2, 10, 100.0, 0.0)];
        let sim = Simulation::new(SimConfig::new().with_num_timesteps(10).with_seed(2));
        let result = sim
            .run(orders, &mut AlwaysPostpone, &mut estimator())
            .unwrap();

        let order = &result.orders[0];
        assert!(order.final_action.is_some());
        assert_ne!(order.final_action, Some(Action::Postpone));
        // Postponed at ticks 0..2, forced off Postpone exactly at the deadline.
        let (t, event) = *order.decision_history.last().unwrap();
        assert_eq!(t, 3);
        assert!(matches!(event, OrderEvent::Decided(a) if a != Action::Postpone));
        assert_eq!(result.fallback_substitutions, 1);
    }

    #[test]
    fn test_unfinished_accept_closed_at_horizon() {
        let orders = vec![Order::new(1, 0, 5, "m", 50, 60, 100.0, 0.0)];
        let sim = Simulation::new(SimConfig::new().with_num_timesteps(10).with_seed(3));
        let result = sim
            .run(orders, &mut AlwaysAccept, &mut estimator())
            .unwrap();

        let order = &result.orders[0];
        assert_eq!(order.final_action, Some(Action::Accept));
        assert_eq!(order.start_time, Some(0));
        assert_eq!(order.finish_time, Some(10));
        assert!(order.is_completed);
    }

    #[test]
    fn test_order_arriving_after_horizon_is_untouched() {
        let orders = vec![Order::new(1, 30, 35, "m", 2, 40, 100.0, 0.0)];
        let sim = Simulation::new(SimConfig::new().with_num_timesteps(10).with_seed(4));
        let result = sim
            .run(orders, &mut AlwaysAccept, &mut estimator())
            .unwrap();

        assert_eq!(result.total_arrived, 0);
        let order = &result.orders[0];
        assert!(order.decision_history.is_empty());
        assert_eq!(order.final_action, None);
        assert!(!order.is_completed);
    }

    #[test]
    fn test_policy_learns_the_substituted_action_at_frozen_ratio() {
        // One slot, both orders past their decision deadline at t = 0. The
        // second Accept is guarded into Reject, and that Reject is what the
        // policy must be taught, priced at the tick-start availability.
        let orders = vec![
            Order::new(1, 0, 0, "m", 3, 10, 100.0, 0.0),
            Order::new(2, 0, 0, "m", 3, 10, 100.0, 0.0),
        ];
        let sim = Simulation::new(
            SimConfig::new()
                .with_num_timesteps(5)
                .with_machine_capacity(1)
                .with_seed(5),
        );
        let mut spy = Spy { taken: Vec::new() };
        let result = sim.run(orders, &mut spy, &mut estimator()).unwrap();

        assert_eq!(spy.taken.len(), 2);
        // Accept: 100 revenue minus the full 100 future regret, free machine.
        let (t0, a0, r0) = spy.taken[0];
        assert_eq!((t0, a0), (0, Action::Accept));
        assert!(r0.abs() < 1e-10);
        // Reject: -10 revenue charge - 50 future regret, still at ratio 1.0
        // even though the sweep just filled the machine.
        let (t1, a1, r1) = spy.taken[1];
        assert_eq!((t1, a1), (0, Action::Reject));
        assert!((r1 + 60.0).abs() < 1e-10);
        assert_eq!(result.guard_substitutions, 1);
    }

    #[test]
    fn test_tick_logs_and_belief_trace_cover_every_tick() {
        let orders = vec![Order::new(1, 0, 5, "m", 2, 10, 100.0, 0.0)];
        let sim = Simulation::new(SimConfig::new().with_num_timesteps(20).with_seed(6));
        let mut policy = GaussianThompson::new(ThompsonConfig::new().with_seed(6));
        let result = sim.run(orders, &mut policy, &mut estimator()).unwrap();

        assert_eq!(result.tick_logs.len(), 21);
        for (t, log) in result.tick_logs.iter().enumerate() {
            assert_eq!(log.timestep, t as u32);
        }
        assert_eq!(result.beliefs.timesteps.len(), 21);
        for action in Action::ALL {
            let series = result.beliefs.series(action).unwrap();
            assert_eq!(series.len(), 21);
            // The trace ends where the policy's live belief stands.
            assert!((series.last().unwrap() - policy.belief(action)).abs() < 1e-10);
        }
    }

    #[test]
    fn test_active_orders_snapshot_precedes_decisions() {
        let orders = vec![Order::new(1, 0, 5, "m", 4, 10, 100.0, 0.0)];
        let sim = Simulation::new(SimConfig::new().with_num_timesteps(10).with_seed(7));
        let result = sim
            .run(orders, &mut AlwaysAccept, &mut estimator())
            .unwrap();

        // Pending when the sweep began, loaded by the time of the snapshot.
        let first = &result.tick_logs[0];
        assert_eq!(first.active_orders, vec![1]);
        assert_eq!(first.machine[&1], 4);
        // Decided, so no longer active; one tick of work done.
        let second = &result.tick_logs[1];
        assert!(second.active_orders.is_empty());
        assert_eq!(second.machine[&1], 3);
    }

    #[test]
    fn test_duplicate_order_numbers_are_rejected() {
        let orders = vec![
            Order::new(1, 0, 5, "m", 2, 10, 100.0, 0.0),
            Order::new(1, 1, 6, "m", 2, 10, 100.0, 0.0),
        ];
        let sim = Simulation::new(SimConfig::default());
        let err = sim
            .run(orders, &mut AlwaysAccept, &mut estimator())
            .unwrap_err();
        assert_eq!(err, OrderError::DuplicateOrderNumber(1));
    }

    proptest! {
        #[test]
        fn prop_capacity_and_deadline_invariants(
            gen_seed in 0u64..1000,
            policy_seed in 0u64..1000,
            sim_seed in 0u64..1000,
        ) {
            let horizon = 30u32;
            let orders = OrderGenerator::generate(
                &GeneratorConfig::new().with_horizon(horizon).with_seed(gen_seed),
            );
            let sim = Simulation::new(
                SimConfig::new()
                    .with_num_timesteps(horizon)
                    .with_machine_capacity(2)
                    .with_seed(sim_seed),
            );
            let mut policy = RandomPolicy::new(Some(policy_seed));
            let result = sim.run(orders, &mut policy, &mut estimator()).unwrap();

            for log in &result.tick_logs {
                prop_assert!(log.machine.len() <= 2, "capacity exceeded at tick {}", log.timestep);
            }

            for order in &result.orders {
                let mut terminal_seen = false;
                for &(t, event) in &order.decision_history {
                    if let OrderEvent::Decided(action) = event {
                        prop_assert!(!terminal_seen, "order {} decided after terminal action", order.order_no);
                        if action == Action::Postpone {
                            prop_assert!(
                                t < order.decision_due_date,
                                "order {} postponed at {} past deadline {}",
                                order.order_no, t, order.decision_due_date
                            );
                        } else {
                            terminal_seen = true;
                        }
                    }
                }
                if let (Some(start), Some(finish)) = (order.start_time, order.finish_time) {
                    prop_assert_eq!(finish, (start + order.processing_time).min(horizon));
                }
            }
        }
    }
}
