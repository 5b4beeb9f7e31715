//! Uniform-random baseline policy.

use crate::order::Action;
use crate::policy::types::{DecisionContext, Policy};
use crate::rng::create_rng;
use rand::rngs::StdRng;
use rand::Rng;

/// Picks uniformly among all four actions and never learns. Useful as a
/// floor when comparing policies.
pub struct RandomPolicy {
    rng: StdRng,
}

impl RandomPolicy {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => create_rng(seed),
            None => create_rng(rand::random()),
        };
        Self { rng }
    }
}

impl Policy for RandomPolicy {
    fn name(&self) -> &str {
        "random"
    }

    fn select(&mut self, _context: &DecisionContext<'_>) -> Action {
        Action::ALL[self.rng.random_range(0..Action::ALL.len())]
    }

    fn learn(&mut self, _action: Action, _context: &DecisionContext<'_>, _reward: f64) {}

    fn reset(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order::Order;

    fn sample_order() -> Order {
        Order::new(1, 0, 5, "15-EB11", 8, 12, 250.0, 0.0)
    }

    #[test]
    fn test_seed_determinism() {
        let order = sample_order();
        let ctx = DecisionContext {
            timestep: 0,
            available_ratio: 1.0,
            order: &order,
        };
        let mut a = RandomPolicy::new(Some(4));
        let mut b = RandomPolicy::new(Some(4));
        for _ in 0..100 {
            assert_eq!(a.select(&ctx), b.select(&ctx));
        }
    }

    #[test]
    fn test_covers_all_actions() {
        let order = sample_order();
        let ctx = DecisionContext {
            timestep: 0,
            available_ratio: 1.0,
            order: &order,
        };
        let mut policy = RandomPolicy::new(Some(8));
        let mut seen = [false; 4];
        for _ in 0..200 {
            seen[policy.select(&ctx).index()] = true;
        }
        assert_eq!(seen, [true; 4]);
    }

    #[test]
    fn test_belief_is_flat() {
        let policy = RandomPolicy::new(Some(1));
        for action in Action::ALL {
            assert!((policy.belief(action) - 0.5).abs() < 1e-10);
        }
    }
}
