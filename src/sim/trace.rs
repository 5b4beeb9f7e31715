//! Per-tick run traces.

use crate::order::Action;
use std::collections::BTreeMap;

/// Snapshot of one tick: which orders were awaiting a decision when the
/// sweep began, and the machine occupancy after the sweep.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TickLog {
    pub timestep: u32,
    /// Orders pending at the start of the decision sweep.
    pub active_orders: Vec<u32>,
    /// Machine occupancy (order number to remaining ticks) at tick end.
    pub machine: BTreeMap<u32, u32>,
}

/// Tick-by-tick history of the policy's scalar belief per action, sampled
/// after each decision sweep. All series share the `timesteps` axis.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BeliefTrace {
    pub timesteps: Vec<u32>,
    pub means: BTreeMap<Action, Vec<f64>>,
}

impl BeliefTrace {
    /// The belief series of one action, if any ticks were recorded.
    pub fn series(&self, action: Action) -> Option<&[f64]> {
        self.means.get(&action).map(|v| v.as_slice())
    }
}
