//! Discrete-time simulation of admission control under finite capacity.
//!
//! Orders arrive over a fixed horizon and compete for a machine with a
//! small number of slots. Every tick, each pending order is put to the
//! policy; the engine narrows ungrantable proposals (postponing past the
//! decision deadline, accepting into a full machine), prices the action
//! actually taken, and feeds the reward back. The result carries the fully
//! decided order set plus per-tick occupancy and belief traces.
//!
//! # Key Features
//! - Fixed five-phase tick: arrivals, machine advance, pending collection,
//!   decision sweep, trace snapshot
//! - Availability ratio frozen per tick for pricing, live for the
//!   capacity guard
//! - Policies learn from substituted actions, not raw proposals
//! - Deterministic runs under fixed seeds

mod config;
mod machine;
mod runner;
mod trace;

pub use config::SimConfig;
pub use machine::Machine;
pub use runner::{Simulation, SimulationResult};
pub use trace::{BeliefTrace, TickLog};
