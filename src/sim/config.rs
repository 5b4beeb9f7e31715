//! Simulation configuration.

/// Configuration for [`Simulation`](crate::sim::Simulation).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimConfig {
    /// Horizon: the loop runs ticks `0..=num_timesteps` inclusive.
    pub num_timesteps: u32,
    /// Number of orders the machine can process at once.
    pub machine_capacity: usize,
    /// Random seed for the engine's own draws (action substitution);
    /// None = random seed.
    pub seed: Option<u64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            num_timesteps: 200,
            machine_capacity: 3,
            seed: None,
        }
    }
}

impl SimConfig {
    /// Creates a new config with default parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the horizon.
    pub fn with_num_timesteps(mut self, num_timesteps: u32) -> Self {
        self.num_timesteps = num_timesteps;
        self
    }

    /// Sets the machine capacity.
    pub fn with_machine_capacity(mut self, machine_capacity: usize) -> Self {
        self.machine_capacity = machine_capacity;
        self
    }

    /// Sets the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates configuration parameters.
    pub fn validate(&self) -> Result<(), String> {
        if self.machine_capacity == 0 {
            return Err("machine_capacity must be at least 1".to_string());
        }
        Ok(())
    }
}
