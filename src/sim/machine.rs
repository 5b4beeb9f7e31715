//! Finite-capacity machine model.

use std::collections::BTreeMap;

/// The shared production resource: a fixed number of slots, each holding
/// one accepted order with its remaining processing ticks.
#[derive(Debug, Clone)]
pub struct Machine {
    capacity: usize,
    running: BTreeMap<u32, u32>,
}

impl Machine {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            running: BTreeMap::new(),
        }
    }

    /// Total slot count.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Orders currently occupying slots.
    pub fn in_progress(&self) -> usize {
        self.running.len()
    }

    /// Whether no slot is free.
    pub fn is_full(&self) -> bool {
        self.running.len() >= self.capacity
    }

    /// Free-slot fraction in `[0, 1]`.
    pub fn available_ratio(&self) -> f64 {
        self.capacity.saturating_sub(self.running.len()) as f64 / self.capacity as f64
    }

    /// Starts processing an order.
    pub fn load(&mut self, order_no: u32, processing_time: u32) {
        self.running.insert(order_no, processing_time);
    }

    /// Advances every running order by one tick and retires those that
    /// reach zero remaining work. Returns the retired order numbers in
    /// ascending order.
    pub fn advance(&mut self) -> Vec<u32> {
        let mut finished = Vec::new();
        for (&order_no, remaining) in self.running.iter_mut() {
            *remaining = remaining.saturating_sub(1);
            if *remaining == 0 {
                finished.push(order_no);
            }
        }
        for order_no in &finished {
            self.running.remove(order_no);
        }
        finished
    }

    /// Copy of the current slot occupancy (order number to remaining ticks).
    pub fn snapshot(&self) -> BTreeMap<u32, u32> {
        self.running.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_advance_retire() {
        let mut machine = Machine::new(3);
        machine.load(1, 2);
        machine.load(2, 1);
        assert_eq!(machine.in_progress(), 2);

        let finished = machine.advance();
        assert_eq!(finished, vec![2]);
        assert_eq!(machine.in_progress(), 1);

        let finished = machine.advance();
        assert_eq!(finished, vec![1]);
        assert_eq!(machine.in_progress(), 0);
        assert!(machine.advance().is_empty());
    }

    #[test]
    fn test_retirees_come_out_in_ascending_order() {
        let mut machine = Machine::new(3);
        machine.load(9, 1);
        machine.load(3, 1);
        machine.load(5, 1);
        assert_eq!(machine.advance(), vec![3, 5, 9]);
    }

    #[test]
    fn test_available_ratio_and_fullness() {
        let mut machine = Machine::new(4);
        assert!((machine.available_ratio() - 1.0).abs() < 1e-10);
        assert!(!machine.is_full());

        machine.load(1, 5);
        assert!((machine.available_ratio() - 0.75).abs() < 1e-10);

        machine.load(2, 5);
        machine.load(3, 5);
        machine.load(4, 5);
        assert!(machine.available_ratio().abs() < 1e-10);
        assert!(machine.is_full());
    }

    #[test]
    fn test_snapshot_reflects_remaining_ticks() {
        let mut machine = Machine::new(2);
        machine.load(7, 3);
        machine.advance();
        let snapshot = machine.snapshot();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[&7], 2);
    }
}
