//! Reduction of per-worker partial results.
//!
//! Every traversal worker owns a [`WorkerSlot`]. While marching rays the worker
//! sums into local storage and contributes once when its traversal ends.
//! Contributions of one slot overwrite each other, the total is taken over all
//! slots after the traversal is joined.

use std::collections::HashMap;

use parking_lot::Mutex;

/// Identity of a traversal worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WorkerSlot(pub usize);

/// Value that can be reduced across workers.
pub trait Reduce {
    fn reduce(&mut self, other: &Self);
}

impl Reduce for f32 {
    fn reduce(&mut self, other: &Self) {
        *self += *other;
    }
}

impl Reduce for f64 {
    fn reduce(&mut self, other: &Self) {
        *self += *other;
    }
}

impl Reduce for Vec<f32> {
    /// Element-wise sum, shorter side is extended with zeroes
    fn reduce(&mut self, other: &Self) {
        if self.len() < other.len() {
            self.resize(other.len(), 0.0);
        }
        self.iter_mut().zip(other.iter()).for_each(|(a, b)| *a += b);
    }
}

/// Slots of partial results.
#[derive(Debug, Default)]
pub struct Accumulator<T> {
    slots: Mutex<HashMap<WorkerSlot, T>>,
}

impl<T> Accumulator<T> {
    pub fn new() -> Accumulator<T> {
        Accumulator {
            slots: Mutex::new(HashMap::new()),
        }
    }

    /// Remove every contribution
    pub fn reset(&self) {
        self.slots.lock().clear();
    }

    /// Store partial result of `slot`, replacing a previous one
    pub fn contribute(&self, slot: WorkerSlot, value: T) {
        self.slots.lock().insert(slot, value);
    }

    /// Number of slots that contributed since last reset
    pub fn contributors(&self) -> usize {
        self.slots.lock().len()
    }
}

impl<T: Reduce + Clone + Default> Accumulator<T> {
    /// Reduce all contributions
    pub fn total(&self) -> T {
        let slots = self.slots.lock();
        // deterministic order of summation
        let mut keys: Vec<_> = slots.keys().copied().collect();
        keys.sort_unstable();

        let mut total = T::default();
        for key in keys {
            total.reduce(&slots[&key]);
        }
        total
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn sums_workers() {
        let acc = Accumulator::<f32>::new();

        crossbeam::scope(|s| {
            for i in 0..4 {
                let acc = &acc;
                s.spawn(move |_| {
                    acc.contribute(WorkerSlot(i), (i + 1) as f32);
                });
            }
        })
        .unwrap();

        assert_eq!(acc.contributors(), 4);
        assert_eq!(acc.total(), 10.0);
    }

    #[test]
    fn contribution_overwrites_slot() {
        let acc = Accumulator::<f32>::new();
        acc.contribute(WorkerSlot(0), 5.0);
        acc.contribute(WorkerSlot(0), 2.0);
        acc.contribute(WorkerSlot(1), 1.0);
        assert_eq!(acc.total(), 3.0);
    }

    #[test]
    fn reset_clears() {
        let acc = Accumulator::<f32>::new();
        acc.contribute(WorkerSlot(3), 5.0);
        acc.reset();
        assert_eq!(acc.contributors(), 0);
        assert_eq!(acc.total(), 0.0);
    }

    #[test]
    fn vectors_are_summed_element_wise() {
        let acc = Accumulator::<Vec<f32>>::new();
        acc.contribute(WorkerSlot(0), vec![1.0, 2.0, 3.0]);
        acc.contribute(WorkerSlot(1), vec![0.5, 0.5, 0.5]);
        assert_eq!(acc.total(), vec![1.5, 2.5, 3.5]);
    }
}
