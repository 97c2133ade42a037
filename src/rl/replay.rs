//! Experience replay for DQN training

use rand::rngs::StdRng;
use rand::{seq::index, Rng, SeedableRng};

use super::observation::StateVector;

/// One recorded interaction with the environment
///
/// Immutable once recorded; owned by the buffer until overwritten.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub state: StateVector,
    pub action: usize,
    pub reward: f32,
    pub next_state: StateVector,
    pub done: bool,
}

/// Fixed-capacity ring buffer of transitions
///
/// Insertion order defines overwrite order: once full, the oldest entry is
/// evicted first. Sampling is uniform-random without regard to order.
pub struct ReplayBuffer {
    buffer: Vec<Transition>,
    capacity: usize,
    position: usize,
    rng: StdRng,
}

impl ReplayBuffer {
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "replay capacity must be positive");
        Self {
            buffer: Vec::with_capacity(capacity),
            capacity,
            position: 0,
            rng: StdRng::from_entropy(),
        }
    }

    /// Append a transition, overwriting the oldest entry once at capacity
    pub fn push(&mut self, transition: Transition) {
        if self.buffer.len() < self.capacity {
            self.buffer.push(transition);
        } else {
            self.buffer[self.position] = transition;
        }
        self.position = (self.position + 1) % self.capacity;
    }

    /// Sample a uniform random batch.
    ///
    /// Samples without replacement when enough transitions are stored,
    /// with replacement when the buffer is smaller than the batch.
    /// Panics on an empty buffer; the caller is expected to guard.
    pub fn sample(&mut self, batch_size: usize) -> Vec<Transition> {
        assert!(
            !self.buffer.is_empty(),
            "cannot sample from an empty replay buffer"
        );

        if batch_size <= self.buffer.len() {
            let indices = index::sample(&mut self.rng, self.buffer.len(), batch_size);
            indices.iter().map(|i| self.buffer[i].clone()).collect()
        } else {
            (0..batch_size)
                .map(|_| self.buffer[self.rng.gen_range(0..self.buffer.len())].clone())
                .collect()
        }
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
