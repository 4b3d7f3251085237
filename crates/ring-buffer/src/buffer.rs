//! Ring Buffer Implementation

use std::collections::VecDeque;

/// Default buffer capacity (three deposits for the streak rule)
pub const DEFAULT_CAPACITY: usize = 3;

/// Bounded FIFO that evicts the oldest value once full
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RingBuffer<T> {
    /// Values in arrival order (front = oldest)
    storage: VecDeque<T>,
    /// Capacity of the buffer
    capacity: usize,
}

impl<T> RingBuffer<T> {
    /// Create a new ring buffer with given capacity
    pub fn new(capacity: usize) -> Self {
        Self {
            storage: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Create a buffer with default capacity
    pub fn with_default_capacity() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }

    /// Push a value into the buffer (evicts oldest if full)
    ///
    /// A zero-capacity buffer discards every value.
    pub fn push(&mut self, value: T) {
        if self.capacity == 0 {
            return;
        }
        while self.storage.len() >= self.capacity {
            self.storage.pop_front();
        }
        self.storage.push_back(value);
    }

    /// Change the capacity, keeping the most recent values
    pub fn resize(&mut self, capacity: usize) {
        if capacity == self.capacity {
            return;
        }
        let excess = self.storage.len().saturating_sub(capacity);
        self.storage.drain(..excess);
        self.storage.shrink_to(capacity);
        self.capacity = capacity;
    }

    /// Get the number of values currently in the buffer
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    /// Check if buffer is empty
    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    /// Check if buffer holds exactly `capacity` values
    pub fn is_full(&self) -> bool {
        self.storage.len() == self.capacity
    }

    /// Get the buffer capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Iterate values from oldest to newest
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> + ExactSizeIterator {
        self.storage.iter()
    }
}

impl<T: PartialOrd> RingBuffer<T> {
    /// True when every value is strictly greater than the one before it.
    /// Vacuously true for fewer than two values.
    pub fn is_strictly_increasing(&self) -> bool {
        self.storage
            .iter()
            .zip(self.storage.iter().skip(1))
            .all(|(prev, cur)| prev < cur)
    }
}

impl<T> Default for RingBuffer<T> {
    fn default() -> Self {
        Self::with_default_capacity()
    }
}
