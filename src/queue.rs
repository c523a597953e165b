//! Bounded record queue and outstanding-work counter
//!
//! The queue is the only channel between emitting threads and the delivery
//! worker. It keeps strict FIFO order across all producers.

use std::collections::VecDeque;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};

/// Default number of records that can wait for the worker
pub const DEFAULT_QUEUE_CAPACITY: usize = 100;

/// What a producer does when the queue is full
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OverflowPolicy {
    /// Wait until the worker makes room
    #[default]
    Block,
    /// Evict the oldest queued record to make room
    DropOldest,
}

/// Result of a push
#[derive(Debug, PartialEq, Eq)]
pub enum Pushed<T> {
    /// Queued without losing anything
    Queued,
    /// Queued after evicting the returned record
    Evicted(T),
    /// The queue is closed; the item is handed back
    Closed(T),
}

struct State<T> {
    items: VecDeque<T>,
    closed: bool,
}

/// Thread-safe bounded FIFO queue
pub struct BoundedQueue<T> {
    state: Mutex<State<T>>,
    not_empty: Condvar,
    not_full: Condvar,
    capacity: usize,
}

impl<T> BoundedQueue<T> {
    /// Create a queue holding at most `capacity` items (at least one)
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            state: Mutex::new(State {
                items: VecDeque::with_capacity(capacity),
                closed: false,
            }),
            not_empty: Condvar::new(),
            not_full: Condvar::new(),
            capacity,
        }
    }

    fn lock(&self) -> MutexGuard<'_, State<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Push an item at the back, applying `policy` when full
    pub fn push(&self, item: T, policy: OverflowPolicy) -> Pushed<T> {
        let mut state = self.lock();
        let mut evicted = None;

        while !state.closed && state.items.len() >= self.capacity {
            match policy {
                OverflowPolicy::Block => {
                    state = self
                        .not_full
                        .wait(state)
                        .unwrap_or_else(PoisonError::into_inner);
                }
                OverflowPolicy::DropOldest => {
                    evicted = state.items.pop_front();
                }
            }
        }

        if state.closed {
            return Pushed::Closed(item);
        }

        state.items.push_back(item);
        drop(state);
        self.not_empty.notify_one();

        match evicted {
            Some(old) => Pushed::Evicted(old),
            None => Pushed::Queued,
        }
    }

    /// Take the item at the front, waiting while the queue is empty
    ///
    /// Returns `None` once the queue is closed and fully drained.
    pub fn pop(&self) -> Option<T> {
        let mut state = self.lock();
        loop {
            if let Some(item) = state.items.pop_front() {
                drop(state);
                self.not_full.notify_one();
                return Some(item);
            }
            if state.closed {
                return None;
            }
            state = self
                .not_empty
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Stop accepting items; queued items can still be popped
    pub fn close(&self) {
        self.lock().closed = true;
        self.not_empty.notify_all();
        self.not_full.notify_all();
    }

    /// Number of queued items
    pub fn len(&self) -> usize {
        self.lock().items.len()
    }

    /// Check if the queue is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maximum number of queued items
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// Count of accepted records not yet fully delivered
#[derive(Default)]
pub struct WorkCounter {
    count: Mutex<u64>,
    idle: Condvar,
}

impl WorkCounter {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, u64> {
        self.count.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record one more outstanding item
    pub fn add(&self) {
        *self.lock() += 1;
    }

    /// Mark one outstanding item as finished
    pub fn done(&self) {
        let mut count = self.lock();
        *count = count.saturating_sub(1);
        if *count == 0 {
            self.idle.notify_all();
        }
    }

    /// Current number of outstanding items
    pub fn get(&self) -> u64 {
        *self.lock()
    }

    /// Block until no item is outstanding
    pub fn wait_idle(&self) {
        let mut count = self.lock();
        while *count > 0 {
            count = self
                .idle
                .wait(count)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }
}
