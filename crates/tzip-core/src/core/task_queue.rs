use std::sync::{Mutex, MutexGuard};

/// Shared cursor handing out catalog indices to workers.
///
/// Each index in `0..total` is returned by [`claim_next`](Self::claim_next)
/// exactly once across all threads. The cursor only moves forward; the lock
/// guards nothing but that integer.
#[derive(Debug)]
pub struct TaskQueue {
    total: usize,
    next_index: Mutex<usize>,
}

impl TaskQueue {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            next_index: Mutex::new(0),
        }
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// Claims the next unassigned index, or `None` once the queue is exhausted.
    pub fn claim_next(&self) -> Option<usize> {
        let mut next = self.lock();
        if *next < self.total {
            let index = *next;
            *next += 1;
            Some(index)
        } else {
            None
        }
    }

    /// Number of indices handed out so far.
    pub fn claimed(&self) -> usize {
        *self.lock()
    }

    pub fn is_exhausted(&self) -> bool {
        self.claimed() >= self.total
    }

    /// Stops further claims by moving the cursor to the end.
    ///
    /// Indices already claimed are unaffected.
    pub fn close(&self) {
        let mut next = self.lock();
        *next = self.total;
    }

    fn lock(&self) -> MutexGuard<'_, usize> {
        // The guarded value is a plain counter, so a poisoned lock is still coherent.
        match self.next_index.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}
