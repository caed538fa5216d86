//! Thread-safe FIFO queue with blocking dequeue and duplicate-combining
//! insertion.
//!
//! Items can be added in two ways: [`ConcurrentQueue::enqueue`] always
//! appends, while [`ConcurrentQueue::enqueue_if_absent`] first scans for an
//! equal element and, if one exists, merges the new item into it via a
//! caller-supplied combine closure instead of inserting a duplicate.
//!
//! Consumers may dequeue non-blocking ([`ConcurrentQueue::try_dequeue`]),
//! blocking ([`ConcurrentQueue::dequeue`]), or blocking with a cancellation
//! predicate ([`ConcurrentQueue::dequeue_until`]). A blocked consumer can be
//! forced to re-run its predicate with [`ConcurrentQueue::wake`]; that pair
//! is the cooperative-shutdown mechanism used by the worker pool.

use std::collections::VecDeque;

use parking_lot::{Condvar, Mutex};

/// A generic thread-safe FIFO queue.
///
/// Insertion order equals dequeue order. All size changes happen under one
/// internal mutex; two condition variables signal insertions (`added`) and
/// removals (`removed`) so that consumers and drain-waiters block without
/// polling.
#[derive(Debug)]
pub struct ConcurrentQueue<T> {
    /// The contents of the queue.
    contents: Mutex<VecDeque<T>>,
    /// Signalled when an item is added.
    added: Condvar,
    /// Signalled when an item is removed (dequeued or erased).
    removed: Condvar,
}

impl<T> Default for ConcurrentQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ConcurrentQueue<T> {
    /// Create an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self {
            contents: Mutex::new(VecDeque::new()),
            added: Condvar::new(),
            removed: Condvar::new(),
        }
    }

    /// Append an item to the tail of the queue and wake one waiting
    /// consumer.
    ///
    /// Never blocks on consumer availability; only contends briefly on the
    /// internal mutex.
    pub fn enqueue(&self, item: T) {
        self.contents.lock().push_back(item);
        self.added.notify_one();
    }

    /// Remove and return the head of the queue if one is present.
    pub fn try_dequeue(&self) -> Option<T> {
        let item = self.contents.lock().pop_front();
        if item.is_some() {
            self.removed.notify_all();
        }
        item
    }

    /// Remove and return the head of the queue, blocking until an item is
    /// available.
    pub fn dequeue(&self) -> T {
        let mut guard = self.contents.lock();
        let item = loop {
            if let Some(item) = guard.pop_front() {
                break item;
            }
            self.added.wait(&mut guard);
        };
        drop(guard);
        self.removed.notify_all();
        item
    }

    /// Block until an item is available or `cancel` returns true.
    ///
    /// Returns `None` only when woken with an empty queue and a true
    /// cancellation predicate; an available item always wins over
    /// cancellation. `cancel` runs under the queue mutex and must not touch
    /// the queue. Pair with [`ConcurrentQueue::wake`] to make a blocked
    /// consumer re-evaluate the predicate promptly.
    pub fn dequeue_until<F>(&self, mut cancel: F) -> Option<T>
    where
        F: FnMut() -> bool,
    {
        let mut guard = self.contents.lock();
        loop {
            if let Some(item) = guard.pop_front() {
                drop(guard);
                self.removed.notify_all();
                return Some(item);
            }
            if cancel() {
                return None;
            }
            self.added.wait(&mut guard);
        }
    }

    /// Block until the queue holds zero elements.
    pub fn block_until_empty(&self) {
        let mut guard = self.contents.lock();
        self.removed.wait_while(&mut guard, |contents| !contents.is_empty());
    }

    /// Atomically empty the queue, dropping all items, and return how many
    /// were discarded.
    pub fn clear(&self) -> usize {
        self.clear_with(drop)
    }

    /// Atomically empty the queue, invoking `dispose` on every removed item.
    ///
    /// The contents are swapped out under the mutex and disposed afterwards,
    /// so `dispose` may itself touch the queue without deadlocking. Returns
    /// the number of items discarded.
    pub fn clear_with<F>(&self, mut dispose: F) -> usize
    where
        F: FnMut(T),
    {
        let drained = std::mem::take(&mut *self.contents.lock());
        self.removed.notify_all();
        let count = drained.len();
        for item in drained {
            dispose(item);
        }
        count
    }

    /// Size of the queue at the time of the call.
    ///
    /// Do not use this to decide whether to call [`ConcurrentQueue::dequeue`];
    /// the queue may change between the check and the call. Use
    /// [`ConcurrentQueue::try_dequeue`] instead.
    #[must_use]
    pub fn len(&self) -> usize {
        self.contents.lock().len()
    }

    /// Whether the queue holds zero elements at the time of the call.
    ///
    /// Subject to the same check-then-act caveat as [`ConcurrentQueue::len`].
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.contents.lock().is_empty()
    }

    /// Remove every element matching `pred` and return how many were
    /// removed.
    ///
    /// Waiters on queue occupancy are woken once overall if anything was
    /// removed; the removed items are dropped outside the critical section.
    pub fn remove_if<F>(&self, mut pred: F) -> usize
    where
        F: FnMut(&T) -> bool,
    {
        let dropped = {
            let mut guard = self.contents.lock();
            let mut kept = VecDeque::with_capacity(guard.len());
            let mut dropped = Vec::new();
            for item in guard.drain(..) {
                if pred(&item) {
                    dropped.push(item);
                } else {
                    kept.push_back(item);
                }
            }
            *guard = kept;
            dropped
        };
        let count = dropped.len();
        if count > 0 {
            self.removed.notify_all();
        }
        count
    }

    /// Wake all blocked consumers without modifying the queue.
    ///
    /// Consumers inside [`ConcurrentQueue::dequeue_until`] re-run their
    /// cancellation predicate; plain [`ConcurrentQueue::dequeue`] callers go
    /// back to sleep if the queue is still empty.
    pub fn wake(&self) {
        self.added.notify_all();
    }
}

impl<T: PartialEq> ConcurrentQueue<T> {
    /// Append `item` unless an equal element is already queued.
    ///
    /// The scan and the insertion happen under the mutex. If an equal
    /// element exists, `combine(existing, new)` is invoked exactly once and
    /// the queue size is unchanged; no consumer is woken. Returns whether
    /// the item was actually inserted.
    pub fn enqueue_if_absent<F>(&self, item: T, combine: F) -> bool
    where
        F: FnOnce(&mut T, T),
    {
        {
            let mut guard = self.contents.lock();
            if let Some(existing) = guard.iter_mut().find(|e| **e == item) {
                combine(existing, item);
                return false;
            }
            guard.push_back(item);
        }
        self.added.notify_one();
        true
    }

    /// Remove the first element equal to `item`.
    ///
    /// If multiple equal elements are queued only the first is removed.
    /// Returns whether an element was removed.
    pub fn remove(&self, item: &T) -> bool {
        let found = {
            let mut guard = self.contents.lock();
            match guard.iter().position(|e| e == item) {
                Some(idx) => {
                    let _ = guard.remove(idx);
                    true
                }
                None => false,
            }
        };
        if found {
            self.removed.notify_all();
        }
        found
    }
}
