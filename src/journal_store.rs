//! Journal store
//!
//! Ordered, optionally bounded append log of served interactions. Every
//! structural change (append with eviction, removal, clear) happens under one
//! write lock, so readers never observe more than `capacity` entries. Readers
//! only hold the read lock long enough to clone the `Arc` handles.

use std::collections::{HashSet, VecDeque};
use std::num::NonZeroUsize;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use uuid::Uuid;

use crate::serve_event::ServeEvent;

pub struct JournalStore {
    events: RwLock<VecDeque<Arc<ServeEvent>>>,
    capacity: Option<NonZeroUsize>,
}

impl JournalStore {
    /// Store that keeps every event until removed or cleared
    pub fn unbounded() -> Self {
        Self::with_capacity(None)
    }

    /// Store that keeps at most `capacity` events when one is given
    pub fn with_capacity(capacity: Option<NonZeroUsize>) -> Self {
        Self {
            events: RwLock::new(VecDeque::new()),
            capacity,
        }
    }

    pub fn capacity(&self) -> Option<NonZeroUsize> {
        self.capacity
    }

    // No caller code runs while the write lock is held, so a poisoned lock still
    // guards a deque in insertion order.
    fn read(&self) -> RwLockReadGuard<'_, VecDeque<Arc<ServeEvent>>> {
        self.events.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, VecDeque<Arc<ServeEvent>>> {
        self.events.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Appends at the logical end, evicting the oldest events if over capacity.
    /// Returns how many events were evicted.
    pub fn append(&self, event: Arc<ServeEvent>) -> usize {
        let id = event.id;
        let mut events = self.write();
        events.push_back(event);

        let mut evicted = 0;
        if let Some(limit) = self.capacity {
            while events.len() > limit.get() {
                events.pop_front();
                evicted += 1;
            }
        }
        let len = events.len();
        drop(events);

        tracing::trace!(event_id = %id, len, "Appended serve event");
        if evicted > 0 {
            tracing::debug!(evicted, len, "Evicted oldest serve events");
        }
        evicted
    }

    /// Point-in-time copy of all events, oldest first
    pub fn snapshot(&self) -> Vec<Arc<ServeEvent>> {
        self.read().iter().cloned().collect()
    }

    pub fn get(&self, id: Uuid) -> Option<Arc<ServeEvent>> {
        self.read().iter().find(|e| e.id == id).cloned()
    }

    /// Removes every event satisfying `predicate`, returning them oldest first.
    /// The predicate runs on a snapshot outside the lock.
    pub fn remove_where<F>(&self, predicate: F) -> Vec<Arc<ServeEvent>>
    where
        F: Fn(&ServeEvent) -> bool,
    {
        // The snapshot keeps matched events alive, so their addresses stay unique
        // until the retain below has run.
        let snapshot = self.snapshot();
        let matched: HashSet<*const ServeEvent> = snapshot
            .iter()
            .filter_map(|event| predicate(&**event).then(|| Arc::as_ptr(event)))
            .collect();
        if matched.is_empty() {
            return Vec::new();
        }

        let mut events = self.write();
        let mut removed = Vec::with_capacity(matched.len());
        events.retain(|event| {
            if matched.contains(&Arc::as_ptr(event)) {
                removed.push(Arc::clone(event));
                false
            } else {
                true
            }
        });
        drop(events);
        drop(snapshot);

        if !removed.is_empty() {
            tracing::debug!(removed = removed.len(), "Removed serve events");
        }
        removed
    }

    /// Drops every event. Returns how many were held.
    pub fn clear(&self) -> usize {
        let mut events = self.write();
        let cleared = events.len();
        events.clear();
        cleared
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }
}

impl Default for JournalStore {
    fn default() -> Self {
        Self::unbounded()
    }
}
