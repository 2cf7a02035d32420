//! In-process observer hooks for pool lifecycle events.
//!
//! Scope:
//! - Local (in-process) pub/sub: the pool publishes after each state
//!   transition of interest (allocation, release, exhaustion, snapshot
//!   commit).
//! - Drop of EventHandle unsubscribes.
//!
//! Notes:
//! - Callbacks run synchronously on the caller's thread right after the
//!   operation. Keep them fast and non-blocking; spawn a thread for async
//!   work.
//! - The registry is owned by the Pool (one per instance) and carries no
//!   console/timestamp concerns — plug in your own sink.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, Weak};

/// A lifecycle event emitted by the pool.
#[derive(Clone, Debug)]
pub enum PoolEvent {
    Allocated { id: String, remaining: usize },
    Released { id: String },
    Exhausted,
    SnapshotCommitted { path: PathBuf, count: usize },
}

pub type Callback = Arc<dyn Fn(&PoolEvent) + Send + Sync + 'static>;

#[derive(Default)]
struct RegInner {
    next_id: u64,
    subs: HashMap<u64, Callback>,
}

/// Observer registry (held inside Pool).
pub struct EventRegistry {
    inner: Mutex<RegInner>,
}

impl EventRegistry {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            inner: Mutex::new(RegInner::default()),
        })
    }

    /// Register an observer; dropping the handle unsubscribes.
    pub fn subscribe(self: &Arc<Self>, cb: Callback) -> EventHandle {
        let mut g = self.inner.lock().unwrap();
        let id = g.next_id;
        g.next_id = g.next_id.wrapping_add(1);
        g.subs.insert(id, cb);
        drop(g);
        EventHandle {
            id,
            reg: Arc::downgrade(self),
        }
    }

    /// Deliver an event to every observer.
    pub fn publish(&self, ev: &PoolEvent) {
        let callbacks: Vec<Callback> = {
            let g = self.inner.lock().unwrap();
            g.subs.values().cloned().collect()
        };
        // Execute outside the lock
        for cb in callbacks {
            cb(ev);
        }
    }

    fn unsubscribe(&self, id: u64) {
        let mut g = self.inner.lock().unwrap();
        g.subs.remove(&id);
    }
}

/// RAII handle: unsubscribes on drop.
pub struct EventHandle {
    id: u64,
    reg: Weak<EventRegistry>,
}

impl Drop for EventHandle {
    fn drop(&mut self) {
        if let Some(reg) = self.reg.upgrade() {
            reg.unsubscribe(self.id);
        }
    }
}

/// Helper for building callbacks without spelling out the Arc.
pub fn callback<F>(f: F) -> Callback
where
    F: Fn(&PoolEvent) + Send + Sync + 'static,
{
    Arc::new(f)
}
