//! Active tenant state and synchronous change notification
//!
//! One broadcaster per engine holds the active tenant/sub-tenant pair.
//! `advance` updates both fields together, then notifies listeners
//! synchronously in registration order. A panicking listener is
//! isolated and logged; later listeners still run and the state stays
//! advanced.

use crate::config::ActiveTenantState;
use parking_lot::{Mutex, RwLock};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use tracing::warn;

type Listener = Arc<dyn Fn(&ActiveTenantState) + Send + Sync>;
type ListenerList = Mutex<Vec<(u64, Listener)>>;

/// Holds the active tenant identity and notifies subscribers on change
pub struct StateBroadcaster {
    state: RwLock<ActiveTenantState>,
    listeners: Arc<ListenerList>,
    next_id: AtomicU64,
}

impl StateBroadcaster {
    /// Broadcaster starting from the given identity
    pub fn new(initial: ActiveTenantState) -> Self {
        Self {
            state: RwLock::new(initial),
            listeners: Arc::new(Mutex::new(Vec::new())),
            next_id: AtomicU64::new(0),
        }
    }

    /// Current identity snapshot
    pub fn current(&self) -> ActiveTenantState {
        self.state.read().clone()
    }

    /// Register a change listener; dropping the returned handle (or
    /// calling [`Subscription::unsubscribe`]) deregisters it
    pub fn subscribe(
        &self,
        listener: impl Fn(&ActiveTenantState) + Send + Sync + 'static,
    ) -> Subscription {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.listeners.lock().push((id, Arc::new(listener)));
        Subscription {
            id,
            listeners: Arc::downgrade(&self.listeners),
        }
    }

    /// Advance both identity fields together, then notify.
    ///
    /// Called only by the orchestrator after a resolution completes.
    pub fn advance(&self, tenant: String, sub_tenant: Option<String>) {
        let snapshot = {
            let mut state = self.state.write();
            state.current_tenant = tenant;
            state.current_sub_tenant = sub_tenant;
            state.clone()
        };

        // Snapshot the list so listeners can subscribe/unsubscribe
        // reentrantly without deadlocking.
        let listeners: Vec<Listener> = self
            .listeners
            .lock()
            .iter()
            .map(|(_, l)| l.clone())
            .collect();

        for listener in listeners {
            if catch_unwind(AssertUnwindSafe(|| listener(&snapshot))).is_err() {
                warn!("tenant state listener panicked, continuing with remaining listeners");
            }
        }
    }
}

/// Unsubscribe handle returned by [`StateBroadcaster::subscribe`]
pub struct Subscription {
    id: u64,
    listeners: Weak<ListenerList>,
}

impl Subscription {
    /// Deregister the listener now (dropping the handle does the same)
    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(listeners) = self.listeners.upgrade() {
            listeners.lock().retain(|(id, _)| *id != self.id);
        }
    }
}
