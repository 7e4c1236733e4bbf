//! Per-period mutual exclusion.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

/// Serializes mutating operations on the same payroll period.
///
/// Each period id maps to its own mutex, so work on different periods never
/// contends. Locks are synchronous and must not be held across an `.await`.
#[derive(Debug, Default)]
pub struct PeriodLocks {
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl PeriodLocks {
    /// Creates an empty lock registry.
    pub fn new() -> Self {
        Self::default()
    }

    fn handle(&self, period_id: &str) -> Arc<Mutex<()>> {
        self.locks
            .lock()
            .entry(period_id.to_string())
            .or_default()
            .clone()
    }

    /// Runs `f` while holding the lock for `period_id`.
    pub fn with_lock<R>(&self, period_id: &str, f: impl FnOnce() -> R) -> R {
        let handle = self.handle(period_id);
        let _guard = handle.lock();
        f()
    }

    /// Drops the lock entry of a deleted period.
    pub fn forget(&self, period_id: &str) {
        self.locks.lock().remove(period_id);
    }
}
