use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

/// One mutex per record key. Operations on different keys never contend.
#[derive(Default)]
pub(crate) struct KeyedLocks {
    table: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl KeyedLocks {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Run `f` while holding the lock for `key`.
    pub(crate) fn with_lock<T>(&self, key: &str, f: impl FnOnce() -> T) -> T {
        let lock = {
            let mut table = self.table.lock().unwrap_or_else(PoisonError::into_inner);
            table.entry(key.to_string()).or_default().clone()
        };
        // The guarded value is `()`, so a poisoned lock carries no broken state.
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
        f()
    }
}
