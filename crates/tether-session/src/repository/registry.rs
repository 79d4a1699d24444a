//! Per-host get-or-create registry

use parking_lot::Mutex;
use std::collections::HashMap;

/// Host-keyed map whose entries are created lazily under one lock, so concurrent
/// first access to a host always yields the same entry.
#[derive(Debug)]
pub(crate) struct HostRegistry<T> {
    entries: Mutex<HashMap<String, T>>,
}

impl<T: Clone> HostRegistry<T> {
    pub(crate) fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub(crate) fn get_or_create<F>(&self, host_id: &str, create: F) -> T
    where
        F: FnOnce() -> T,
    {
        let mut entries = self.entries.lock();
        if let Some(entry) = entries.get(host_id) {
            return entry.clone();
        }
        let entry = create();
        entries.insert(host_id.to_string(), entry.clone());
        entry
    }
}
