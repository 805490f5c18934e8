use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

use super::AuthAction;

/// Tracks auth submissions that are waiting on the backend.
///
/// A second submit for the same action and username is refused while the
/// first is still in flight.
#[derive(Debug, Clone, Default)]
pub struct InFlight {
    keys: Arc<Mutex<HashSet<String>>>,
}

impl InFlight {
    pub fn try_begin(&self, action: AuthAction, username: &str) -> Option<InFlightGuard> {
        let key = format!("{}:{}", action.as_str(), username.to_lowercase());

        if !lock(&self.keys).insert(key.clone()) {
            return None;
        }

        Some(InFlightGuard {
            keys: Arc::clone(&self.keys),
            key,
        })
    }
}

#[cfg(test)]
impl InFlight {
    pub fn len(&self) -> usize {
        lock(&self.keys).len()
    }

    pub fn is_empty(&self) -> bool {
        lock(&self.keys).is_empty()
    }
}

/// Removes its key from the registry when dropped.
#[derive(Debug)]
pub struct InFlightGuard {
    keys: Arc<Mutex<HashSet<String>>>,
    key: String,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        lock(&self.keys).remove(&self.key);
    }
}

// A poisoned set is still a valid set of strings.
fn lock(keys: &Mutex<HashSet<String>>) -> MutexGuard<'_, HashSet<String>> {
    keys.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
