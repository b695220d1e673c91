// ABOUTME: Correlates outbound sequence numbers with application trace identifiers
// ABOUTME: In-memory store with TTL-based garbage collection swept on every access

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Remembers the `(log_id, hook_metadata)` an application attached to each
/// outbound request so the response, which echoes the sequence number, can
/// be reported back under the same identifiers.
///
/// `get` returns empty strings on a miss and does NOT remove the entry:
/// duplicate responses for one sequence number resolve to the same pair.
/// Expiry is the only eviction, so the store stays bounded by
/// `send_rate * max_ttl`.
pub trait Correlator: Send + Sync {
    fn put(&self, sequence_number: u32, log_id: &str, hook_metadata: &str);
    fn get(&self, sequence_number: u32) -> (String, String);
}

struct Entry {
    log_id: String,
    hook_metadata: String,
    stored_at: Instant,
}

/// Default correlator: a HashMap swept for expired entries on every put and
/// get.
pub struct InMemoryCorrelator {
    store: Mutex<HashMap<u32, Entry>>,
    max_ttl: Duration,
}

impl InMemoryCorrelator {
    /// `max_ttl` is how long an entry survives without its response
    /// arriving; the default is 900 seconds.
    pub fn new(max_ttl: Duration) -> InMemoryCorrelator {
        InMemoryCorrelator {
            store: Mutex::new(HashMap::new()),
            max_ttl,
        }
    }

    pub fn len(&self) -> usize {
        self.store.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn sweep(&self, store: &mut HashMap<u32, Entry>) {
        let now = Instant::now();
        store.retain(|_, entry| now.duration_since(entry.stored_at) <= self.max_ttl);
    }
}

impl Correlator for InMemoryCorrelator {
    fn put(&self, sequence_number: u32, log_id: &str, hook_metadata: &str) {
        let mut store = self.store.lock().unwrap();
        store.insert(
            sequence_number,
            Entry {
                log_id: log_id.to_string(),
                hook_metadata: hook_metadata.to_string(),
                stored_at: Instant::now(),
            },
        );
        self.sweep(&mut store);
    }

    fn get(&self, sequence_number: u32) -> (String, String) {
        let mut store = self.store.lock().unwrap();
        self.sweep(&mut store);
        match store.get(&sequence_number) {
            Some(entry) => (entry.log_id.clone(), entry.hook_metadata.clone()),
            None => (String::new(), String::new()),
        }
    }
}
