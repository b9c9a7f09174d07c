//! Trailing-edge debouncing of file notifications.
//!
//! Editors often write a file several times in quick succession. Each
//! [`Debouncer::schedule`] call for a key replaces the pending timer for
//! that key, so a burst collapses into one action that runs `delay` after
//! the last call. Different keys never affect each other.
//!
//! Every timer carries a generation number. A timer that wakes after being
//! superseded (it lost the race with `abort`) sees a newer generation in
//! the table and exits without running its action. The table lock is
//! released before the action runs.

use std::future::Future;
use std::hash::Hash;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use tokio::task::AbortHandle;

#[derive(Debug)]
struct Pending {
    generation: u64,
    handle: AbortHandle,
}

/// Per-key timer table.
///
/// Must be used from within a tokio runtime; timers are spawned tasks.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use lb_watcher::Debouncer;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let debouncer = Debouncer::new();
/// for _ in 0..3 {
///     debouncer.schedule("main.go", Duration::from_millis(10), async {});
/// }
/// assert_eq!(debouncer.pending(), 1);
/// # }
/// ```
#[derive(Debug)]
pub struct Debouncer<K> {
    table: Arc<Mutex<FxHashMap<K, Pending>>>,
    next_generation: AtomicU64,
}

impl<K> Default for Debouncer<K> {
    fn default() -> Self {
        Self {
            table: Arc::new(Mutex::new(FxHashMap::default())),
            next_generation: AtomicU64::new(0),
        }
    }
}

impl<K> Debouncer<K>
where
    K: Eq + Hash + Clone + Send + 'static,
{
    /// Creates an empty debouncer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `action` after `delay`, unless `key` is scheduled again first.
    ///
    /// A pending timer for the same key is cancelled and replaced.
    pub fn schedule<F>(&self, key: K, delay: Duration, action: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed);
        let table = Arc::clone(&self.table);
        let timer_key = key.clone();

        // Held across spawn so the timer cannot look up its entry before it exists.
        let mut pending = self.table.lock();
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            {
                let mut pending = table.lock();
                match pending.get(&timer_key) {
                    Some(entry) if entry.generation == generation => {
                        pending.remove(&timer_key);
                    }
                    _ => return,
                }
            }
            action.await;
        });

        let entry = Pending {
            generation,
            handle: task.abort_handle(),
        };
        if let Some(previous) = pending.insert(key, entry) {
            previous.handle.abort();
        }
    }

    /// Cancels the pending timer for `key`, returning `true` if one existed.
    pub fn cancel(&self, key: &K) -> bool {
        match self.table.lock().remove(key) {
            Some(entry) => {
                entry.handle.abort();
                true
            }
            None => false,
        }
    }

    /// Cancels every pending timer.
    pub fn cancel_all(&self) {
        let drained: Vec<Pending> = self.table.lock().drain().map(|(_, entry)| entry).collect();
        for entry in drained {
            entry.handle.abort();
        }
    }

    /// Number of timers that have not fired yet.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.table.lock().len()
    }
}
