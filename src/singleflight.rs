//! Request Coalescing
//!
//! Collapses concurrent loads of the same key into one execution whose result
//! is shared by every caller.

use std::collections::HashMap;
use std::future::Future;

use parking_lot::Mutex;
use tokio::sync::watch;
use tracing::debug;

use crate::error::{CacheError, Result};

type Slot<T> = Option<Result<T>>;

// == Call ==
/// One in-flight load. Waiters hold a receiver and wake when the slot is filled.
#[derive(Debug)]
struct Call<T> {
    rx: watch::Receiver<Slot<T>>,
    waiters: usize,
}

// == Single Flight ==
/// Deduplicates concurrent work per key.
///
/// The map lock is held only while checking for or creating a call. The load
/// itself runs outside it, so different keys never wait on each other.
#[derive(Debug)]
pub struct SingleFlight<T> {
    calls: Mutex<HashMap<String, Call<T>>>,
}

impl<T> Default for SingleFlight<T> {
    fn default() -> Self {
        Self {
            calls: Mutex::new(HashMap::new()),
        }
    }
}

/// Removes the call record when the leading caller finishes or is dropped.
struct CallGuard<'a, T> {
    calls: &'a Mutex<HashMap<String, Call<T>>>,
    key: &'a str,
}

impl<T> Drop for CallGuard<'_, T> {
    fn drop(&mut self) {
        self.calls.lock().remove(self.key);
    }
}

enum Role<T> {
    Leader(watch::Sender<Slot<T>>),
    Waiter(watch::Receiver<Slot<T>>),
}

impl<T: Clone + Send + Sync> SingleFlight<T> {
    pub fn new() -> Self {
        Self::default()
    }

    // == Execute ==
    /// Runs `load` for `key` unless a load for that key is already running, in
    /// which case this waits for and returns that load's result instead.
    ///
    /// Results are shared only while the call is in flight; once it completes
    /// the next caller starts a fresh load, so a failure is never replayed.
    pub async fn execute<F, Fut>(&self, key: &str, load: F) -> Result<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let role = {
            let mut calls = self.calls.lock();
            match calls.get_mut(key) {
                Some(call) => {
                    call.waiters += 1;
                    Role::Waiter(call.rx.clone())
                }
                None => {
                    let (tx, rx) = watch::channel(None);
                    calls.insert(key.to_string(), Call { rx, waiters: 0 });
                    Role::Leader(tx)
                }
            }
        };

        match role {
            Role::Waiter(mut rx) => {
                debug!(key, "joining in-flight load");
                let outcome = rx.wait_for(Option::is_some).await;
                match outcome {
                    Ok(slot) => (*slot)
                        .clone()
                        .unwrap_or_else(|| Err(CacheError::Cancelled(key.to_string()))),
                    Err(_) => Err(CacheError::Cancelled(key.to_string())),
                }
            }
            Role::Leader(tx) => {
                let _guard = CallGuard {
                    calls: &self.calls,
                    key,
                };
                let result = load().await;

                let waiters = self.calls.lock().get(key).map_or(0, |call| call.waiters);
                if waiters > 0 {
                    debug!(key, waiters, "releasing coalesced callers");
                }
                tx.send_replace(Some(result.clone()));
                result
            }
        }
    }

    /// Number of keys with a load currently in flight.
    pub fn in_flight(&self) -> usize {
        self.calls.lock().len()
    }
}
