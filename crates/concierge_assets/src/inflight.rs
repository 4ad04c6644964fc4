//! Per-key request coalescing.
//!
//! [`InFlightJobs`] guarantees at most one running job per key. Callers that
//! arrive while a job is pending await the same shared result instead of
//! starting their own. Coalescing is per process: separate instances of the
//! service do not see each other's jobs.

use futures::future::{BoxFuture, FutureExt, Shared};
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, warn};

type SharedJob<T> = Shared<BoxFuture<'static, T>>;
type JobMap<T> = Arc<Mutex<HashMap<String, SharedJob<T>>>>;

/// Registry of pending jobs keyed by string.
///
/// A job is spawned onto the tokio runtime so it runs to completion even if
/// every caller is dropped, and it removes its own entry as soon as it
/// settles. A request after completion therefore never reuses a stale
/// result.
///
/// Jobs that panic resolve to `T::default()` for every waiter.
pub struct InFlightJobs<T>
where
    T: Clone + Default + Send + Sync + 'static,
{
    jobs: JobMap<T>,
}

impl<T> InFlightJobs<T>
where
    T: Clone + Default + Send + Sync + 'static,
{
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            jobs: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Number of jobs currently pending.
    pub fn pending(&self) -> usize {
        lock(&self.jobs).len()
    }

    /// Await the pending job for `key`, or start one with `make`.
    ///
    /// `make` is only called when no job for `key` is pending.
    pub async fn run<F, Fut>(&self, key: &str, make: F) -> T
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T> + Send + 'static,
    {
        let job = {
            let mut jobs = lock(&self.jobs);
            match jobs.get(key) {
                Some(job) => {
                    debug!(key, "Joining in-flight job");
                    job.clone()
                }
                None => {
                    debug!(key, "Starting job");
                    let job = self.spawn(key.to_string(), make());
                    jobs.insert(key.to_string(), job.clone());
                    job
                }
            }
        };
        job.await
    }

    // Called with the registry lock held, so the job cannot remove its entry
    // before the entry has been inserted.
    fn spawn<Fut>(&self, key: String, work: Fut) -> SharedJob<T>
    where
        Fut: Future<Output = T> + Send + 'static,
    {
        let registry = Arc::clone(&self.jobs);
        let task_key = key.clone();
        let handle = tokio::spawn(async move {
            let result = work.await;
            lock(&registry).remove(&task_key);
            result
        });

        let registry = Arc::clone(&self.jobs);
        async move {
            match handle.await {
                Ok(result) => result,
                Err(e) => {
                    warn!(key = %key, error = %e, "In-flight job did not complete");
                    lock(&registry).remove(&key);
                    T::default()
                }
            }
        }
        .boxed()
        .shared()
    }
}

impl<T> Default for InFlightJobs<T>
where
    T: Clone + Default + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for InFlightJobs<T>
where
    T: Clone + Default + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            jobs: Arc::clone(&self.jobs),
        }
    }
}

impl<T> std::fmt::Debug for InFlightJobs<T>
where
    T: Clone + Default + Send + Sync + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InFlightJobs")
            .field("pending", &self.pending())
            .finish()
    }
}

fn lock<T>(jobs: &Mutex<T>) -> MutexGuard<'_, T> {
    jobs.lock().unwrap_or_else(PoisonError::into_inner)
}
