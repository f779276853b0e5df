use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::Result;
use crate::worker::{ScriptJob, ScriptOutcome, ScriptWorker};

/// A fixed set of script workers with round-robin dispatch.
///
/// Gives callers a `Send` handle for parallel script evaluation while keeping
/// the one-engine-per-thread rule: each worker owns exactly one engine and
/// runs its jobs serially.
#[derive(Clone, Debug)]
pub struct ScriptPool {
    workers: Arc<Vec<ScriptWorker>>,
    next: Arc<AtomicUsize>,
}

impl ScriptPool {
    /// Spawns `size` workers (at least one).
    ///
    /// # Errors
    ///
    /// Returns the first engine construction error.
    pub async fn new(size: usize) -> Result<Self> {
        let size = size.max(1);
        let mut workers = Vec::with_capacity(size);
        for _ in 0..size {
            workers.push(ScriptWorker::new().await?);
        }
        Ok(Self {
            workers: Arc::new(workers),
            next: Arc::new(AtomicUsize::new(0)),
        })
    }

    /// Runs one job on the next worker in round-robin order.
    ///
    /// # Errors
    ///
    /// Errors from the job itself or a closed worker.
    pub async fn execute(&self, job: ScriptJob) -> Result<ScriptOutcome> {
        let index = self.next.fetch_add(1, Ordering::Relaxed) % self.workers.len();
        self.workers[index].execute(job).await
    }
}
