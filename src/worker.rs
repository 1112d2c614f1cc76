//! Bounded worker pool for blocking image work.
//!
//! Decode, resize, encode, and directory scans are CPU-bound and blocking;
//! dispatching them here keeps callers' event loops free and puts one bound
//! on concurrent pixel work for the whole process. Backed by a dedicated
//! rayon thread pool.
//!
//! [`WorkerPool::submit`] hands back a [`JobHandle`]; `wait` blocks for the
//! result. Dropping the handle abandons the job — it still runs to
//! completion on the pool (a wasted task), but nobody observes it and no
//! state is touched. A panicking job is contained by the pool's panic
//! handler and surfaces to the waiter as [`WorkerError::Lost`].

use log::error;
use std::sync::mpsc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WorkerError {
    #[error("worker pool failed to start: {0}")]
    Build(String),
    #[error("worker task was lost before completing")]
    Lost,
}

pub struct WorkerPool {
    pool: rayon::ThreadPool,
}

/// Receipt for a submitted job. `wait` blocks until the job finishes;
/// dropping it abandons the job.
pub struct JobHandle<T> {
    rx: mpsc::Receiver<T>,
}

impl<T> JobHandle<T> {
    pub fn wait(self) -> Result<T, WorkerError> {
        self.rx.recv().map_err(|_| WorkerError::Lost)
    }
}

impl WorkerPool {
    /// Pool with the requested thread count, capped at the CPU count — the
    /// caller can constrain down, not up.
    pub fn new(threads: usize) -> Result<Self, WorkerError> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(effective_threads(threads))
            .panic_handler(|_| error!("worker task panicked"))
            .build()
            .map_err(|e| WorkerError::Build(e.to_string()))?;
        Ok(Self { pool })
    }

    /// Pool sized to the CPU count.
    pub fn with_default_threads() -> Result<Self, WorkerError> {
        Self::new(usize::MAX)
    }

    pub fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Queue a job; returns immediately.
    pub fn submit<T, F>(&self, job: F) -> JobHandle<T>
    where
        T: Send + 'static,
        F: FnOnce() -> T + Send + 'static,
    {
        let (tx, rx) = mpsc::channel();
        self.pool.spawn(move || {
            // The receiver may already be gone (abandoned job); that's fine.
            let _ = tx.send(job());
        });
        JobHandle { rx }
    }

    /// Queue a job and block for its result.
    pub fn run<T, F>(&self, job: F) -> Result<T, WorkerError>
    where
        T: Send + 'static,
        F: FnOnce() -> T + Send + 'static,
    {
        self.submit(job).wait()
    }
}

fn effective_threads(requested: usize) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    requested.clamp(1, cores)
}
