//! Fixed-size worker pool bound to a [`std::thread::Scope`].
//!
//! Workers pull boxed jobs from an unbounded crossbeam channel. A pending
//! counter guarded by a mutex/condvar pair backs [`WorkerPool::drain`]: it is
//! bumped on submit and dropped when a job returns or panics. Because the pool
//! lives inside a scope, jobs may borrow data owned by the caller (the input
//! picture and the output canvas) without reference counting.

use crate::BlurError;
use crossbeam::channel::{self, Receiver, Sender};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, Scope, ScopedJoinHandle};

/// A unit of work accepted by the pool.
pub type Job<'scope> = Box<dyn FnOnce() + Send + 'scope>;

type PanicPayload = Box<dyn Any + Send + 'static>;

#[derive(Default)]
struct Shared {
    pending: Mutex<usize>,
    idle: Condvar,
    panic: Mutex<Option<PanicPayload>>,
}

impl Shared {
    fn add(&self) {
        *lock(&self.pending) += 1;
    }

    fn finish(&self) {
        let mut pending = lock(&self.pending);
        *pending -= 1;
        if *pending == 0 {
            self.idle.notify_all();
        }
    }

    fn wait_idle(&self) {
        let mut pending = lock(&self.pending);
        while *pending > 0 {
            pending = self
                .idle
                .wait(pending)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    fn record_panic(&self, payload: PanicPayload) {
        // keep the first one; later panics are usually consequences
        lock(&self.panic).get_or_insert(payload);
    }
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Fixed set of worker threads consuming a shared job queue.
///
/// Lifecycle: [`WorkerPool::new`] → any number of [`WorkerPool::submit`] →
/// [`WorkerPool::drain`] → [`WorkerPool::shutdown`]. A pool serves a single
/// blur invocation.
pub struct WorkerPool<'scope> {
    jobs: Option<Sender<Job<'scope>>>,
    shared: Arc<Shared>,
    workers: Vec<ScopedJoinHandle<'scope, ()>>,
}

impl<'scope> WorkerPool<'scope> {
    /// Spawn `workers` threads inside `scope`.
    pub fn new<'env>(
        scope: &'scope Scope<'scope, 'env>,
        workers: usize,
    ) -> Result<Self, BlurError> {
        if workers == 0 {
            return Err(BlurError::NoWorkers);
        }

        let (tx, rx) = channel::unbounded::<Job<'scope>>();
        let shared = Arc::new(Shared::default());

        let mut handles = Vec::with_capacity(workers);
        for id in 0..workers {
            let rx = rx.clone();
            let shared = Arc::clone(&shared);
            let handle = thread::Builder::new()
                .name(format!("picblur-worker-{id}"))
                .spawn_scoped(scope, move || worker_loop(rx, &shared))
                .map_err(BlurError::Spawn)?;
            handles.push(handle);
        }

        Ok(Self {
            jobs: Some(tx),
            shared,
            workers: handles,
        })
    }

    /// Number of worker threads.
    pub fn workers(&self) -> usize {
        self.workers.len()
    }

    /// Enqueue `job` for some worker. Never blocks.
    pub fn submit<F>(&self, job: F) -> Result<(), BlurError>
    where
        F: FnOnce() + Send + 'scope,
    {
        let jobs = self.jobs.as_ref().ok_or(BlurError::PoolClosed)?;
        self.shared.add();
        if jobs.send(Box::new(job)).is_err() {
            self.shared.finish();
            return Err(BlurError::PoolClosed);
        }
        Ok(())
    }

    /// Block until every submitted job has finished running.
    pub fn drain(&self) {
        self.shared.wait_idle();
    }

    /// Close the queue and join all workers.
    ///
    /// Jobs still queued are run before the workers exit. If any job panicked,
    /// the first panic is resumed on the calling thread.
    pub fn shutdown(mut self) {
        self.jobs.take();
        for handle in self.workers.drain(..) {
            if let Err(payload) = handle.join() {
                panic::resume_unwind(payload);
            }
        }
        if let Some(payload) = lock(&self.shared.panic).take() {
            panic::resume_unwind(payload);
        }
    }
}

impl Drop for WorkerPool<'_> {
    fn drop(&mut self) {
        // workers exit once the channel is closed; the scope joins them
        self.jobs.take();
    }
}

fn worker_loop(jobs: Receiver<Job<'_>>, shared: &Shared) {
    for job in jobs.iter() {
        if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(job)) {
            shared.record_panic(payload);
        }
        shared.finish();
    }
}
