//! `Executor` — a dynamically sized worker pool with a bounded task queue.
//!
//! The pool holds `low_watermark..=high_watermark` worker threads. Workers
//! above the floor voluntarily exit after `idle_time` with nothing to do;
//! [`Executor::execute`] grows the pool on demand, up to the ceiling, when
//! the queue backs up. Shutdown is two-phase: `Stop` moves the pool from
//! `Run` to `Stopping`, in which workers keep draining the queue to
//! completion before exiting; the last worker to exit moves the pool to
//! `Stopped` and wakes anyone waiting on `Stop(await = true)`.
//!
//! Worker threads are joined via owned [`JoinHandle`]s rather than only
//! counted down, so no thread can outlive the pool; `Drop` stops the pool
//! if it is still `Run`, ensuring a graceful shutdown even if the caller
//! never called [`Executor::stop`] explicitly.

use std::collections::VecDeque;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Condvar, Mutex};
use std::thread::{self, JoinHandle};

use crate::config::ExecutorConfig;
use crate::error::ConfigError;

/// A boxed, type-erased, zero-argument unit of work.
type Task = Box<dyn FnOnce() + Send + 'static>;

/// Lifecycle state of an [`Executor`]. See the module docs for the
/// transition diagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Run,
    Stopping,
    Stopped,
}

struct Inner {
    state: State,
    tasks: VecDeque<Task>,
    current_workers: usize,
}

struct Shared {
    inner: Mutex<Inner>,
    /// Signaled once per `execute` (`notify_one`, exactly one sleeper needs
    /// to claim the new task) and once on `stop` (`notify_all`, every
    /// worker — including ones deep into an idle-timeout wait — must
    /// observe the state change promptly).
    not_empty: Condvar,
    /// Signaled exactly once, when `current_workers` reaches zero.
    all_exited: Condvar,
    name: String,
    queue_cap: usize,
    low_watermark: usize,
    high_watermark: usize,
    idle_time: std::time::Duration,
}

/// A dynamically sized worker pool.
pub struct Executor {
    shared: Arc<Shared>,
    handles: Mutex<Vec<JoinHandle<()>>>,
}

impl Executor {
    /// Constructs the pool, validates `config`, and spawns `low_watermark`
    /// workers. The pool starts in `Run`.
    pub fn new(config: ExecutorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let shared = Arc::new(Shared {
            inner: Mutex::new(Inner {
                state: State::Run,
                tasks: VecDeque::new(),
                current_workers: 0,
            }),
            not_empty: Condvar::new(),
            all_exited: Condvar::new(),
            name: config.name,
            queue_cap: config.queue_cap,
            low_watermark: config.low_watermark,
            high_watermark: config.high_watermark,
            idle_time: config.idle_time,
        });

        let mut handles = Vec::with_capacity(config.low_watermark);
        {
            let mut inner = shared.inner.lock().expect("pool mutex poisoned");
            for i in 0..config.low_watermark {
                inner.current_workers += 1;
                handles.push(spawn_worker(&shared, i));
            }
        }

        Ok(Executor { shared, handles: Mutex::new(handles) })
    }

    /// Enqueues `task` if the pool is `Run` and the queue has room,
    /// growing the pool up to `high_watermark` if the queue is non-empty
    /// after the push. Returns whether the task was accepted.
    pub fn execute<F>(&self, task: F) -> bool
    where
        F: FnOnce() + Send + 'static,
    {
        let mut inner = self.shared.inner.lock().expect("pool mutex poisoned");
        if inner.state != State::Run {
            return false;
        }
        if inner.tasks.len() == self.shared.queue_cap {
            return false;
        }
        inner.tasks.push_back(Box::new(task));
        self.shared.not_empty.notify_one();

        while inner.current_workers < self.shared.high_watermark && !inner.tasks.is_empty() {
            let idx = inner.current_workers;
            inner.current_workers += 1;
            let mut handles = self.handles.lock().expect("handle holder poisoned");
            match thread::Builder::new()
                .name(format!("{}-worker-{idx}", self.shared.name))
                .spawn({
                    let shared = Arc::clone(&self.shared);
                    move || run_worker(shared)
                }) {
                Ok(handle) => handles.push(handle),
                Err(err) => {
                    // Not fatal to submission: the task is already queued
                    // and at least the floor of workers is alive to pick
                    // it up eventually.
                    inner.current_workers -= 1;
                    tracing::warn!(pool = %self.shared.name, %err, "worker spawn failed during Execute");
                    break;
                }
            }
        }
        true
    }

    /// Moves the pool from `Run` to `Stopping`, waking every worker so
    /// each observes the transition promptly instead of only after its
    /// own idle timeout. No-op if the pool is not currently `Run`.
    /// If `await` is true, blocks until every worker has exited and joins
    /// their handles.
    pub fn stop(&self, await_drain: bool) {
        {
            let mut inner = self.shared.inner.lock().expect("pool mutex poisoned");
            if inner.state != State::Run {
                return;
            }
            inner.state = State::Stopping;
            self.shared.not_empty.notify_all();
        }
        if await_drain {
            self.join_all();
        }
    }

    /// Blocks until `current_workers == 0`, then joins every spawned
    /// thread. Safe to call after the pool has already stopped.
    fn join_all(&self) {
        {
            let mut inner = self.shared.inner.lock().expect("pool mutex poisoned");
            while inner.current_workers != 0 {
                inner = self.shared.all_exited.wait(inner).expect("pool mutex poisoned");
            }
        }
        let mut handles = self.handles.lock().expect("handle holder poisoned");
        for handle in handles.drain(..) {
            let _ = handle.join();
        }
    }

    /// Number of workers currently alive, for tests and diagnostics.
    pub fn current_workers(&self) -> usize {
        self.shared.inner.lock().expect("pool mutex poisoned").current_workers
    }
}

impl Drop for Executor {
    fn drop(&mut self) {
        // Ensure a graceful, fully-joined shutdown regardless of how the
        // caller left the pool: stop it if still running, otherwise just
        // join whatever is left from an earlier `stop`.
        let still_running = {
            let inner = self.shared.inner.lock().expect("pool mutex poisoned");
            inner.state == State::Run
        };
        if still_running {
            self.stop(true);
        } else {
            self.join_all();
        }
    }
}

fn spawn_worker(shared: &Arc<Shared>, idx: usize) -> JoinHandle<()> {
    let shared = Arc::clone(shared);
    thread::Builder::new()
        .name(format!("{}-worker-{idx}", shared.name))
        .spawn(move || run_worker(shared))
        .expect("initial worker spawn failed")
}

fn run_worker(shared: Arc<Shared>) {
    loop {
        let mut inner = shared.inner.lock().expect("pool mutex poisoned");

        while inner.state == State::Run && inner.tasks.is_empty() {
            let (guard, wait_result) = shared
                .not_empty
                .wait_timeout(inner, shared.idle_time)
                .expect("pool mutex poisoned");
            inner = guard;
            if wait_result.timed_out() && inner.state == State::Run && inner.tasks.is_empty() {
                if inner.current_workers > shared.low_watermark {
                    inner.current_workers -= 1;
                    tracing::debug!(pool = %shared.name, "worker exiting: idle above low watermark");
                    return;
                }
                // At the floor: keep waiting, never shrink below it.
            }
        }

        if inner.state != State::Run && inner.tasks.is_empty() {
            inner.current_workers -= 1;
            let last_worker = inner.current_workers == 0;
            if last_worker {
                inner.state = State::Stopped;
            }
            drop(inner);
            if last_worker {
                shared.all_exited.notify_all();
            }
            tracing::debug!(pool = %shared.name, "worker exiting: pool stopping, queue drained");
            return;
        }

        let task = inner.tasks.pop_front();
        drop(inner);

        if let Some(task) = task {
            if panic::catch_unwind(AssertUnwindSafe(task)).is_err() {
                tracing::warn!(pool = %shared.name, "task panicked; worker continues");
            }
        }
    }
}
