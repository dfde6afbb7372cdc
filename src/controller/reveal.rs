//! Cancelable reveal timer
//!
//! A single worker thread waits on a condition variable for the pending
//! deadline. Scheduling replaces the deadline and cancelling clears it. The
//! action always runs with the scheduler lock held, so a press handled
//! through [`RevealScheduler::preempt`] can never interleave with a firing
//! reveal. A reveal still pending at shutdown runs before the worker exits.

use parking_lot::{Condvar, Mutex};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};
use tracing::{debug, trace};

/// Deadline used when `now + delay` is not representable
const FAR_FUTURE: Duration = Duration::from_secs(365 * 24 * 60 * 60);

type RevealAction = Box<dyn Fn() + Send + Sync>;

#[derive(Default)]
struct RevealState {
    deadline: Option<Instant>,
    shutdown: bool,
}

struct Shared {
    state: Mutex<RevealState>,
    wake: Condvar,
    action: RevealAction,
}

fn deadline_after(delay: Duration) -> Instant {
    let now = Instant::now();
    now.checked_add(delay)
        .or_else(|| now.checked_add(FAR_FUTURE))
        .unwrap_or(now)
}

/// One-shot timer with at most one pending reveal
pub struct RevealScheduler {
    shared: Arc<Shared>,
    worker: Option<JoinHandle<()>>,
}

impl RevealScheduler {
    /// Start the worker thread; `action` runs each time a deadline passes
    pub fn spawn<F>(action: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        let shared = Arc::new(Shared {
            state: Mutex::new(RevealState::default()),
            wake: Condvar::new(),
            action: Box::new(action),
        });
        let worker_shared = Arc::clone(&shared);
        let worker = std::thread::spawn(move || run_worker(&worker_shared));

        Self {
            shared,
            worker: Some(worker),
        }
    }

    /// Schedule the action `delay` from now, replacing any pending reveal
    ///
    /// A delay too large to add to the current instant is capped to a
    /// deadline one year out.
    pub fn schedule(&self, delay: Duration) {
        let mut state = self.shared.state.lock();
        let replaced = state.deadline.replace(deadline_after(delay)).is_some();
        trace!("Reveal scheduled in {:?} (replaced pending: {})", delay, replaced);
        self.shared.wake.notify_all();
    }

    /// Drop the pending reveal; returns whether one was pending
    pub fn cancel(&self) -> bool {
        let mut state = self.shared.state.lock();
        let cancelled = state.deadline.take().is_some();
        if cancelled {
            debug!("Pending reveal cancelled");
            self.shared.wake.notify_all();
        }
        cancelled
    }

    /// Cancel the pending reveal and run `f` before any reveal can fire
    pub fn preempt<R>(&self, f: impl FnOnce() -> R) -> R {
        let mut state = self.shared.state.lock();
        if state.deadline.take().is_some() {
            debug!("Pending reveal cancelled");
            self.shared.wake.notify_all();
        }
        f()
    }

    /// Run the pending reveal now instead of at its deadline; returns
    /// whether one was pending
    pub fn flush(&self) -> bool {
        let mut state = self.shared.state.lock();
        if state.deadline.take().is_none() {
            return false;
        }
        debug!("Pending reveal flushed");
        self.shared.wake.notify_all();
        (self.shared.action)();
        true
    }

    /// Whether a reveal is waiting to fire
    pub fn is_pending(&self) -> bool {
        self.shared.state.lock().deadline.is_some()
    }
}

impl Drop for RevealScheduler {
    fn drop(&mut self) {
        self.shared.state.lock().shutdown = true;
        self.shared.wake.notify_all();

        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                tracing::error!("Reveal worker panicked");
            }
        }
    }
}

fn run_worker(shared: &Shared) {
    let mut state = shared.state.lock();
    while !state.shutdown {
        let deadline = state.deadline;
        match deadline {
            None => shared.wake.wait(&mut state),
            Some(deadline) if Instant::now() >= deadline => {
                state.deadline = None;
                (shared.action)();
            }
            Some(deadline) => {
                shared.wake.wait_until(&mut state, deadline);
            }
        }
    }

    if state.deadline.take().is_some() {
        debug!("Running pending reveal on shutdown");
        (shared.action)();
    }
    trace!("Reveal worker stopped");
}
