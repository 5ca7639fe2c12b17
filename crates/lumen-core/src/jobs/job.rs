// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Jobs, their shared completion state and the handles callers keep.

use super::queue::BackgroundJobQueueType;
use parking_lot::Mutex;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Cooperative cancellation flag handed to [`BackgroundJob::process`].
///
/// Long jobs are expected to poll it and return early once it is set.
#[derive(Debug, Default)]
pub struct CancelFlag(AtomicBool);

impl CancelFlag {
    /// A flag that is not set.
    pub fn new() -> Self {
        Self::default()
    }

    /// `true` once cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// Requests cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }
}

/// A unit of work for the background queue.
///
/// Jobs keep their results internally; callers that need them hold their
/// own `Arc` to the job and read them once the [`JobHandle`] reports
/// completion.
pub trait BackgroundJob: Send + Sync + 'static {
    /// Does the work. Runs at most once, on a worker or a synchronous drain.
    fn process(&self, cancel: &CancelFlag);

    /// Name used in logs.
    fn name(&self) -> &str {
        "background job"
    }
}

/// Adapts a closure into a [`BackgroundJob`].
pub struct FnJob<F> {
    name: String,
    work: F,
}

impl<F> FnJob<F>
where
    F: Fn(&CancelFlag) + Send + Sync + 'static,
{
    /// Wraps `work` under the given log name.
    pub fn new(name: impl Into<String>, work: F) -> Self {
        Self {
            name: name.into(),
            work,
        }
    }
}

impl<F> BackgroundJob for FnJob<F>
where
    F: Fn(&CancelFlag) + Send + Sync + 'static,
{
    fn process(&self, cancel: &CancelFlag) {
        (self.work)(cancel)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl<F> fmt::Debug for FnJob<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnJob").field("name", &self.name).finish_non_exhaustive()
    }
}

/// When a job was scheduled, started and finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JobTimings {
    /// When the job was pushed.
    pub scheduled: Instant,
    /// When a worker (or drain) picked it up.
    pub started: Option<Instant>,
    /// When it completed, ran or not.
    pub finished: Option<Instant>,
}

impl JobTimings {
    /// Time spent waiting in the queue.
    pub fn queue_latency(&self) -> Option<Duration> {
        self.started.map(|started| started.duration_since(self.scheduled))
    }

    /// Time spent in `process`.
    pub fn run_time(&self) -> Option<Duration> {
        match (self.started, self.finished) {
            (Some(started), Some(finished)) => Some(finished.duration_since(started)),
            _ => None,
        }
    }
}

/// Totals shared by a queue and every job it created.
#[derive(Debug, Default)]
pub(crate) struct JobCounters {
    pub(crate) pushed: AtomicU64,
    pub(crate) executed: AtomicU64,
    pub(crate) cancelled: AtomicU64,
}

#[derive(Default)]
struct CompletionSignal {
    completed: bool,
    notifier: Option<flume::Sender<()>>,
    waiter: Option<flume::Receiver<()>>,
}

/// State shared between a queued entry and the caller's [`JobHandle`].
pub(crate) struct JobState {
    job: Arc<dyn BackgroundJob>,
    tier: BackgroundJobQueueType,
    synchronous: bool,
    cancel: CancelFlag,
    claimed: AtomicBool,
    executed: AtomicBool,
    timings: Mutex<JobTimings>,
    signal: Mutex<CompletionSignal>,
    counters: Arc<JobCounters>,
}

impl JobState {
    pub(crate) fn new(
        job: Arc<dyn BackgroundJob>,
        tier: BackgroundJobQueueType,
        synchronous: bool,
        counters: Arc<JobCounters>,
    ) -> Self {
        counters.pushed.fetch_add(1, Ordering::Relaxed);
        Self {
            job,
            tier,
            synchronous,
            cancel: CancelFlag::new(),
            claimed: AtomicBool::new(false),
            executed: AtomicBool::new(false),
            timings: Mutex::new(JobTimings {
                scheduled: Instant::now(),
                started: None,
                finished: None,
            }),
            signal: Mutex::new(CompletionSignal::default()),
            counters,
        }
    }

    pub(crate) fn tier(&self) -> BackgroundJobQueueType {
        self.tier
    }

    /// Takes exclusive ownership of running (or cancelling) the job.
    pub(crate) fn claim(&self) -> bool {
        self.claimed
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Runs a claimed job and completes it.
    pub(crate) fn run(&self) {
        self.timings.lock().started = Some(Instant::now());
        log::trace!("Running background job '{}'", self.job.name());

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.job.process(&self.cancel)));
        if outcome.is_err() {
            log::error!("Background job '{}' panicked", self.job.name());
        }
        self.executed.store(true, Ordering::Release);
        self.counters.executed.fetch_add(1, Ordering::Relaxed);
        self.finish();
    }

    /// Completes a claimed job that never started.
    pub(crate) fn cancel_pending(&self) {
        self.cancel.cancel();
        self.counters.cancelled.fetch_add(1, Ordering::Relaxed);
        log::debug!("Cancelled pending background job '{}'", self.job.name());
        self.finish();
    }

    fn finish(&self) {
        self.timings.lock().finished = Some(Instant::now());
        let mut signal = self.signal.lock();
        signal.completed = true;
        // Dropping the only sender wakes every waiter.
        signal.notifier = None;
        signal.waiter = None;
    }

    fn is_completed(&self) -> bool {
        self.signal.lock().completed
    }

    /// The receiver to block on, allocated on first use. `None` when done.
    fn waiter(&self) -> Option<flume::Receiver<()>> {
        let mut signal = self.signal.lock();
        if signal.completed {
            return None;
        }
        if signal.waiter.is_none() {
            let (notifier, waiter) = flume::bounded(0);
            signal.notifier = Some(notifier);
            signal.waiter = Some(waiter);
        }
        signal.waiter.clone()
    }
}

/// The caller's view of a pushed job.
#[derive(Clone)]
pub struct JobHandle {
    state: Arc<JobState>,
}

impl JobHandle {
    pub(crate) fn new(state: Arc<JobState>) -> Self {
        Self { state }
    }

    /// `true` once the job ran or was cancelled before running.
    pub fn check_completed(&self) -> bool {
        self.state.is_completed()
    }

    /// Blocks until the job completes.
    ///
    /// A synchronous-mode job that nobody has picked up yet runs on the
    /// calling thread instead.
    pub fn wait_until_completed(&self) {
        self.run_if_synchronous();
        if let Some(waiter) = self.state.waiter() {
            // Disconnection is the completion signal.
            let _ = waiter.recv();
        }
    }

    /// Like [`wait_until_completed`](Self::wait_until_completed) with an
    /// upper bound. Returns `true` if the job completed.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        self.run_if_synchronous();
        match self.state.waiter() {
            None => true,
            Some(waiter) => !matches!(
                waiter.recv_timeout(timeout),
                Err(flume::RecvTimeoutError::Timeout)
            ),
        }
    }

    fn run_if_synchronous(&self) {
        if self.state.synchronous && self.state.claim() {
            self.state.run();
        }
    }

    /// Sets the job's cancellation flag. The job decides whether to honor it.
    pub fn cancel(&self) {
        self.state.cancel.cancel();
    }

    /// `true` if cancellation was requested or the queue dropped the job.
    pub fn was_cancelled(&self) -> bool {
        self.state.cancel.is_cancelled()
    }

    /// `true` if `process` was called.
    pub fn was_executed(&self) -> bool {
        self.state.executed.load(Ordering::Acquire)
    }

    /// `true` if the job was pushed to a queue without workers.
    pub fn is_synchronous(&self) -> bool {
        self.state.synchronous
    }

    /// The tier the job was pushed on.
    pub fn tier(&self) -> BackgroundJobQueueType {
        self.state.tier
    }

    /// Scheduling timestamps.
    pub fn timings(&self) -> JobTimings {
        *self.state.timings.lock()
    }

    /// The job's log name.
    pub fn name(&self) -> &str {
        self.state.job.name()
    }

    /// `true` while a completion signal exists, i.e. someone waited on an
    /// unfinished job.
    pub fn has_completion_signal(&self) -> bool {
        self.state.signal.lock().notifier.is_some()
    }
}

impl fmt::Debug for JobHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JobHandle")
            .field("name", &self.name())
            .field("tier", &self.tier())
            .field("completed", &self.check_completed())
            .field("cancelled", &self.was_cancelled())
            .finish()
    }
}
