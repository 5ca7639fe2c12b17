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

//! The two-tier background job queue and its worker pool.

use super::config::{JobQueueConfig, SyncDispatch};
use super::job::{BackgroundJob, CancelFlag, FnJob, JobCounters, JobHandle, JobState};
use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Priority tier of a job. `Current` always drains before `Background`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackgroundJobQueueType {
    /// Work needed soon, e.g. for the frame being built.
    Current,
    /// Work that can wait.
    Background,
}

/// Errors reported by the job system.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum JobQueueError {
    /// The queue is shutting down and takes no more work.
    #[error("the background job queue has been shut down")]
    ShutDown,
    /// A process-wide queue already exists.
    #[error("a global background job queue is already installed")]
    AlreadyInitialized,
    /// No process-wide queue exists.
    #[error("no global background job queue is installed")]
    NotInitialized,
}

/// A snapshot of the queue's backlog and totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct QueueStats {
    /// Entries waiting on the `Current` tier.
    pub pending_current: usize,
    /// Entries waiting on the `Background` tier.
    pub pending_background: usize,
    /// Jobs pushed since creation.
    pub pushed: u64,
    /// Jobs whose `process` ran.
    pub executed: u64,
    /// Jobs dropped without running.
    pub cancelled: u64,
    /// Running worker threads.
    pub workers: usize,
}

#[derive(Default)]
struct Pending {
    current: VecDeque<Arc<JobState>>,
    background: VecDeque<Arc<JobState>>,
    exiting: bool,
}

impl Pending {
    fn tier_mut(&mut self, tier: BackgroundJobQueueType) -> &mut VecDeque<Arc<JobState>> {
        match tier {
            BackgroundJobQueueType::Current => &mut self.current,
            BackgroundJobQueueType::Background => &mut self.background,
        }
    }

    fn len(&self) -> usize {
        self.current.len() + self.background.len()
    }
}

enum Popped {
    Job(Arc<JobState>),
    Empty,
    Exit,
}

/// State shared with the worker threads.
struct Shared {
    pending: Mutex<Pending>,
    // An unbounded channel of unit tokens is the counting semaphore.
    permits_tx: Sender<()>,
    permits_rx: Receiver<()>,
    counters: Arc<JobCounters>,
    wait_timeout: Duration,
}

impl Shared {
    fn pop(&self) -> Popped {
        let mut pending = self.pending.lock();
        if pending.exiting {
            return Popped::Exit;
        }
        match pending.current.pop_front().or_else(|| pending.background.pop_front()) {
            Some(state) => Popped::Job(state),
            None => Popped::Empty,
        }
    }

    fn pop_tier(&self, tier: BackgroundJobQueueType) -> Option<Arc<JobState>> {
        self.pending.lock().tier_mut(tier).pop_front()
    }

    fn worker_loop(&self) {
        loop {
            let permit = self.permits_rx.recv_timeout(self.wait_timeout);
            if let Err(RecvTimeoutError::Disconnected) = permit {
                break;
            }
            match self.pop() {
                Popped::Job(state) => {
                    if state.claim() {
                        state.run();
                    }
                }
                Popped::Empty => {}
                Popped::Exit => break,
            }
        }
    }
}

/// Runs jobs on worker threads, or synchronously when there are none.
///
/// The queue grows without bound; use [`stats`](Self::stats) to watch the
/// backlog. Dropping the queue shuts it down.
pub struct BackgroundJobQueue {
    shared: Arc<Shared>,
    workers: Mutex<Vec<thread::JoinHandle<()>>>,
    worker_count: usize,
    dispatch: SyncDispatch,
    shut_down: AtomicBool,
}

impl BackgroundJobQueue {
    /// Creates the queue and starts its workers.
    ///
    /// Falls back to synchronous mode when the config asks for no workers
    /// or none of them could be spawned.
    pub fn new(config: JobQueueConfig) -> Self {
        let (permits_tx, permits_rx) = crossbeam_channel::unbounded();
        let shared = Arc::new(Shared {
            pending: Mutex::new(Pending::default()),
            permits_tx,
            permits_rx,
            counters: Arc::default(),
            wait_timeout: Duration::from_millis(config.wait_timeout_ms.max(1)),
        });

        let requested = config.resolved_worker_threads();
        let mut workers = Vec::with_capacity(requested);
        for index in 0..requested {
            let worker_shared = Arc::clone(&shared);
            let spawned = thread::Builder::new()
                .name(format!("{}-{index}", config.thread_name_prefix))
                .spawn(move || worker_shared.worker_loop());
            match spawned {
                Ok(handle) => workers.push(handle),
                Err(err) => {
                    log::warn!("Failed to spawn background worker {index}: {err}");
                    break;
                }
            }
        }

        let worker_count = workers.len();
        if worker_count == 0 {
            log::info!(
                "Background job queue running in synchronous mode ({:?} dispatch)",
                config.synchronous_dispatch
            );
        } else {
            log::info!("Background job queue started with {worker_count} worker(s)");
        }

        Self {
            shared,
            workers: Mutex::new(workers),
            worker_count,
            dispatch: config.synchronous_dispatch,
            shut_down: AtomicBool::new(false),
        }
    }

    /// `true` when no worker threads run the jobs.
    pub fn is_synchronous(&self) -> bool {
        self.worker_count == 0
    }

    /// Number of worker threads started.
    pub fn worker_count(&self) -> usize {
        self.worker_count
    }

    /// Schedules `job` on `tier`.
    ///
    /// Pushing after [`shutdown`](Self::shutdown) is a logic error: it
    /// asserts in debug builds and completes the job as cancelled otherwise.
    pub fn push(&self, job: Arc<dyn BackgroundJob>, tier: BackgroundJobQueueType) -> JobHandle {
        let state = self.new_state(job, tier);
        let handle = JobHandle::new(Arc::clone(&state));
        if let Err(err) = self.schedule(&state) {
            debug_assert!(false, "push of '{}': {err}", handle.name());
            log::error!("Dropping background job '{}': {err}", handle.name());
            if state.claim() {
                state.cancel_pending();
            }
        }
        handle
    }

    /// Schedules a closure on `tier`.
    pub fn push_fn<F>(&self, name: &str, tier: BackgroundJobQueueType, work: F) -> JobHandle
    where
        F: Fn(&CancelFlag) + Send + Sync + 'static,
    {
        self.push(Arc::new(FnJob::new(name, work)), tier)
    }

    /// Like [`push`](Self::push) but reports a shut down queue as an error.
    pub fn try_push(
        &self,
        job: Arc<dyn BackgroundJob>,
        tier: BackgroundJobQueueType,
    ) -> Result<JobHandle, JobQueueError> {
        let state = self.new_state(job, tier);
        self.schedule(&state)?;
        Ok(JobHandle::new(state))
    }

    fn new_state(
        &self,
        job: Arc<dyn BackgroundJob>,
        tier: BackgroundJobQueueType,
    ) -> Arc<JobState> {
        Arc::new(JobState::new(
            job,
            tier,
            self.is_synchronous(),
            Arc::clone(&self.shared.counters),
        ))
    }

    fn schedule(&self, state: &Arc<JobState>) -> Result<(), JobQueueError> {
        let run_inline = {
            let mut pending = self.shared.pending.lock();
            if pending.exiting {
                return Err(JobQueueError::ShutDown);
            }
            if self.is_synchronous() && self.dispatch == SyncDispatch::Inline {
                true
            } else {
                pending.tier_mut(state.tier()).push_back(Arc::clone(state));
                false
            }
        };

        if run_inline {
            if state.claim() {
                state.run();
            }
        } else if !self.is_synchronous() {
            // The receiver lives in `shared`, so this cannot fail.
            let _ = self.shared.permits_tx.send(());
        }
        Ok(())
    }

    /// Synchronous-mode checkpoint; does nothing when workers exist.
    ///
    /// Runs every `Current` job, then `Background` jobs until `budget` has
    /// elapsed. A background job is never started past the budget.
    pub fn update(&self, budget: Duration) {
        if !self.is_synchronous() {
            return;
        }
        let start = Instant::now();
        let mut ran = 0usize;

        while let Some(state) = self.shared.pop_tier(BackgroundJobQueueType::Current) {
            if state.claim() {
                state.run();
                ran += 1;
            }
        }
        while start.elapsed() < budget {
            let Some(state) = self.shared.pop_tier(BackgroundJobQueueType::Background) else {
                break;
            };
            if state.claim() {
                state.run();
                ran += 1;
            }
        }

        if ran > 0 {
            log::trace!("Background queue update ran {ran} job(s) in {:?}", start.elapsed());
        }
    }

    /// Current backlog and totals.
    pub fn stats(&self) -> QueueStats {
        let (pending_current, pending_background) = {
            let pending = self.shared.pending.lock();
            (pending.current.len(), pending.background.len())
        };
        let counters = &self.shared.counters;
        QueueStats {
            pending_current,
            pending_background,
            pushed: counters.pushed.load(Ordering::Relaxed),
            executed: counters.executed.load(Ordering::Relaxed),
            cancelled: counters.cancelled.load(Ordering::Relaxed),
            workers: self.workers.lock().len(),
        }
    }

    /// `true` once [`shutdown`](Self::shutdown) has run.
    pub fn is_shut_down(&self) -> bool {
        self.shut_down.load(Ordering::Acquire)
    }

    /// Cancels every pending job, joins the workers and refuses new work.
    ///
    /// Jobs already running finish normally. Calling it again does nothing.
    pub fn shutdown(&self) {
        if self.shut_down.swap(true, Ordering::AcqRel) {
            return;
        }

        let drained: Vec<Arc<JobState>> = {
            let mut pending = self.shared.pending.lock();
            pending.exiting = true;
            let Pending {
                current,
                background,
                ..
            } = &mut *pending;
            current.drain(..).chain(background.drain(..)).collect()
        };
        let mut cancelled = 0usize;
        for state in &drained {
            if state.claim() {
                state.cancel_pending();
                cancelled += 1;
            }
        }

        let workers = std::mem::take(&mut *self.workers.lock());
        for _ in &workers {
            let _ = self.shared.permits_tx.send(());
        }
        let this_thread = thread::current().id();
        for worker in workers {
            // The last owner may drop the queue from inside one of its own jobs.
            if worker.thread().id() == this_thread {
                log::debug!("Background queue dropped on its own worker, detaching it");
                continue;
            }
            if worker.join().is_err() {
                log::error!("A background worker thread panicked");
            }
        }

        let leftover = self.shared.pending.lock().len();
        debug_assert_eq!(leftover, 0, "background queue not empty after shutdown");
        if leftover != 0 {
            log::error!("{leftover} background job(s) left queued after shutdown");
        }
        log::info!("Background job queue shut down ({cancelled} pending job(s) cancelled)");
    }
}

impl Drop for BackgroundJobQueue {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl std::fmt::Debug for BackgroundJobQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackgroundJobQueue")
            .field("workers", &self.worker_count)
            .field("dispatch", &self.dispatch)
            .field("shut_down", &self.is_shut_down())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn recorder(
        log: &Arc<Mutex<Vec<&'static str>>>,
        label: &'static str,
    ) -> Arc<dyn BackgroundJob> {
        let log = Arc::clone(log);
        Arc::new(FnJob::new(label, move |_: &CancelFlag| log.lock().push(label)))
    }

    #[test]
    fn zero_workers_runs_inline() {
        let queue = BackgroundJobQueue::new(JobQueueConfig::synchronous(SyncDispatch::Inline));
        assert!(queue.is_synchronous());

        let counter = Arc::new(AtomicUsize::new(0));
        let job_counter = Arc::clone(&counter);
        let handle = queue.push_fn("inline", BackgroundJobQueueType::Background, move |_| {
            job_counter.fetch_add(1, Ordering::SeqCst);
        });
        assert!(handle.check_completed());
        assert!(handle.is_synchronous());
        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert_eq!(queue.stats().pending_background, 0);
    }

    #[test]
    fn deferred_update_drains_current_first() {
        let queue = BackgroundJobQueue::new(JobQueueConfig::synchronous(SyncDispatch::Deferred));
        let log = Arc::new(Mutex::new(Vec::new()));

        queue.push(recorder(&log, "bg1"), BackgroundJobQueueType::Background);
        queue.push(recorder(&log, "cur1"), BackgroundJobQueueType::Current);
        queue.push(recorder(&log, "bg2"), BackgroundJobQueueType::Background);
        queue.push(recorder(&log, "cur2"), BackgroundJobQueueType::Current);
        assert!(log.lock().is_empty());

        queue.update(Duration::from_secs(5));
        assert_eq!(*log.lock(), ["cur1", "cur2", "bg1", "bg2"]);
    }

    #[test]
    fn zero_budget_defers_background() {
        let queue = BackgroundJobQueue::new(JobQueueConfig::synchronous(SyncDispatch::Deferred));
        let log = Arc::new(Mutex::new(Vec::new()));

        let background = queue.push(recorder(&log, "bg"), BackgroundJobQueueType::Background);
        queue.push(recorder(&log, "cur"), BackgroundJobQueueType::Current);

        queue.update(Duration::ZERO);
        assert_eq!(*log.lock(), ["cur"]);
        assert!(!background.check_completed());
        assert_eq!(queue.stats().pending_background, 1);

        queue.update(Duration::from_secs(5));
        assert!(background.check_completed());
    }

    #[test]
    fn deferred_wait_runs_inline() {
        let queue = BackgroundJobQueue::new(JobQueueConfig::synchronous(SyncDispatch::Deferred));
        let log = Arc::new(Mutex::new(Vec::new()));
        let handle = queue.push(recorder(&log, "waited"), BackgroundJobQueueType::Background);

        handle.wait_until_completed();
        assert!(handle.was_executed());

        // The stale entry is skipped by the next drain.
        queue.update(Duration::from_secs(1));
        assert_eq!(*log.lock(), ["waited"]);
        assert_eq!(queue.stats().executed, 1);
    }

    #[test]
    fn single_worker_keeps_fifo_order() {
        let queue = BackgroundJobQueue::new(JobQueueConfig::with_workers(1));
        let log = Arc::new(Mutex::new(Vec::new()));
        let labels = ["a", "b", "c", "d", "e"];
        let handles: Vec<_> = labels
            .iter()
            .map(|&label| queue.push(recorder(&log, label), BackgroundJobQueueType::Current))
            .collect();
        for handle in &handles {
            handle.wait_until_completed();
            assert!(handle.check_completed());
        }
        assert_eq!(*log.lock(), labels);
    }

    #[test]
    fn budget_leaves_remaining_background_jobs() {
        let queue = BackgroundJobQueue::new(JobQueueConfig::synchronous(SyncDispatch::Deferred));
        let counter = Arc::new(AtomicUsize::new(0));
        let background: Vec<_> = (0..5)
            .map(|_| {
                let counter = Arc::clone(&counter);
                queue.push_fn("slow", BackgroundJobQueueType::Background, move |_| {
                    thread::sleep(Duration::from_millis(20));
                    counter.fetch_add(1, Ordering::SeqCst);
                })
            })
            .collect();
        let current = queue.push_fn("now", BackgroundJobQueueType::Current, |_| {});

        queue.update(Duration::from_millis(30));
        assert!(current.check_completed());
        let done = counter.load(Ordering::SeqCst);
        assert!((1..5).contains(&done), "ran {done} background job(s)");
        assert_eq!(queue.stats().pending_background, 5 - done);

        while queue.stats().pending_background > 0 {
            queue.update(Duration::from_millis(30));
        }
        assert!(background.iter().all(JobHandle::was_executed));
        assert_eq!(counter.load(Ordering::SeqCst), 5);
    }

    struct DropReport(crossbeam_channel::Sender<bool>);

    impl Drop for DropReport {
        fn drop(&mut self) {
            let _ = self.0.send(!thread::panicking());
        }
    }

    /// Holds the last reference to the queue that runs it.
    struct LastOwner {
        go: crossbeam_channel::Receiver<()>,
        _queue: Arc<BackgroundJobQueue>,
        _report: DropReport,
    }

    impl BackgroundJob for LastOwner {
        fn process(&self, _cancel: &CancelFlag) {
            let _ = self.go.recv();
        }
    }

    #[test]
    fn last_owner_dropped_on_worker_shuts_down_cleanly() {
        let queue = Arc::new(BackgroundJobQueue::new(JobQueueConfig {
            worker_threads: Some(1),
            ..JobQueueConfig::default()
        }));
        let (go_tx, go_rx) = crossbeam_channel::bounded(1);
        let (report_tx, report_rx) = crossbeam_channel::bounded(1);
        let job = Arc::new(LastOwner {
            go: go_rx,
            _queue: Arc::clone(&queue),
            _report: DropReport(report_tx),
        });

        drop(queue.push(job, BackgroundJobQueueType::Background));
        drop(queue);
        go_tx.send(()).unwrap();

        assert_eq!(report_rx.recv_timeout(Duration::from_secs(5)), Ok(true));
    }

    #[test]
    fn shutdown_cancels_pending_jobs() {
        let queue = BackgroundJobQueue::new(JobQueueConfig::synchronous(SyncDispatch::Deferred));
        let counter = Arc::new(AtomicUsize::new(0));
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let counter = Arc::clone(&counter);
                queue.push_fn("never", BackgroundJobQueueType::Background, move |_| {
                    counter.fetch_add(1, Ordering::SeqCst);
                })
            })
            .collect();

        queue.shutdown();
        for handle in &handles {
            assert!(handle.check_completed());
            assert!(handle.was_cancelled());
            assert!(!handle.was_executed());
        }
        assert_eq!(counter.load(Ordering::SeqCst), 0);
        let stats = queue.stats();
        assert_eq!(stats.cancelled, 4);
        assert_eq!(stats.pending_background, 0);

        queue.shutdown();
        let late = Arc::new(FnJob::new("late", |_: &CancelFlag| {}));
        assert_eq!(
            queue.try_push(late, BackgroundJobQueueType::Current).unwrap_err(),
            JobQueueError::ShutDown
        );
    }

    #[test]
    fn cancel_flag_is_cooperative() {
        let queue = BackgroundJobQueue::new(JobQueueConfig::synchronous(SyncDispatch::Deferred));
        let observed = Arc::new(AtomicBool::new(false));
        let seen = Arc::clone(&observed);
        let handle = queue.push_fn("poll", BackgroundJobQueueType::Current, move |cancel| {
            seen.store(cancel.is_cancelled(), Ordering::SeqCst);
        });

        handle.cancel();
        queue.update(Duration::ZERO);
        assert!(handle.was_executed());
        assert!(handle.was_cancelled());
        assert!(observed.load(Ordering::SeqCst));
    }
}
