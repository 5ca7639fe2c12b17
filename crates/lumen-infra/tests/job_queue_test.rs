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

use anyhow::Result;
use lumen_core::jobs::{
    BackgroundJob, BackgroundJobQueueType, CancelFlag, JobQueueConfig, SyncDispatch,
};
use lumen_core::renderer::GraphicsDevice;
use lumen_infra::{NullDevice, NullDeviceConfig};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

fn device_with(job_queue: JobQueueConfig) -> Result<NullDevice> {
    let _ = env_logger::builder().is_test(true).try_init();
    Ok(NullDevice::new(NullDeviceConfig {
        job_queue,
        sync_job_budget_ms: 1_000,
        ..Default::default()
    })?)
}

/// Blocks its worker until opened.
#[derive(Default)]
struct Gate {
    entered: AtomicBool,
    open: AtomicBool,
}

impl Gate {
    fn wait_entered(&self) {
        while !self.entered.load(Ordering::SeqCst) {
            thread::yield_now();
        }
    }

    fn open(&self) {
        self.open.store(true, Ordering::SeqCst);
    }
}

impl BackgroundJob for Gate {
    fn process(&self, _cancel: &CancelFlag) {
        self.entered.store(true, Ordering::SeqCst);
        while !self.open.load(Ordering::SeqCst) {
            thread::sleep(Duration::from_millis(1));
        }
    }

    fn name(&self) -> &str {
        "gate"
    }
}

/// Computes a checksum and keeps it for the caller.
struct Checksum {
    data: Vec<u8>,
    result: Mutex<Option<u32>>,
}

impl BackgroundJob for Checksum {
    fn process(&self, _cancel: &CancelFlag) {
        let sum = self.data.iter().map(|&byte| u32::from(byte)).sum();
        *self.result.lock().unwrap() = Some(sum);
    }
}

#[test]
fn test_jobs_run_on_workers() -> Result<()> {
    let device = device_with(JobQueueConfig::with_workers(2))?;
    let queue = device.job_queue();
    assert!(!queue.is_synchronous());

    let counter = Arc::new(AtomicUsize::new(0));
    let handles: Vec<_> = (0..32)
        .map(|index| {
            let counter = Arc::clone(&counter);
            let tier = if index % 2 == 0 {
                BackgroundJobQueueType::Current
            } else {
                BackgroundJobQueueType::Background
            };
            queue.push_fn("count", tier, move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            })
        })
        .collect();

    for handle in &handles {
        handle.wait_until_completed();
        assert!(handle.check_completed());
        assert!(handle.was_executed());
        assert!(!handle.is_synchronous());
    }
    assert_eq!(counter.load(Ordering::SeqCst), 32);
    assert_eq!(queue.stats().executed, 32);
    Ok(())
}

#[test]
fn test_push_returns_before_completion() -> Result<()> {
    let device = device_with(JobQueueConfig::with_workers(1))?;
    let gate = Arc::new(Gate::default());
    let handle = device
        .job_queue()
        .push(gate.clone(), BackgroundJobQueueType::Current);

    gate.wait_entered();
    assert!(!handle.check_completed());
    assert!(!handle.wait_timeout(Duration::from_millis(5)));
    assert!(handle.has_completion_signal());

    gate.open();
    handle.wait_until_completed();
    assert!(handle.check_completed());
    let timings = handle.timings();
    assert!(timings.queue_latency().is_some());
    assert!(timings.run_time().is_some());
    Ok(())
}

#[test]
fn test_job_results_are_read_after_completion() -> Result<()> {
    let device = device_with(JobQueueConfig::with_workers(1))?;
    let job = Arc::new(Checksum {
        data: vec![1, 2, 3, 250],
        result: Mutex::new(None),
    });
    let handle = device
        .job_queue()
        .push(job.clone(), BackgroundJobQueueType::Background);
    handle.wait_until_completed();
    assert_eq!(*job.result.lock().unwrap(), Some(256));
    assert_eq!(handle.name(), "background job");
    Ok(())
}

#[test]
fn test_device_sync_drains_deferred_jobs() -> Result<()> {
    let device = device_with(JobQueueConfig::synchronous(SyncDispatch::Deferred))?;
    let order = Arc::new(Mutex::new(Vec::new()));
    let push = |label: &'static str, tier| {
        let order = Arc::clone(&order);
        device
            .job_queue()
            .push_fn(label, tier, move |_| order.lock().unwrap().push(label))
    };

    let upload = push("upload", BackgroundJobQueueType::Background);
    let readback = push("readback", BackgroundJobQueueType::Current);
    assert!(upload.is_synchronous());
    assert!(!upload.check_completed());
    assert!(!readback.check_completed());

    device.sync();
    assert_eq!(*order.lock().unwrap(), ["readback", "upload"]);
    assert!(upload.check_completed());
    Ok(())
}

#[test]
fn test_shutdown_cancels_never_started_jobs() -> Result<()> {
    let device = device_with(JobQueueConfig::with_workers(1))?;
    let queue = Arc::clone(device.job_queue());
    let gate = Arc::new(Gate::default());
    let running = queue.push(gate.clone(), BackgroundJobQueueType::Current);
    gate.wait_entered();

    let executed = Arc::new(AtomicUsize::new(0));
    let pending: Vec<_> = (0..3)
        .map(|_| {
            let executed = Arc::clone(&executed);
            queue.push_fn("pending", BackgroundJobQueueType::Background, move |_| {
                executed.fetch_add(1, Ordering::SeqCst);
            })
        })
        .collect();

    let shutdown = {
        let queue = Arc::clone(&queue);
        thread::spawn(move || queue.shutdown())
    };
    for handle in &pending {
        handle.wait_until_completed();
        assert!(handle.was_cancelled());
        assert!(!handle.was_executed());
    }
    gate.open();
    shutdown.join().expect("shutdown thread");

    assert!(running.was_executed());
    assert!(!running.was_cancelled());
    assert_eq!(executed.load(Ordering::SeqCst), 0);
    let stats = queue.stats();
    assert_eq!((stats.pending_current, stats.pending_background), (0, 0));
    assert_eq!(stats.cancelled, 3);
    assert_eq!(stats.workers, 0);
    Ok(())
}

#[test]
fn test_long_job_observes_cancellation() -> Result<()> {
    let device = device_with(JobQueueConfig::with_workers(1))?;
    let iterations = Arc::new(AtomicUsize::new(0));
    let counted = Arc::clone(&iterations);
    let handle = device.job_queue().push_fn(
        "spin",
        BackgroundJobQueueType::Background,
        move |cancel| {
            while !cancel.is_cancelled() {
                counted.fetch_add(1, Ordering::SeqCst);
                thread::sleep(Duration::from_millis(1));
            }
        },
    );

    while iterations.load(Ordering::SeqCst) == 0 {
        thread::yield_now();
    }
    handle.cancel();
    handle.wait_until_completed();
    assert!(handle.was_executed());
    assert!(handle.was_cancelled());
    Ok(())
}
