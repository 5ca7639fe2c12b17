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

//! The process-wide background queue.
//!
//! A device installs the queue at startup and shuts it down before its own
//! backend objects are released. Nothing recreates it implicitly.

use super::config::JobQueueConfig;
use super::job::{BackgroundJob, JobHandle};
use super::queue::{BackgroundJobQueue, BackgroundJobQueueType, JobQueueError};
use parking_lot::RwLock;
use std::sync::Arc;

static GLOBAL_QUEUE: RwLock<Option<Arc<BackgroundJobQueue>>> = parking_lot::const_rwlock(None);

/// Creates and installs the global queue.
pub fn initialize(config: JobQueueConfig) -> Result<Arc<BackgroundJobQueue>, JobQueueError> {
    let mut slot = GLOBAL_QUEUE.write();
    if slot.is_some() {
        return Err(JobQueueError::AlreadyInitialized);
    }
    let queue = Arc::new(BackgroundJobQueue::new(config));
    *slot = Some(Arc::clone(&queue));
    Ok(queue)
}

/// Installs an existing queue as the global one.
pub fn install(queue: Arc<BackgroundJobQueue>) -> Result<(), JobQueueError> {
    let mut slot = GLOBAL_QUEUE.write();
    if slot.is_some() {
        return Err(JobQueueError::AlreadyInitialized);
    }
    *slot = Some(queue);
    Ok(())
}

/// The installed queue, if any.
pub fn get() -> Option<Arc<BackgroundJobQueue>> {
    GLOBAL_QUEUE.read().clone()
}

/// `true` while a global queue is installed.
pub fn is_initialized() -> bool {
    GLOBAL_QUEUE.read().is_some()
}

/// Pushes a job on the global queue.
pub fn push(
    job: Arc<dyn BackgroundJob>,
    tier: BackgroundJobQueueType,
) -> Result<JobHandle, JobQueueError> {
    let queue = get().ok_or(JobQueueError::NotInitialized)?;
    queue.try_push(job, tier)
}

/// Uninstalls the global queue and shuts it down.
///
/// Returns `false` when no queue was installed.
pub fn shutdown() -> bool {
    // Release the lock before joining workers, which may call `get`.
    let queue = GLOBAL_QUEUE.write().take();
    match queue {
        Some(queue) => {
            queue.shutdown();
            true
        }
        None => false,
    }
}
