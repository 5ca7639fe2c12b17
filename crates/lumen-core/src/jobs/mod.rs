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

//! Background job system.
//!
//! Work is pushed into a [`BackgroundJobQueue`] on one of two tiers and
//! runs on a small pool of worker threads. When no worker can be started
//! the queue runs in synchronous mode and jobs execute on the pushing
//! thread or at [`BackgroundJobQueue::update`] checkpoints.

mod config;
pub mod global;
mod job;
mod queue;

pub use self::config::{JobQueueConfig, SyncDispatch, BACKGROUND_THREADS_ENV};
pub use self::job::{BackgroundJob, CancelFlag, FnJob, JobHandle, JobTimings};
pub use self::queue::{BackgroundJobQueue, BackgroundJobQueueType, JobQueueError, QueueStats};
