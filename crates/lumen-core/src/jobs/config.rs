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

use serde::{Deserialize, Serialize};
use std::thread;

/// Environment variable overriding [`JobQueueConfig::worker_threads`].
pub const BACKGROUND_THREADS_ENV: &str = "LUMEN_BACKGROUND_THREADS";

/// When jobs run in synchronous mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncDispatch {
    /// The job runs inside `push`.
    #[default]
    Inline,
    /// The job waits for the next `update`, or for a caller waiting on it.
    Deferred,
}

/// Configuration of a [`BackgroundJobQueue`](super::BackgroundJobQueue).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobQueueConfig {
    /// Number of worker threads. `None` picks one less than the number of
    /// cores; `Some(0)` forces synchronous mode.
    pub worker_threads: Option<usize>,
    /// How long an idle worker sleeps before checking for shutdown.
    pub wait_timeout_ms: u64,
    /// Dispatch policy in synchronous mode.
    pub synchronous_dispatch: SyncDispatch,
    /// Worker threads are named `{prefix}-{index}`.
    pub thread_name_prefix: String,
}

impl Default for JobQueueConfig {
    fn default() -> Self {
        Self {
            worker_threads: None,
            wait_timeout_ms: 100,
            synchronous_dispatch: SyncDispatch::Inline,
            thread_name_prefix: "lumen-bg".to_string(),
        }
    }
}

impl JobQueueConfig {
    /// A config that never starts worker threads.
    pub fn synchronous(dispatch: SyncDispatch) -> Self {
        Self {
            worker_threads: Some(0),
            synchronous_dispatch: dispatch,
            ..Default::default()
        }
    }

    /// A config with exactly `count` workers.
    pub fn with_workers(count: usize) -> Self {
        Self {
            worker_threads: Some(count),
            ..Default::default()
        }
    }

    /// Applies [`BACKGROUND_THREADS_ENV`] when it is set.
    pub fn with_env_overrides(self) -> Self {
        let value = std::env::var(BACKGROUND_THREADS_ENV).ok();
        self.apply_thread_override(value.as_deref())
    }

    fn apply_thread_override(mut self, value: Option<&str>) -> Self {
        if let Some(value) = value {
            match value.trim().parse::<usize>() {
                Ok(count) => self.worker_threads = Some(count),
                Err(_) => log::warn!(
                    "Ignoring {BACKGROUND_THREADS_ENV}={value:?}: not a thread count"
                ),
            }
        }
        self
    }

    /// The number of workers the queue will try to start.
    pub fn resolved_worker_threads(&self) -> usize {
        match self.worker_threads {
            Some(count) => count,
            None => thread::available_parallelism()
                .map(|cores| cores.get().saturating_sub(1))
                .unwrap_or(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_counts_win() {
        assert_eq!(JobQueueConfig::with_workers(3).resolved_worker_threads(), 3);
        assert_eq!(
            JobQueueConfig::synchronous(SyncDispatch::Deferred).resolved_worker_threads(),
            0
        );
    }

    #[test]
    fn thread_override() {
        let config = JobQueueConfig::default().apply_thread_override(Some(" 2 "));
        assert_eq!(config.worker_threads, Some(2));
        let config = JobQueueConfig::with_workers(4).apply_thread_override(Some("many"));
        assert_eq!(config.worker_threads, Some(4));
        let config = JobQueueConfig::with_workers(4).apply_thread_override(None);
        assert_eq!(config.worker_threads, Some(4));
    }

    #[test]
    fn partial_config_uses_defaults() {
        let config: JobQueueConfig =
            serde_json::from_str(r#"{ "worker_threads": 0, "synchronous_dispatch": "deferred" }"#)
                .unwrap();
        assert_eq!(config.worker_threads, Some(0));
        assert_eq!(config.synchronous_dispatch, SyncDispatch::Deferred);
        assert_eq!(config.wait_timeout_ms, 100);
        assert_eq!(config.thread_name_prefix, "lumen-bg");
    }
}
