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

//! The `Null` graphics device.

use super::objects::{
    image_size_in_bytes, NullBuffer, NullCounters, NullImage, NullSampler, NullShared,
};
use lumen_core::jobs::{global, BackgroundJobQueue, JobQueueConfig, JobQueueError};
use lumen_core::object::{
    BackendObject, DeviceObject, DeviceObjectHandler, ObjectId, ObjectRegistry, RegistryStats,
};
use lumen_core::renderer::{
    BufferCreationInfo, BufferObject, GraphicsBackendType, GraphicsDevice, ImageCreationInfo,
    ImageFormat, ImageObject, ResourceError, SamplerObject,
};
use serde::{Deserialize, Serialize};
use std::sync::atomic::Ordering;
use std::sync::{Arc, Weak};
use std::time::Duration;

/// Configuration for a [`NullDevice`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NullDeviceConfig {
    /// Configuration of the device's background queue.
    pub job_queue: JobQueueConfig,
    /// Install the device's queue as the process-wide one.
    pub install_global_queue: bool,
    /// Time given to background jobs at each [`GraphicsDevice::sync`] in
    /// synchronous mode.
    pub sync_job_budget_ms: u64,
    /// View formats the simulated hardware refuses.
    pub unsupported_view_formats: Vec<ImageFormat>,
}

impl Default for NullDeviceConfig {
    fn default() -> Self {
        Self {
            job_queue: JobQueueConfig::default(),
            install_global_queue: false,
            sync_job_budget_ms: 2,
            unsupported_view_formats: Vec::new(),
        }
    }
}

/// Resource counters of a [`NullDevice`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NullDeviceStats {
    /// Images created.
    pub images_created: u64,
    /// Buffers created.
    pub buffers_created: u64,
    /// Samplers created.
    pub samplers_created: u64,
    /// Views the frontend asked the backend to build.
    pub view_requests: u64,
    /// Views built.
    pub views_created: u64,
    /// Views refused for their format.
    pub views_rejected: u64,
    /// Simulated bytes held by live and retired objects.
    pub allocated_bytes: u64,
    /// High-water mark of `allocated_bytes`.
    pub peak_allocated_bytes: u64,
    /// Object table counters.
    pub registry: RegistryStats,
}

/// A device whose resources only exist as registry entries.
///
/// Dropping the device shuts its job queue down, then destroys every
/// backend object. Frontend proxies that outlive it become inert.
#[derive(Debug)]
pub struct NullDevice {
    shared: Arc<NullShared>,
    queue: Arc<BackgroundJobQueue>,
    owns_global_queue: bool,
    sync_budget: Duration,
}

impl NullDevice {
    /// Creates the device and its background queue.
    pub fn new(config: NullDeviceConfig) -> Result<Self, JobQueueError> {
        let queue = Arc::new(BackgroundJobQueue::new(config.job_queue));
        if config.install_global_queue {
            global::install(Arc::clone(&queue))?;
        }

        let shared = Arc::new(NullShared {
            registry: ObjectRegistry::new(),
            counters: Arc::new(NullCounters::default()),
            unsupported_view_formats: config.unsupported_view_formats,
        });
        log::info!(
            "Null graphics device created ({} background worker(s))",
            queue.worker_count()
        );

        Ok(Self {
            shared,
            queue,
            owns_global_queue: config.install_global_queue,
            sync_budget: Duration::from_millis(config.sync_job_budget_ms),
        })
    }

    /// The handler every proxy created by this device holds.
    pub fn handler(&self) -> Weak<dyn DeviceObjectHandler> {
        let weak: Weak<NullShared> = Arc::downgrade(&self.shared);
        weak
    }

    /// Resolves `id` to a concrete backend object type.
    pub fn resolve_backend_object<T: BackendObject>(&self, id: ObjectId) -> Option<Arc<T>> {
        self.shared.registry.resolve_as::<T>(id)
    }

    /// `true` while `id` names a live backend object.
    pub fn is_live(&self, id: ObjectId) -> bool {
        self.shared.registry.contains(id)
    }

    /// A snapshot of the resource counters.
    pub fn stats(&self) -> NullDeviceStats {
        let counters = &self.shared.counters;
        let load = |counter: &std::sync::atomic::AtomicU64| counter.load(Ordering::Relaxed);
        NullDeviceStats {
            images_created: load(&counters.images),
            buffers_created: load(&counters.buffers),
            samplers_created: load(&counters.samplers),
            view_requests: load(&counters.view_requests),
            views_created: load(&counters.views_created),
            views_rejected: load(&counters.views_rejected),
            allocated_bytes: load(&counters.allocated_bytes),
            peak_allocated_bytes: load(&counters.peak_allocated_bytes),
            registry: self.shared.registry.stats(),
        }
    }

    fn label_or(label: Option<&str>, kind: &str, id: ObjectId) -> String {
        label.map_or_else(|| format!("{kind} {id:?}"), str::to_string)
    }
}

impl GraphicsDevice for NullDevice {
    fn backend_type(&self) -> GraphicsBackendType {
        GraphicsBackendType::Null
    }

    fn create_image(&self, info: &ImageCreationInfo) -> Result<Arc<ImageObject>, ResourceError> {
        info.validate()?;
        let setup = info.to_setup();
        let size_in_bytes = image_size_in_bytes(&setup).ok_or_else(|| {
            ResourceError::InvalidDescriptor("image size overflows the address space".to_string())
        })?;
        let id = self.shared.registry.register_with(|id| {
            let label = Self::label_or(info.label.as_deref(), "image", id);
            Arc::new(NullImage::new(label, setup, size_in_bytes, &self.shared))
        });
        self.shared.counters.images.fetch_add(1, Ordering::Relaxed);
        log::debug!(
            "Created {:?} image {id:?} ({}x{})",
            setup.key.view_type,
            setup.width,
            setup.height
        );
        Ok(Arc::new(ImageObject::new(DeviceObject::new(id, self.handler()), setup)))
    }

    fn create_buffer(&self, info: &BufferCreationInfo) -> Result<Arc<BufferObject>, ResourceError> {
        info.validate()?;
        let setup = info.to_setup();
        let id = self.shared.registry.register_with(|id| {
            let label = Self::label_or(info.label.as_deref(), "buffer", id);
            Arc::new(NullBuffer::new(label, setup, &self.shared))
        });
        self.shared.counters.buffers.fetch_add(1, Ordering::Relaxed);
        log::debug!("Created buffer {id:?} ({} bytes)", setup.size);
        Ok(Arc::new(BufferObject::new(DeviceObject::new(id, self.handler()), setup)))
    }

    fn create_sampler(&self, label: Option<&str>) -> Result<Arc<SamplerObject>, ResourceError> {
        let id = self
            .shared
            .registry
            .register_with(|id| Arc::new(NullSampler::new(Self::label_or(label, "sampler", id))));
        self.shared.counters.samplers.fetch_add(1, Ordering::Relaxed);
        Ok(Arc::new(SamplerObject::new(
            DeviceObject::new(id, self.handler()),
            label.map(str::to_string),
        )))
    }

    fn job_queue(&self) -> &Arc<BackgroundJobQueue> {
        &self.queue
    }

    fn sync(&self) {
        let destroyed = self.shared.registry.flush_retired();
        self.queue.update(self.sync_budget);
        if destroyed > 0 {
            log::trace!("Null device sync destroyed {destroyed} object(s)");
        }
    }
}

impl Drop for NullDevice {
    fn drop(&mut self) {
        // The queue goes first: pending jobs may still reference resources.
        let installed = global::get().is_some_and(|queue| Arc::ptr_eq(&queue, &self.queue));
        if self.owns_global_queue && installed {
            global::shutdown();
        }
        self.queue.shutdown();
        let destroyed = self.shared.registry.clear();
        log::info!("Null graphics device destroyed ({destroyed} backend object(s) released)");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_core::jobs::SyncDispatch;
    use lumen_core::renderer::ImageViewType;

    fn device() -> NullDevice {
        NullDevice::new(NullDeviceConfig {
            job_queue: JobQueueConfig::synchronous(SyncDispatch::Inline),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn invalid_descriptors_allocate_nothing() {
        let device = device();
        let image = ImageCreationInfo {
            width: 0,
            ..Default::default()
        };
        assert!(matches!(
            device.create_image(&image),
            Err(ResourceError::InvalidDescriptor(_))
        ));
        assert!(device.create_buffer(&BufferCreationInfo::default()).is_err());
        assert_eq!(device.stats().registry.registered_total, 0);
    }

    #[test]
    fn oversized_image_is_rejected() {
        let device = device();
        let huge = ImageCreationInfo {
            view: ImageViewType::View2DArray,
            format: ImageFormat::Rgba32Float,
            width: 1 << 20,
            height: 1 << 20,
            num_slices: 1 << 24,
            ..Default::default()
        };
        assert!(matches!(
            device.create_image(&huge),
            Err(ResourceError::InvalidDescriptor(_))
        ));
        let stats = device.stats();
        assert_eq!(stats.registry.registered_total, 0);
        assert_eq!(stats.allocated_bytes, 0);
    }

    #[test]
    fn labels_default_to_the_id() {
        let device = device();
        let sampler = device.create_sampler(None).unwrap();
        let backend = device.resolve_backend_object::<NullSampler>(sampler.id()).unwrap();
        assert!(backend.debug_label().starts_with("sampler ObjectId("));
        assert_eq!(sampler.label(), None);
    }

    #[test]
    fn config_from_json() {
        let config: NullDeviceConfig = serde_json::from_str(
            r#"{
                "unsupported_view_formats": ["Rgba32Float"],
                "job_queue": { "worker_threads": 1 }
            }"#,
        )
        .unwrap();
        assert_eq!(config.unsupported_view_formats, vec![ImageFormat::Rgba32Float]);
        assert_eq!(config.job_queue.worker_threads, Some(1));
        assert!(!config.install_global_queue);
    }
}
