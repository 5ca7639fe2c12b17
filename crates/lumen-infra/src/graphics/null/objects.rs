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

//! Backend objects of the `Null` device.

use lumen_core::object::{
    BackendObject, DeviceObjectHandler, DeviceObjectViewType, ObjectId, ObjectRegistry,
};
use lumen_core::renderer::{
    BufferBackend, BufferSetup, BufferViewSetup, ImageBackend, ImageFormat, ImageSetup,
    ImageViewKey,
};
use std::any::Any;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

/// Device-wide counters, shared with every backend object.
#[derive(Debug, Default)]
pub(crate) struct NullCounters {
    pub(crate) images: AtomicU64,
    pub(crate) buffers: AtomicU64,
    pub(crate) samplers: AtomicU64,
    pub(crate) view_requests: AtomicU64,
    pub(crate) views_created: AtomicU64,
    pub(crate) views_rejected: AtomicU64,
    pub(crate) allocated_bytes: AtomicU64,
    pub(crate) peak_allocated_bytes: AtomicU64,
}

impl NullCounters {
    pub(crate) fn allocate(&self, bytes: u64) {
        let current = self
            .allocated_bytes
            .fetch_add(bytes, Ordering::Relaxed)
            .saturating_add(bytes);
        self.peak_allocated_bytes.fetch_max(current, Ordering::Relaxed);
    }

    fn free(&self, bytes: u64) {
        self.allocated_bytes.fetch_sub(bytes, Ordering::Relaxed);
    }
}

/// The object table of a `Null` device and the policy its objects follow.
#[derive(Debug)]
pub(crate) struct NullShared {
    pub(crate) registry: ObjectRegistry,
    pub(crate) counters: Arc<NullCounters>,
    pub(crate) unsupported_view_formats: Vec<ImageFormat>,
}

impl NullShared {
    /// Registers a view unless its format is on the refusal list.
    fn register_view(
        &self,
        view_type: DeviceObjectViewType,
        format: Option<ImageFormat>,
        view: impl FnOnce() -> Arc<dyn BackendObject>,
    ) -> Option<ObjectId> {
        self.counters.view_requests.fetch_add(1, Ordering::Relaxed);
        if let Some(format) = format.filter(|f| self.unsupported_view_formats.contains(f)) {
            self.counters.views_rejected.fetch_add(1, Ordering::Relaxed);
            log::debug!("Null backend refuses {view_type:?} views in {format:?}");
            return None;
        }
        let id = self.registry.register(view());
        self.counters.views_created.fetch_add(1, Ordering::Relaxed);
        Some(id)
    }
}

impl DeviceObjectHandler for NullShared {
    fn resolve_internal_object(&self, id: ObjectId) -> Option<Arc<dyn BackendObject>> {
        self.registry.resolve(id)
    }

    fn release_object(&self, id: ObjectId) {
        self.registry.release(id);
    }
}

/// Bytes an image with this setup would occupy, every mip and slice included.
///
/// `None` when the size does not fit in a `u64`.
pub(crate) fn image_size_in_bytes(setup: &ImageSetup) -> Option<u64> {
    let format = setup.key.format;
    let block = if format.is_compressed() { 4 } else { 1 };
    let texel_bytes = u64::from(format.bytes_per_pixel());
    let mut texels = 0u64;
    for mip in 0..setup.key.num_mips {
        let extent = |size: u32| u64::from((size >> mip).max(1).div_ceil(block));
        let mip_texels = extent(setup.width)
            .checked_mul(extent(setup.height))?
            .checked_mul(u64::from((setup.depth >> mip).max(1)))?;
        texels = texels.checked_add(mip_texels)?;
    }
    texels
        .checked_mul(texel_bytes)?
        .checked_mul(u64::from(setup.key.num_slices))?
        .checked_mul(u64::from(setup.samples))
}

/// A backend image.
#[derive(Debug)]
pub struct NullImage {
    label: String,
    setup: ImageSetup,
    size_in_bytes: u64,
    shared: Weak<NullShared>,
    counters: Arc<NullCounters>,
}

impl NullImage {
    pub(crate) fn new(
        label: String,
        setup: ImageSetup,
        size_in_bytes: u64,
        shared: &Arc<NullShared>,
    ) -> Self {
        shared.counters.allocate(size_in_bytes);
        Self {
            label,
            setup,
            size_in_bytes,
            shared: Arc::downgrade(shared),
            counters: Arc::clone(&shared.counters),
        }
    }

    /// Description the image was created with.
    pub fn setup(&self) -> &ImageSetup {
        &self.setup
    }

    /// Simulated memory footprint.
    pub fn size_in_bytes(&self) -> u64 {
        self.size_in_bytes
    }

    fn build_view(&self, view_type: DeviceObjectViewType, key: &ImageViewKey) -> Option<ObjectId> {
        let shared = self.shared.upgrade()?;
        debug_assert!(
            key.first_mip + key.num_mips <= self.setup.key.num_mips
                && key.first_slice + key.num_slices <= self.setup.key.num_slices,
            "unvalidated view key {key:?} for {}",
            self.label
        );
        let label = format!("{} ({view_type:?})", self.label);
        let key = *key;
        shared.register_view(view_type, Some(key.format), || {
            Arc::new(NullImageView {
                label,
                view_type,
                key,
            })
        })
    }
}

impl Drop for NullImage {
    fn drop(&mut self) {
        self.counters.free(self.size_in_bytes);
    }
}

impl BackendObject for NullImage {
    fn debug_label(&self) -> &str {
        &self.label
    }

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }

    fn as_image(&self) -> Option<&dyn ImageBackend> {
        Some(self)
    }
}

impl ImageBackend for NullImage {
    fn create_sampled_view(&self, key: &ImageViewKey) -> Option<ObjectId> {
        self.build_view(DeviceObjectViewType::SampledImage, key)
    }

    fn create_read_only_view(&self, key: &ImageViewKey) -> Option<ObjectId> {
        self.build_view(DeviceObjectViewType::Image, key)
    }

    fn create_writable_view(&self, key: &ImageViewKey) -> Option<ObjectId> {
        self.build_view(DeviceObjectViewType::ImageWritable, key)
    }

    fn create_render_target_view(&self, key: &ImageViewKey) -> Option<ObjectId> {
        self.build_view(DeviceObjectViewType::RenderTarget, key)
    }
}

/// A backend view of a [`NullImage`].
#[derive(Debug)]
pub struct NullImageView {
    label: String,
    view_type: DeviceObjectViewType,
    key: ImageViewKey,
}

impl NullImageView {
    /// The kind of view.
    pub fn view_type(&self) -> DeviceObjectViewType {
        self.view_type
    }

    /// The validated range the view covers.
    pub fn key(&self) -> &ImageViewKey {
        &self.key
    }
}

impl BackendObject for NullImageView {
    fn debug_label(&self) -> &str {
        &self.label
    }

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

/// A backend buffer.
#[derive(Debug)]
pub struct NullBuffer {
    label: String,
    setup: BufferSetup,
    shared: Weak<NullShared>,
    counters: Arc<NullCounters>,
}

impl NullBuffer {
    pub(crate) fn new(label: String, setup: BufferSetup, shared: &Arc<NullShared>) -> Self {
        shared.counters.allocate(setup.size);
        Self {
            label,
            setup,
            shared: Arc::downgrade(shared),
            counters: Arc::clone(&shared.counters),
        }
    }

    /// Description the buffer was created with.
    pub fn setup(&self) -> &BufferSetup {
        &self.setup
    }
}

impl Drop for NullBuffer {
    fn drop(&mut self) {
        self.counters.free(self.setup.size);
    }
}

impl BackendObject for NullBuffer {
    fn debug_label(&self) -> &str {
        &self.label
    }

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }

    fn as_buffer(&self) -> Option<&dyn BufferBackend> {
        Some(self)
    }
}

impl BufferBackend for NullBuffer {
    fn create_view(
        &self,
        view_type: DeviceObjectViewType,
        setup: &BufferViewSetup,
    ) -> Option<ObjectId> {
        let shared = self.shared.upgrade()?;
        debug_assert!(
            setup.offset + setup.size <= self.setup.size,
            "unvalidated buffer view {setup:?} for {}",
            self.label
        );
        let label = format!("{} ({view_type:?})", self.label);
        let setup = *setup;
        shared.register_view(view_type, setup.format, || {
            Arc::new(NullBufferView {
                label,
                view_type,
                setup,
            })
        })
    }
}

/// A backend view of a [`NullBuffer`].
#[derive(Debug)]
pub struct NullBufferView {
    label: String,
    view_type: DeviceObjectViewType,
    setup: BufferViewSetup,
}

impl NullBufferView {
    /// The kind of view.
    pub fn view_type(&self) -> DeviceObjectViewType {
        self.view_type
    }

    /// The validated byte range and interpretation.
    pub fn setup(&self) -> &BufferViewSetup {
        &self.setup
    }
}

impl BackendObject for NullBufferView {
    fn debug_label(&self) -> &str {
        &self.label
    }

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

/// A backend sampler.
#[derive(Debug)]
pub struct NullSampler {
    label: String,
}

impl NullSampler {
    pub(crate) fn new(label: String) -> Self {
        Self { label }
    }
}

impl BackendObject for NullSampler {
    fn debug_label(&self) -> &str {
        &self.label
    }

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_core::renderer::{ImageCreationInfo, ImageViewType};

    #[test]
    fn image_sizes() {
        let info = ImageCreationInfo {
            width: 4,
            height: 4,
            num_mips: 3,
            ..Default::default()
        };
        // 16 + 4 + 1 texels of 4 bytes.
        assert_eq!(image_size_in_bytes(&info.to_setup()), Some(84));

        let array = ImageCreationInfo {
            view: ImageViewType::View2DArray,
            format: ImageFormat::Bc1RgbaUnorm,
            width: 8,
            height: 8,
            num_slices: 2,
            ..Default::default()
        };
        // 2x2 blocks of 8 bytes per slice.
        assert_eq!(image_size_in_bytes(&array.to_setup()), Some(64));
    }

    #[test]
    fn oversized_images_have_no_size() {
        let huge = ImageCreationInfo {
            view: ImageViewType::View2DArray,
            format: ImageFormat::Rgba32Float,
            width: 1 << 20,
            height: 1 << 20,
            num_slices: 1 << 24,
            ..Default::default()
        };
        assert!(huge.validate().is_ok());
        assert_eq!(image_size_in_bytes(&huge.to_setup()), None);
    }

    #[test]
    fn counters_track_peak() {
        let counters = NullCounters::default();
        counters.allocate(100);
        counters.allocate(50);
        counters.free(100);
        assert_eq!(counters.allocated_bytes.load(Ordering::Relaxed), 50);
        assert_eq!(counters.peak_allocated_bytes.load(Ordering::Relaxed), 150);
    }
}
