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

use crate::object::{DeviceObjectViewType, ObjectId};
use crate::renderer::buffer::BufferViewSetup;
use crate::renderer::image::ImageViewKey;

/// View-building capability of a backend image.
///
/// The frontend only calls these with keys it has already validated against
/// the image. Each method registers the new backend view and returns its id,
/// or `None` when the backend cannot build this view (e.g. the format is
/// unsupported for that view kind on this hardware).
pub trait ImageBackend: Send + Sync {
    /// Builds a view sampled as a texture.
    fn create_sampled_view(&self, key: &ImageViewKey) -> Option<ObjectId>;

    /// Builds a read-only storage view of a single mip and slice.
    fn create_read_only_view(&self, key: &ImageViewKey) -> Option<ObjectId>;

    /// Builds a writable storage view of a single mip and slice.
    fn create_writable_view(&self, key: &ImageViewKey) -> Option<ObjectId>;

    /// Builds a render target view of a single mip and a slice range.
    fn create_render_target_view(&self, key: &ImageViewKey) -> Option<ObjectId>;
}

/// View-building capability of a backend buffer.
pub trait BufferBackend: Send + Sync {
    /// Builds a buffer view of kind `view_type` over a validated range.
    fn create_view(
        &self,
        view_type: DeviceObjectViewType,
        setup: &BufferViewSetup,
    ) -> Option<ObjectId>;
}
