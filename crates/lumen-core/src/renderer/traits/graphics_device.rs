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

use crate::jobs::BackgroundJobQueue;
use crate::renderer::buffer::{BufferCreationInfo, BufferObject};
use crate::renderer::error::ResourceError;
use crate::renderer::image::{ImageCreationInfo, ImageObject};
use crate::renderer::sampler::SamplerObject;
use std::fmt::Debug;
use std::sync::Arc;

/// A backend-agnostic representation of a graphics API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GraphicsBackendType {
    /// Vulkan API.
    Vulkan,
    /// Microsoft's DirectX 11 API.
    Dx11,
    /// OpenGL API.
    OpenGL,
    /// A backend that executes nothing on a GPU.
    #[default]
    Null,
}

/// The device side of a backend: creates base resources and owns the
/// object table every proxy resolves through.
///
/// One implementation exists per backend; it is selected at startup and
/// never mixed with another at runtime.
pub trait GraphicsDevice: Send + Sync + Debug + 'static {
    /// The graphics API this device drives.
    fn backend_type(&self) -> GraphicsBackendType;

    /// Creates a new image.
    /// ## Arguments
    /// * `info` - The image description. Validated before anything is allocated.
    /// ## Returns
    /// A shared proxy for the image, released when the last reference drops.
    /// ## Errors
    /// * `ResourceError` - If the description is invalid or the backend fails.
    fn create_image(&self, info: &ImageCreationInfo) -> Result<Arc<ImageObject>, ResourceError>;

    /// Creates a new buffer.
    /// ## Arguments
    /// * `info` - The buffer description. Validated before anything is allocated.
    /// ## Returns
    /// A shared proxy for the buffer, released when the last reference drops.
    /// ## Errors
    /// * `ResourceError` - If the description is invalid or the backend fails.
    fn create_buffer(&self, info: &BufferCreationInfo) -> Result<Arc<BufferObject>, ResourceError>;

    /// Creates a new sampler.
    fn create_sampler(&self, label: Option<&str>) -> Result<Arc<SamplerObject>, ResourceError>;

    /// The background job queue started with this device.
    fn job_queue(&self) -> &Arc<BackgroundJobQueue>;

    /// Frame boundary: destroys objects released since the previous call and
    /// drains the job queue when it runs without workers.
    fn sync(&self);
}
