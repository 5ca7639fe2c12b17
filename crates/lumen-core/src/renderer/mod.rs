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

//! Provides the backend-agnostic resource and view contracts of the renderer.
//!
//! Client code creates base resources through a [`GraphicsDevice`] and carves
//! views out of them through the factory methods of [`ImageObject`] and
//! [`BufferObject`]. Every factory resolves and bounds-checks the request
//! (see [`range`]) before the backend is asked to build anything.

pub mod buffer;
pub mod error;
pub mod format;
pub mod image;
pub mod range;
pub mod sampler;
pub mod traits;

pub use self::buffer::{
    BufferCreationInfo, BufferObject, BufferSetup, BufferView, BufferViewFlags, BufferViewSetup,
};
pub use self::error::{ResourceError, ViewError};
pub use self::format::ImageFormat;
pub use self::image::{
    ImageCreationInfo, ImageObject, ImageReadOnlyView, ImageSampledView, ImageSetup,
    ImageViewFlags, ImageViewKey, ImageViewType, ImageWritableView, RenderTargetView,
    RenderTargetViewSetup, SampledViewSetup, SubresourceSetup,
};
pub use self::range::{RangeAxis, SubresourceRange, ALL, ALL_BYTES};
pub use self::sampler::SamplerObject;
pub use self::traits::{BufferBackend, GraphicsBackendType, GraphicsDevice, ImageBackend};
