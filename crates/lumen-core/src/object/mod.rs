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

//! Identity and lifetime plumbing shared by every frontend device object.
//!
//! The backend owns every GPU object; the frontend only ever holds an
//! [`ObjectId`] plus a weak relation to the [`DeviceObjectHandler`] that can
//! resolve it. Once the backend is torn down the relation can no longer be
//! upgraded and every proxy silently becomes inert.

mod device_object;
mod handler;
mod registry;

pub use self::device_object::{DeviceObject, DeviceObjectView, DeviceResource};
pub use self::handler::{BackendObject, DeviceObjectHandler};
pub use self::registry::{ObjectRegistry, RegistryStats};

use std::fmt;

/// An opaque, process-unique identifier of a backend-owned object or view.
///
/// The identifier pairs the tag of the registry that issued it with a
/// generation-carrying slot key. Tags are unique within the process, and
/// generations make sure a slot recycled by the same registry never yields
/// an identifier twice.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId {
    registry: u32,
    key: u64,
}

impl ObjectId {
    /// An identifier that never names a live object.
    pub const INVALID: Self = Self {
        registry: 0,
        key: 0,
    };

    /// Builds an identifier from a registry tag and a slot key.
    pub const fn new(registry: u32, key: u64) -> Self {
        Self { registry, key }
    }

    /// Tag of the registry that issued the identifier.
    pub const fn registry(self) -> u32 {
        self.registry
    }

    /// Slot key within the issuing registry.
    pub const fn key(self) -> u64 {
        self.key
    }

    /// The identifier packed into one integer, as consumed by command recording.
    pub const fn to_bits(self) -> u128 {
        ((self.registry as u128) << 64) | self.key as u128
    }

    /// Unpacks an identifier produced by [`ObjectId::to_bits`].
    pub const fn from_bits(bits: u128) -> Self {
        Self {
            registry: (bits >> 64) as u32,
            key: bits as u64,
        }
    }

    /// `false` for [`ObjectId::INVALID`] and anything no registry issues.
    pub const fn is_valid(self) -> bool {
        self.registry != 0 && self.key != 0
    }
}

impl Default for ObjectId {
    fn default() -> Self {
        Self::INVALID
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Low half of the key is the slot index, high half the generation.
        write!(
            f,
            "ObjectId({}:{}v{})",
            self.registry,
            self.key as u32,
            self.key >> 32
        )
    }
}

/// Tags what kind of view an object represents. Immutable once a view exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DeviceObjectViewType {
    /// Not a view.
    #[default]
    Invalid,
    /// Uniform (constant) buffer range.
    ConstantBuffer,
    /// Typed, read-only buffer range.
    Buffer,
    /// Typed, shader-writable buffer range.
    BufferWritable,
    /// Structured, read-only buffer range.
    BufferStructured,
    /// Structured, shader-writable buffer range.
    BufferStructuredWritable,
    /// Single mip/slice of an image, read as storage image.
    Image,
    /// Single mip/slice of an image, written as storage image.
    ImageWritable,
    /// Mip and slice range of an image, sampled as a texture.
    SampledImage,
    /// Attachment usable as a render pass output.
    RenderTarget,
    /// Sampler state.
    Sampler,
}

impl DeviceObjectViewType {
    /// `true` for views carved out of a buffer.
    pub const fn is_buffer_view(self) -> bool {
        matches!(
            self,
            Self::ConstantBuffer
                | Self::Buffer
                | Self::BufferWritable
                | Self::BufferStructured
                | Self::BufferStructuredWritable
        )
    }

    /// `true` for views carved out of an image.
    pub const fn is_image_view(self) -> bool {
        matches!(
            self,
            Self::Image | Self::ImageWritable | Self::SampledImage | Self::RenderTarget
        )
    }

    /// `true` for views shaders (or the output merger) may write through.
    pub const fn is_writable(self) -> bool {
        matches!(
            self,
            Self::BufferWritable
                | Self::BufferStructuredWritable
                | Self::ImageWritable
                | Self::RenderTarget
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_id_is_default() {
        assert_eq!(ObjectId::default(), ObjectId::INVALID);
        assert!(!ObjectId::INVALID.is_valid());
        assert!(ObjectId::new(1, 42).is_valid());
        assert!(!ObjectId::new(0, 42).is_valid());
        assert!(!ObjectId::new(3, 0).is_valid());
    }

    #[test]
    fn bits_keep_both_halves() {
        let id = ObjectId::new(7, (5 << 32) | 9);
        assert_eq!(ObjectId::from_bits(id.to_bits()), id);
        assert_eq!(format!("{id:?}"), "ObjectId(7:9v5)");
        assert_ne!(ObjectId::new(1, 9), ObjectId::new(2, 9));
    }

    #[test]
    fn view_type_classification() {
        assert!(DeviceObjectViewType::BufferStructured.is_buffer_view());
        assert!(!DeviceObjectViewType::BufferStructured.is_writable());
        assert!(DeviceObjectViewType::RenderTarget.is_image_view());
        assert!(DeviceObjectViewType::RenderTarget.is_writable());
        assert!(!DeviceObjectViewType::Sampler.is_buffer_view());
        assert!(!DeviceObjectViewType::Sampler.is_image_view());
        assert!(!DeviceObjectViewType::Invalid.is_writable());
    }
}
