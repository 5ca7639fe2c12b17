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

//! Pixel formats of images and typed buffer views.

use serde::{Deserialize, Serialize};

/// The format of the texels of an image or typed buffer view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ImageFormat {
    // 8-bit formats
    /// One 8-bit unsigned normalized component.
    R8Unorm,
    /// Two 8-bit unsigned normalized components.
    Rg8Unorm,
    /// Four 8-bit unsigned normalized components (RGBA).
    Rgba8Unorm,
    /// Four 8-bit unsigned normalized components (RGBA) in the sRGB color space.
    Rgba8UnormSrgb,
    /// Four 8-bit unsigned normalized components (BGRA).
    Bgra8Unorm,
    /// Four 8-bit unsigned normalized components (BGRA) in the sRGB color space.
    Bgra8UnormSrgb,
    // 16-bit float formats
    /// One 16-bit float component.
    R16Float,
    /// Two 16-bit float components.
    Rg16Float,
    /// Four 16-bit float components.
    Rgba16Float,
    // 32-bit formats
    /// One 32-bit float component.
    R32Float,
    /// Two 32-bit float components.
    Rg32Float,
    /// Four 32-bit float components.
    Rgba32Float,
    /// One 32-bit unsigned integer component.
    R32Uint,
    /// Four 32-bit unsigned integer components.
    Rgba32Uint,
    // Block compressed formats
    /// BC1 (DXT1) RGBA, 4x4 blocks of 8 bytes.
    Bc1RgbaUnorm,
    /// BC3 (DXT5) RGBA, 4x4 blocks of 16 bytes.
    Bc3RgbaUnorm,
    /// BC7 RGBA, 4x4 blocks of 16 bytes.
    Bc7RgbaUnorm,
    // Depth/stencil formats
    /// A 16-bit unsigned normalized depth format.
    Depth16Unorm,
    /// A 24-bit depth format with an 8-bit stencil component.
    Depth24PlusStencil8,
    /// A 32-bit float depth format.
    Depth32Float,
}

impl ImageFormat {
    /// Size in bytes of one texel, or of one 4x4 block for compressed formats.
    pub const fn bytes_per_pixel(self) -> u32 {
        match self {
            ImageFormat::R8Unorm => 1,
            ImageFormat::Rg8Unorm => 2,
            ImageFormat::Rgba8Unorm
            | ImageFormat::Rgba8UnormSrgb
            | ImageFormat::Bgra8Unorm
            | ImageFormat::Bgra8UnormSrgb => 4,
            ImageFormat::R16Float => 2,
            ImageFormat::Rg16Float => 4,
            ImageFormat::Rgba16Float => 8,
            ImageFormat::R32Float | ImageFormat::R32Uint => 4,
            ImageFormat::Rg32Float => 8,
            ImageFormat::Rgba32Float | ImageFormat::Rgba32Uint => 16,
            ImageFormat::Bc1RgbaUnorm => 8,
            ImageFormat::Bc3RgbaUnorm | ImageFormat::Bc7RgbaUnorm => 16,
            ImageFormat::Depth16Unorm => 2,
            ImageFormat::Depth24PlusStencil8 | ImageFormat::Depth32Float => 4,
        }
    }

    /// `true` for depth (and depth/stencil) formats.
    pub const fn is_depth(self) -> bool {
        matches!(
            self,
            ImageFormat::Depth16Unorm | ImageFormat::Depth24PlusStencil8 | ImageFormat::Depth32Float
        )
    }

    /// `true` when the format has a stencil component.
    pub const fn has_stencil(self) -> bool {
        matches!(self, ImageFormat::Depth24PlusStencil8)
    }

    /// `true` for sRGB encoded formats.
    pub const fn is_srgb(self) -> bool {
        matches!(self, ImageFormat::Rgba8UnormSrgb | ImageFormat::Bgra8UnormSrgb)
    }

    /// `true` for block compressed formats.
    pub const fn is_compressed(self) -> bool {
        matches!(
            self,
            ImageFormat::Bc1RgbaUnorm | ImageFormat::Bc3RgbaUnorm | ImageFormat::Bc7RgbaUnorm
        )
    }

    /// `true` when the format can back a typed buffer view.
    pub const fn is_buffer_compatible(self) -> bool {
        !self.is_depth() && !self.is_compressed() && !self.is_srgb()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification() {
        assert!(ImageFormat::Depth24PlusStencil8.is_depth());
        assert!(ImageFormat::Depth24PlusStencil8.has_stencil());
        assert!(!ImageFormat::Depth32Float.has_stencil());
        assert!(ImageFormat::Bgra8UnormSrgb.is_srgb());
        assert!(ImageFormat::Bc7RgbaUnorm.is_compressed());
        assert!(ImageFormat::R32Uint.is_buffer_compatible());
        assert!(!ImageFormat::Bc1RgbaUnorm.is_buffer_compatible());
        assert!(!ImageFormat::Depth16Unorm.is_buffer_compatible());
    }

    #[test]
    fn texel_sizes() {
        assert_eq!(ImageFormat::Rgba16Float.bytes_per_pixel(), 8);
        assert_eq!(ImageFormat::Rgba32Uint.bytes_per_pixel(), 16);
        assert_eq!(ImageFormat::Bc1RgbaUnorm.bytes_per_pixel(), 8);
    }
}
