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

//! Images and the views that can be carved out of them.

use crate::lumen_bitflags;
use crate::object::{DeviceObject, DeviceObjectView, DeviceObjectViewType, DeviceResource, ObjectId};
use crate::renderer::error::{ResourceError, ViewError};
use crate::renderer::format::ImageFormat;
use crate::renderer::range::{self, RangeAxis};
use crate::renderer::traits::ImageBackend;
use std::ops::Deref;
use std::sync::Arc;

/// The dimensionality of an image or image view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ImageViewType {
    /// One-dimensional image.
    View1D,
    /// Two-dimensional image.
    #[default]
    View2D,
    /// Volume image.
    View3D,
    /// Cubemap, six 2D slices.
    ViewCube,
    /// Array of 1D slices.
    View1DArray,
    /// Array of 2D slices.
    View2DArray,
    /// Array of cubemaps, a multiple of six 2D slices.
    ViewCubeArray,
}

impl ImageViewType {
    /// `true` for cubemaps and cubemap arrays.
    pub const fn is_cubemap(self) -> bool {
        matches!(self, Self::ViewCube | Self::ViewCubeArray)
    }

    /// `true` for the array variants.
    pub const fn is_array(self) -> bool {
        matches!(self, Self::View1DArray | Self::View2DArray | Self::ViewCubeArray)
    }

    /// The view type used to look at `count` slices starting at `first`.
    pub const fn for_slice_range(self, first: u32, count: u32) -> Self {
        match self {
            Self::View1D | Self::View2D | Self::View3D => self,
            Self::View1DArray if count == 1 => Self::View1D,
            Self::View1DArray => Self::View1DArray,
            Self::View2DArray if count == 1 => Self::View2D,
            Self::View2DArray => Self::View2DArray,
            Self::ViewCube | Self::ViewCubeArray => {
                if first % 6 == 0 && count == 6 {
                    Self::ViewCube
                } else if first % 6 == 0 && count % 6 == 0 {
                    Self::ViewCubeArray
                } else if count == 1 {
                    Self::View2D
                } else {
                    Self::View2DArray
                }
            }
        }
    }
}

lumen_bitflags! {
    /// Capabilities an image was created with.
    pub struct ImageViewFlags: u32 {
        /// Created with initial content.
        const PREINITIALIZED = 1 << 0;
        /// Content can be updated from the CPU after creation.
        const DYNAMIC = 1 << 1;
        /// Can be read by shaders (sampled or read-only views).
        const SHADER_READABLE = 1 << 2;
        /// Can be the source or destination of copies.
        const COPY_CAPABLE = 1 << 3;
        /// Can be written by shaders (writable views).
        const UAV_CAPABLE = 1 << 4;
        /// Can be a color render target.
        const RENDER_TARGET = 1 << 5;
        /// Can be a depth/stencil render target.
        const DEPTH = 1 << 6;
        /// Has more than one sample per texel.
        const MULTISAMPLED = 1 << 7;
        /// Uses a block compressed format.
        const COMPRESSED = 1 << 8;
        /// Belongs to a swapchain.
        const SWAPCHAIN = 1 << 9;
        /// Uses an sRGB format.
        const SRGB = 1 << 10;
        /// Displayed vertically flipped (OpenGL style swapchains).
        const FLIPPED_Y = 1 << 11;
    }
}

/// Type, format and sub-range of an image or image view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageViewKey {
    /// Texel format; views always inherit it from the image.
    pub format: ImageFormat,
    /// Dimensionality.
    pub view_type: ImageViewType,
    /// First mip level.
    pub first_mip: u32,
    /// Number of mip levels.
    pub num_mips: u32,
    /// First array slice.
    pub first_slice: u32,
    /// Number of array slices.
    pub num_slices: u32,
}

/// Full description of an existing image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageSetup {
    /// Type, format and full mip/slice range.
    pub key: ImageViewKey,
    /// Capabilities.
    pub flags: ImageViewFlags,
    /// Samples per texel, 1 when not multisampled.
    pub samples: u32,
    /// Width of mip 0.
    pub width: u32,
    /// Height of mip 0.
    pub height: u32,
    /// Depth of mip 0 (volume images only, 1 otherwise).
    pub depth: u32,
}

/// A request to create an image, checked by [`ImageCreationInfo::validate`].
#[derive(Debug, Clone)]
pub struct ImageCreationInfo {
    /// Debug label.
    pub label: Option<String>,
    /// Dimensionality.
    pub view: ImageViewType,
    /// Texel format.
    pub format: ImageFormat,
    /// Width of mip 0.
    pub width: u32,
    /// Height of mip 0.
    pub height: u32,
    /// Depth of mip 0.
    pub depth: u32,
    /// Number of mip levels.
    pub num_mips: u32,
    /// Number of array slices.
    pub num_slices: u32,
    /// Samples per texel.
    pub num_samples: u32,
    /// Allow sampled and read-only views.
    pub allow_shader_reads: bool,
    /// Allow writable views.
    pub allow_uav: bool,
    /// Allow render target views.
    pub allow_render_target: bool,
    /// Allow copies.
    pub allow_copies: bool,
    /// Allow CPU updates after creation.
    pub allow_dynamic_update: bool,
    /// The image is created with initial content.
    pub preinitialized: bool,
    /// The image is a presentable surface of a swapchain.
    pub swapchain: bool,
    /// The swapchain presents rows bottom to top.
    pub flipped_y: bool,
}

impl Default for ImageCreationInfo {
    fn default() -> Self {
        Self {
            label: None,
            view: ImageViewType::View2D,
            format: ImageFormat::Rgba8Unorm,
            width: 1,
            height: 1,
            depth: 1,
            num_mips: 1,
            num_slices: 1,
            num_samples: 1,
            allow_shader_reads: true,
            allow_uav: false,
            allow_render_target: false,
            allow_copies: false,
            allow_dynamic_update: false,
            preinitialized: false,
            swapchain: false,
            flipped_y: false,
        }
    }
}

impl ImageCreationInfo {
    /// Number of mips of a complete chain down to 1x1x1.
    pub fn full_mip_chain(&self) -> u32 {
        let largest = self.width.max(self.height).max(self.depth).max(1);
        u32::BITS - largest.leading_zeros()
    }

    /// Capabilities implied by this request.
    pub fn compute_view_flags(&self) -> ImageViewFlags {
        let mut flags = ImageViewFlags::EMPTY;
        flags.set(ImageViewFlags::SHADER_READABLE, self.allow_shader_reads);
        flags.set(ImageViewFlags::UAV_CAPABLE, self.allow_uav);
        flags.set(
            ImageViewFlags::RENDER_TARGET,
            self.allow_render_target && !self.format.is_depth(),
        );
        flags.set(
            ImageViewFlags::DEPTH,
            self.allow_render_target && self.format.is_depth(),
        );
        flags.set(ImageViewFlags::COPY_CAPABLE, self.allow_copies);
        flags.set(ImageViewFlags::DYNAMIC, self.allow_dynamic_update);
        flags.set(ImageViewFlags::MULTISAMPLED, self.num_samples > 1);
        flags.set(ImageViewFlags::COMPRESSED, self.format.is_compressed());
        flags.set(ImageViewFlags::SRGB, self.format.is_srgb());
        flags.set(ImageViewFlags::PREINITIALIZED, self.preinitialized);
        flags.set(ImageViewFlags::SWAPCHAIN, self.swapchain);
        flags.set(ImageViewFlags::FLIPPED_Y, self.swapchain && self.flipped_y);
        flags
    }

    /// Checks the request is self-consistent.
    pub fn validate(&self) -> Result<(), ResourceError> {
        let invalid = |msg: &str| Err(ResourceError::InvalidDescriptor(msg.to_string()));

        if self.width == 0 || self.height == 0 || self.depth == 0 {
            return invalid("image dimensions must be non-zero");
        }
        match self.view {
            ImageViewType::View1D | ImageViewType::View1DArray
                if self.height != 1 || self.depth != 1 =>
            {
                return invalid("1D images must have a height and depth of 1");
            }
            ImageViewType::View2D | ImageViewType::View2DArray if self.depth != 1 => {
                return invalid("2D images must have a depth of 1");
            }
            ImageViewType::ViewCube | ImageViewType::ViewCubeArray
                if self.depth != 1 || self.width != self.height =>
            {
                return invalid("cubemap faces must be square with a depth of 1");
            }
            _ => {}
        }

        let slices_ok = match self.view {
            ImageViewType::View1D | ImageViewType::View2D | ImageViewType::View3D => {
                self.num_slices == 1
            }
            ImageViewType::ViewCube => self.num_slices == 6,
            ImageViewType::ViewCubeArray => self.num_slices > 0 && self.num_slices % 6 == 0,
            ImageViewType::View1DArray | ImageViewType::View2DArray => self.num_slices > 0,
        };
        if !slices_ok {
            return invalid("slice count does not match the image type");
        }

        if self.num_mips == 0 || self.num_mips > self.full_mip_chain() {
            return invalid("mip count must be between 1 and the full mip chain");
        }

        if self.num_samples == 0 {
            return invalid("sample count must be at least 1");
        }
        if self.num_samples > 1 {
            if !self.num_samples.is_power_of_two() {
                return invalid("sample count must be a power of two");
            }
            if !matches!(self.view, ImageViewType::View2D | ImageViewType::View2DArray) {
                return invalid("only 2D images can be multisampled");
            }
            if self.num_mips != 1 {
                return invalid("multisampled images cannot have mips");
            }
        }

        if self.allow_uav && (self.format.is_compressed() || self.format.is_depth()) {
            return invalid("compressed and depth images cannot be UAV capable");
        }
        if self.allow_render_target && self.format.is_compressed() {
            return invalid("compressed images cannot be render targets");
        }

        if self.swapchain {
            if self.view != ImageViewType::View2D || self.num_mips != 1 {
                return invalid("swapchain images are single-mip 2D images");
            }
            if !self.allow_render_target || self.format.is_depth() {
                return invalid("swapchain images must be color render targets");
            }
        } else if self.flipped_y {
            return invalid("only swapchain images can be flipped");
        }
        Ok(())
    }

    /// The setup of an image created from this request.
    pub fn to_setup(&self) -> ImageSetup {
        ImageSetup {
            key: ImageViewKey {
                format: self.format,
                view_type: self.view,
                first_mip: 0,
                num_mips: self.num_mips,
                first_slice: 0,
                num_slices: self.num_slices,
            },
            flags: self.compute_view_flags(),
            samples: self.num_samples.max(1),
            width: self.width,
            height: self.height,
            depth: self.depth,
        }
    }
}

/// Resolved range of a sampled view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SampledViewSetup {
    /// First mip in the image.
    pub first_mip: u32,
    /// Number of mips in the view.
    pub num_mips: u32,
    /// First slice in the image.
    pub first_slice: u32,
    /// Number of slices in the view.
    pub num_slices: u32,
}

/// A single mip and slice of an image, used by read-only and writable views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubresourceSetup {
    /// Mip in the image.
    pub mip: u32,
    /// Slice in the image.
    pub slice: u32,
}

/// Resolved description of a render target view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderTargetViewSetup {
    /// Format of the target surface.
    pub format: ImageFormat,
    /// Mip in the image.
    pub mip: u32,
    /// Samples per texel.
    pub samples: u32,
    /// First slice in the image.
    pub first_slice: u32,
    /// Number of slices rendered to.
    pub num_slices: u32,
    /// Width of the viewed mip.
    pub width: u32,
    /// Height of the viewed mip.
    pub height: u32,
    /// Displayed vertically flipped.
    pub flipped: bool,
    /// Comes from a swapchain.
    pub swapchain: bool,
    /// Is a depth/stencil target.
    pub depth: bool,
    /// Uses an sRGB format.
    pub srgb: bool,
    /// Renders to more than one slice, or to an array image.
    pub arrayed: bool,
    /// Multisampled.
    pub msaa: bool,
}

/// Frontend proxy of a backend image.
#[derive(Debug)]
pub struct ImageObject {
    object: DeviceObject,
    setup: ImageSetup,
}

impl DeviceResource for ImageObject {
    fn device_object(&self) -> &DeviceObject {
        &self.object
    }
}

impl ImageObject {
    /// Wraps an image the backend has already created.
    pub fn new(object: DeviceObject, setup: ImageSetup) -> Self {
        Self { object, setup }
    }

    /// The id of the backend image.
    pub fn id(&self) -> ObjectId {
        self.object.id()
    }

    /// Full description.
    pub fn setup(&self) -> &ImageSetup {
        &self.setup
    }

    /// Type, format and full range.
    pub fn key(&self) -> &ImageViewKey {
        &self.setup.key
    }

    /// Texel format.
    pub fn format(&self) -> ImageFormat {
        self.setup.key.format
    }

    /// Dimensionality.
    pub fn view_type(&self) -> ImageViewType {
        self.setup.key.view_type
    }

    /// Capabilities.
    pub fn flags(&self) -> ImageViewFlags {
        self.setup.flags
    }

    /// Number of mip levels.
    pub fn mips(&self) -> u32 {
        self.setup.key.num_mips
    }

    /// Number of array slices.
    pub fn slices(&self) -> u32 {
        self.setup.key.num_slices
    }

    /// Samples per texel.
    pub fn samples(&self) -> u32 {
        self.setup.samples
    }

    /// Width of mip 0.
    pub fn width(&self) -> u32 {
        self.setup.width
    }

    /// Height of mip 0.
    pub fn height(&self) -> u32 {
        self.setup.height
    }

    /// Depth of mip 0.
    pub fn depth(&self) -> u32 {
        self.setup.depth
    }

    /// Width, height and depth of `mip`, clamped to 1.
    pub fn mip_extent(&self, mip: u32) -> (u32, u32, u32) {
        let shrink = |size: u32| size.checked_shr(mip).unwrap_or(0).max(1);
        (
            shrink(self.setup.width),
            shrink(self.setup.height),
            shrink(self.setup.depth),
        )
    }

    /// `true` when the device that created the image is gone.
    pub fn is_orphaned(&self) -> bool {
        self.object.is_orphaned()
    }

    fn require(
        &self,
        view_type: DeviceObjectViewType,
        needed: ImageViewFlags,
        reason: &'static str,
    ) -> Result<(), ViewError> {
        if self.setup.flags.intersects(needed) {
            Ok(())
        } else {
            Err(ViewError::UnsupportedUsage { view_type, reason })
        }
    }

    /// Resolves and checks a sampled view request. `ALL` counts take the rest.
    pub fn validate_sampled_view(
        &self,
        first_mip: u32,
        num_mips: u32,
        first_slice: u32,
        num_slices: u32,
    ) -> Result<SampledViewSetup, ViewError> {
        self.require(
            DeviceObjectViewType::SampledImage,
            ImageViewFlags::SHADER_READABLE,
            "image is not shader readable",
        )?;
        let mips = range::resolve_range(RangeAxis::Mip, first_mip, num_mips, self.mips())?;
        let slices =
            range::resolve_range(RangeAxis::Slice, first_slice, num_slices, self.slices())?;
        Ok(SampledViewSetup {
            first_mip: mips.first,
            num_mips: mips.count,
            first_slice: slices.first,
            num_slices: slices.count,
        })
    }

    /// Checks a read-only view request.
    pub fn validate_read_only_view(
        &self,
        mip: u32,
        slice: u32,
    ) -> Result<SubresourceSetup, ViewError> {
        self.require(
            DeviceObjectViewType::Image,
            ImageViewFlags::SHADER_READABLE,
            "image is not shader readable",
        )?;
        self.validate_subresource(mip, slice)
    }

    /// Checks a writable view request.
    pub fn validate_writable_view(
        &self,
        mip: u32,
        slice: u32,
    ) -> Result<SubresourceSetup, ViewError> {
        self.require(
            DeviceObjectViewType::ImageWritable,
            ImageViewFlags::UAV_CAPABLE,
            "image is not UAV capable",
        )?;
        self.validate_subresource(mip, slice)
    }

    fn validate_subresource(&self, mip: u32, slice: u32) -> Result<SubresourceSetup, ViewError> {
        Ok(SubresourceSetup {
            mip: range::resolve_index(RangeAxis::Mip, mip, self.mips())?,
            slice: range::resolve_index(RangeAxis::Slice, slice, self.slices())?,
        })
    }

    /// Resolves and checks a render target view request.
    pub fn validate_render_target_view(
        &self,
        mip: u32,
        first_slice: u32,
        num_slices: u32,
    ) -> Result<RenderTargetViewSetup, ViewError> {
        self.require(
            DeviceObjectViewType::RenderTarget,
            ImageViewFlags::RENDER_TARGET | ImageViewFlags::DEPTH,
            "image is not a render target",
        )?;
        let mip = range::resolve_index(RangeAxis::Mip, mip, self.mips())?;
        let slices =
            range::resolve_range(RangeAxis::Slice, first_slice, num_slices, self.slices())?;
        let (width, height, _) = self.mip_extent(mip);
        let flags = self.setup.flags;
        Ok(RenderTargetViewSetup {
            format: self.format(),
            mip,
            samples: self.samples(),
            first_slice: slices.first,
            num_slices: slices.count,
            width,
            height,
            flipped: flags.contains(ImageViewFlags::FLIPPED_Y),
            swapchain: flags.contains(ImageViewFlags::SWAPCHAIN),
            depth: flags.contains(ImageViewFlags::DEPTH),
            srgb: flags.contains(ImageViewFlags::SRGB),
            arrayed: slices.count > 1 || self.view_type().is_array(),
            msaa: self.samples() > 1,
        })
    }

    fn view_key(
        &self,
        first_mip: u32,
        num_mips: u32,
        first_slice: u32,
        num_slices: u32,
    ) -> ImageViewKey {
        ImageViewKey {
            format: self.format(),
            view_type: self.view_type().for_slice_range(first_slice, num_slices),
            first_mip,
            num_mips,
            first_slice,
            num_slices,
        }
    }

    /// Creates a sampled view of every mip and slice from `first_mip`/`first_slice` on.
    pub fn create_sampled_view(
        self: &Arc<Self>,
        first_mip: u32,
        first_slice: u32,
    ) -> Result<Arc<ImageSampledView>, ViewError> {
        self.create_sampled_view_ex(first_mip, first_slice, range::ALL, range::ALL)
    }

    /// Creates a sampled view of an explicit mip and slice range.
    pub fn create_sampled_view_ex(
        self: &Arc<Self>,
        first_mip: u32,
        first_slice: u32,
        num_mips: u32,
        num_slices: u32,
    ) -> Result<Arc<ImageSampledView>, ViewError> {
        let view_type = DeviceObjectViewType::SampledImage;
        let setup = self
            .validate_sampled_view(first_mip, num_mips, first_slice, num_slices)
            .inspect_err(|err| self.log_rejection(view_type, err))?;
        let key = self.view_key(
            setup.first_mip,
            setup.num_mips,
            setup.first_slice,
            setup.num_slices,
        );
        let view = self.materialize(view_type, &key, |backend, key| {
            backend.create_sampled_view(key)
        })?;
        Ok(Arc::new(ImageSampledView { view, setup }))
    }

    /// Creates a read-only view of a single mip and slice.
    pub fn create_read_only_view(
        self: &Arc<Self>,
        mip: u32,
        slice: u32,
    ) -> Result<Arc<ImageReadOnlyView>, ViewError> {
        let view_type = DeviceObjectViewType::Image;
        let setup = self
            .validate_read_only_view(mip, slice)
            .inspect_err(|err| self.log_rejection(view_type, err))?;
        let key = self.view_key(setup.mip, 1, setup.slice, 1);
        let view = self.materialize(view_type, &key, |backend, key| {
            backend.create_read_only_view(key)
        })?;
        Ok(Arc::new(ImageReadOnlyView { view, setup }))
    }

    /// Creates a writable view of a single mip and slice.
    pub fn create_writable_view(
        self: &Arc<Self>,
        mip: u32,
        slice: u32,
    ) -> Result<Arc<ImageWritableView>, ViewError> {
        let view_type = DeviceObjectViewType::ImageWritable;
        let setup = self
            .validate_writable_view(mip, slice)
            .inspect_err(|err| self.log_rejection(view_type, err))?;
        let key = self.view_key(setup.mip, 1, setup.slice, 1);
        let view = self.materialize(view_type, &key, |backend, key| {
            backend.create_writable_view(key)
        })?;
        Ok(Arc::new(ImageWritableView { view, setup }))
    }

    /// Creates a render target view of a single mip and a slice range.
    pub fn create_render_target_view(
        self: &Arc<Self>,
        mip: u32,
        first_slice: u32,
        num_slices: u32,
    ) -> Result<Arc<RenderTargetView>, ViewError> {
        let view_type = DeviceObjectViewType::RenderTarget;
        let setup = self
            .validate_render_target_view(mip, first_slice, num_slices)
            .inspect_err(|err| self.log_rejection(view_type, err))?;
        let key = self.view_key(setup.mip, 1, setup.first_slice, setup.num_slices);
        let view = self.materialize(view_type, &key, |backend, key| {
            backend.create_render_target_view(key)
        })?;
        Ok(Arc::new(RenderTargetView { view, setup }))
    }

    fn log_rejection(&self, view_type: DeviceObjectViewType, err: &ViewError) {
        log::warn!("Rejected {view_type:?} view of image {:?}: {err}", self.id());
    }

    /// Resolves the live backend image and asks it to build the view.
    fn materialize(
        self: &Arc<Self>,
        view_type: DeviceObjectViewType,
        key: &ImageViewKey,
        build: impl FnOnce(&dyn ImageBackend, &ImageViewKey) -> Option<ObjectId>,
    ) -> Result<DeviceObjectView<ImageObject>, ViewError> {
        let backend = self
            .object
            .resolve_internal_object()
            .ok_or(ViewError::StaleHandle(self.id()))?;
        let image = backend.as_image().ok_or(ViewError::StaleHandle(self.id()))?;
        let view_id = build(image, key).ok_or_else(|| {
            log::warn!("Backend refused {view_type:?} view {key:?} of image {:?}", self.id());
            ViewError::BackendRejected { view_type }
        })?;
        log::debug!("Created {view_type:?} view {view_id:?} of image {:?}", self.id());
        Ok(DeviceObjectView::new(
            view_id,
            view_type,
            Arc::clone(self),
            self.object.handler(),
        ))
    }
}

macro_rules! image_view {
    ($(#[$attr:meta])* $name:ident, $setup:ty) => {
        $(#[$attr])*
        #[derive(Debug)]
        pub struct $name {
            view: DeviceObjectView<ImageObject>,
            setup: $setup,
        }

        impl $name {
            /// The image this view was created from. Guaranteed alive.
            pub fn image(&self) -> &Arc<ImageObject> {
                self.view.base()
            }

            /// The validated setup the view was built from.
            pub fn setup(&self) -> &$setup {
                &self.setup
            }
        }

        impl Deref for $name {
            type Target = DeviceObjectView<ImageObject>;

            fn deref(&self) -> &Self::Target {
                &self.view
            }
        }
    };
}

image_view!(
    /// Sampled (SRV) view of a mip and slice range.
    ImageSampledView,
    SampledViewSetup
);
image_view!(
    /// Read-only view of a single mip and slice.
    ImageReadOnlyView,
    SubresourceSetup
);
image_view!(
    /// Writable (UAV) view of a single mip and slice.
    ImageWritableView,
    SubresourceSetup
);
image_view!(
    /// View usable as a rendering surface in passes.
    RenderTargetView,
    RenderTargetViewSetup
);

impl ImageSampledView {
    /// First mip of the image seen by the view.
    pub fn first_mip(&self) -> u32 {
        self.setup.first_mip
    }

    /// Number of mips in the view.
    pub fn mips(&self) -> u32 {
        self.setup.num_mips
    }

    /// First slice of the image seen by the view.
    pub fn first_slice(&self) -> u32 {
        self.setup.first_slice
    }

    /// Number of slices in the view.
    pub fn slices(&self) -> u32 {
        self.setup.num_slices
    }
}

impl RenderTargetView {
    /// Width of the rendering surface.
    pub fn width(&self) -> u32 {
        self.setup.width
    }

    /// Height of the rendering surface.
    pub fn height(&self) -> u32 {
        self.setup.height
    }

    /// Format of the target surface.
    pub fn format(&self) -> ImageFormat {
        self.setup.format
    }
}
