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

//! Buffers and the typed, structured and constant views over their bytes.

use crate::lumen_bitflags;
use crate::object::{DeviceObject, DeviceObjectView, DeviceObjectViewType, DeviceResource, ObjectId};
use crate::renderer::error::{ResourceError, ViewError};
use crate::renderer::format::ImageFormat;
use crate::renderer::range;
use std::ops::Deref;
use std::sync::Arc;

/// Required alignment of constant buffer sizes and view offsets.
pub const CONSTANT_BUFFER_ALIGNMENT: u64 = 16;

lumen_bitflags! {
    /// Capabilities a buffer was created with.
    pub struct BufferViewFlags: u32 {
        /// Can back constant (uniform) views.
        const CONSTANT = 1 << 0;
        /// Can be read by shaders through typed or structured views.
        const SHADER_READABLE = 1 << 1;
        /// Can be written by shaders.
        const UAV_CAPABLE = 1 << 2;
        /// Holds fixed-stride elements.
        const STRUCTURED = 1 << 3;
        /// Vertex data.
        const VERTEX = 1 << 4;
        /// Index data.
        const INDEX = 1 << 5;
        /// Indirect draw/dispatch arguments.
        const INDIRECT = 1 << 6;
        /// Can be the source or destination of copies.
        const COPY_CAPABLE = 1 << 7;
        /// Content can be updated from the CPU after creation.
        const DYNAMIC = 1 << 8;
    }
}

/// Full description of an existing buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferSetup {
    /// Size in bytes.
    pub size: u64,
    /// Element stride of structured buffers, 0 otherwise.
    pub stride: u32,
    /// Capabilities.
    pub flags: BufferViewFlags,
}

/// A request to create a buffer, checked by [`BufferCreationInfo::validate`].
#[derive(Debug, Clone, Default)]
pub struct BufferCreationInfo {
    /// Debug label.
    pub label: Option<String>,
    /// Size in bytes.
    pub size: u64,
    /// Element stride; non-zero makes the buffer structured.
    pub stride: u32,
    /// Usable as a constant buffer.
    pub allow_constant: bool,
    /// Readable by shaders.
    pub allow_shader_reads: bool,
    /// Writable by shaders.
    pub allow_uav: bool,
    /// Usable as vertex data.
    pub allow_vertex: bool,
    /// Usable as index data.
    pub allow_index: bool,
    /// Usable for indirect arguments.
    pub allow_indirect: bool,
    /// Allow copies.
    pub allow_copies: bool,
    /// Allow CPU updates after creation.
    pub allow_dynamic_update: bool,
}

impl BufferCreationInfo {
    /// Capabilities implied by this request.
    pub fn compute_flags(&self) -> BufferViewFlags {
        let mut flags = BufferViewFlags::EMPTY;
        flags.set(BufferViewFlags::CONSTANT, self.allow_constant);
        flags.set(BufferViewFlags::SHADER_READABLE, self.allow_shader_reads);
        flags.set(BufferViewFlags::UAV_CAPABLE, self.allow_uav);
        flags.set(BufferViewFlags::STRUCTURED, self.stride > 0);
        flags.set(BufferViewFlags::VERTEX, self.allow_vertex);
        flags.set(BufferViewFlags::INDEX, self.allow_index);
        flags.set(BufferViewFlags::INDIRECT, self.allow_indirect);
        flags.set(BufferViewFlags::COPY_CAPABLE, self.allow_copies);
        flags.set(BufferViewFlags::DYNAMIC, self.allow_dynamic_update);
        flags
    }

    /// Checks the request is self-consistent.
    pub fn validate(&self) -> Result<(), ResourceError> {
        let invalid = |msg: &str| Err(ResourceError::InvalidDescriptor(msg.to_string()));

        if self.size == 0 {
            return invalid("buffer size must be non-zero");
        }
        let exclusive = [
            self.allow_constant,
            self.allow_vertex,
            self.allow_index,
            self.allow_indirect,
        ];
        if exclusive.iter().filter(|&&used| used).count() > 1 {
            return invalid("constant, vertex, index and indirect usages are exclusive");
        }
        if self.allow_constant {
            if self.size % CONSTANT_BUFFER_ALIGNMENT != 0 {
                return invalid("constant buffer size must be a multiple of 16 bytes");
            }
            if self.allow_shader_reads || self.allow_uav {
                return invalid("constant buffers cannot be shader readable or writable");
            }
        }
        if self.stride > 0 && self.size % u64::from(self.stride) != 0 {
            return invalid("structured buffer size must be a multiple of its stride");
        }
        Ok(())
    }

    /// The setup of a buffer created from this request.
    pub fn to_setup(&self) -> BufferSetup {
        BufferSetup {
            size: self.size,
            stride: self.stride,
            flags: self.compute_flags(),
        }
    }
}

/// Resolved byte range and interpretation of a buffer view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferViewSetup {
    /// First byte of the view.
    pub offset: u64,
    /// Size of the view in bytes.
    pub size: u64,
    /// Element format of typed views.
    pub format: Option<ImageFormat>,
    /// Element stride of structured views, 0 otherwise.
    pub stride: u32,
}

/// Frontend proxy of a backend buffer.
#[derive(Debug)]
pub struct BufferObject {
    object: DeviceObject,
    setup: BufferSetup,
}

impl DeviceResource for BufferObject {
    fn device_object(&self) -> &DeviceObject {
        &self.object
    }
}

impl BufferObject {
    /// Wraps a buffer the backend has already created.
    pub fn new(object: DeviceObject, setup: BufferSetup) -> Self {
        Self { object, setup }
    }

    /// The id of the backend buffer.
    pub fn id(&self) -> ObjectId {
        self.object.id()
    }

    /// Full description.
    pub fn setup(&self) -> &BufferSetup {
        &self.setup
    }

    /// Size in bytes.
    pub fn size(&self) -> u64 {
        self.setup.size
    }

    /// Element stride, 0 for unstructured buffers.
    pub fn stride(&self) -> u32 {
        self.setup.stride
    }

    /// Capabilities.
    pub fn flags(&self) -> BufferViewFlags {
        self.setup.flags
    }

    /// `true` when the device that created the buffer is gone.
    pub fn is_orphaned(&self) -> bool {
        self.object.is_orphaned()
    }

    /// Resolves and checks a view request of the given kind.
    ///
    /// `size == ALL_BYTES` takes the rest of the buffer. `format` is only
    /// looked at for typed views ([`DeviceObjectViewType::Buffer`] and
    /// [`DeviceObjectViewType::BufferWritable`]).
    pub fn validate_view(
        &self,
        view_type: DeviceObjectViewType,
        offset: u64,
        size: u64,
        format: Option<ImageFormat>,
    ) -> Result<BufferViewSetup, ViewError> {
        let unsupported = |reason| Err(ViewError::UnsupportedUsage { view_type, reason });
        let flags = self.setup.flags;

        let needed = match view_type {
            DeviceObjectViewType::ConstantBuffer => BufferViewFlags::CONSTANT,
            DeviceObjectViewType::Buffer | DeviceObjectViewType::BufferStructured => {
                BufferViewFlags::SHADER_READABLE
            }
            DeviceObjectViewType::BufferWritable
            | DeviceObjectViewType::BufferStructuredWritable => BufferViewFlags::UAV_CAPABLE,
            _ => return unsupported("not a buffer view type"),
        };
        if !flags.contains(needed) {
            return unsupported("buffer lacks the usage required by the view");
        }

        let (offset, size) = range::resolve_byte_range(offset, size, self.setup.size)?;
        let mut setup = BufferViewSetup {
            offset,
            size,
            format: None,
            stride: 0,
        };

        match view_type {
            DeviceObjectViewType::ConstantBuffer => {
                range::check_alignment("constant view offset", offset, CONSTANT_BUFFER_ALIGNMENT)?;
                range::check_alignment("constant view size", size, CONSTANT_BUFFER_ALIGNMENT)?;
            }
            DeviceObjectViewType::Buffer | DeviceObjectViewType::BufferWritable => {
                let Some(format) = format.filter(|f| f.is_buffer_compatible()) else {
                    return unsupported("typed views need a buffer compatible format");
                };
                let texel = u64::from(format.bytes_per_pixel());
                range::check_alignment("typed view offset", offset, texel)?;
                range::check_alignment("typed view size", size, texel)?;
                setup.format = Some(format);
            }
            _ => {
                if self.setup.stride == 0 {
                    return unsupported("structured views need a buffer with a stride");
                }
                let stride = u64::from(self.setup.stride);
                range::check_alignment("structured view offset", offset, stride)?;
                range::check_alignment("structured view size", size, stride)?;
                setup.stride = self.setup.stride;
            }
        }
        Ok(setup)
    }

    /// Creates a constant (uniform) view of `size` bytes at `offset`.
    pub fn create_constant_view(
        self: &Arc<Self>,
        offset: u64,
        size: u64,
    ) -> Result<Arc<BufferView>, ViewError> {
        self.create(DeviceObjectViewType::ConstantBuffer, offset, size, None)
    }

    /// Creates a typed read-only view interpreting the bytes as `format`.
    pub fn create_view(
        self: &Arc<Self>,
        format: ImageFormat,
        offset: u64,
        size: u64,
    ) -> Result<Arc<BufferView>, ViewError> {
        self.create(DeviceObjectViewType::Buffer, offset, size, Some(format))
    }

    /// Creates a typed shader-writable view interpreting the bytes as `format`.
    pub fn create_writable_view(
        self: &Arc<Self>,
        format: ImageFormat,
        offset: u64,
        size: u64,
    ) -> Result<Arc<BufferView>, ViewError> {
        self.create(DeviceObjectViewType::BufferWritable, offset, size, Some(format))
    }

    /// Creates a read-only view over whole structured elements.
    pub fn create_structured_view(
        self: &Arc<Self>,
        offset: u64,
        size: u64,
    ) -> Result<Arc<BufferView>, ViewError> {
        self.create(DeviceObjectViewType::BufferStructured, offset, size, None)
    }

    /// Creates a shader-writable view over whole structured elements.
    pub fn create_writable_structured_view(
        self: &Arc<Self>,
        offset: u64,
        size: u64,
    ) -> Result<Arc<BufferView>, ViewError> {
        self.create(DeviceObjectViewType::BufferStructuredWritable, offset, size, None)
    }

    fn create(
        self: &Arc<Self>,
        view_type: DeviceObjectViewType,
        offset: u64,
        size: u64,
        format: Option<ImageFormat>,
    ) -> Result<Arc<BufferView>, ViewError> {
        let setup = self
            .validate_view(view_type, offset, size, format)
            .inspect_err(|err| {
                log::warn!("Rejected {view_type:?} view of buffer {:?}: {err}", self.id());
            })?;

        let stale = ViewError::StaleHandle(self.id());
        let backend = self.object.resolve_internal_object().ok_or(stale.clone())?;
        let buffer = backend.as_buffer().ok_or(stale)?;
        let view_id = buffer.create_view(view_type, &setup).ok_or_else(|| {
            log::warn!("Backend refused {view_type:?} view {setup:?} of buffer {:?}", self.id());
            ViewError::BackendRejected { view_type }
        })?;
        log::debug!("Created {view_type:?} view {view_id:?} of buffer {:?}", self.id());

        let view =
            DeviceObjectView::new(view_id, view_type, Arc::clone(self), self.object.handler());
        Ok(Arc::new(BufferView { view, setup }))
    }
}

/// A byte range of a buffer, bindable as the view type it was created as.
#[derive(Debug)]
pub struct BufferView {
    view: DeviceObjectView<BufferObject>,
    setup: BufferViewSetup,
}

impl BufferView {
    /// The buffer this view was created from. Guaranteed alive.
    pub fn buffer(&self) -> &Arc<BufferObject> {
        self.view.base()
    }

    /// The validated setup the view was built from.
    pub fn setup(&self) -> &BufferViewSetup {
        &self.setup
    }

    /// First byte of the view.
    pub fn offset(&self) -> u64 {
        self.setup.offset
    }

    /// Size of the view in bytes.
    pub fn size(&self) -> u64 {
        self.setup.size
    }
}

impl Deref for BufferView {
    type Target = DeviceObjectView<BufferObject>;

    fn deref(&self) -> &Self::Target {
        &self.view
    }
}
