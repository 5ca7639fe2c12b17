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

//! Frontend proxies with automatic release.

use super::{BackendObject, DeviceObjectHandler, DeviceObjectViewType, ObjectId};
use std::fmt;
use std::sync::{Arc, Weak};

/// A frontend handle to a backend-owned object.
///
/// The proxy never owns the backend object. It holds the object's id and a
/// weak relation to the handler that does; dropping the proxy asks the
/// handler to release the id if the handler still exists and does nothing
/// otherwise, so proxies may freely outlive the device.
///
/// Lifecycle: live while the handler can be upgraded, orphaned once it
/// cannot (resolves return `None`, nothing is reported), destroyed on drop.
pub struct DeviceObject {
    id: ObjectId,
    handler: Weak<dyn DeviceObjectHandler>,
}

impl DeviceObject {
    /// Wraps an already-existing backend object. Makes no backend call.
    pub fn new(id: ObjectId, handler: Weak<dyn DeviceObjectHandler>) -> Self {
        Self { id, handler }
    }

    /// The id of the wrapped backend object.
    pub fn id(&self) -> ObjectId {
        self.id
    }

    /// `true` once the handler is gone. The transition is silent.
    pub fn is_orphaned(&self) -> bool {
        self.handler.strong_count() == 0
    }

    /// Another weak relation to the same handler, for objects derived from this one.
    pub fn handler(&self) -> Weak<dyn DeviceObjectHandler> {
        self.handler.clone()
    }

    /// Resolves the live backend object.
    ///
    /// Must be called on every use and never cached across frames: the
    /// backend may destroy the object between two calls (device lost or
    /// reset). Returns `None` once the handler or the object is gone.
    pub fn resolve_internal_object(&self) -> Option<Arc<dyn BackendObject>> {
        self.handler.upgrade()?.resolve_internal_object(self.id)
    }

    /// Resolves the live backend object as the concrete backend type `T`.
    pub fn resolve_as<T: BackendObject>(&self) -> Option<Arc<T>> {
        self.resolve_internal_object()?
            .into_any()
            .downcast::<T>()
            .ok()
    }

    /// Runs `f` against the live backend object, if any.
    pub fn with_internal_object<R>(&self, f: impl FnOnce(&dyn BackendObject) -> R) -> Option<R> {
        let object = self.resolve_internal_object()?;
        Some(f(object.as_ref()))
    }
}

impl Drop for DeviceObject {
    fn drop(&mut self) {
        match self.handler.upgrade() {
            Some(handler) => handler.release_object(self.id),
            None => log::trace!("Dropping orphaned device object {:?}", self.id),
        }
    }
}

impl fmt::Debug for DeviceObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceObject")
            .field("id", &self.id)
            .field("orphaned", &self.is_orphaned())
            .finish()
    }
}

/// A frontend resource that views can be carved out of.
pub trait DeviceResource: Send + Sync + fmt::Debug {
    /// The device object backing this resource.
    fn device_object(&self) -> &DeviceObject;

    /// Shorthand for `device_object().id()`.
    fn id(&self) -> ObjectId {
        self.device_object().id()
    }
}

/// A device object that views a sub-range of a base resource.
///
/// Holds a strong reference to the base, so the base cannot be released
/// while any view over it is alive. The view's own id is released before
/// the base reference is dropped.
pub struct DeviceObjectView<B: DeviceResource> {
    // Field order matters: the view releases its id before the base.
    object: DeviceObject,
    view_type: DeviceObjectViewType,
    base: Arc<B>,
}

impl<B: DeviceResource> DeviceObjectView<B> {
    /// Wraps an already-created backend view over `base`.
    ///
    /// The base is not re-validated here; view factories resolve and
    /// validate before calling this.
    pub fn new(
        view_id: ObjectId,
        view_type: DeviceObjectViewType,
        base: Arc<B>,
        handler: Weak<dyn DeviceObjectHandler>,
    ) -> Self {
        Self {
            object: DeviceObject::new(view_id, handler),
            view_type,
            base,
        }
    }

    /// The id of the view itself.
    pub fn id(&self) -> ObjectId {
        self.object.id()
    }

    /// What kind of view this is.
    pub fn view_type(&self) -> DeviceObjectViewType {
        self.view_type
    }

    /// The resource this view was created from. Guaranteed alive.
    pub fn base(&self) -> &Arc<B> {
        &self.base
    }

    /// The device object of the view.
    pub fn device_object(&self) -> &DeviceObject {
        &self.object
    }

    /// Resolves the live backend view object. See [`DeviceObject::resolve_internal_object`].
    pub fn resolve_internal_object(&self) -> Option<Arc<dyn BackendObject>> {
        self.object.resolve_internal_object()
    }
}

impl<B: DeviceResource> fmt::Debug for DeviceObjectView<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceObjectView")
            .field("id", &self.object.id())
            .field("view_type", &self.view_type)
            .field("base", &self.base.id())
            .finish()
    }
}
