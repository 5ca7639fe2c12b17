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

use super::ObjectId;
use crate::renderer::traits::{BufferBackend, ImageBackend};
use std::any::Any;
use std::fmt::Debug;
use std::sync::Arc;

/// A backend-owned object reachable through an [`ObjectId`].
///
/// The `as_*` accessors are the checked downcast used by the frontend: a
/// backend image answers [`BackendObject::as_image`], everything else
/// answers `None`, and the frontend treats a mismatch like a stale handle.
pub trait BackendObject: Any + Send + Sync + Debug {
    /// Short human readable name used in logs.
    fn debug_label(&self) -> &str;

    /// Upcast used to hand out typed `Arc`s.
    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;

    /// The image capability of this object, if it is an image.
    fn as_image(&self) -> Option<&dyn ImageBackend> {
        None
    }

    /// The buffer capability of this object, if it is a buffer.
    fn as_buffer(&self) -> Option<&dyn BufferBackend> {
        None
    }
}

/// Resolves and releases backend objects on behalf of frontend proxies.
///
/// Implemented by the device/thread of a backend. Both methods may be called
/// concurrently from any thread, including a release racing a resolve of the
/// same id: the resolve must then observe `None`, never a half-destroyed
/// object.
pub trait DeviceObjectHandler: Send + Sync {
    /// Returns the live object named by `id`, or `None` if it was released.
    fn resolve_internal_object(&self, id: ObjectId) -> Option<Arc<dyn BackendObject>>;

    /// Releases the object named by `id`. Releasing an unknown id is a no-op.
    fn release_object(&self, id: ObjectId);
}
