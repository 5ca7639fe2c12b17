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

//! Sampler state objects.

use crate::object::{DeviceObject, DeviceObjectViewType, DeviceResource, ObjectId};

/// Frontend proxy of backend sampler state.
///
/// Samplers have no views; the object itself is bound, tagged as
/// [`DeviceObjectViewType::Sampler`].
#[derive(Debug)]
pub struct SamplerObject {
    object: DeviceObject,
    label: Option<String>,
}

impl SamplerObject {
    /// Wraps a sampler the backend has already created.
    pub fn new(object: DeviceObject, label: Option<String>) -> Self {
        Self { object, label }
    }

    /// The id of the backend sampler.
    pub fn id(&self) -> ObjectId {
        self.object.id()
    }

    /// Debug label given at creation.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// How the sampler is bound.
    pub fn binding_type(&self) -> DeviceObjectViewType {
        DeviceObjectViewType::Sampler
    }
}

impl DeviceResource for SamplerObject {
    fn device_object(&self) -> &DeviceObject {
        &self.object
    }
}
