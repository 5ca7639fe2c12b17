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

//! The `Null` backend: a complete device that allocates nothing on a GPU.
//!
//! Every resource and view is a real entry in the device's object registry,
//! so frontend lifetime rules, view validation and job scheduling behave
//! exactly as they do on a native backend.

mod device;
mod objects;

pub use self::device::{NullDevice, NullDeviceConfig, NullDeviceStats};
pub use self::objects::{NullBuffer, NullBufferView, NullImage, NullImageView, NullSampler};
