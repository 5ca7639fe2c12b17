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

//! # Lumen Core
//!
//! Backend-agnostic runtime layer of the renderer: frontend proxies for
//! backend-owned GPU objects and their views, the view range validator,
//! and the background job queue used for GPU-adjacent work.
//!
//! Concrete backends live in `lumen-infra` and implement the contracts
//! defined in [`object`] and [`renderer::traits`].

#![warn(missing_docs)]

pub mod jobs;
pub mod object;
pub mod renderer;
pub mod utils;

pub use jobs::{BackgroundJob, BackgroundJobQueue, BackgroundJobQueueType, JobHandle};
pub use object::{
    DeviceObject, DeviceObjectHandler, DeviceObjectView, DeviceObjectViewType, ObjectId,
};
