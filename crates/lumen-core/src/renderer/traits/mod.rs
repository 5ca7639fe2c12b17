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

//! Defines the contracts between the frontend and a concrete backend.
//!
//! - [`GraphicsDevice`]: creates base resources and owns the background queue.
//! - [`ImageBackend`] / [`BufferBackend`]: the view-building capabilities of
//!   backend resources, reached through
//!   [`BackendObject`](crate::object::BackendObject).

mod backend;
mod graphics_device;

pub use self::backend::{BufferBackend, ImageBackend};
pub use self::graphics_device::{GraphicsBackendType, GraphicsDevice};
