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

//! Defines the error types of resource and view creation.

use crate::object::{DeviceObjectViewType, ObjectId};
use crate::renderer::range::RangeAxis;
use std::fmt;

/// An error raised while creating a base resource (image, buffer, sampler).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceError {
    /// The creation request is inconsistent or unsupported.
    InvalidDescriptor(String),
}

impl fmt::Display for ResourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceError::InvalidDescriptor(msg) => {
                write!(f, "Invalid resource description: {msg}")
            }
        }
    }
}

impl std::error::Error for ResourceError {}

/// Why a view could not be created.
///
/// Whatever the variant, no view object was created and no id was allocated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewError {
    /// `first + count` exceeds the capacity of the base resource on `axis`.
    OutOfRange {
        /// The axis the request overflowed.
        axis: RangeAxis,
        /// First requested element.
        first: u64,
        /// Number of requested elements after defaulting.
        count: u64,
        /// Number of elements the base resource has.
        capacity: u64,
    },
    /// The request resolved to zero elements on `axis`.
    EmptyRange {
        /// The axis with no elements.
        axis: RangeAxis,
    },
    /// The base resource was not created with the usage this view needs.
    UnsupportedUsage {
        /// The requested kind of view.
        view_type: DeviceObjectViewType,
        /// What is missing.
        reason: &'static str,
    },
    /// An offset or size does not respect the alignment the view kind needs.
    Misaligned {
        /// Which value is misaligned.
        what: &'static str,
        /// The offending value.
        value: u64,
        /// The required alignment.
        alignment: u64,
    },
    /// The base resource could not be resolved (device gone or object released).
    StaleHandle(ObjectId),
    /// The backend refused to create the view.
    BackendRejected {
        /// The requested kind of view.
        view_type: DeviceObjectViewType,
    },
}

impl fmt::Display for ViewError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewError::OutOfRange {
                axis,
                first,
                count,
                capacity,
            } => write!(
                f,
                "View range out of bounds on {axis}: {first} + {count} > {capacity}"
            ),
            ViewError::EmptyRange { axis } => write!(f, "View range on {axis} is empty"),
            ViewError::UnsupportedUsage { view_type, reason } => {
                write!(f, "Cannot create {view_type:?} view: {reason}")
            }
            ViewError::Misaligned {
                what,
                value,
                alignment,
            } => write!(f, "View {what} {value} is not aligned to {alignment}"),
            ViewError::StaleHandle(id) => {
                write!(f, "Base object {id:?} is no longer resolvable")
            }
            ViewError::BackendRejected { view_type } => {
                write!(f, "Backend failed to create {view_type:?} view")
            }
        }
    }
}

impl std::error::Error for ViewError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_display() {
        let err = ViewError::OutOfRange {
            axis: RangeAxis::Mip,
            first: 3,
            count: 2,
            capacity: 4,
        };
        assert_eq!(
            format!("{err}"),
            "View range out of bounds on mips: 3 + 2 > 4"
        );
    }

    #[test]
    fn usage_display() {
        let err = ViewError::UnsupportedUsage {
            view_type: DeviceObjectViewType::ImageWritable,
            reason: "image is not UAV capable",
        };
        assert_eq!(
            format!("{err}"),
            "Cannot create ImageWritable view: image is not UAV capable"
        );
    }

    #[test]
    fn resource_error_display() {
        let err = ResourceError::InvalidDescriptor("zero width".to_string());
        assert_eq!(format!("{err}"), "Invalid resource description: zero width");
    }
}
