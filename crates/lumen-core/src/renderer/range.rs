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

//! Resolution and bounds checking of view sub-ranges.
//!
//! A request names a first element and a count on an axis (mips, slices or
//! bytes). A count equal to the [`ALL`] sentinel means "everything from
//! `first` to the end". Once defaulted, a range is accepted only when it is
//! non-empty and `first + count <= capacity`.

use crate::renderer::error::ViewError;
use std::fmt;

/// Sentinel count meaning "the rest of the mips/slices starting at `first`".
pub const ALL: u32 = u32::MAX;

/// Sentinel size meaning "the rest of the buffer starting at `offset`".
pub const ALL_BYTES: u64 = u64::MAX;

/// The axis a range is measured on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RangeAxis {
    /// Mip levels of an image.
    Mip,
    /// Array slices of an image.
    Slice,
    /// Bytes of a buffer.
    Bytes,
}

impl fmt::Display for RangeAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RangeAxis::Mip => "mips",
            RangeAxis::Slice => "slices",
            RangeAxis::Bytes => "bytes",
        })
    }
}

/// A resolved, bounds-checked `[first, first + count)` range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubresourceRange {
    /// First element.
    pub first: u32,
    /// Number of elements, never zero.
    pub count: u32,
}

impl SubresourceRange {
    /// One past the last element.
    pub const fn end(&self) -> u32 {
        self.first + self.count
    }
}

/// Defaults and validates a mip or slice range against `capacity`.
pub fn resolve_range(
    axis: RangeAxis,
    first: u32,
    count: u32,
    capacity: u32,
) -> Result<SubresourceRange, ViewError> {
    let count = if count == ALL {
        capacity.saturating_sub(first)
    } else {
        count
    };
    if count == 0 {
        return Err(ViewError::EmptyRange { axis });
    }
    match first.checked_add(count) {
        Some(end) if end <= capacity => Ok(SubresourceRange { first, count }),
        _ => Err(ViewError::OutOfRange {
            axis,
            first: first.into(),
            count: count.into(),
            capacity: capacity.into(),
        }),
    }
}

/// Validates a single mip or slice index against `capacity`.
pub fn resolve_index(axis: RangeAxis, index: u32, capacity: u32) -> Result<u32, ViewError> {
    resolve_range(axis, index, 1, capacity).map(|range| range.first)
}

/// Defaults and validates a byte range; returns `(offset, size)`.
pub fn resolve_byte_range(offset: u64, size: u64, capacity: u64) -> Result<(u64, u64), ViewError> {
    let size = if size == ALL_BYTES {
        capacity.saturating_sub(offset)
    } else {
        size
    };
    if size == 0 {
        return Err(ViewError::EmptyRange {
            axis: RangeAxis::Bytes,
        });
    }
    match offset.checked_add(size) {
        Some(end) if end <= capacity => Ok((offset, size)),
        _ => Err(ViewError::OutOfRange {
            axis: RangeAxis::Bytes,
            first: offset,
            count: size,
            capacity,
        }),
    }
}

/// Fails with [`ViewError::Misaligned`] unless `value` is a multiple of `alignment`.
pub fn check_alignment(what: &'static str, value: u64, alignment: u64) -> Result<(), ViewError> {
    if alignment == 0 || value % alignment == 0 {
        Ok(())
    } else {
        Err(ViewError::Misaligned {
            what,
            value,
            alignment,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_ended_count_takes_the_rest() {
        let range = resolve_range(RangeAxis::Mip, 2, ALL, 4).unwrap();
        assert_eq!(range, SubresourceRange { first: 2, count: 2 });
        assert_eq!(range.end(), 4);
    }

    #[test]
    fn overflowing_range_is_rejected() {
        assert_eq!(
            resolve_range(RangeAxis::Mip, 3, 2, 4),
            Err(ViewError::OutOfRange {
                axis: RangeAxis::Mip,
                first: 3,
                count: 2,
                capacity: 4,
            })
        );
        assert!(resolve_range(RangeAxis::Slice, u32::MAX - 1, 5, 4).is_err());
    }

    #[test]
    fn first_past_the_end_is_empty() {
        assert_eq!(
            resolve_range(RangeAxis::Slice, 4, ALL, 4),
            Err(ViewError::EmptyRange {
                axis: RangeAxis::Slice
            })
        );
        assert!(resolve_range(RangeAxis::Slice, 0, 0, 4).is_err());
    }

    #[test]
    fn exact_fit_is_accepted() {
        assert!(resolve_range(RangeAxis::Slice, 0, 6, 6).is_ok());
        assert_eq!(resolve_index(RangeAxis::Mip, 3, 4), Ok(3));
        assert!(resolve_index(RangeAxis::Mip, 4, 4).is_err());
    }

    #[test]
    fn byte_ranges() {
        assert_eq!(resolve_byte_range(64, ALL_BYTES, 256), Ok((64, 192)));
        assert_eq!(resolve_byte_range(0, 256, 256), Ok((0, 256)));
        assert!(resolve_byte_range(200, 100, 256).is_err());
        assert!(resolve_byte_range(256, ALL_BYTES, 256).is_err());
        assert!(resolve_byte_range(u64::MAX, 2, 256).is_err());
    }

    #[test]
    fn alignment() {
        assert!(check_alignment("offset", 32, 16).is_ok());
        assert_eq!(
            check_alignment("size", 20, 16),
            Err(ViewError::Misaligned {
                what: "size",
                value: 20,
                alignment: 16
            })
        );
    }
}
