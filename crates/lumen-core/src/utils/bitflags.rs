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

//! Declarative flag sets used by resource descriptions.

/// Declares a `Copy` flag-set type with named constants and set operators.
///
/// Bits outside the declared constants are dropped by `from_bits_truncate`,
/// so a flag set built from raw data never carries meaning the crate does
/// not know about.
#[macro_export]
#[doc(hidden)]
macro_rules! lumen_bitflags {
    (
        $(#[$attr:meta])*
        $vis:vis struct $name:ident: $ty:ty {
            $(
                $(#[$flag_attr:meta])*
                const $flag_name:ident = $flag_value:expr;
            )*
        }
    ) => {
        $(#[$attr])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
        $vis struct $name {
            bits: $ty,
        }

        impl $name {
            $(
                $(#[$flag_attr])*
                pub const $flag_name: Self = Self { bits: $flag_value };
            )*

            /// A set with no flags.
            pub const EMPTY: Self = Self { bits: 0 };

            const NAMED: &'static [(&'static str, $ty)] = &[
                $((stringify!($flag_name), $flag_value),)*
            ];

            /// Every declared flag.
            pub const fn all() -> Self {
                Self { bits: 0 $(| $flag_value)* }
            }

            /// Builds a set from raw bits, discarding undeclared bits.
            pub const fn from_bits_truncate(bits: $ty) -> Self {
                Self { bits: bits & Self::all().bits }
            }

            /// The raw bit pattern.
            pub const fn bits(&self) -> $ty {
                self.bits
            }

            /// `true` when no flag is set.
            pub const fn is_empty(&self) -> bool {
                self.bits == 0
            }

            /// `true` when every flag of `other` is set in `self`.
            pub const fn contains(&self, other: Self) -> bool {
                (self.bits & other.bits) == other.bits
            }

            /// `true` when at least one flag of `other` is set in `self`.
            pub const fn intersects(&self, other: Self) -> bool {
                (self.bits & other.bits) != 0
            }

            /// Sets the flags of `other`.
            pub fn insert(&mut self, other: Self) {
                self.bits |= other.bits;
            }

            /// Clears the flags of `other`.
            pub fn remove(&mut self, other: Self) {
                self.bits &= !other.bits;
            }

            /// Sets or clears the flags of `other` depending on `value`.
            pub fn set(&mut self, other: Self, value: bool) {
                if value {
                    self.insert(other);
                } else {
                    self.remove(other);
                }
            }

            /// Returns a copy with the flags of `other` set.
            #[must_use]
            pub const fn with(self, other: Self) -> Self {
                Self { bits: self.bits | other.bits }
            }
        }

        impl core::ops::BitOr for $name {
            type Output = Self;
            fn bitor(self, other: Self) -> Self {
                Self { bits: self.bits | other.bits }
            }
        }

        impl core::ops::BitOrAssign for $name {
            fn bitor_assign(&mut self, other: Self) {
                self.bits |= other.bits;
            }
        }

        impl core::ops::BitAnd for $name {
            type Output = Self;
            fn bitand(self, other: Self) -> Self {
                Self { bits: self.bits & other.bits }
            }
        }

        impl core::ops::Sub for $name {
            type Output = Self;
            fn sub(self, other: Self) -> Self {
                Self { bits: self.bits & !other.bits }
            }
        }

        impl core::fmt::Debug for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                if self.bits == 0 {
                    return write!(f, "{}(EMPTY)", stringify!($name));
                }
                write!(f, "{}(", stringify!($name))?;
                let mut first = true;
                for (name, value) in Self::NAMED {
                    if *value != 0 && (self.bits & *value) == *value {
                        if !first {
                            f.write_str(" | ")?;
                        }
                        f.write_str(name)?;
                        first = false;
                    }
                }
                f.write_str(")")
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::lumen_bitflags;

    lumen_bitflags! {
        /// Flags used only by these tests.
        pub struct Access: u8 {
            const READ = 1 << 0;
            const WRITE = 1 << 1;
            const MAP = 1 << 2;
        }
    }

    #[test]
    fn truncation_drops_unknown_bits() {
        let flags = Access::from_bits_truncate(0b1111_0011);
        assert_eq!(flags, Access::READ | Access::WRITE);
        assert_eq!(Access::all().bits(), 0b111);
    }

    #[test]
    fn set_operations() {
        let mut flags = Access::READ;
        flags.set(Access::MAP, true);
        assert!(flags.contains(Access::READ | Access::MAP));
        assert!(!flags.contains(Access::WRITE));
        assert!(flags.intersects(Access::WRITE | Access::MAP));

        flags.set(Access::READ, false);
        assert_eq!(flags, Access::MAP);
        assert_eq!((Access::all() - Access::MAP), Access::READ | Access::WRITE);
        assert!(Access::EMPTY.is_empty());
    }

    #[test]
    fn debug_lists_flag_names() {
        assert_eq!(format!("{:?}", Access::EMPTY), "Access(EMPTY)");
        assert_eq!(
            format!("{:?}", Access::READ | Access::MAP),
            "Access(READ | MAP)"
        );
    }
}
