//! Action attribute flags and the fixed-width [`AttributeSet`].
//!
//! Attributes are assigned to an action at registration and never
//! mutated afterward. Downstream actions query them to pick a runtime
//! branch (for example, whether an upstream action requested a
//! half-step advance).
//!
//! Applications declare their flags as an enum implementing
//! [`AttributeFlag`]:
//!
//! ```
//! use cadence_core::{AttributeFlag, AttributeSet};
//!
//! #[derive(Clone, Copy)]
//! enum Advance {
//!     Half,
//!     Whole,
//! }
//!
//! impl AttributeFlag for Advance {
//!     fn bit(self) -> u8 {
//!         self as u8
//!     }
//! }
//!
//! let attrs = AttributeSet::empty().with(Advance::Half).unwrap();
//! assert!(attrs.contains(Advance::Half));
//! assert!(!attrs.contains(Advance::Whole));
//! ```

use std::fmt;

use crate::error::AttributeError;

/// Number of attribute bits available per action.
pub const MAX_ATTRIBUTES: u8 = 64;

/// A named boolean flag that can be attached to an action.
pub trait AttributeFlag: Copy {
    /// Bit index of this flag, in `0..MAX_ATTRIBUTES`.
    fn bit(self) -> u8;

    /// Human-readable label for diagnostics. Defaults to empty.
    fn label(self) -> &'static str {
        ""
    }
}

/// An untyped attribute identified only by its bit index.
///
/// Useful when flags come from configuration rather than an enum.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Attribute(pub u8);

impl Attribute {
    /// Convert a single-bit mask (e.g. `0b0100`) into an attribute.
    ///
    /// Returns `None` unless exactly one bit is set.
    pub fn from_mask(mask: u64) -> Option<Self> {
        if mask.count_ones() == 1 {
            Some(Self(mask.trailing_zeros() as u8))
        } else {
            None
        }
    }
}

impl AttributeFlag for Attribute {
    fn bit(self) -> u8 {
        self.0
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "bit{}", self.0)
    }
}

/// A fixed-width set of attribute flags.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct AttributeSet {
    bits: u64,
}

impl AttributeSet {
    /// The set with no flags.
    pub const fn empty() -> Self {
        Self { bits: 0 }
    }

    /// Build a set from a raw bitmask.
    pub const fn from_bits(bits: u64) -> Self {
        Self { bits }
    }

    /// Build a set from a list of flags.
    pub fn from_flags<F: AttributeFlag>(
        flags: impl IntoIterator<Item = F>,
    ) -> Result<Self, AttributeError> {
        let mut set = Self::empty();
        for flag in flags {
            set.insert(flag)?;
        }
        Ok(set)
    }

    /// The raw bitmask.
    pub const fn bits(&self) -> u64 {
        self.bits
    }

    /// Set a flag.
    pub fn insert<F: AttributeFlag>(&mut self, flag: F) -> Result<(), AttributeError> {
        let bit = flag.bit();
        if bit >= MAX_ATTRIBUTES {
            return Err(AttributeError::OutOfRange { bit });
        }
        self.bits |= 1u64 << bit;
        Ok(())
    }

    /// Return a copy of this set with `flag` added.
    pub fn with<F: AttributeFlag>(mut self, flag: F) -> Result<Self, AttributeError> {
        self.insert(flag)?;
        Ok(self)
    }

    /// Whether `flag` is set. Out-of-range flags are never set.
    pub fn contains<F: AttributeFlag>(&self, flag: F) -> bool {
        let bit = flag.bit();
        bit < MAX_ATTRIBUTES && self.bits & (1u64 << bit) != 0
    }

    /// Returns `true` if no flag is set.
    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    /// Number of flags set.
    pub fn len(&self) -> usize {
        self.bits.count_ones() as usize
    }

    /// Iterate the set bit indices in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = Attribute> + '_ {
        let bits = self.bits;
        (0..MAX_ATTRIBUTES)
            .filter(move |&b| bits & (1u64 << b) != 0)
            .map(Attribute)
    }
}

impl fmt::Debug for AttributeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AttributeSet({:#b})", self.bits)
    }
}

impl From<u64> for AttributeSet {
    fn from(bits: u64) -> Self {
        Self::from_bits(bits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy)]
    enum Pic {
        TimeAdvanceHalf,
        TimeAdvanceWhole,
        UpdatedEosAtFaces,
    }

    impl AttributeFlag for Pic {
        fn bit(self) -> u8 {
            self as u8
        }
        fn label(self) -> &'static str {
            match self {
                Self::TimeAdvanceHalf => "time_advance_half",
                Self::TimeAdvanceWhole => "time_advance_whole",
                Self::UpdatedEosAtFaces => "updated_eos_at_faces",
            }
        }
    }

    #[derive(Clone, Copy)]
    struct Wide;
    impl AttributeFlag for Wide {
        fn bit(self) -> u8 {
            64
        }
    }

    #[test]
    fn raw_mask_query() {
        let set = AttributeSet::from_bits(0b0010);
        assert!(set.contains(Attribute::from_mask(0b0010).unwrap()));
        assert!(!set.contains(Attribute::from_mask(0b0100).unwrap()));
    }

    #[test]
    fn from_mask_requires_single_bit() {
        assert_eq!(Attribute::from_mask(0b1000), Some(Attribute(3)));
        assert_eq!(Attribute::from_mask(0), None);
        assert_eq!(Attribute::from_mask(0b0110), None);
    }

    #[test]
    fn enum_flags_roundtrip_through_bits() {
        let set = AttributeSet::from_flags([Pic::TimeAdvanceHalf, Pic::UpdatedEosAtFaces]).unwrap();
        assert_eq!(set.bits(), 0b101);
        assert!(set.contains(Pic::TimeAdvanceHalf));
        assert!(!set.contains(Pic::TimeAdvanceWhole));
        assert_eq!(set.len(), 2);
        assert_eq!(Pic::UpdatedEosAtFaces.label(), "updated_eos_at_faces");
    }

    #[test]
    fn out_of_range_flag_rejected() {
        let err = AttributeSet::empty().with(Wide).unwrap_err();
        assert_eq!(err, AttributeError::OutOfRange { bit: 64 });
        assert!(!AttributeSet::from_bits(u64::MAX).contains(Wide));
    }

    #[test]
    fn highest_bit_accepted() {
        let set = AttributeSet::empty().with(Attribute(63)).unwrap();
        assert_eq!(set.bits(), 1u64 << 63);
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![Attribute(63)]);
    }

    #[test]
    fn empty_set() {
        let set = AttributeSet::default();
        assert!(set.is_empty());
        assert_eq!(set.len(), 0);
        assert_eq!(set.iter().count(), 0);
        assert_eq!(format!("{set:?}"), "AttributeSet(0b0)");
    }

    #[test]
    fn iter_is_ascending() {
        let set = AttributeSet::from_bits(0b1001_0010);
        let bits: Vec<u8> = set.iter().map(|a| a.0).collect();
        assert_eq!(bits, vec![1, 4, 7]);
    }

    mod proptests {
        use crate::attribute::{Attribute, AttributeSet, MAX_ATTRIBUTES};
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn insert_then_contains(bits in any::<u64>(), bit in 0u8..MAX_ATTRIBUTES) {
                let set = AttributeSet::from_bits(bits).with(Attribute(bit)).unwrap();
                prop_assert!(set.contains(Attribute(bit)));
                prop_assert_eq!(set.bits(), bits | (1u64 << bit));
            }

            #[test]
            fn iter_matches_popcount(bits in any::<u64>()) {
                let set = AttributeSet::from_bits(bits);
                prop_assert_eq!(set.iter().count(), set.len());
                prop_assert!(set.iter().all(|a| set.contains(a)));
            }
        }
    }
}
