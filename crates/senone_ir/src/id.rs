//! Compact identifiers for phones, acoustic-model units and tied states.
//!
//! All ids are `u32` newtypes: 4 bytes, O(1) compare, and usable directly as
//! indices into the contiguous tables that own the data.

use std::fmt;

/// Index of a context-independent phone.
///
/// CI phones are the base-phone space: every CD unit names one as its base,
/// and phone-membership questions are sets of them.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct PhoneId(u32);

impl PhoneId {
    #[inline]
    pub const fn new(index: u32) -> Self {
        PhoneId(index)
    }

    /// Get the index into the CI phone table.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for PhoneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PhoneId({})", self.0)
    }
}

/// Index of an acoustic-model unit (CI phone or CD unit).
///
/// CI units share their index with [`PhoneId`]; CD units follow them.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct AcmodId(u32);

impl AcmodId {
    #[inline]
    pub const fn new(index: u32) -> Self {
        AcmodId(index)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl From<PhoneId> for AcmodId {
    #[inline]
    fn from(phone: PhoneId) -> Self {
        AcmodId(phone.0)
    }
}

impl fmt::Debug for AcmodId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AcmodId({})", self.0)
    }
}

/// Identifier of a tied state (CI tied state or senone).
///
/// [`TiedStateId::NO_ID`] marks a non-emitting state in a model definition and
/// an unlabeled leaf in a decision tree.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct TiedStateId(u32);

impl TiedStateId {
    /// Sentinel for "no tied state".
    pub const NO_ID: TiedStateId = TiedStateId(u32::MAX);

    #[inline]
    pub const fn new(raw: u32) -> Self {
        TiedStateId(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Check whether this refers to an actual tied state.
    #[inline]
    pub const fn is_valid(self) -> bool {
        self.0 != u32::MAX
    }
}

impl fmt::Debug for TiedStateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "TiedStateId({})", self.0)
        } else {
            write!(f, "TiedStateId::NO_ID")
        }
    }
}

impl fmt::Display for TiedStateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "{}", self.0)
        } else {
            write!(f, "N")
        }
    }
}

impl Default for TiedStateId {
    fn default() -> Self {
        Self::NO_ID
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tied_state_sentinel() {
        assert!(!TiedStateId::NO_ID.is_valid());
        assert!(!TiedStateId::default().is_valid());
        assert!(TiedStateId::new(0).is_valid());
    }

    #[test]
    fn test_tied_state_display() {
        assert_eq!(TiedStateId::new(42).to_string(), "42");
        assert_eq!(TiedStateId::NO_ID.to_string(), "N");
        assert_eq!(format!("{:?}", TiedStateId::NO_ID), "TiedStateId::NO_ID");
    }

    #[test]
    fn test_ci_phone_is_acmod() {
        let phone = PhoneId::new(7);
        assert_eq!(AcmodId::from(phone).index(), 7);
    }

    #[test]
    fn test_memory_size() {
        assert_eq!(std::mem::size_of::<PhoneId>(), 4);
        assert_eq!(std::mem::size_of::<AcmodId>(), 4);
        assert_eq!(std::mem::size_of::<TiedStateId>(), 4);
    }
}
