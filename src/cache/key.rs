//! Range Key Module
//!
//! Identifies a cached aggregate by the inclusive index range it covers.

use std::fmt;

// == Range Key ==
/// Inclusive `[left, right]` index range into an externally owned sequence.
///
/// The cache never checks the range against the sequence; callers keep
/// `left <= right` and both indices in bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RangeKey {
    pub left: usize,
    pub right: usize,
}

impl RangeKey {
    /// Creates a key for `[left, right]`.
    pub const fn new(left: usize, right: usize) -> Self {
        Self { left, right }
    }

    // == Covers ==
    /// Returns true if `index` lies inside the range, bounds included.
    pub fn covers(&self, index: usize) -> bool {
        self.left <= index && index <= self.right
    }

    /// Returns true if `left <= right`.
    pub fn is_well_formed(&self) -> bool {
        self.left <= self.right
    }
}

impl From<(usize, usize)> for RangeKey {
    fn from((left, right): (usize, usize)) -> Self {
        Self::new(left, right)
    }
}

impl fmt::Display for RangeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.left, self.right)
    }
}
