//! Inclusive port ranges.
//!
//! Port numbers are plain `u16` values; every value, including 0, is a
//! legal connect target. `PortRange` only guarantees `start <= end`.

use std::fmt;

/// An inclusive range of ports with `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PortRange {
    start: u16,
    end: u16,
}

impl PortRange {
    /// Build a range from two bounds given in either order.
    ///
    /// Returns the range and whether the bounds had to be swapped.
    pub const fn ordered(a: u16, b: u16) -> (Self, bool) {
        if a > b {
            (Self { start: b, end: a }, true)
        } else {
            (Self { start: a, end: b }, false)
        }
    }

    #[inline]
    pub const fn start(&self) -> u16 {
        self.start
    }

    #[inline]
    pub const fn end(&self) -> u16 {
        self.end
    }

    /// Number of ports in the range, counting both ends.
    pub(crate) const fn len(&self) -> usize {
        (self.end - self.start) as usize + 1
    }

    /// Check whether the range covers exactly one port.
    pub const fn is_single(&self) -> bool {
        self.start == self.end
    }

    /// Iterate over all ports in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = u16> {
        self.start..=self.end
    }
}

impl fmt::Display for PortRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_single() {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}
