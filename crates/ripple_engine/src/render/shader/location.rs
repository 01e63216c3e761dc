//! Driver-assigned variable locations

use std::fmt;

/// Location of an attribute or uniform inside a linked program
///
/// Wraps the raw GL integer. [`Location::NOT_FOUND`] (-1) is the sentinel
/// for names that are unknown, inactive or reserved; GL ignores uniform
/// uploads addressed to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Location(i32);

impl Location {
    /// The "not found" sentinel
    pub const NOT_FOUND: Self = Self(-1);

    /// Wrap a raw GL location
    pub fn new(raw: i32) -> Self {
        if raw < 0 {
            Self::NOT_FOUND
        } else {
            Self(raw)
        }
    }

    /// Raw GL integer value
    pub fn raw(self) -> i32 {
        self.0
    }

    /// Whether this is a real location
    pub fn is_found(self) -> bool {
        self.0 >= 0
    }

    /// The location as an unsigned index, if found
    pub fn index(self) -> Option<u32> {
        u32::try_from(self.0).ok()
    }
}

impl Default for Location {
    fn default() -> Self {
        Self::NOT_FOUND
    }
}

impl From<Option<u32>> for Location {
    fn from(index: Option<u32>) -> Self {
        index
            .and_then(|i| i32::try_from(i).ok())
            .map_or(Self::NOT_FOUND, Self)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
