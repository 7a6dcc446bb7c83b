use core::fmt;

/// Errors reported by the trees and the collections built on them.
///
/// A key that is simply absent is not an error: lookups report it through `Option`, `bool` or an
/// end [`Cursor`](crate::Cursor).
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Error {
    /// An insertion was attempted while the collection already held
    /// [`max_size`](crate::AvlTree::max_size) values. The collection is left unmodified.
    CapacityExceeded {
        /// The ceiling that was hit.
        max_size: usize,
    },
    /// The first or last value of an empty collection was requested.
    Empty,
    /// A keyed access (such as [`AvlMap::at`](crate::AvlMap::at)) named a key that is not present.
    KeyNotFound,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::CapacityExceeded { max_size } => write!(f, "container is full ({max_size} values)"),
            Error::Empty => f.write_str("container is empty"),
            Error::KeyNotFound => f.write_str("key not found"),
        }
    }
}

impl core::error::Error for Error {}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn display_names_the_condition() {
        assert_eq!(Error::CapacityExceeded { max_size: 4 }.to_string(), "container is full (4 values)");
        assert_eq!(Error::Empty.to_string(), "container is empty");
        assert_eq!(Error::KeyNotFound.to_string(), "key not found");
    }
}
