//! Error types for circular buffer operations.

use thiserror::Error;

/// Capacity conditions reported by buffer operations.
///
/// These are expected runtime outcomes. The buffer never retries or drops
/// on its own; what to do next is up to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BufferError {
    /// Every usable slot is occupied.
    #[error("circular buffer is full")]
    Full,

    /// There is nothing to read.
    #[error("circular buffer is empty")]
    Empty,

    /// A peek reached past the occupied elements.
    #[error("peek offset {offset} out of range for {len} occupied elements")]
    OutOfRange {
        /// Requested offset from the oldest element.
        offset: usize,
        /// Number of occupied elements at the time of the peek.
        len: usize,
    },
}

impl BufferError {
    /// Returns `true` if a push failed for lack of space.
    #[inline]
    pub fn is_full(&self) -> bool {
        matches!(self, Self::Full)
    }

    /// Returns `true` if a pop found nothing to read.
    ///
    /// A peek never reports `Empty`; on an empty buffer it fails with
    /// `OutOfRange { len: 0, .. }`.
    #[inline]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(BufferError::Full.to_string(), "circular buffer is full");
        assert_eq!(
            BufferError::OutOfRange { offset: 7, len: 3 }.to_string(),
            "peek offset 7 out of range for 3 occupied elements"
        );
    }

    #[test]
    fn test_classification() {
        assert!(BufferError::Full.is_full());
        assert!(!BufferError::Full.is_empty());
        assert!(BufferError::Empty.is_empty());
        assert!(!BufferError::OutOfRange { offset: 0, len: 0 }.is_empty());
        assert!(!BufferError::OutOfRange { offset: 4, len: 2 }.is_empty());
    }
}
