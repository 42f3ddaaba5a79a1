//! Debug assertion macros for circular buffer invariants.
//!
//! Only active in debug builds (`debug_assert!`), so release builds pay
//! nothing for them.

// =============================================================================
// Cursor Range
// =============================================================================

/// Assert that a cursor stays inside the slot space.
///
/// **Invariant**: `0 ≤ cursor < slot_count`
///
/// Used in: `Ring::push()` and `Ring::pop()` before touching a slot
macro_rules! debug_assert_cursor_in_range {
    ($name:literal, $cursor:expr, $slot_count:expr) => {
        debug_assert!(
            $cursor < $slot_count,
            "{} cursor {} outside slot space of {}",
            $name,
            $cursor,
            $slot_count
        )
    };
}

// =============================================================================
// Sentinel Slot
// =============================================================================

/// Assert that a push leaves the sentinel slot free.
///
/// **Invariant**: `next(write) != read` before the payload is copied
///
/// Used in: `Ring::push()` before copying the payload
macro_rules! debug_assert_slot_free {
    ($next_write:expr, $read:expr) => {
        debug_assert!(
            $next_write != $read,
            "writing into the sentinel slot: next write {} equals read {}",
            $next_write,
            $read
        )
    };
}

/// Assert that a read is taken from an occupied slot.
///
/// **Invariant**: `offset < (write - read) & mask`
///
/// Used in: `Ring::peek()` and `Ring::consume_up_to()`
macro_rules! debug_assert_occupied_read {
    ($offset:expr, $occupied:expr) => {
        debug_assert!(
            $offset < $occupied,
            "reading offset {} outside {} occupied slots",
            $offset,
            $occupied
        )
    };
}

pub(crate) use debug_assert_cursor_in_range;
pub(crate) use debug_assert_occupied_read;
pub(crate) use debug_assert_slot_free;
