/// Slot layout of a circular buffer.
///
/// The slot count is always a power of two so cursors wrap with a single
/// `& mask` instead of a modulo. One slot is kept free as the sentinel that
/// tells "full" apart from "empty", so the usable capacity is
/// `slot_count - 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    mask: usize,
}

impl Geometry {
    /// Geometry with `1 << bits` slots.
    ///
    /// Handy for sizing caller-owned arrays at compile time:
    ///
    /// ```
    /// use ringspsc_rs::Geometry;
    ///
    /// const SLOTS: usize = Geometry::from_bits(3).slot_count();
    /// let storage = [0u32; SLOTS];
    /// assert_eq!(storage.len(), 8);
    /// ```
    pub const fn from_bits(bits: u8) -> Self {
        assert!(
            (bits as u32) < usize::BITS,
            "slot bits exceed the width of usize"
        );
        Self {
            mask: (1usize << bits) - 1,
        }
    }

    /// Geometry for a storage region holding `slots` elements.
    ///
    /// # Panics
    ///
    /// Panics if `slots` is zero or not a power of two. These are caller
    /// contract violations, not runtime conditions.
    pub const fn for_slots(slots: usize) -> Self {
        assert!(slots > 0, "circular buffer storage must not be empty");
        assert!(
            slots.is_power_of_two(),
            "circular buffer slot count must be a power of two"
        );
        Self { mask: slots - 1 }
    }

    /// Total number of slots, including the sentinel.
    #[inline]
    pub const fn slot_count(&self) -> usize {
        self.mask + 1
    }

    /// Mask for index wrapping (`slot_count - 1`).
    #[inline]
    pub const fn mask(&self) -> usize {
        self.mask
    }

    /// Maximum number of elements held at once.
    #[inline]
    pub const fn capacity(&self) -> usize {
        self.mask
    }

    /// Cursor that follows `cursor` in slot order.
    #[inline]
    pub(crate) const fn next(&self, cursor: usize) -> usize {
        cursor.wrapping_add(1) & self.mask
    }

    /// Number of occupied slots between the read and write cursors.
    #[inline]
    pub(crate) const fn occupied(&self, write: usize, read: usize) -> usize {
        write.wrapping_sub(read) & self.mask
    }

    /// Slot index `offset` positions after `cursor`.
    #[inline]
    pub(crate) const fn offset(&self, cursor: usize, offset: usize) -> usize {
        cursor.wrapping_add(offset) & self.mask
    }
}
