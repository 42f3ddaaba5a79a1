use crate::invariants::{
    debug_assert_cursor_in_range, debug_assert_occupied_read, debug_assert_slot_free,
};
use crate::{BufferError, Geometry};
use crossbeam_utils::CachePadded;
use std::ptr::NonNull;

#[cfg(not(feature = "loom"))]
use std::sync::atomic::{AtomicUsize, Ordering};

#[cfg(feature = "loom")]
use loom::{
    cell::UnsafeCell,
    sync::atomic::{AtomicUsize, Ordering},
};

// =============================================================================
// MEMORY ORDERING & SYNCHRONIZATION STRATEGY
// =============================================================================
//
// Cursors are slot indices, always held in `[0, slot_count)`. They wrap with
// `& mask` on every advance, so "full" and "empty" cannot be told apart by
// the cursors alone. One slot is therefore never written: the ring is full
// when `next(write) == read` and empty when `write == read`. No shared
// counter exists, so each cursor has exactly one writer.
//
// **Producer (push):**
// 1. Load `write` with Relaxed (only the producer stores it)
// 2. Load `read` with Acquire (the consumer is done with the slot it freed)
// 3. Copy the payload into slot `write`
// 4. Store `next(write)` with Release (publishes the payload)
//
// **Consumer (pop / peek):**
// 1. Load `read` with Relaxed (only the consumer stores it)
// 2. Load `write` with Acquire (synchronizes with step 4 above)
// 3. Copy the payload out of slot `read`
// 4. Store `next(read)` with Release (hands the slot back to the producer)
//
// Slot memory itself is never atomic. The producer only touches the slot at
// `write`, which lies outside `[read, write)`; the consumer only touches
// slots inside `[read, write)`.
//
// Slots live in caller memory, which loom cannot see. Under the `loom`
// feature each slot gets a shadow `loom::cell::UnsafeCell<()>` that is
// touched on every slot access, so loom reports any slot read or write not
// ordered by the cursor protocol.
//
// =============================================================================

/// Shared core of a circular buffer: slot pointer plus the two cursors.
///
/// All access to slot memory goes through here. The `unsafe` methods carry
/// the role contract: `push` may only be called by the single producer;
/// `pop`, `peek`, `occupied_span` and `consume_up_to` only by the single
/// consumer.
pub(crate) struct Ring<T> {
    /// Next slot to write (stored by producer, loaded by consumer)
    write: CachePadded<AtomicUsize>,
    /// Next slot to read (stored by consumer, loaded by producer)
    read: CachePadded<AtomicUsize>,
    slots: NonNull<T>,
    geometry: Geometry,
    /// Access tracking for each slot, one cell per slot
    #[cfg(feature = "loom")]
    tracked: Box<[UnsafeCell<()>]>,
}

// Safety: the cursor protocol above keeps producer and consumer on disjoint
// slots, so sharing the ring between the two roles only moves `T` values
// across threads.
unsafe impl<T: Send> Send for Ring<T> {}
unsafe impl<T: Send> Sync for Ring<T> {}

impl<T: Copy> Ring<T> {
    /// Creates a ring over `geometry.slot_count()` slots starting at `slots`.
    ///
    /// # Safety
    ///
    /// `slots` must be valid for reads and writes of `geometry.slot_count()`
    /// elements for as long as the ring is used, and nothing else may access
    /// that memory meanwhile.
    pub(crate) unsafe fn from_raw_parts(slots: NonNull<T>, geometry: Geometry) -> Self {
        Self {
            write: CachePadded::new(AtomicUsize::new(0)),
            read: CachePadded::new(AtomicUsize::new(0)),
            slots,
            geometry,
            #[cfg(feature = "loom")]
            tracked: (0..geometry.slot_count())
                .map(|_| UnsafeCell::new(()))
                .collect(),
        }
    }

    #[inline]
    pub(crate) fn geometry(&self) -> Geometry {
        self.geometry
    }

    #[inline]
    fn slot(&self, index: usize) -> *mut T {
        debug_assert_cursor_in_range!("slot", index, self.geometry.slot_count());
        // SAFETY: every index passed here is masked, so it is below
        // slot_count and the offset stays inside the storage region.
        unsafe { self.slots.as_ptr().add(index) }
    }

    #[cfg(feature = "loom")]
    fn track_read(&self, index: usize) {
        self.tracked[index].with(|_| ());
    }

    #[cfg(feature = "loom")]
    fn track_write(&self, index: usize) {
        self.tracked[index].with_mut(|_| ());
    }

    #[cfg(not(feature = "loom"))]
    #[inline]
    fn track_read(&self, _index: usize) {}

    #[cfg(not(feature = "loom"))]
    #[inline]
    fn track_write(&self, _index: usize) {}

    /// Copies `value` into slot `index`.
    #[inline]
    unsafe fn write_slot(&self, index: usize, value: T) {
        self.track_write(index);
        self.slot(index).write(value);
    }

    /// Copies the value out of slot `index`.
    #[inline]
    unsafe fn read_slot(&self, index: usize) -> T {
        self.track_read(index);
        self.slot(index).read()
    }

    // ---------------------------------------------------------------------
    // QUERIES (either side)
    // ---------------------------------------------------------------------

    /// Number of occupied slots.
    #[inline]
    pub(crate) fn size(&self) -> usize {
        let write = self.write.load(Ordering::Acquire);
        let read = self.read.load(Ordering::Acquire);
        self.geometry.occupied(write, read)
    }

    /// Number of free usable slots.
    #[inline]
    pub(crate) fn space(&self) -> usize {
        self.geometry.capacity() - self.size()
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.read.load(Ordering::Acquire) == self.write.load(Ordering::Acquire)
    }

    #[inline]
    pub(crate) fn is_full(&self) -> bool {
        let write = self.write.load(Ordering::Acquire);
        self.geometry.next(write) == self.read.load(Ordering::Acquire)
    }

    // ---------------------------------------------------------------------
    // PRODUCER
    // ---------------------------------------------------------------------

    /// Copies `value` into the next free slot and publishes it.
    ///
    /// # Safety
    ///
    /// Only the single producer may call this.
    #[inline]
    pub(crate) unsafe fn push(&self, value: T) -> Result<(), BufferError> {
        let write = self.write.load(Ordering::Relaxed);
        let next = self.geometry.next(write);

        if next == self.read.load(Ordering::Acquire) {
            return Err(BufferError::Full);
        }

        debug_assert_cursor_in_range!("write", write, self.geometry.slot_count());
        debug_assert_slot_free!(next, self.read.load(Ordering::Relaxed));

        self.write_slot(write, value);
        self.write.store(next, Ordering::Release);
        Ok(())
    }

    // ---------------------------------------------------------------------
    // CONSUMER
    // ---------------------------------------------------------------------

    /// Copies the oldest element out and frees its slot.
    ///
    /// # Safety
    ///
    /// Only the single consumer may call this, and no reference obtained from
    /// `peek` may be alive.
    #[inline]
    pub(crate) unsafe fn pop(&self) -> Result<T, BufferError> {
        let read = self.read.load(Ordering::Relaxed);

        if read == self.write.load(Ordering::Acquire) {
            return Err(BufferError::Empty);
        }

        debug_assert_cursor_in_range!("read", read, self.geometry.slot_count());

        let value = self.read_slot(read);
        self.read.store(self.geometry.next(read), Ordering::Release);
        Ok(value)
    }

    /// Borrows the element `offset` positions after the oldest one.
    ///
    /// # Safety
    ///
    /// Only the single consumer may call this. The reference must be dropped
    /// before the consumer advances past that slot or the ring is reset.
    #[inline]
    pub(crate) unsafe fn peek(&self, offset: usize) -> Result<&T, BufferError> {
        let (read, len) = self.occupied_span();

        if offset >= len {
            return Err(BufferError::OutOfRange { offset, len });
        }

        debug_assert_occupied_read!(offset, len);
        Ok(self.slot_ref(self.geometry.offset(read, offset)))
    }

    /// Snapshot of the read cursor and the number of elements behind it.
    ///
    /// # Safety
    ///
    /// Only the single consumer may call this.
    #[inline]
    pub(crate) unsafe fn occupied_span(&self) -> (usize, usize) {
        let read = self.read.load(Ordering::Relaxed);
        let write = self.write.load(Ordering::Acquire);
        (read, self.geometry.occupied(write, read))
    }

    /// Borrows the slot at `index`.
    ///
    /// # Safety
    ///
    /// `index` must come from `occupied_span` and address an occupied slot;
    /// the same lifetime rules as `peek` apply.
    #[inline]
    pub(crate) unsafe fn slot_ref(&self, index: usize) -> &T {
        self.track_read(index);
        &*self.slot(index)
    }

    /// Hands up to `max` of the oldest elements to `handler`, then frees them
    /// with a single read cursor store.
    ///
    /// # Safety
    ///
    /// Same contract as `pop`.
    #[inline]
    pub(crate) unsafe fn consume_up_to<F>(&self, max: usize, mut handler: F) -> usize
    where
        F: FnMut(&T),
    {
        let (read, len) = self.occupied_span();
        let count = len.min(max);
        if count == 0 {
            return 0;
        }

        for i in 0..count {
            debug_assert_occupied_read!(i, len);
            handler(self.slot_ref(self.geometry.offset(read, i)));
        }

        self.read
            .store(self.geometry.offset(read, count), Ordering::Release);
        count
    }

    // ---------------------------------------------------------------------
    // RESET
    // ---------------------------------------------------------------------

    /// Rewinds both cursors to slot 0. Slot memory is left as is.
    #[inline]
    pub(crate) fn reset(&mut self) {
        self.write.store(0, Ordering::Relaxed);
        self.read.store(0, Ordering::Relaxed);
    }
}
