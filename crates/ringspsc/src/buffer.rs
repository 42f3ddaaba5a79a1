//! Circular buffer over caller-supplied storage.
//!
//! [`CircularBuffer<'a, T>`] never allocates. The caller lends it a slice
//! whose length is a power of two, and the buffer manages a write cursor and
//! a read cursor over that slice until the borrow ends.
//!
//! # Capacity
//!
//! One slot is kept free so that "full" and "empty" can be told apart with
//! the two cursors alone:
//!
//! ```text
//!   empty:  read == write
//!   full:   (write + 1) & mask == read
//!   size:   (write - read) & mask
//! ```
//!
//! A slice of 8 elements therefore holds at most 7.
//!
//! # Threading
//!
//! Used directly, every mutating operation takes `&mut self`. For lock-free
//! use from two threads, [`split`](CircularBuffer::split) hands out a
//! [`Producer`] and a [`Consumer`].

use crate::ring::Ring;
use crate::split::{Consumer, Producer};
use crate::{BufferError, Geometry};

use std::fmt;
use std::iter::FusedIterator;
use std::marker::PhantomData;
use std::ptr::NonNull;

/// A fixed-capacity FIFO over a borrowed slice.
///
/// Elements are `Copy`: pushing copies the value into a slot, popping copies
/// it back out. Slots are never dropped or zeroed.
///
/// # Example
///
/// ```
/// use ringspsc_rs::{BufferError, CircularBuffer};
///
/// let mut storage = [0u32; 8];
/// let mut buffer = CircularBuffer::new(&mut storage);
///
/// for i in 0..7 {
///     buffer.push_back(i).unwrap();
/// }
/// assert_eq!(buffer.push_back(7), Err(BufferError::Full));
///
/// assert_eq!(buffer.peek(2), Ok(&2));
/// assert_eq!(buffer.pop_front(), Ok(0));
/// assert_eq!(buffer.size(), 6);
/// ```
pub struct CircularBuffer<'a, T> {
    ring: Ring<T>,
    _storage: PhantomData<&'a mut [T]>,
}

impl<'a, T: Copy> CircularBuffer<'a, T> {
    /// Creates an empty buffer over `storage`.
    ///
    /// The usable capacity is `storage.len() - 1`. A single-slot storage is
    /// accepted and gives a buffer on which every push fails with
    /// [`BufferError::Full`].
    ///
    /// # Panics
    ///
    /// Panics if `storage` is empty, if its length is not a power of two, or
    /// if `T` is zero-sized.
    pub fn new(storage: &'a mut [T]) -> Self {
        assert!(
            std::mem::size_of::<T>() > 0,
            "circular buffer element size must be non-zero"
        );
        let geometry = Geometry::for_slots(storage.len());
        let slots = NonNull::from(storage).cast::<T>();

        Self {
            // SAFETY: `slots` comes from an exclusive borrow of exactly
            // `geometry.slot_count()` elements that lives for `'a`, and the
            // `PhantomData` keeps that borrow alive as long as `self`.
            ring: unsafe { Ring::from_raw_parts(slots, geometry) },
            _storage: PhantomData,
        }
    }

    // =========================================================================
    // STATUS
    // =========================================================================

    /// Maximum number of elements the buffer can hold (`slot_count - 1`).
    #[inline]
    pub fn capacity(&self) -> usize {
        self.ring.geometry().capacity()
    }

    /// Number of slots in the backing storage.
    #[inline]
    pub fn slot_count(&self) -> usize {
        self.ring.geometry().slot_count()
    }

    /// Number of elements currently held.
    #[inline]
    pub fn size(&self) -> usize {
        self.ring.size()
    }

    /// Number of elements that can still be pushed.
    #[inline]
    pub fn space(&self) -> usize {
        self.ring.space()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ring.is_empty()
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.ring.is_full()
    }

    // =========================================================================
    // OPERATIONS
    // =========================================================================

    /// Logically discards every element. Memory is not touched.
    pub fn clear(&mut self) {
        self.ring.reset();
    }

    /// Appends `value` at the back.
    ///
    /// Fails with [`BufferError::Full`] and leaves the buffer unchanged when
    /// no usable slot is free.
    #[inline]
    pub fn push_back(&mut self, value: T) -> Result<(), BufferError> {
        // SAFETY: `&mut self` excludes any other caller.
        unsafe { self.ring.push(value) }
    }

    /// Removes and returns the oldest element.
    ///
    /// Fails with [`BufferError::Empty`] when there is nothing to read.
    #[inline]
    pub fn pop_front(&mut self) -> Result<T, BufferError> {
        // SAFETY: `&mut self` excludes other callers and live peek borrows.
        unsafe { self.ring.pop() }
    }

    /// Removes the oldest element into `out`.
    ///
    /// `out` is left untouched when the buffer is empty.
    #[inline]
    pub fn pop_front_into(&mut self, out: &mut T) -> Result<(), BufferError> {
        *out = self.pop_front()?;
        Ok(())
    }

    /// Borrows the element `offset` positions after the oldest one.
    ///
    /// Fails with [`BufferError::OutOfRange`] when `offset >= size()`,
    /// including every offset on an empty buffer.
    #[inline]
    pub fn peek(&self, offset: usize) -> Result<&T, BufferError> {
        // SAFETY: the returned borrow ties up `self`, so no pop or clear can
        // run until it is dropped.
        unsafe { self.ring.peek(offset) }
    }

    /// Iterates over held elements, oldest first.
    pub fn iter(&self) -> Iter<'_, T> {
        // SAFETY: as for `peek`.
        unsafe { Iter::new(&self.ring) }
    }

    /// Splits the buffer into its producer and consumer roles.
    ///
    /// Both handles borrow the buffer, so [`clear`](Self::clear) cannot run
    /// while either is alive.
    ///
    /// ```
    /// use ringspsc_rs::CircularBuffer;
    /// use std::thread;
    ///
    /// let mut storage = [0u64; 16];
    /// let mut buffer = CircularBuffer::new(&mut storage);
    /// let (mut producer, mut consumer) = buffer.split();
    ///
    /// thread::scope(|s| {
    ///     s.spawn(move || {
    ///         for i in 0..100u64 {
    ///             while producer.push_back(i).is_err() {
    ///                 std::hint::spin_loop();
    ///             }
    ///         }
    ///     });
    ///
    ///     let mut expected = 0;
    ///     while expected < 100 {
    ///         if let Ok(v) = consumer.pop_front() {
    ///             assert_eq!(v, expected);
    ///             expected += 1;
    ///         }
    ///     }
    /// });
    /// ```
    pub fn split(&mut self) -> (Producer<'_, T>, Consumer<'_, T>) {
        (Producer::new(&self.ring), Consumer::new(&self.ring))
    }
}

impl<T: Copy> fmt::Debug for CircularBuffer<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CircularBuffer")
            .field("slot_count", &self.slot_count())
            .field("size", &self.size())
            .finish_non_exhaustive()
    }
}

impl<'b, T: Copy> IntoIterator for &'b CircularBuffer<'_, T> {
    type Item = &'b T;
    type IntoIter = Iter<'b, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// =============================================================================
// ITERATOR
// =============================================================================

/// Oldest-first iterator over the elements held when it was created.
pub struct Iter<'b, T> {
    ring: &'b Ring<T>,
    cursor: usize,
    remaining: usize,
    // Yields `&'b T`, so it may only cross threads when `T: Sync`.
    _items: PhantomData<&'b T>,
}

impl<'b, T: Copy> Iter<'b, T> {
    /// # Safety
    ///
    /// The caller must hold the consumer role for `'b`.
    pub(crate) unsafe fn new(ring: &'b Ring<T>) -> Self {
        let (cursor, remaining) = ring.occupied_span();
        Self {
            ring,
            cursor,
            remaining,
            _items: PhantomData,
        }
    }
}

impl<'b, T: Copy> Iterator for Iter<'b, T> {
    type Item = &'b T;

    fn next(&mut self) -> Option<&'b T> {
        if self.remaining == 0 {
            return None;
        }
        // SAFETY: the cursor walks the span captured in `new`; the consumer
        // role held for 'b keeps those slots occupied.
        let item = unsafe { self.ring.slot_ref(self.cursor) };
        self.cursor = self.ring.geometry().next(self.cursor);
        self.remaining -= 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T: Copy> ExactSizeIterator for Iter<'_, T> {}

impl<T: Copy> FusedIterator for Iter<'_, T> {}
