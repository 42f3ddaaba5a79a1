//! Producer and consumer roles of a split [`CircularBuffer`].
//!
//! Each handle can be moved to its own thread. Both are `Send` when `T` is,
//! and `!Sync`: a role is driven through `&mut self`, so only one thread at a
//! time can act as producer and one as consumer.
//!
//! [`CircularBuffer`]: crate::CircularBuffer

use crate::buffer::Iter;
use crate::ring::Ring;
use crate::BufferError;

use std::cell::Cell;
use std::fmt;
use std::marker::PhantomData;

/// `Send + !Sync` marker.
type NotSync = PhantomData<Cell<()>>;

// =============================================================================
// PRODUCER
// =============================================================================

/// Write side of a split circular buffer.
pub struct Producer<'b, T> {
    ring: &'b Ring<T>,
    _not_sync: NotSync,
}

impl<'b, T: Copy> Producer<'b, T> {
    pub(crate) fn new(ring: &'b Ring<T>) -> Self {
        Self {
            ring,
            _not_sync: PhantomData,
        }
    }

    /// Appends `value` at the back and publishes it to the consumer.
    ///
    /// Returns [`BufferError::Full`] immediately when no slot is free; the
    /// caller decides whether to retry, back off or drop.
    #[inline]
    pub fn push_back(&mut self, value: T) -> Result<(), BufferError> {
        // SAFETY: this handle is the only producer, and `&mut self` keeps it
        // on one thread at a time.
        unsafe { self.ring.push(value) }
    }

    /// Free slots as seen by the producer. The consumer may free more at
    /// any moment.
    #[inline]
    pub fn space(&self) -> usize {
        self.ring.space()
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.ring.is_full()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.ring.geometry().capacity()
    }
}

impl<T: Copy> fmt::Debug for Producer<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Producer")
            .field("space", &self.space())
            .finish_non_exhaustive()
    }
}

// =============================================================================
// CONSUMER
// =============================================================================

/// Read side of a split circular buffer.
pub struct Consumer<'b, T> {
    ring: &'b Ring<T>,
    _not_sync: NotSync,
}

impl<'b, T: Copy> Consumer<'b, T> {
    pub(crate) fn new(ring: &'b Ring<T>) -> Self {
        Self {
            ring,
            _not_sync: PhantomData,
        }
    }

    /// Removes and returns the oldest element.
    #[inline]
    pub fn pop_front(&mut self) -> Result<T, BufferError> {
        // SAFETY: sole consumer; `&mut self` ends every peek borrow first.
        unsafe { self.ring.pop() }
    }

    /// Removes the oldest element into `out`, leaving `out` untouched on
    /// [`BufferError::Empty`].
    #[inline]
    pub fn pop_front_into(&mut self, out: &mut T) -> Result<(), BufferError> {
        *out = self.pop_front()?;
        Ok(())
    }

    /// Borrows the element `offset` positions after the oldest one.
    ///
    /// The borrow lasts until the next `pop_front` or `consume_up_to`.
    #[inline]
    pub fn peek(&self, offset: usize) -> Result<&T, BufferError> {
        // SAFETY: sole consumer; the borrow of `self` outlives the returned
        // reference, and the producer never writes occupied slots.
        unsafe { self.ring.peek(offset) }
    }

    /// Iterates over the elements available right now, oldest first.
    pub fn iter(&self) -> Iter<'_, T> {
        // SAFETY: as for `peek`.
        unsafe { Iter::new(self.ring) }
    }

    /// Processes up to `max` elements, then frees all of them with a single
    /// read cursor update. Returns how many were processed.
    ///
    /// Cheaper than repeated `pop_front` when draining, since the producer
    /// sees one cursor store per batch.
    #[inline]
    pub fn consume_up_to<F>(&mut self, max: usize, handler: F) -> usize
    where
        F: FnMut(&T),
    {
        // SAFETY: as for `pop_front`.
        unsafe { self.ring.consume_up_to(max, handler) }
    }

    /// Processes every element available right now.
    #[inline]
    pub fn consume_all<F>(&mut self, handler: F) -> usize
    where
        F: FnMut(&T),
    {
        self.consume_up_to(usize::MAX, handler)
    }

    /// Elements available to read. The producer may add more at any moment.
    #[inline]
    pub fn size(&self) -> usize {
        self.ring.size()
    }

    /// Free slots as seen by the consumer. The producer may fill them at
    /// any moment.
    #[inline]
    pub fn space(&self) -> usize {
        self.ring.space()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ring.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.ring.geometry().capacity()
    }
}

impl<T: Copy> fmt::Debug for Consumer<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Consumer")
            .field("size", &self.size())
            .finish_non_exhaustive()
    }
}
