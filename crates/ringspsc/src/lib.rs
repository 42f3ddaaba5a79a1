//! RingSPSC - Lock-Free Single-Producer Single-Consumer Circular Buffer
//!
//! A fixed-capacity FIFO that manages caller-supplied storage. It owns no
//! memory: the caller lends a slice whose length is a power of two, and the
//! buffer keeps a write cursor and a read cursor over it.
//!
//! # Key Features
//!
//! - No allocation; storage is a borrowed `&mut [T]`
//! - Power-of-two slot count, cursors wrap with a bitwise AND
//! - One sentinel slot tells full from empty without a shared counter
//! - Acquire/Release cursor publication, no locks or read-modify-write atomics
//! - Every operation is O(1) and non-blocking
//!
//! # Example
//!
//! ```
//! use ringspsc_rs::{BufferError, CircularBuffer};
//!
//! let mut storage = [0u32; 8]; // 8 slots, 7 usable
//! let mut buffer = CircularBuffer::new(&mut storage);
//!
//! buffer.push_back(1).unwrap();
//! buffer.push_back(2).unwrap();
//! assert_eq!(buffer.peek(1), Ok(&2));
//! assert_eq!(buffer.pop_front(), Ok(1));
//!
//! // Lock-free use from two threads
//! let (mut producer, mut consumer) = buffer.split();
//! std::thread::scope(|s| {
//!     s.spawn(move || producer.push_back(3).unwrap());
//! });
//! assert_eq!(consumer.pop_front(), Ok(2));
//! assert_eq!(consumer.pop_front(), Ok(3));
//! assert_eq!(consumer.pop_front(), Err(BufferError::Empty));
//! ```

mod buffer;
mod error;
mod geometry;
mod invariants;
mod ring;
mod split;

pub use buffer::{CircularBuffer, Iter};
pub use error::BufferError;
pub use geometry::Geometry;
pub use split::{Consumer, Producer};
