//! Two-thread tests for split circular buffers.
//!
//! These run a real producer thread against a real consumer thread over
//! stack storage, using scoped threads so the borrow of the storage is
//! checked by the compiler.

#![cfg(not(feature = "loom"))]

use ringspsc_rs::{BufferError, CircularBuffer};
use std::thread;

const MSG_COUNT: u64 = 100_000;

/// Every message arrives exactly once and in order.
#[test]
fn test_spsc_threads_fifo() {
    let mut storage = [0u64; 1024];
    let mut buffer = CircularBuffer::new(&mut storage);
    let (mut producer, mut consumer) = buffer.split();

    thread::scope(|s| {
        s.spawn(move || {
            for i in 0..MSG_COUNT {
                while producer.push_back(i).is_err() {
                    thread::yield_now();
                }
            }
        });

        let mut expected = 0u64;
        while expected < MSG_COUNT {
            match consumer.pop_front() {
                Ok(v) => {
                    assert_eq!(v, expected, "FIFO order violated");
                    expected += 1;
                }
                Err(BufferError::Empty) => thread::yield_now(),
                Err(e) => panic!("unexpected error: {e}"),
            }
        }
    });

    assert!(buffer.is_empty());
}

/// A tiny buffer forces constant full/empty transitions and wrap-around.
#[test]
fn test_spsc_threads_tiny_buffer() {
    let mut storage = [0u32; 2];
    let mut buffer = CircularBuffer::new(&mut storage);
    let (mut producer, mut consumer) = buffer.split();

    let total: u32 = 10_000;

    let sum = thread::scope(|s| {
        s.spawn(move || {
            for i in 0..total {
                while producer.push_back(i).is_err() {
                    thread::yield_now();
                }
            }
        });

        let mut received = 0u32;
        let mut sum = 0u64;
        while received < total {
            if let Ok(v) = consumer.pop_front() {
                assert_eq!(v, received);
                sum += u64::from(v);
                received += 1;
            } else {
                thread::yield_now();
            }
        }
        sum
    });

    let total = u64::from(total);
    assert_eq!(sum, total * (total - 1) / 2);
}

/// Batch consumption keeps order while the producer is still writing.
#[test]
fn test_spsc_threads_consume_up_to() {
    let mut storage = [0u64; 64];
    let mut buffer = CircularBuffer::new(&mut storage);
    let (mut producer, mut consumer) = buffer.split();

    thread::scope(|s| {
        s.spawn(move || {
            for i in 0..MSG_COUNT {
                while producer.push_back(i).is_err() {
                    thread::yield_now();
                }
            }
        });

        let mut expected = 0u64;
        while expected < MSG_COUNT {
            let n = consumer.consume_up_to(16, |v| {
                assert_eq!(*v, expected);
                expected += 1;
            });
            assert!(n <= 16);
            if n == 0 {
                thread::yield_now();
            }
        }
    });
}

/// Peeked elements stay valid and correct while the producer keeps pushing.
#[test]
fn test_spsc_threads_peek_window() {
    let mut storage = [0u64; 16];
    let mut buffer = CircularBuffer::new(&mut storage);
    let (mut producer, mut consumer) = buffer.split();

    thread::scope(|s| {
        s.spawn(move || {
            for i in 0..MSG_COUNT {
                while producer.push_back(i).is_err() {
                    thread::yield_now();
                }
            }
        });

        let mut base = 0u64;
        while base < MSG_COUNT {
            let window: Vec<u64> = consumer.iter().copied().collect();
            for (offset, v) in window.iter().enumerate() {
                assert_eq!(*v, base + offset as u64);
            }
            if window.is_empty() {
                thread::yield_now();
                continue;
            }
            assert_eq!(consumer.pop_front(), Ok(base));
            base += 1;
        }
    });
}
