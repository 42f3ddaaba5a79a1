//! Property-based tests for the circular buffer invariants.
//!
//! Each test drives a `CircularBuffer` and a `VecDeque` model with the same
//! operation sequence and checks that they never disagree.

#![cfg(not(feature = "loom"))]

use proptest::prelude::*;
use ringspsc_rs::{BufferError, CircularBuffer};
use std::collections::VecDeque;

#[derive(Debug, Clone)]
enum Op {
    Push(u32),
    Pop,
    Peek(usize),
    Clear,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => any::<u32>().prop_map(Op::Push),
        3 => Just(Op::Pop),
        2 => (0usize..20).prop_map(Op::Peek),
        1 => Just(Op::Clear),
    ]
}

// =============================================================================
// Model equivalence
// =============================================================================

proptest! {
    /// Any operation sequence gives the same results as a bounded VecDeque.
    #[test]
    fn prop_matches_vecdeque_model(
        bits in 0u8..5,
        ops in prop::collection::vec(op(), 1..200),
    ) {
        let mut storage = vec![0u32; 1 << bits];
        let mut buffer = CircularBuffer::new(&mut storage);
        let capacity = (1usize << bits) - 1;
        let mut model: VecDeque<u32> = VecDeque::new();

        for op in ops {
            match op {
                Op::Push(v) => {
                    let result = buffer.push_back(v);
                    if model.len() < capacity {
                        prop_assert_eq!(result, Ok(()));
                        model.push_back(v);
                    } else {
                        prop_assert_eq!(result, Err(BufferError::Full));
                    }
                }
                Op::Pop => {
                    let expected = model.pop_front().ok_or(BufferError::Empty);
                    prop_assert_eq!(buffer.pop_front(), expected);
                }
                Op::Peek(offset) => {
                    let expected = model.get(offset).ok_or(BufferError::OutOfRange {
                        offset,
                        len: model.len(),
                    });
                    prop_assert_eq!(buffer.peek(offset), expected);
                }
                Op::Clear => {
                    buffer.clear();
                    model.clear();
                }
            }

            // Occupied count stays in [0, capacity] and agrees with the model
            prop_assert_eq!(buffer.size(), model.len());
            prop_assert!(buffer.size() <= capacity);
            prop_assert_eq!(buffer.space(), capacity - model.len());
            prop_assert_eq!(buffer.is_empty(), model.is_empty());
            prop_assert_eq!(buffer.is_full(), model.len() == capacity);
        }
    }
}

// =============================================================================
// Counting laws
// =============================================================================

proptest! {
    /// After n successful pushes size is n and space dropped by n.
    #[test]
    fn prop_push_counts(bits in 1u8..8, n in 0usize..256) {
        let mut storage = vec![0u64; 1 << bits];
        let mut buffer = CircularBuffer::new(&mut storage);
        let capacity = buffer.capacity();
        let n = n.min(capacity);

        for i in 0..n {
            prop_assert_eq!(buffer.space(), capacity - i);
            prop_assert_eq!(buffer.push_back(i as u64), Ok(()));
            prop_assert_eq!(buffer.size(), i + 1);
        }
    }

    /// Full pushes and empty pops leave the buffer as it was.
    #[test]
    fn prop_failed_ops_change_nothing(bits in 0u8..6, extra in 1usize..10) {
        let mut storage = vec![0u16; 1 << bits];
        let mut buffer = CircularBuffer::new(&mut storage);
        let capacity = buffer.capacity();

        for i in 0..capacity {
            buffer.push_back(i as u16).unwrap();
        }
        for _ in 0..extra {
            prop_assert_eq!(buffer.push_back(u16::MAX), Err(BufferError::Full));
            prop_assert_eq!(buffer.size(), capacity);
        }
        for i in 0..capacity {
            prop_assert_eq!(buffer.pop_front(), Ok(i as u16));
        }

        let mut out = 7u16;
        for _ in 0..extra {
            prop_assert_eq!(buffer.pop_front_into(&mut out), Err(BufferError::Empty));
            prop_assert_eq!(out, 7);
        }
    }
}

// =============================================================================
// FIFO and wrap-around
// =============================================================================

proptest! {
    /// Fill, drain m, refill m: the buffer is full again and oldest-first
    /// order holds across the wrap point.
    #[test]
    fn prop_wraparound_preserves_order(bits in 1u8..7, m_seed in any::<usize>(), base in any::<u32>()) {
        let mut storage = vec![0u32; 1 << bits];
        let mut buffer = CircularBuffer::new(&mut storage);
        let capacity = buffer.capacity();
        let m = m_seed % (capacity + 1);

        let mut expected: VecDeque<u32> = VecDeque::new();
        let mut next = base;
        for _ in 0..capacity {
            buffer.push_back(next).unwrap();
            expected.push_back(next);
            next = next.wrapping_add(1);
        }
        for _ in 0..m {
            prop_assert_eq!(buffer.pop_front().ok(), expected.pop_front());
        }
        for _ in 0..m {
            buffer.push_back(next).unwrap();
            expected.push_back(next);
            next = next.wrapping_add(1);
        }

        prop_assert_eq!(buffer.size(), capacity);
        let peeked: Vec<u32> = (0..capacity).map(|i| *buffer.peek(i).unwrap()).collect();
        let iterated: Vec<u32> = buffer.iter().copied().collect();
        let model: Vec<u32> = expected.iter().copied().collect();
        prop_assert_eq!(&peeked, &model);
        prop_assert_eq!(&iterated, &model);
        prop_assert_eq!(
            buffer.peek(capacity),
            Err(BufferError::OutOfRange { offset: capacity, len: capacity })
        );
    }
}
