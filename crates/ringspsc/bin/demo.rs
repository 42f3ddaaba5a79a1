//! Demo: a sensor producer and a logging consumer sharing one stack buffer.
//!
//! Run with: `cargo run -p ringspsc-rs --bin demo --release`

use ringspsc_rs::{BufferError, CircularBuffer, Geometry};
use std::thread;
use std::time::Instant;

const GEOMETRY: Geometry = Geometry::from_bits(10);
const SAMPLES: u64 = 5_000_000;

#[derive(Debug, Clone, Copy, Default)]
struct Sample {
    seq: u64,
    reading: f32,
}

fn main() {
    println!("RingSPSC demo");
    println!("=============");
    println!(
        "slots: {}, usable capacity: {}, samples: {}",
        GEOMETRY.slot_count(),
        GEOMETRY.capacity(),
        SAMPLES
    );

    let mut storage = [Sample::default(); GEOMETRY.slot_count()];
    let mut buffer = CircularBuffer::new(&mut storage);
    let (mut producer, mut consumer) = buffer.split();

    let start = Instant::now();
    let (full_hits, checksum) = thread::scope(|s| {
        let sensor = s.spawn(move || {
            let mut full_hits = 0u64;
            for seq in 0..SAMPLES {
                let sample = Sample {
                    seq,
                    reading: (seq % 1000) as f32 * 0.5,
                };
                loop {
                    match producer.push_back(sample) {
                        Ok(()) => break,
                        Err(BufferError::Full) => {
                            full_hits += 1;
                            std::hint::spin_loop();
                        }
                        Err(e) => unreachable!("push only reports Full, got {e}"),
                    }
                }
            }
            full_hits
        });

        let mut expected = 0u64;
        let mut checksum = 0f64;
        while expected < SAMPLES {
            let n = consumer.consume_up_to(64, |sample| {
                assert_eq!(sample.seq, expected, "samples out of order");
                checksum += f64::from(sample.reading);
                expected += 1;
            });
            if n == 0 {
                std::hint::spin_loop();
            }
        }

        (sensor.join().expect("sensor thread panicked"), checksum)
    });
    let elapsed = start.elapsed();

    println!("received {SAMPLES} samples in {elapsed:.2?}");
    println!(
        "throughput: {:.1} M samples/s",
        SAMPLES as f64 / elapsed.as_secs_f64() / 1e6
    );
    println!("producer saw a full buffer {full_hits} times");
    println!("checksum: {checksum}");
    println!("buffer empty after run: {}", buffer.is_empty());
}
