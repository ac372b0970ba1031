//! Example demonstrating a bounded pool of scratch buffers shared by worker threads.
//!
//! Each worker checks a buffer out, fills it, and drops the lease, which resets the buffer and
//! hands it to the next worker. The pool never holds more than its ceiling of buffers.

use std::thread;
use std::time::Duration;

use recycle_pool::{ResourcePool, timeout_from_millis};

const WORKERS: usize = 6;

fn main() {
    println!("=== ResourcePool: bounded scratch buffers ===");

    let pool = ResourcePool::builder()
        .pre_allocate(1)
        .max_count(3)
        .build_with(|| Vec::<u8>::with_capacity(4096));

    let workers: Vec<_> = (0..WORKERS)
        .map(|worker| {
            let pool = pool.clone();

            thread::spawn(move || {
                // Grows the pool if it is below its ceiling, otherwise waits up to 500 ms.
                let Some(mut buffer) = pool.acquire_or_create_with(timeout_from_millis(500), || {
                    Vec::with_capacity(4096)
                }) else {
                    println!("worker {worker}: timed out waiting for a buffer");
                    return;
                };

                buffer.extend(std::iter::repeat_n(u8::try_from(worker).unwrap_or(u8::MAX), 128));
                thread::sleep(Duration::from_millis(10));

                println!("worker {worker}: used {} bytes", buffer.len());
            })
        })
        .collect();

    for worker in workers {
        worker.join().unwrap();
    }

    println!(
        "pool owns {} buffers, {} free, ceiling {:?}",
        pool.len(),
        pool.available(),
        pool.max_count()
    );

    // Shrinking takes effect immediately for free buffers.
    pool.resize(1);
    println!("after resize(1): pool owns {} buffers", pool.len());
}
