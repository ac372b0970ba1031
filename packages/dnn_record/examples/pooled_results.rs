//! Example demonstrating a process-wide result pool injected into worker threads.
//!
//! Each worker "runs inference", stores the outcome in a pooled result record and hands the
//! record to a consumer. The pool ceiling bounds how many results can be in flight.

use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use dnn_record::{ClassificationResult, Classifier, ResultPool};

const LABELS: [&str; 3] = ["background", "person", "vehicle"];

fn main() {
    println!("=== Pooled inference results ===");

    // Constructed once and passed to whoever needs it.
    let results = ResultPool::builder().pre_allocate(2).max_count(4).build();
    let classifier = Classifier::new(results.clone(), LABELS, Some(Duration::from_millis(200)));

    let (tx, rx) = mpsc::channel();

    let producers: Vec<_> = (0..3_u8)
        .map(|worker| {
            let classifier = classifier.clone();
            let tx = tx.clone();

            thread::spawn(move || {
                for frame in 0..4_u8 {
                    let scores = [0.1, f32::from(worker) * 0.3, f32::from(frame) * 0.2];

                    if let Some(record) = classifier.publish(&scores) {
                        tx.send((worker, frame, record)).unwrap();
                    }
                }
            })
        })
        .collect();

    drop(tx);

    for (worker, frame, record) in rx {
        let top = record.result_ref::<ClassificationResult>().unwrap();
        println!(
            "worker {worker} frame {frame}: {} ({:.2})",
            top.class_name, top.max_conf
        );
        // Dropping `record` here returns it to the pool for the next producer.
    }

    for producer in producers {
        producer.join().unwrap();
    }

    println!(
        "pool owns {} records, {} free",
        results.len(),
        results.available()
    );
}
