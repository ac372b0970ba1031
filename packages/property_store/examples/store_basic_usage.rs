//! Example demonstrating how unrelated components attach typed values to one record.

use property_store::{Error, PropertyStore};

#[derive(Clone, Debug)]
struct Timing {
    inference_us: u64,
    postprocess_us: u64,
}

fn main() {
    println!("=== PropertyStore: typed values without a shared schema ===");

    let mut record = PropertyStore::new();

    // The model layer stores its primary payload.
    record.set("dnn_result", vec![0.1_f32, 0.7, 0.2]).unwrap();

    // A profiler, unaware of the model layer, adds its own data.
    record
        .set(
            "timing",
            Timing {
                inference_us: 820,
                postprocess_us: 95,
            },
        )
        .unwrap();

    let scores = record.get_ref::<Vec<f32>>("dnn_result").unwrap();
    println!("Scores: {scores:?}");

    let timing = record.get::<Timing>("timing").unwrap();
    println!(
        "Timing: {} us inference, {} us postprocess",
        timing.inference_us, timing.postprocess_us
    );

    // A consumer that guesses the wrong type gets a recoverable error, not garbage.
    match record.get::<Vec<f64>>("dnn_result") {
        Err(Error::TypeMismatch {
            stored, requested, ..
        }) => println!("Refused to read {stored} as {requested}"),
        other => println!("Unexpected: {other:?}"),
    }

    record.clear();
    println!("Entries after clear: {}", record.len());
}
