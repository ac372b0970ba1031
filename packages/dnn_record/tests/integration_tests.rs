//! Integration tests for the `dnn_record` package: records drawn from pools, shared across
//! threads and recycled without leaking data between uses.

use std::thread;
use std::time::Duration;

use dnn_record::{
    ClassificationResult, Classifier, DetectionResult, DnnInput, InputPool, PerceptionRect,
    ResultPool,
};
use property_store::Error;
use testing::with_watchdog;

#[test]
fn payload_type_confusion_is_caught_on_pooled_records() {
    let results = ResultPool::builder().pre_allocate(1).max_count(1).build();

    let mut record = results.try_acquire().unwrap();
    record
        .set_result(ClassificationResult {
            max_conf: 0.75,
            class_id: 12,
            class_name: "bus".to_string(),
        })
        .unwrap();

    assert!(matches!(
        record.result::<DetectionResult>(),
        Err(Error::TypeMismatch { .. })
    ));
    assert_eq!(
        record.result::<ClassificationResult>().unwrap().class_name,
        "bus"
    );
}

#[test]
fn records_do_not_leak_between_requests() {
    let inputs = InputPool::builder()
        .pre_allocate(1)
        .max_count(1)
        .build_with(|| DnnInput::with_capacity(4096));

    {
        let mut input = inputs.try_acquire().unwrap();
        input.data.extend_from_slice(&[0xAB; 100]);
        input.width = 10;
        input.height = 10;
        input.metadata.set("frame_id", 1_u64).unwrap();
    }

    let input = inputs.try_acquire().unwrap();
    assert!(input.data.is_empty());
    assert!(input.data.capacity() >= 4096);
    assert!(input.metadata.get::<u64>("frame_id").is_err());
}

#[test]
fn shared_result_is_readable_from_many_threads() {
    with_watchdog(|| {
        let results = ResultPool::builder().max_count(2).build();

        let mut record = results.acquire_or_create(None).unwrap();
        record
            .set_result(DetectionResult {
                boxes: vec![
                    PerceptionRect {
                        conf: 0.4,
                        ..PerceptionRect::default()
                    },
                    PerceptionRect {
                        conf: 0.9,
                        ..PerceptionRect::default()
                    },
                ],
            })
            .unwrap();

        let shared = record.into_shared();

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let shared = shared.clone();
                thread::spawn(move || {
                    shared
                        .result_ref::<DetectionResult>()
                        .map(|detections| detections.boxes.len())
                })
            })
            .collect();

        for reader in readers {
            assert_eq!(reader.join().unwrap(), Ok(2));
        }

        drop(shared);
        assert_eq!(results.available(), 1);
    });
}

#[test]
fn classifier_is_bounded_by_injected_pool() {
    with_watchdog(|| {
        let results = ResultPool::builder().max_count(2).build();
        let classifier =
            Classifier::new(results.clone(), ["no", "yes"], Some(Duration::from_millis(10)));

        let first = classifier.publish(&[0.1, 0.9]).unwrap();
        let second = classifier.publish(&[0.8, 0.2]).unwrap();

        assert_eq!(
            first.result_ref::<ClassificationResult>().unwrap().class_name,
            "yes"
        );
        assert_eq!(
            second.result_ref::<ClassificationResult>().unwrap().class_name,
            "no"
        );

        // Both records are in flight and the pool is at its ceiling.
        assert!(classifier.publish(&[0.5, 0.5]).is_none());
        assert_eq!(results.len(), 2);

        drop(first);
        assert!(classifier.publish(&[0.5, 0.5]).is_some());
    });
}
