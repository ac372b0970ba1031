#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Recyclable records for an inference pipeline.
//!
//! Inference runs at a high request rate, and every request needs an input record and a result
//! record. This package defines those records so they can be drawn from a
//! [`ResourcePool`][recycle_pool::ResourcePool] instead of being allocated per request, and so
//! that any component can attach typed metadata to them through an embedded
//! [`PropertyStore`][property_store::PropertyStore].
//!
//! # Example
//!
//! ```rust
//! use dnn_record::{DNN_RESULT_KEY, DetectionResult, PerceptionRect, ResultPool};
//!
//! // One pool for the whole process, handed to whoever produces results.
//! let results = ResultPool::builder().pre_allocate(4).max_count(16).build();
//!
//! let mut record = results.try_acquire().unwrap();
//!
//! let mut detections = DetectionResult::default();
//! detections.boxes.push(PerceptionRect {
//!     right: 32.0,
//!     bottom: 64.0,
//!     conf: 0.8,
//!     ..PerceptionRect::default()
//! });
//!
//! record.set_result(detections).unwrap();
//! record.set_result_as("camera", "rear".to_string()).unwrap();
//!
//! assert!(record.properties().contains_key(DNN_RESULT_KEY));
//!
//! // Dropping the lease clears the record and returns it to the pool.
//! drop(record);
//! assert!(results.try_acquire().unwrap().properties().is_empty());
//! ```

mod classification;
mod detection;
mod input;
mod pools;
mod result;

pub use classification::*;
pub use detection::*;
pub use input::*;
pub use pools::*;
pub use result::*;
