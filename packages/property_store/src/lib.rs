#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! This package provides [`PropertyStore`], a string-keyed store of arbitrarily typed values,
//! and [`TypedCell`], the single-value container it is built from.
//!
//! Records that many unrelated components contribute to (inference results, task descriptions)
//! rarely share a schema. A store lets each component attach its own values under its own keys,
//! while every read is checked against the type the value was stored with.
//!
//! # Type safety
//!
//! Each value is tagged with its concrete type when stored. Reading it back as any other type,
//! even a structurally identical one, fails with [`Error::TypeMismatch`]. No raw memory is ever
//! reinterpreted.
//!
//! # Example
//!
//! ```rust
//! use property_store::{ErrorKind, PropertyStore};
//!
//! #[derive(Clone, Debug, PartialEq)]
//! struct Classification {
//!     class_id: i32,
//!     confidence: f32,
//! }
//!
//! let mut store = PropertyStore::new();
//!
//! store
//!     .set("dnn_result", Classification { class_id: 7, confidence: 0.93 })
//!     .unwrap();
//! store.set("latency_us", 1250_u64).unwrap();
//!
//! let result: Classification = store.get("dnn_result").unwrap();
//! assert_eq!(result.class_id, 7);
//!
//! // Asking for the wrong type is an ordinary, recoverable error.
//! let error = store.get::<String>("dnn_result").unwrap_err();
//! assert_eq!(error.kind(), ErrorKind::InvalidArgument);
//!
//! let latency = store.get::<u64>("missing_key").unwrap_or_default();
//! assert_eq!(latency, 0);
//! ```

mod cell;
mod error;
mod store;

pub use cell::*;
pub use error::*;
pub use store::*;
