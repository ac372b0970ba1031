use std::sync::Arc;
use std::time::Duration;

use recycle_pool::{Recycled, ResourcePool};
use tracing::{debug, trace};

use crate::{ClassificationResult, DnnInput, DnnResult};

/// A pool of recyclable result records.
pub type ResultPool = ResourcePool<DnnResult>;

/// A pool of recyclable input records.
pub type InputPool = ResourcePool<DnnInput>;

/// Turns raw per-class scores into pooled result records.
///
/// The classifier does not own its result records. It is handed a [`ResultPool`] when created
/// and draws from it for every published result, so the pool's ceiling bounds how many results
/// can be in flight across every component that shares it.
///
/// # Example
///
/// ```rust
/// use dnn_record::{ClassificationResult, Classifier, ResultPool};
///
/// let results = ResultPool::builder().pre_allocate(2).max_count(2).build();
/// let classifier = Classifier::new(results.clone(), ["cat", "dog"], None);
///
/// let published = classifier.publish(&[0.3, 0.7]).unwrap();
///
/// let top: &ClassificationResult = published.result_ref().unwrap();
/// assert_eq!(top.class_name, "dog");
/// assert_eq!(results.checked_out(), 1);
/// ```
#[derive(Clone, Debug)]
pub struct Classifier {
    results: ResultPool,
    labels: Arc<[String]>,
    wait: Option<Duration>,
}

impl Classifier {
    /// Creates a classifier drawing records from `results`.
    ///
    /// `wait` bounds how long [`publish()`][Self::publish] waits for a record when the pool is at
    /// its ceiling; `None` waits indefinitely.
    #[must_use]
    pub fn new<I, S>(results: ResultPool, labels: I, wait: Option<Duration>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let labels: Arc<[String]> = labels.into_iter().map(Into::into).collect();

        debug!(labels = labels.len(), "created classifier");

        Self {
            results,
            labels,
            wait,
        }
    }

    /// Stores the top-scoring class as the primary payload of a pooled record.
    ///
    /// Returns `None` if `scores` has no usable value or no record became available in time.
    /// The record returns to the pool when the last clone of the returned handle is dropped.
    #[must_use]
    pub fn publish(&self, scores: &[f32]) -> Option<Recycled<DnnResult>> {
        let top = ClassificationResult::top1(scores, &*self.labels)?;

        let Some(mut record) = self.results.acquire_or_create(self.wait) else {
            trace!(wait = ?self.wait, "no result record available");
            return None;
        };

        // The well-known key is never empty, so this cannot fail.
        record.set_result(top).ok()?;

        Some(record.into_shared())
    }
}
