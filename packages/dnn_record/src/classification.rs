use recycle_pool::Reset;

/// The most likely class for one input.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ClassificationResult {
    /// Confidence of the winning class.
    pub max_conf: f32,

    /// Index of the winning class in the model's label set.
    pub class_id: i32,

    /// Human-readable name of the winning class, empty if unknown.
    pub class_name: String,
}

impl ClassificationResult {
    /// Picks the highest-scoring class from raw per-class `scores`.
    ///
    /// `labels` supplies class names by index; classes without a label get an empty name.
    /// Returns `None` if `scores` is empty or contains only NaN values.
    ///
    /// # Example
    ///
    /// ```rust
    /// use dnn_record::ClassificationResult;
    ///
    /// let top = ClassificationResult::top1(&[0.1, 0.7, 0.2], &["cat", "dog", "fox"]).unwrap();
    ///
    /// assert_eq!(top.class_id, 1);
    /// assert_eq!(top.class_name, "dog");
    /// ```
    #[must_use]
    pub fn top1<L: AsRef<str>>(scores: &[f32], labels: &[L]) -> Option<Self> {
        let (index, max_conf) = scores
            .iter()
            .copied()
            .enumerate()
            .filter(|(_, score)| !score.is_nan())
            .max_by(|(_, a), (_, b)| a.total_cmp(b))?;

        Some(Self {
            max_conf,
            class_id: i32::try_from(index).ok()?,
            class_name: labels
                .get(index)
                .map(|label| label.as_ref().to_owned())
                .unwrap_or_default(),
        })
    }
}

/// A raw embedding produced by a feature-extraction head.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FeatureResult {
    /// Quantized feature vector.
    pub features: Vec<i8>,
}

impl Reset for FeatureResult {
    fn reset(&mut self) {
        self.features.clear();
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    const NO_LABELS: &[&str] = &[];

    #[test]
    fn top1_picks_highest_score() {
        let top = ClassificationResult::top1(&[0.2, 0.1, 0.6, 0.1], &["a", "b", "c", "d"]).unwrap();

        assert_eq!(top.class_id, 2);
        assert_eq!(top.class_name, "c");
        assert!((top.max_conf - 0.6).abs() < f32::EPSILON);
    }

    #[test]
    fn top1_without_label_has_empty_name() {
        let top = ClassificationResult::top1(&[0.1, 0.9], &["only_first"]).unwrap();

        assert_eq!(top.class_id, 1);
        assert!(top.class_name.is_empty());
    }

    #[test]
    fn top1_ignores_nan() {
        let top = ClassificationResult::top1(&[f32::NAN, 0.3], NO_LABELS).unwrap();
        assert_eq!(top.class_id, 1);

        assert!(ClassificationResult::top1(&[f32::NAN], NO_LABELS).is_none());
        assert!(ClassificationResult::top1(&[], NO_LABELS).is_none());
    }

    #[test]
    fn feature_reset_keeps_capacity() {
        let mut result = FeatureResult {
            features: Vec::with_capacity(512),
        };
        result.features.push(1);

        result.reset();

        assert!(result.features.is_empty());
        assert!(result.features.capacity() >= 512);
    }
}
