use std::cmp::Ordering;

use recycle_pool::Reset;

/// One detected object as an axis-aligned box in image coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PerceptionRect {
    /// Left edge.
    pub left: f32,
    /// Top edge.
    pub top: f32,
    /// Right edge.
    pub right: f32,
    /// Bottom edge.
    pub bottom: f32,
    /// Detection confidence.
    pub conf: f32,
    /// Class of the detected object.
    pub object_type: i32,
    /// Which perception task produced the box.
    pub perception_type: i32,
    /// Scale factor applied to `conf` by the producing model.
    pub conf_scale: i32,
    /// Pixels the box was expanded by during post-processing.
    pub expand: i32,
    /// Output branch of the model that produced the box.
    pub branch: i32,
}

impl PerceptionRect {
    /// Width of the box, zero if the edges are inverted.
    #[must_use]
    pub fn width(&self) -> f32 {
        (self.right - self.left).max(0.0)
    }

    /// Height of the box, zero if the edges are inverted.
    #[must_use]
    pub fn height(&self) -> f32 {
        (self.bottom - self.top).max(0.0)
    }

    /// Orders boxes by descending confidence.
    #[must_use]
    pub fn by_confidence_desc(a: &Self, b: &Self) -> Ordering {
        b.conf.total_cmp(&a.conf)
    }
}

/// All objects detected in one input.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DetectionResult {
    /// Detected boxes, in no particular order unless sorted.
    pub boxes: Vec<PerceptionRect>,
}

impl DetectionResult {
    /// Sorts the boxes so the most confident come first.
    pub fn sort_by_confidence(&mut self) {
        self.boxes.sort_by(PerceptionRect::by_confidence_desc);
    }

    /// Drops every box with confidence below `threshold`.
    pub fn retain_confident(&mut self, threshold: f32) {
        self.boxes.retain(|rect| rect.conf >= threshold);
    }
}

impl Reset for DetectionResult {
    fn reset(&mut self) {
        self.boxes.clear();
    }
}
