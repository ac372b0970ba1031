use property_store::PropertyStore;
use recycle_pool::Reset;

/// A reusable input record: a byte buffer plus open-ended metadata.
///
/// The buffer keeps its capacity across resets, which is what makes recycling inputs through
/// an [`InputPool`][crate::InputPool] cheaper than allocating a new one per request.
#[derive(Clone, Debug, Default)]
pub struct DnnInput {
    /// Raw input bytes, e.g. an encoded or preprocessed image.
    pub data: Vec<u8>,

    /// Image height in pixels, zero if not an image.
    pub height: u32,

    /// Image width in pixels, zero if not an image.
    pub width: u32,

    /// Caller-defined metadata such as frame ids or timestamps.
    pub metadata: PropertyStore,
}

impl DnnInput {
    /// Creates an input whose buffer can hold `capacity` bytes without reallocating.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
            ..Self::default()
        }
    }
}

impl Reset for DnnInput {
    fn reset(&mut self) {
        self.data.clear();
        self.height = 0;
        self.width = 0;
        self.metadata.clear();
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn reset_clears_everything_but_capacity() {
        let mut input = DnnInput::with_capacity(1024);
        input.data.extend_from_slice(&[1, 2, 3]);
        input.height = 480;
        input.width = 640;
        input.metadata.set("frame_id", 9_u64).unwrap();

        input.reset();

        assert!(input.data.is_empty());
        assert!(input.data.capacity() >= 1024);
        assert_eq!((input.height, input.width), (0, 0));
        assert!(input.metadata.is_empty());
    }
}
