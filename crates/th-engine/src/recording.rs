//! Append-only capture of emitted samples.

use std::sync::Arc;

/// Immutable snapshot of a recording.
pub type Recording = Arc<[i16]>;

/// Every sample sent to the sink since the last clear, in emission order.
#[derive(Clone, Debug, Default)]
pub struct RecordingBuffer {
    samples: Vec<i16>,
}

impl RecordingBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-size for `capacity` samples so appends stay allocation-free.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            samples: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, sample: i16) {
        self.samples.push(sample);
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[i16] {
        &self.samples
    }

    /// Copy out the current contents.
    pub fn snapshot(&self) -> Recording {
        Arc::from(self.samples.as_slice())
    }

    /// Replace with an empty buffer, returning what was recorded.
    pub fn clear(&mut self) -> Vec<i16> {
        std::mem::take(&mut self.samples)
    }

    pub fn into_samples(self) -> Vec<i16> {
        self.samples
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_is_detached() {
        let mut rec = RecordingBuffer::new();
        rec.push(1);
        rec.push(-2);
        let snap = rec.snapshot();
        rec.push(3);
        assert_eq!(&snap[..], &[1, -2]);
        assert_eq!(rec.samples(), &[1, -2, 3]);
    }

    #[test]
    fn clear_restarts_at_zero() {
        let mut rec = RecordingBuffer::new();
        rec.push(7);
        rec.push(8);
        assert_eq!(rec.clear(), vec![7, 8]);
        assert!(rec.is_empty());
        rec.push(9);
        assert_eq!(rec.samples(), &[9]);
    }
}
