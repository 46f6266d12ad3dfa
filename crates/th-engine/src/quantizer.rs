//! Nearest-tone search with partial snap.

use crate::error::TableError;

/// Non-empty, strictly ascending frequencies the quantizer snaps toward.
#[derive(Clone, Debug, PartialEq)]
pub struct CandidateTones {
    tones: Vec<f64>,
}

impl CandidateTones {
    pub fn new(tones: Vec<f64>) -> Result<Self, TableError> {
        if tones.is_empty() {
            return Err(TableError::EmptyCandidates);
        }
        if let Some(i) = tones.windows(2).position(|w| !(w[0] < w[1])) {
            return Err(TableError::Unsorted { index: i + 1 });
        }
        Ok(Self { tones })
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.tones
    }

    pub fn len(&self) -> usize {
        self.tones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tones.is_empty()
    }

    /// Map `input` toward the nearest candidate.
    ///
    /// Scans upward keeping the closest tone so far and stops at the first
    /// tone whose error is strictly larger than the best error; equal errors
    /// keep scanning without replacing the earlier tone. When the scan stops
    /// that way the result moves only halfway from the closest tone toward
    /// the input. A scan that runs off the top of the table returns the
    /// closest tone unmodified.
    pub fn quantize(&self, input: f64) -> f64 {
        let mut closest = self.tones[0];
        let mut err = f64::INFINITY;
        let mut adjustment = 0.0;

        for (i, &tone) in self.tones.iter().enumerate() {
            let tone_err = (input - tone).abs();
            if tone_err < err {
                closest = tone;
                err = tone_err;
            } else if tone_err > err {
                if i > 0 {
                    adjustment = (input - closest) / 2.0;
                }
                break;
            }
        }

        closest + adjustment
    }
}
