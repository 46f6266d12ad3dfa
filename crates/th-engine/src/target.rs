//! Single-slot frequency/volume target shared between control and playback.

use std::sync::atomic::{AtomicU64, Ordering};

/// Last-writer-wins target for the oscillator.
///
/// Frequency and volume are stored as `f64` bit patterns. Each update
/// overwrites the slot; the playback side reads it fresh on every sample.
#[derive(Debug)]
pub struct ToneTarget {
    frequency: AtomicU64,
    volume: AtomicU64,
}

impl ToneTarget {
    pub fn new(frequency: f64, volume: f64) -> Self {
        let target = Self {
            frequency: AtomicU64::new(frequency.max(f64::MIN_POSITIVE).to_bits()),
            volume: AtomicU64::new(0f64.to_bits()),
        };
        target.set_volume(volume);
        target
    }

    /// Publish a new target. Never blocks.
    ///
    /// Non-positive or non-finite frequencies are ignored; volume is clamped
    /// to [0, 1]. The two fields are stored independently, so a reader
    /// racing this call may see the new volume with the old frequency for
    /// one sample. The oscillator only adopts a new frequency at its next
    /// rising zero crossing, so the mismatch is inaudible.
    pub fn set(&self, frequency: f64, volume: f64) {
        if frequency > 0.0 && frequency.is_finite() {
            self.frequency.store(frequency.to_bits(), Ordering::Release);
        }
        self.set_volume(volume);
    }

    pub fn set_volume(&self, volume: f64) {
        let volume = if volume.is_nan() { 0.0 } else { volume.clamp(0.0, 1.0) };
        self.volume.store(volume.to_bits(), Ordering::Release);
    }

    /// Pending frequency in Hz.
    pub fn frequency(&self) -> f64 {
        f64::from_bits(self.frequency.load(Ordering::Acquire))
    }

    pub fn volume(&self) -> f64 {
        f64::from_bits(self.volume.load(Ordering::Acquire))
    }
}
