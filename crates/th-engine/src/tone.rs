//! Phase-continuous sine oscillator.
//!
//! Frequency changes requested through the shared [`ToneTarget`] are held
//! back until the playing waveform rises through zero, so the phase never
//! jumps. Volume changes apply on the next sample.

use std::f64::consts::TAU;
use std::sync::Arc;

use crate::target::ToneTarget;

/// Raw waveform magnitude below which a pending frequency may be committed.
pub const COMMIT_THRESHOLD: f64 = 0.01;

/// Output scale applied on top of volume so full volume stays off the rails.
pub const HEADROOM: f64 = 0.95;

/// Oscillator state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToneState {
    Silent,
    Playing,
}

/// Sine oscillator driven by a shared target.
pub struct ToneGenerator {
    target: Arc<ToneTarget>,
    sample_rate: f64,
    /// Samples since the last commit
    sample_clock: u64,
    committed_frequency: f64,
    /// Raw (unscaled) value of the previous sample
    last_raw: f64,
    state: ToneState,
}

impl ToneGenerator {
    /// Create a silent oscillator already committed to the target frequency.
    pub fn new(target: Arc<ToneTarget>, sample_rate: u32) -> Self {
        let committed_frequency = target.frequency();
        Self {
            target,
            sample_rate: sample_rate.max(1) as f64,
            sample_clock: 0,
            committed_frequency,
            last_raw: 0.0,
            state: ToneState::Silent,
        }
    }

    pub fn state(&self) -> ToneState {
        self.state
    }

    pub fn unmute(&mut self) {
        self.state = ToneState::Playing;
    }

    /// Go silent, keeping phase so playback resumes where it left off.
    pub fn pause(&mut self) {
        self.state = ToneState::Silent;
    }

    pub fn committed_frequency(&self) -> f64 {
        self.committed_frequency
    }

    pub fn sample_clock(&self) -> u64 {
        self.sample_clock
    }

    pub fn target(&self) -> &Arc<ToneTarget> {
        &self.target
    }

    /// Produce the next sample in [-1, 1].
    ///
    /// The sample is computed at the committed frequency. If the target
    /// differs and this sample is a rising crossing within
    /// [`COMMIT_THRESHOLD`] of zero, the new frequency is committed and the
    /// clock restarts, so the next sample begins the new frequency's cycle.
    /// While silent this returns 0 and leaves the oscillator untouched.
    pub fn next_sample(&mut self) -> f64 {
        if self.state == ToneState::Silent {
            return 0.0;
        }

        let raw = (TAU * self.committed_frequency * self.sample_clock as f64 / self.sample_rate).sin();
        let prev = self.last_raw;
        self.last_raw = raw;

        let pending = self.target.frequency();
        if pending != self.committed_frequency
            && raw.abs() < COMMIT_THRESHOLD
            && prev < raw
        {
            self.committed_frequency = pending;
            self.sample_clock = 0;
        }
        self.sample_clock += 1;

        raw * self.target.volume() * HEADROOM
    }
}

/// Scale a sample in [-1, 1] to signed 16-bit, truncating toward zero.
pub fn to_pcm(sample: f64) -> i16 {
    (sample * i16::MAX as f64) as i16
}
