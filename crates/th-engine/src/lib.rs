//! Tone generation and pitch quantization core for the theremin.
//!
//! Everything in this crate is device-free: a continuous control signal is
//! optionally snapped to a musical scale, published to a shared target slot,
//! and turned into samples by a phase-continuous sine oscillator.

mod control;
mod error;
mod note_table;
mod quantizer;
mod recording;
mod scale;
mod scale_filter;
mod target;
mod tone;

pub use control::{master_gain, pointer_amplitude, pointer_frequency, FrequencyRange};
pub use error::TableError;
pub use note_table::{
    Note, NoteTable, BASE_FREQUENCIES, BASE_LABELS, DEFAULT_OCTAVES, NOTES_PER_OCTAVE,
};
pub use quantizer::CandidateTones;
pub use recording::{Recording, RecordingBuffer};
pub use scale::{Key, OutputMode, Scale};
pub use scale_filter::{ActiveScale, ScaleFilter};
pub use target::ToneTarget;
pub use tone::{to_pcm, ToneGenerator, ToneState, COMMIT_THRESHOLD, HEADROOM};

/// Output sample rate shared by the oscillator and the exported recording.
pub const SAMPLE_RATE: u32 = 44100;
