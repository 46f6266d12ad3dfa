//! Headless controller for the theremin.
//!
//! Owns the scale filter, the shared tone target and the playback thread,
//! so a front end only has to forward pointer and selector events.

mod config;
mod instrument;
mod playback;
mod player;
mod wav;

// Re-export common types so callers don't need th-engine/th-audio directly.
pub use th_audio::{AudioError, AudioSink, CpalOutput, MemorySink};
pub use th_engine::{
    ActiveScale, FrequencyRange, Key, NoteTable, OutputMode, Recording, RecordingBuffer, Scale,
    TableError, ToneTarget,
};

pub use config::{ConfigError, InstrumentConfig};
pub use instrument::{Instrument, InstrumentError, INITIAL_FREQUENCY};
pub use playback::{render_offline, EngineCommand, PlaybackEngine, Step, Transport};
pub use player::{PlaybackError, Player};
pub use wav::{samples_to_wav, save_wav, write_wav, ExportError, ExportOutcome, PROGRESS_INTERVAL};
