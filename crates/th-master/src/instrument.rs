//! The instrument controller.
//!
//! Receives control input, optionally quantizes it against the active
//! scale, and publishes the result to the tone target read by the playback
//! thread. Owns the playback thread once started.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use th_audio::{AudioError, AudioSink, CpalOutput};
use th_engine::{
    master_gain, pointer_amplitude, pointer_frequency, ActiveScale, Key, NoteTable, OutputMode,
    Recording, RecordingBuffer, Scale, ScaleFilter, TableError, ToneTarget,
};

use crate::config::{ConfigError, InstrumentConfig};
use crate::player::{PlaybackError, Player};
use crate::wav::{self, ExportError, ExportOutcome};

/// Frequency the oscillator idles at before any input.
pub const INITIAL_FREQUENCY: f64 = 20.0;

/// Error building an [`Instrument`].
#[derive(Debug)]
pub enum InstrumentError {
    /// The configuration failed validation
    Config(ConfigError),
    /// The note table or initial scale couldn't be built
    Table(TableError),
}

impl std::fmt::Display for InstrumentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InstrumentError::Config(e) => write!(f, "{}", e),
            InstrumentError::Table(e) => write!(f, "Note table error: {}", e),
        }
    }
}

impl std::error::Error for InstrumentError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            InstrumentError::Config(e) => Some(e),
            InstrumentError::Table(e) => Some(e),
        }
    }
}

impl From<ConfigError> for InstrumentError {
    fn from(e: ConfigError) -> Self {
        InstrumentError::Config(e)
    }
}

impl From<TableError> for InstrumentError {
    fn from(e: TableError) -> Self {
        InstrumentError::Table(e)
    }
}

/// Control-side state of the theremin.
pub struct Instrument {
    config: InstrumentConfig,
    filter: ScaleFilter,
    target: Arc<ToneTarget>,
    mode: OutputMode,
    /// Last control-surface frequency, before quantization
    frequency: f64,
    /// Last control-surface amplitude, before master gain
    amplitude: f64,
    master_gain: f64,
    player: Option<Player>,
}

impl Instrument {
    /// Build from `config`, rejecting it if it fails validation.
    pub fn new(config: InstrumentConfig) -> Result<Self, InstrumentError> {
        config.validate()?;
        let table = NoteTable::with_octaves(config.octaves);
        let filter = ScaleFilter::new(table, config.initial_scale, config.initial_key)?;
        let master_gain = master_gain(config.master_volume);

        Ok(Self {
            mode: config.initial_mode,
            config,
            filter,
            target: Arc::new(ToneTarget::new(INITIAL_FREQUENCY, 0.0)),
            frequency: INITIAL_FREQUENCY,
            amplitude: 0.0,
            master_gain,
            player: None,
        })
    }

    pub fn config(&self) -> &InstrumentConfig {
        &self.config
    }

    /// The slot read by the playback thread.
    pub fn target(&self) -> Arc<ToneTarget> {
        Arc::clone(&self.target)
    }

    pub fn mode(&self) -> OutputMode {
        self.mode
    }

    pub fn active_scale(&self) -> Arc<ActiveScale> {
        self.filter.active()
    }

    pub fn master_gain(&self) -> f64 {
        self.master_gain
    }

    // --- Selection ---

    pub fn set_mode(&mut self, mode: OutputMode) {
        self.mode = mode;
        log::info!("Output mode: {:?}", mode);
        self.reapply();
    }

    pub fn set_scale(&mut self, scale: Scale) -> Result<(), TableError> {
        let active = self.filter.set_scale(scale)?;
        log::info!("Scale: {} ({} notes)", scale, active.notes().len());
        self.reapply();
        Ok(())
    }

    pub fn set_key(&mut self, key: Key) -> Result<(), TableError> {
        let active = self.filter.set_key(key)?;
        log::info!("Key: {} ({} notes)", key, active.notes().len());
        self.reapply();
        Ok(())
    }

    /// Set the master volume slider (1 to 10) and re-send the current tone.
    pub fn set_master_volume(&mut self, slider: f64) {
        self.master_gain = master_gain(slider);
        self.reapply();
    }

    // --- Control input ---

    /// Apply a control update and return the frequency sent to the oscillator.
    pub fn set_tone(&mut self, frequency: f64, amplitude: f64) -> f64 {
        self.frequency = frequency;
        self.amplitude = amplitude;

        let output = match self.mode {
            OutputMode::Discrete => self.filter.quantize(frequency),
            OutputMode::Continuous => frequency,
        };
        let volume = amplitude * self.master_gain;
        log::debug!(
            "Output frequency: {:.2} Hz - volume {:.2}%",
            output,
            volume * 100.0
        );

        self.target.set(output, volume);
        output
    }

    /// Apply a pointer position on the control surface, both axes in [0, 1]
    /// with the origin at the top left.
    pub fn set_pointer(&mut self, x: f64, y: f64) -> f64 {
        let frequency = pointer_frequency(x, self.config.frequency_range());
        self.set_tone(frequency, pointer_amplitude(y))
    }

    fn reapply(&mut self) {
        self.set_tone(self.frequency, self.amplitude);
    }

    // --- Playback ---

    /// Start playback on the default audio device, paused.
    pub fn start(&mut self) -> Result<(), PlaybackError> {
        let sample_rate = self.config.sample_rate;
        let buffer_ms = self.config.buffer_ms;
        self.start_with(move || CpalOutput::open(sample_rate, buffer_ms))
    }

    /// Start playback into the sink returned by `open`, paused.
    pub fn start_with<S, F>(&mut self, open: F) -> Result<(), PlaybackError>
    where
        S: AudioSink + 'static,
        F: FnOnce() -> Result<S, AudioError> + Send + 'static,
    {
        self.stop();
        let idle_poll = Duration::from_millis(self.config.idle_poll_ms);
        self.player = Some(Player::spawn(open, self.target(), idle_poll)?);
        Ok(())
    }

    pub fn is_started(&self) -> bool {
        self.player.is_some()
    }

    pub fn play(&self) {
        if let Some(player) = &self.player {
            player.play();
        }
    }

    pub fn pause(&self) {
        if let Some(player) = &self.player {
            player.pause();
        }
    }

    pub fn is_playing(&self) -> bool {
        self.player.as_ref().is_some_and(|p| !p.is_paused())
    }

    /// Samples emitted by the current playback thread.
    pub fn emitted(&self) -> u64 {
        self.player.as_ref().map_or(0, Player::emitted)
    }

    /// Stop the playback thread, returning what it recorded.
    pub fn stop(&mut self) -> Option<RecordingBuffer> {
        self.player.take().map(Player::stop)
    }

    // --- Recording ---

    pub fn recording(&self) -> Recording {
        self.player
            .as_ref()
            .map_or_else(|| Arc::from(Vec::new()), Player::recording)
    }

    pub fn clear_recording(&self) {
        if let Some(player) = &self.player {
            player.clear_recording();
        }
    }

    /// Write the recording so far to `path`.
    pub fn save_recording<P>(&self, path: &Path, progress: P) -> Result<ExportOutcome, ExportError>
    where
        P: FnMut(usize, usize) -> bool,
    {
        let recording = self.recording();
        wav::save_wav(path, &recording, self.config.sample_rate, progress)
    }
}

impl Drop for Instrument {
    fn drop(&mut self) {
        self.stop();
    }
}
