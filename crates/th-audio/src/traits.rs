//! Audio sink trait and error types.

/// Error type for audio operations.
#[derive(Debug)]
pub enum AudioError {
    /// Failed to initialize audio device
    DeviceInit(String),
    /// Device reports a config with no output channels
    UnsupportedConfig(String),
    /// Failed to create audio stream
    StreamCreate(String),
    /// Playback error
    Playback(String),
    /// No audio device available
    NoDevice,
}

impl std::fmt::Display for AudioError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AudioError::DeviceInit(msg) => write!(f, "Device init error: {}", msg),
            AudioError::UnsupportedConfig(msg) => write!(f, "Unsupported config: {}", msg),
            AudioError::StreamCreate(msg) => write!(f, "Stream create error: {}", msg),
            AudioError::Playback(msg) => write!(f, "Playback error: {}", msg),
            AudioError::NoDevice => write!(f, "No audio device available"),
        }
    }
}

impl std::error::Error for AudioError {}

/// Sequential mono 16-bit PCM writer.
pub trait AudioSink {
    /// Get the sample rate.
    fn sample_rate(&self) -> u32;

    /// Samples that can be written right now without waiting.
    fn free_capacity(&self) -> usize;

    /// Write samples in order, blocking until every sample is accepted.
    fn write(&mut self, samples: &[i16]);

    /// Start playback.
    fn start(&mut self) -> Result<(), AudioError>;

    /// Stop playback.
    fn stop(&mut self) -> Result<(), AudioError>;
}
