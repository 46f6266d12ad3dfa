//! WAV export for 16-bit mono PCM.

use std::io::{Cursor, Seek, Write};
use std::path::Path;

/// Samples written between progress callbacks.
pub const PROGRESS_INTERVAL: usize = 256;

/// Error writing a recording.
#[derive(Debug)]
pub enum ExportError {
    Wav(hound::Error),
}

impl std::fmt::Display for ExportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportError::Wav(e) => write!(f, "WAV export error: {}", e),
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExportError::Wav(e) => Some(e),
        }
    }
}

impl From<hound::Error> for ExportError {
    fn from(e: hound::Error) -> Self {
        ExportError::Wav(e)
    }
}

/// How an export ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportOutcome {
    /// Every sample was written
    Complete(usize),
    /// The progress callback asked to stop; the file holds this many samples
    Cancelled(usize),
}

impl ExportOutcome {
    pub fn samples_written(&self) -> usize {
        match *self {
            ExportOutcome::Complete(n) | ExportOutcome::Cancelled(n) => n,
        }
    }
}

fn spec(sample_rate: u32) -> hound::WavSpec {
    hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    }
}

/// Write `samples` in order as a mono 16-bit WAV.
///
/// `progress` is called with `(written, total)` every
/// [`PROGRESS_INTERVAL`] samples; returning `false` stops the export and
/// finalizes a shorter, still valid file.
pub fn write_wav<W, P>(
    w: W,
    samples: &[i16],
    sample_rate: u32,
    mut progress: P,
) -> Result<ExportOutcome, ExportError>
where
    W: Write + Seek,
    P: FnMut(usize, usize) -> bool,
{
    let mut writer = hound::WavWriter::new(w, spec(sample_rate))?;
    let total = samples.len();

    let mut written = 0;
    for &sample in samples {
        if written % PROGRESS_INTERVAL == 0 && !progress(written, total) {
            writer.finalize()?;
            return Ok(ExportOutcome::Cancelled(written));
        }
        writer.write_sample(sample)?;
        written += 1;
    }
    progress(written, total);

    writer.finalize()?;
    Ok(ExportOutcome::Complete(written))
}

/// Encode `samples` to an in-memory WAV file.
pub fn samples_to_wav(samples: &[i16], sample_rate: u32) -> Result<Vec<u8>, ExportError> {
    let mut buf = Cursor::new(Vec::new());
    write_wav(&mut buf, samples, sample_rate, |_, _| true)?;
    Ok(buf.into_inner())
}

/// Save `samples` to `path`.
pub fn save_wav<P>(
    path: &Path,
    samples: &[i16],
    sample_rate: u32,
    progress: P,
) -> Result<ExportOutcome, ExportError>
where
    P: FnMut(usize, usize) -> bool,
{
    let file = std::io::BufWriter::new(std::fs::File::create(path).map_err(hound::Error::IoError)?);
    let outcome = write_wav(file, samples, sample_rate, progress)?;
    log::info!(
        "Saved {} samples to {}",
        outcome.samples_written(),
        path.display()
    );
    Ok(outcome)
}
