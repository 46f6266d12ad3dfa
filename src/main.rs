//! theremin: scripted pointer glide on the default output device.
//!
//! Loads `./theremin.toml` when present, glides the pointer across the
//! control surface once in the configured mode and once quantized, then
//! writes the take to `theremin.wav`. Set `RUST_LOG=debug` to see every
//! output frequency.

use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;
use std::time::Duration;
use th_master::{save_wav, Instrument, InstrumentConfig, OutputMode};

#[cfg(feature = "alloc_check")]
#[global_allocator]
static A: assert_no_alloc::AllocDisabler = assert_no_alloc::AllocDisabler;

const CONFIG_PATH: &str = "theremin.toml";
const WAV_PATH: &str = "theremin.wav";

/// Pointer updates per second of glide.
const UPDATES_PER_SECOND: u32 = 50;
const GLIDE_SECONDS: u32 = 3;

fn load_config() -> Result<InstrumentConfig> {
    let path = Path::new(CONFIG_PATH);
    if path.exists() {
        log::info!("Using {}", path.display());
        InstrumentConfig::load(path).with_context(|| format!("loading {}", path.display()))
    } else {
        log::debug!("No {}, using defaults", CONFIG_PATH);
        Ok(InstrumentConfig::default())
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let config = load_config()?;
    let sample_rate = config.sample_rate;

    let mut inst = Instrument::new(config)?;
    inst.start().context("opening audio output")?;

    let first = inst.mode();
    glide(&mut inst);
    inst.set_mode(match first {
        OutputMode::Continuous => OutputMode::Discrete,
        OutputMode::Discrete => OutputMode::Continuous,
    });
    glide(&mut inst);

    let recording = inst.stop().map(|r| r.into_samples()).unwrap_or_default();
    println!("Recorded {} samples", recording.len());
    save(Path::new(WAV_PATH), &recording, sample_rate)
}

/// Sweep the pointer left to right at a fixed height, then pause.
fn glide(inst: &mut Instrument) {
    let active = inst.active_scale();
    println!(
        "{:?}: {} in {} ({} notes)",
        inst.mode(),
        active.scale(),
        active.key(),
        active.notes().len()
    );

    let steps = UPDATES_PER_SECOND * GLIDE_SECONDS;
    let interval = Duration::from_secs(1) / UPDATES_PER_SECOND;

    inst.play();
    for i in 0..=steps {
        let freq = inst.set_pointer(i as f64 / steps as f64, 0.3);
        print!("\r{:8.2} Hz", freq);
        let _ = std::io::stdout().flush();
        std::thread::sleep(interval);
    }
    inst.pause();
    println!("\rDone.          ");
}

fn save(path: &Path, samples: &[i16], sample_rate: u32) -> Result<()> {
    println!("Writing {}...", path.display());
    let outcome = save_wav(path, samples, sample_rate, |done, total| {
        if total > 0 {
            print!("\r{:3}%", done * 100 / total);
            let _ = std::io::stdout().flush();
        }
        true
    })
    .with_context(|| format!("writing {}", path.display()))?;
    println!("\rWrote {} samples", outcome.samples_written());
    Ok(())
}
