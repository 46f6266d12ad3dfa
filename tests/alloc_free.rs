//! Allocation-free sample path tests.
//!
//! These check that producing a sample, quantizing a control update and
//! stepping the playback loop never touch the heap once set up.
//!
//! Just run `cargo test`; no feature flags needed.

use assert_no_alloc::{assert_no_alloc, AllocDisabler};

#[cfg(debug_assertions)]
#[global_allocator]
static A: AllocDisabler = AllocDisabler;

use std::sync::Arc;
use th_audio::MemorySink;
use th_engine::{Key, NoteTable, Scale, ScaleFilter, ToneGenerator, ToneTarget};
use th_master::{PlaybackEngine, Transport};

#[test]
fn tone_generator_alloc_free() {
    let target = Arc::new(ToneTarget::new(440.0, 0.8));
    let mut tone = ToneGenerator::new(Arc::clone(&target), 44100);
    tone.unmute();

    assert_no_alloc(|| {
        for i in 0..44100 * 5 {
            if i % 1000 == 0 {
                target.set(200.0 + (i / 1000) as f64, 0.8);
            }
            tone.next_sample();
        }
    });
}

#[test]
fn quantize_alloc_free() {
    let filter = ScaleFilter::new(NoteTable::standard(), Scale::Blues, Key::E).unwrap();
    // First load registers this thread with the swap slot.
    filter.quantize(440.0);

    assert_no_alloc(|| {
        let mut f = 20.0;
        while f < 2000.0 {
            filter.quantize(f);
            f += 0.5;
        }
    });
}

#[test]
fn playback_step_alloc_free() {
    let samples = 44100 * 2;
    let (sink, _rx) = MemorySink::bounded(44100, samples);
    let target = Arc::new(ToneTarget::new(330.0, 0.5));
    let transport = Arc::new(Transport::new());
    let (_commands, command_rx) = crossbeam_channel::unbounded();
    let mut engine = PlaybackEngine::new(sink, Arc::clone(&target), Arc::clone(&transport), command_rx);
    engine.reserve_recording(samples);
    transport.play();

    let emitted = assert_no_alloc(|| engine.render(samples));
    assert_eq!(emitted, samples);
}
