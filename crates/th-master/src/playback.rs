//! Real-time playback loop.
//!
//! The engine pulls one sample per iteration from the tone generator,
//! writes it to the sink and appends it to the recording. The sink's
//! blocking write paces the loop.

use crossbeam_channel::{Receiver, Sender};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use th_audio::{AudioSink, MemorySink};
use th_engine::{to_pcm, Recording, RecordingBuffer, ToneGenerator, ToneTarget};

/// Flags shared between the playback loop and its controller.
#[derive(Debug)]
pub struct Transport {
    paused: AtomicBool,
    stop: AtomicBool,
    emitted: AtomicU64,
}

impl Transport {
    /// New transport, paused.
    pub fn new() -> Self {
        Self {
            paused: AtomicBool::new(true),
            stop: AtomicBool::new(false),
            emitted: AtomicU64::new(0),
        }
    }

    pub fn play(&self) {
        self.paused.store(false, Ordering::Release);
    }

    pub fn pause(&self) {
        self.paused.store(true, Ordering::Release);
    }

    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::Acquire)
    }

    pub fn request_stop(&self) {
        self.stop.store(true, Ordering::Release);
    }

    pub fn stop_requested(&self) -> bool {
        self.stop.load(Ordering::Acquire)
    }

    /// Samples written to the sink since the engine started.
    pub fn emitted(&self) -> u64 {
        self.emitted.load(Ordering::Relaxed)
    }
}

impl Default for Transport {
    fn default() -> Self {
        Self::new()
    }
}

/// Requests serviced by the loop between samples.
#[derive(Debug)]
pub enum EngineCommand {
    /// Reply with a copy of the recording
    Snapshot(Sender<Recording>),
    /// Drop everything recorded so far
    ClearRecording,
}

/// Outcome of one loop iteration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    /// One sample written and recorded
    Emitted(i16),
    /// Paused; nothing written
    Idle,
    /// Stop was requested
    Stopped,
}

/// Drives a tone generator into a sink, recording every sample.
pub struct PlaybackEngine<S: AudioSink> {
    sink: S,
    tone: ToneGenerator,
    recording: RecordingBuffer,
    transport: Arc<Transport>,
    commands: Receiver<EngineCommand>,
    idle_poll: Duration,
}

impl<S: AudioSink> PlaybackEngine<S> {
    pub fn new(
        sink: S,
        target: Arc<ToneTarget>,
        transport: Arc<Transport>,
        commands: Receiver<EngineCommand>,
    ) -> Self {
        let tone = ToneGenerator::new(target, sink.sample_rate());
        Self {
            sink,
            tone,
            recording: RecordingBuffer::new(),
            transport,
            commands,
            idle_poll: Duration::from_millis(10),
        }
    }

    pub fn with_idle_poll(mut self, idle_poll: Duration) -> Self {
        self.idle_poll = idle_poll;
        self
    }

    /// Reserve recording space so the first `samples` appends don't allocate.
    pub fn reserve_recording(&mut self, samples: usize) {
        self.recording = RecordingBuffer::with_capacity(samples);
    }

    pub fn recording(&self) -> &RecordingBuffer {
        &self.recording
    }

    pub fn tone(&self) -> &ToneGenerator {
        &self.tone
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Run one iteration.
    pub fn step(&mut self) -> Step {
        self.service_commands();

        if self.transport.stop_requested() {
            return Step::Stopped;
        }
        if self.transport.is_paused() {
            self.tone.pause();
            return Step::Idle;
        }
        self.tone.unmute();

        let value = self.next_pcm();
        self.sink.write(&[value]);
        self.recording.push(value);
        self.transport.emitted.fetch_add(1, Ordering::Relaxed);
        Step::Emitted(value)
    }

    /// Emit up to `samples` samples, stopping early if paused or stopped.
    pub fn render(&mut self, samples: usize) -> usize {
        let mut emitted = 0;
        while emitted < samples {
            match self.step() {
                Step::Emitted(_) => emitted += 1,
                Step::Idle | Step::Stopped => break,
            }
        }
        emitted
    }

    /// Loop until stopped, then hand back the recording.
    pub fn run(mut self) -> RecordingBuffer {
        loop {
            match self.step() {
                Step::Emitted(_) => {}
                Step::Idle => std::thread::sleep(self.idle_poll),
                Step::Stopped => break,
            }
        }
        if let Err(e) = self.sink.stop() {
            log::warn!("Failed to stop audio sink: {}", e);
        }
        self.recording
    }

    /// Give up the engine without running it, keeping the recording.
    pub fn into_recording(self) -> RecordingBuffer {
        self.recording
    }

    #[cfg(not(feature = "alloc_check"))]
    fn next_pcm(&mut self) -> i16 {
        to_pcm(self.tone.next_sample())
    }

    #[cfg(feature = "alloc_check")]
    fn next_pcm(&mut self) -> i16 {
        let tone = &mut self.tone;
        assert_no_alloc::assert_no_alloc(|| to_pcm(tone.next_sample()))
    }

    fn service_commands(&mut self) {
        while let Ok(command) = self.commands.try_recv() {
            match command {
                EngineCommand::Snapshot(reply) => {
                    let _ = reply.send(self.recording.snapshot());
                }
                EngineCommand::ClearRecording => {
                    let dropped = self.recording.clear();
                    log::debug!("Cleared {} recorded samples", dropped.len());
                }
            }
        }
    }
}

/// Render `samples` of the tone at `target` without an audio device.
///
/// Returns exactly what a device sink would have been fed.
pub fn render_offline(target: Arc<ToneTarget>, sample_rate: u32, samples: usize) -> Vec<i16> {
    let (sink, written) = MemorySink::unbounded(sample_rate);
    drop(written);
    let transport = Arc::new(Transport::new());
    let (_commands, rx) = crossbeam_channel::unbounded();
    let mut engine = PlaybackEngine::new(sink, target, Arc::clone(&transport), rx);
    engine.reserve_recording(samples);
    transport.play();
    engine.render(samples);
    engine.into_recording().into_samples()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::{bounded, unbounded};

    struct Rig {
        engine: PlaybackEngine<MemorySink>,
        written: Receiver<i16>,
        target: Arc<ToneTarget>,
        transport: Arc<Transport>,
        commands: Sender<EngineCommand>,
    }

    fn rig(frequency: f64, volume: f64) -> Rig {
        let (sink, written) = MemorySink::unbounded(44100);
        let target = Arc::new(ToneTarget::new(frequency, volume));
        let transport = Arc::new(Transport::new());
        let (commands, rx) = unbounded();
        let engine = PlaybackEngine::new(sink, Arc::clone(&target), Arc::clone(&transport), rx);
        Rig {
            engine,
            written,
            target,
            transport,
            commands,
        }
    }

    #[test]
    fn starts_paused_and_idle() {
        let mut r = rig(440.0, 1.0);
        assert_eq!(r.engine.step(), Step::Idle);
        assert!(r.engine.recording().is_empty());
        assert!(r.written.try_recv().is_err());
    }

    #[test]
    fn records_exactly_what_it_writes() {
        let mut r = rig(440.0, 0.5);
        r.transport.play();
        assert_eq!(r.engine.render(1000), 1000);
        let written: Vec<i16> = r.written.try_iter().collect();
        assert_eq!(written.len(), 1000);
        assert_eq!(r.engine.recording().samples(), written.as_slice());
        assert_eq!(r.transport.emitted(), 1000);
    }

    #[test]
    fn pause_emits_nothing_and_resumes_in_phase() {
        let mut r = rig(441.0, 1.0);
        r.transport.play();
        r.engine.render(30);
        r.transport.pause();
        for _ in 0..50 {
            assert_eq!(r.engine.step(), Step::Idle);
        }
        assert_eq!(r.engine.recording().len(), 30);

        r.transport.play();
        r.engine.render(30);
        let rec = r.engine.recording().samples().to_vec();
        let mut fresh = rig(441.0, 1.0);
        fresh.transport.play();
        fresh.engine.render(60);
        assert_eq!(rec, fresh.engine.recording().samples());
    }

    #[test]
    fn clear_restarts_recording() {
        let mut r = rig(440.0, 1.0);
        r.transport.play();
        r.engine.render(100);
        r.commands.send(EngineCommand::ClearRecording).unwrap();
        r.engine.render(10);
        assert_eq!(r.engine.recording().len(), 10);
        assert_eq!(r.written.try_iter().count(), 110);
    }

    #[test]
    fn snapshot_is_served_between_samples() {
        let mut r = rig(440.0, 1.0);
        r.transport.play();
        r.engine.render(64);
        let (reply, snapshot) = bounded(1);
        r.commands.send(EngineCommand::Snapshot(reply)).unwrap();
        r.engine.render(1);
        let snap = snapshot.recv().unwrap();
        assert_eq!(snap.len(), 64);
        assert_eq!(&snap[..], &r.engine.recording().samples()[..64]);
    }

    #[test]
    fn stop_ends_run_and_returns_recording() {
        let mut r = rig(440.0, 1.0);
        r.transport.play();
        r.engine.render(500);
        r.transport.request_stop();
        assert_eq!(r.engine.step(), Step::Stopped);
        let recording = r.engine.run();
        assert_eq!(recording.len(), 500);
    }

    #[test]
    fn retarget_reaches_output() {
        let mut r = rig(100.0, 1.0);
        r.transport.play();
        r.engine.render(10);
        r.target.set(1000.0, 1.0);
        r.engine.render(2000);
        assert_eq!(r.engine.tone().committed_frequency(), 1000.0);
    }

    #[test]
    fn offline_render_matches_requested_length() {
        let target = Arc::new(ToneTarget::new(440.0, 0.5));
        let pcm = render_offline(Arc::clone(&target), 44100, 44100);
        assert_eq!(pcm.len(), 44100);
        let peak = pcm.iter().map(|s| s.abs()).max().unwrap();
        assert!(peak > 15000 && peak <= (0.5 * 0.95 * 32767.0) as i16);
    }

    #[test]
    fn sixteen_bit_scaling_uses_full_range() {
        let mut r = rig(441.0, 1.0);
        r.transport.play();
        r.engine.render(100);
        let peak = r.engine.recording().samples().iter().map(|s| s.abs()).max().unwrap();
        // Peak of a 441 Hz sine lands exactly on a sample at 44.1 kHz.
        assert_eq!(peak, (0.95 * 32767.0) as i16);
    }
}
