//! Playback thread handle.

use crossbeam_channel::{bounded, unbounded, Sender};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;
use th_audio::{AudioError, AudioSink};
use th_engine::{Recording, RecordingBuffer, ToneTarget};

use crate::playback::{EngineCommand, PlaybackEngine, Transport};

/// Error starting playback.
#[derive(Debug)]
pub enum PlaybackError {
    /// The sink couldn't be opened or started
    Audio(AudioError),
    /// The playback thread couldn't be spawned or died during startup
    Thread(String),
}

impl std::fmt::Display for PlaybackError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlaybackError::Audio(e) => write!(f, "Audio error: {}", e),
            PlaybackError::Thread(msg) => write!(f, "Playback thread error: {}", msg),
        }
    }
}

impl std::error::Error for PlaybackError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PlaybackError::Audio(e) => Some(e),
            PlaybackError::Thread(_) => None,
        }
    }
}

impl From<AudioError> for PlaybackError {
    fn from(e: AudioError) -> Self {
        PlaybackError::Audio(e)
    }
}

/// A running playback thread.
///
/// Starts paused. Dropping the player stops the thread.
pub struct Player {
    transport: Arc<Transport>,
    commands: Sender<EngineCommand>,
    thread: Option<JoinHandle<RecordingBuffer>>,
}

impl Player {
    /// Open a sink on a new thread and start the playback loop there.
    ///
    /// `open` runs on the playback thread so sinks that must stay on one
    /// thread (device streams) can be used. Its error is returned here,
    /// before any sample is produced.
    pub fn spawn<S, F>(
        open: F,
        target: Arc<ToneTarget>,
        idle_poll: Duration,
    ) -> Result<Self, PlaybackError>
    where
        S: AudioSink + 'static,
        F: FnOnce() -> Result<S, AudioError> + Send + 'static,
    {
        let transport = Arc::new(Transport::new());
        let (commands, command_rx) = unbounded();
        let (ready_tx, ready_rx) = bounded::<Result<(), AudioError>>(1);

        let engine_transport = Arc::clone(&transport);
        let thread = std::thread::Builder::new()
            .name("playback".into())
            .spawn(move || {
                let mut sink = match open() {
                    Ok(sink) => sink,
                    Err(e) => {
                        let _ = ready_tx.send(Err(e));
                        return RecordingBuffer::new();
                    }
                };
                if let Err(e) = sink.start() {
                    let _ = ready_tx.send(Err(e));
                    return RecordingBuffer::new();
                }
                let _ = ready_tx.send(Ok(()));

                PlaybackEngine::new(sink, target, engine_transport, command_rx)
                    .with_idle_poll(idle_poll)
                    .run()
            })
            .map_err(|e| PlaybackError::Thread(e.to_string()))?;

        let started = ready_rx.recv();
        match started {
            Ok(Ok(())) => {
                log::info!("Playback thread started");
                Ok(Self {
                    transport,
                    commands,
                    thread: Some(thread),
                })
            }
            Ok(Err(e)) => {
                let _ = thread.join();
                log::error!("Failed to open audio sink: {}", e);
                Err(PlaybackError::Audio(e))
            }
            Err(_) => {
                let _ = thread.join();
                Err(PlaybackError::Thread("playback thread exited during startup".into()))
            }
        }
    }

    pub fn play(&self) {
        self.transport.play();
    }

    pub fn pause(&self) {
        self.transport.pause();
    }

    pub fn is_paused(&self) -> bool {
        self.transport.is_paused()
    }

    /// Samples written to the sink so far.
    pub fn emitted(&self) -> u64 {
        self.transport.emitted()
    }

    /// Copy of everything recorded since the last clear.
    ///
    /// Waits for the loop to reach its next iteration boundary.
    pub fn recording(&self) -> Recording {
        let (reply, snapshot) = bounded(1);
        if self.commands.send(EngineCommand::Snapshot(reply)).is_err() {
            return Arc::from(Vec::new());
        }
        snapshot.recv().unwrap_or_else(|_| Arc::from(Vec::new()))
    }

    pub fn clear_recording(&self) {
        let _ = self.commands.send(EngineCommand::ClearRecording);
    }

    /// Stop the loop at its next iteration boundary and return the recording.
    pub fn stop(mut self) -> RecordingBuffer {
        self.shutdown()
    }

    fn shutdown(&mut self) -> RecordingBuffer {
        self.transport.request_stop();
        match self.thread.take().map(JoinHandle::join) {
            Some(Ok(recording)) => recording,
            Some(Err(_)) => {
                log::error!("Playback thread panicked");
                RecordingBuffer::new()
            }
            None => RecordingBuffer::new(),
        }
    }
}

impl Drop for Player {
    fn drop(&mut self) {
        if self.thread.is_some() {
            self.shutdown();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use th_audio::MemorySink;

    const POLL: Duration = Duration::from_millis(1);

    #[test]
    fn open_failure_is_reported_before_playback() {
        let target = Arc::new(ToneTarget::new(440.0, 1.0));
        let result = Player::spawn(
            || Err::<MemorySink, _>(AudioError::NoDevice),
            target,
            POLL,
        );
        assert!(matches!(result, Err(PlaybackError::Audio(AudioError::NoDevice))));
    }

    #[test]
    fn paused_player_writes_nothing() {
        let target = Arc::new(ToneTarget::new(440.0, 1.0));
        let (sink, rx) = MemorySink::unbounded(44100);
        let player = Player::spawn(move || Ok(sink), target, POLL).unwrap();
        std::thread::sleep(Duration::from_millis(20));
        assert!(player.is_paused());
        assert_eq!(player.emitted(), 0);
        assert!(player.recording().is_empty());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn bounded_sink_paces_the_loop_without_drops() {
        let target = Arc::new(ToneTarget::new(440.0, 1.0));
        let (sink, rx) = MemorySink::bounded(44100, 256);
        let player = Player::spawn(move || Ok(sink), target, POLL).unwrap();
        player.play();

        let consumed: Vec<i16> = rx.iter().take(4096).collect();
        player.pause();
        // Unblock a write parked on the full sink.
        drop(rx);
        let recording = player.stop();

        // Everything consumed was recorded, in order; the rest is still
        // sitting in the sink.
        assert!(recording.len() >= consumed.len());
        assert!(recording.len() <= consumed.len() + 257);
        assert_eq!(&recording.samples()[..consumed.len()], consumed.as_slice());
    }

    #[test]
    fn clear_then_snapshot() {
        let target = Arc::new(ToneTarget::new(440.0, 1.0));
        let (sink, rx) = MemorySink::bounded(44100, 64);
        let player = Player::spawn(move || Ok(sink), target, POLL).unwrap();
        player.play();
        let _: Vec<i16> = rx.iter().take(1000).collect();
        player.pause();
        // Drain whatever is left so the loop isn't parked in write.
        while rx.recv_timeout(Duration::from_millis(20)).is_ok() {}
        player.clear_recording();
        assert!(player.recording().is_empty());
        drop(player);
    }
}
