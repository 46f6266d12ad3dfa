//! In-memory sink for headless rendering and tests.

use crossbeam_channel::{bounded, unbounded, Receiver, Sender};

use crate::traits::{AudioError, AudioSink};

/// Sink that forwards samples to a channel instead of a device.
///
/// A bounded sink blocks writes once `capacity` samples are waiting, the
/// same way a device buffer does; the paired [`Receiver`] plays the role of
/// the device draining it.
pub struct MemorySink {
    sample_rate: u32,
    tx: Sender<i16>,
    running: bool,
}

impl MemorySink {
    /// Sink that never blocks.
    pub fn unbounded(sample_rate: u32) -> (Self, Receiver<i16>) {
        let (tx, rx) = unbounded();
        (Self::with_sender(sample_rate, tx), rx)
    }

    /// Sink that holds at most `capacity` undrained samples.
    pub fn bounded(sample_rate: u32, capacity: usize) -> (Self, Receiver<i16>) {
        let (tx, rx) = bounded(capacity.max(1));
        (Self::with_sender(sample_rate, tx), rx)
    }

    fn with_sender(sample_rate: u32, tx: Sender<i16>) -> Self {
        Self {
            sample_rate,
            tx,
            running: false,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }
}

impl AudioSink for MemorySink {
    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn free_capacity(&self) -> usize {
        self.tx
            .capacity()
            .map_or(usize::MAX, |cap| cap.saturating_sub(self.tx.len()))
    }

    fn write(&mut self, samples: &[i16]) {
        for &sample in samples {
            // A dropped receiver means nobody is listening; keep going
            let _ = self.tx.send(sample);
        }
    }

    fn start(&mut self) -> Result<(), AudioError> {
        self.running = true;
        Ok(())
    }

    fn stop(&mut self) -> Result<(), AudioError> {
        self.running = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn unbounded_passes_samples_in_order() {
        let (mut sink, rx) = MemorySink::unbounded(44100);
        sink.write(&[1, 2, 3]);
        sink.write(&[4]);
        assert_eq!(rx.try_iter().collect::<Vec<_>>(), vec![1, 2, 3, 4]);
        assert_eq!(sink.free_capacity(), usize::MAX);
    }

    #[test]
    fn bounded_reports_free_capacity() {
        let (mut sink, rx) = MemorySink::bounded(44100, 4);
        assert_eq!(sink.free_capacity(), 4);
        sink.write(&[1, 2, 3]);
        assert_eq!(sink.free_capacity(), 1);
        rx.recv().unwrap();
        assert_eq!(sink.free_capacity(), 2);
    }

    #[test]
    fn bounded_write_waits_for_drain() {
        let (mut sink, rx) = MemorySink::bounded(44100, 8);
        let writer = thread::spawn(move || {
            let samples: Vec<i16> = (0..1000).collect();
            sink.write(&samples);
        });
        let received: Vec<i16> = rx.iter().take(1000).collect();
        writer.join().unwrap();
        assert_eq!(received, (0..1000).collect::<Vec<i16>>());
    }

    #[test]
    fn start_stop_toggle_running() {
        let (mut sink, _rx) = MemorySink::unbounded(22050);
        assert!(!sink.is_running());
        sink.start().unwrap();
        assert!(sink.is_running());
        sink.stop().unwrap();
        assert!(!sink.is_running());
        assert_eq!(sink.sample_rate(), 22050);
    }

    #[test]
    fn write_after_receiver_dropped_does_not_block() {
        let (mut sink, rx) = MemorySink::bounded(44100, 1);
        drop(rx);
        sink.write(&[1, 2, 3]);
    }
}
