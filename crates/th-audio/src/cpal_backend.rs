//! CPAL-based audio output backend.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, SampleRate, Stream, StreamConfig};
use ringbuf::traits::{Consumer, Observer, Producer, Split};
use ringbuf::{HeapCons, HeapProd, HeapRb};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::traits::{AudioError, AudioSink};

/// CPAL-based mono output at a fixed sample rate.
pub struct CpalOutput {
    device: Device,
    config: StreamConfig,
    stream: Option<Stream>,
    producer: HeapProd<i16>,
    running: Arc<AtomicBool>,
}

impl CpalOutput {
    /// Open the default output device at `sample_rate`.
    ///
    /// The ring buffer between the caller and the device callback holds
    /// `buffer_ms` milliseconds of audio.
    pub fn new(sample_rate: u32, buffer_ms: u32) -> Result<(Self, HeapCons<i16>), AudioError> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or(AudioError::NoDevice)?;

        let default = device
            .default_output_config()
            .map_err(|e| AudioError::DeviceInit(e.to_string()))?;

        if default.channels() == 0 {
            return Err(AudioError::UnsupportedConfig(
                "device reports zero output channels".into(),
            ));
        }

        let mut config: StreamConfig = default.into();
        // The oscillator and the recording share one fixed rate
        config.sample_rate = SampleRate(sample_rate);

        log::info!(
            "Audio output: {} ({} ch @ {} Hz)",
            device.name().unwrap_or_else(|_| "unknown".into()),
            config.channels,
            sample_rate
        );

        let buffer_size = (sample_rate as usize * buffer_ms.max(1) as usize / 1000).max(1);
        let rb = HeapRb::<i16>::new(buffer_size);
        let (producer, consumer) = rb.split();

        let output = Self {
            device,
            config,
            stream: None,
            producer,
            running: Arc::new(AtomicBool::new(false)),
        };

        Ok((output, consumer))
    }

    /// Open the default device and start its stream.
    pub fn open(sample_rate: u32, buffer_ms: u32) -> Result<Self, AudioError> {
        let (mut output, consumer) = Self::new(sample_rate, buffer_ms)?;
        output.build_stream(consumer)?;
        output.start()?;
        Ok(output)
    }

    /// Build and start the audio stream.
    pub fn build_stream(&mut self, mut consumer: HeapCons<i16>) -> Result<(), AudioError> {
        let running = self.running.clone();
        let channels = self.config.channels as usize;

        let stream = self
            .device
            .build_output_stream(
                &self.config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    if !running.load(Ordering::Relaxed) {
                        data.fill(0.0);
                        return;
                    }

                    // One mono sample per device frame, copied to every channel
                    for chunk in data.chunks_mut(channels) {
                        let value = consumer
                            .try_pop()
                            .map_or(0.0, |s| s as f32 / 32768.0);
                        chunk.fill(value);
                    }
                },
                |err| log::error!("Audio stream error: {}", err),
                None,
            )
            .map_err(|e| AudioError::StreamCreate(e.to_string()))?;

        stream.play().map_err(|e| AudioError::Playback(e.to_string()))?;
        self.stream = Some(stream);

        Ok(())
    }
}

impl AudioSink for CpalOutput {
    fn sample_rate(&self) -> u32 {
        self.config.sample_rate.0
    }

    fn free_capacity(&self) -> usize {
        self.producer.vacant_len()
    }

    fn write(&mut self, samples: &[i16]) {
        for &sample in samples {
            // Spin until the device callback frees a slot
            while self.producer.try_push(sample).is_err() {
                std::hint::spin_loop();
            }
        }
    }

    fn start(&mut self) -> Result<(), AudioError> {
        self.running.store(true, Ordering::Relaxed);
        if let Some(ref stream) = self.stream {
            stream.play().map_err(|e| AudioError::Playback(e.to_string()))?;
        }
        Ok(())
    }

    fn stop(&mut self) -> Result<(), AudioError> {
        self.running.store(false, Ordering::Relaxed);
        if let Some(ref stream) = self.stream {
            stream.pause().map_err(|e| AudioError::Playback(e.to_string()))?;
        }
        Ok(())
    }
}
