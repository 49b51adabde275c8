//! cpal-based voice capture
//!
//! Records mono 16-bit audio from the default input device on a
//! dedicated thread, draining buffered samples into chunk events every
//! 100ms. The take ends on manual stop, the max-speech-length cap, or
//! 2 seconds of trailing silence once speech has been heard.
//!
//! The stream lives entirely on the capture thread because cpal::Stream
//! is not Send.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex as StdMutex};
use std::time::Instant;

use async_trait::async_trait;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{SampleFormat, StreamConfig};
use tokio::sync::mpsc;
use tokio::time::{sleep, Duration as TokioDuration};
use tracing::debug;

use crate::application::ports::{
    CaptureError, CaptureEvent, CaptureOptions, EndReason, VoiceCapture,
};
use crate::domain::recording::AudioEncoding;

use super::flac::encode_to_flac;

/// How often buffered samples are drained into chunk events
const DRAIN_INTERVAL_MS: u64 = 100;

/// Trailing silence that ends a take once speech has been heard
const SILENCE_TIMEOUT_MS: u64 = 2000;

/// Peak amplitude at or above which a drained block counts as speech
const SPEECH_THRESHOLD: u16 = 500;

/// Chunk size a finished FLAC take is relayed in
const FLAC_CHUNK_BYTES: usize = 32 * 1024;

/// Event channel capacity
const EVENT_QUEUE_DEPTH: usize = 64;

/// Voice capture over the default cpal input device
pub struct CpalVoiceCapture {
    is_capturing: Arc<AtomicBool>,
    stop_requested: Arc<AtomicBool>,
}

impl CpalVoiceCapture {
    /// Create a new capture over the default input device
    pub fn new() -> Self {
        Self {
            is_capturing: Arc::new(AtomicBool::new(false)),
            stop_requested: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Resolve the default input device and a stream config we can use
    fn input_config() -> Result<(cpal::Device, StreamConfig, SampleFormat), CaptureError> {
        let host = cpal::default_host();
        let device = host
            .default_input_device()
            .ok_or(CaptureError::NoInputDevice)?;

        let supported = device
            .default_input_config()
            .map_err(|e| CaptureError::StartFailed(format!("Failed to get input config: {}", e)))?;

        let sample_format = supported.sample_format();
        if sample_format != SampleFormat::I16 && sample_format != SampleFormat::F32 {
            return Err(CaptureError::StartFailed(
                "Unsupported sample format".into(),
            ));
        }

        Ok((device, supported.config(), sample_format))
    }
}

impl Default for CpalVoiceCapture {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VoiceCapture for CpalVoiceCapture {
    async fn start(
        &self,
        options: CaptureOptions,
    ) -> Result<mpsc::Receiver<CaptureEvent>, CaptureError> {
        if self.is_capturing.load(Ordering::SeqCst) {
            return Err(CaptureError::AlreadyCapturing);
        }

        // Probe the device up front so start fails fast; the capture
        // thread does its own lookup because the stream must live there
        let _ = Self::input_config()?;

        let (tx, rx) = mpsc::channel(EVENT_QUEUE_DEPTH);

        self.stop_requested.store(false, Ordering::SeqCst);
        self.is_capturing.store(true, Ordering::SeqCst);

        let is_capturing = Arc::clone(&self.is_capturing);
        let stop_requested = Arc::clone(&self.stop_requested);

        std::thread::spawn(move || {
            run_take(options, tx, &stop_requested);
            is_capturing.store(false, Ordering::SeqCst);
        });

        Ok(rx)
    }

    async fn stop(&self) {
        self.stop_requested.store(true, Ordering::SeqCst);

        // The capture thread notices within one drain interval; give it
        // time to flush the tail of the take
        let mut waited_ms = 0;
        while self.is_capturing.load(Ordering::SeqCst) && waited_ms < 3000 {
            sleep(TokioDuration::from_millis(10)).await;
            waited_ms += 10;
        }
    }

    fn is_capturing(&self) -> bool {
        self.is_capturing.load(Ordering::SeqCst)
    }
}

/// Run one take to completion on the capture thread
fn run_take(options: CaptureOptions, tx: mpsc::Sender<CaptureEvent>, stop_requested: &AtomicBool) {
    let (device, config, sample_format) = match CpalVoiceCapture::input_config() {
        Ok(resolved) => resolved,
        Err(e) => {
            debug!("unable to resolve input device: {e}");
            let _ = tx.blocking_send(CaptureEvent::Ended(EndReason::Stopped));
            return;
        }
    };

    let sample_rate = config.sample_rate.0;
    let channels = config.channels;

    let pcm_buffer: Arc<StdMutex<Vec<i16>>> = Arc::new(StdMutex::new(Vec::new()));

    let stream = {
        let buffer = Arc::clone(&pcm_buffer);
        let stream_result = match sample_format {
            SampleFormat::I16 => device.build_input_stream(
                &config,
                move |data: &[i16], _: &cpal::InputCallbackInfo| {
                    let mono = downmix_to_mono(data, channels);
                    if let Ok(mut buffer) = buffer.lock() {
                        buffer.extend_from_slice(&mono);
                    }
                },
                |err| debug!("audio stream error: {err}"),
                None,
            ),

            SampleFormat::F32 => device.build_input_stream(
                &config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    let i16_data: Vec<i16> =
                        data.iter().map(|&s| (s * 32767.0) as i16).collect();
                    let mono = downmix_to_mono(&i16_data, channels);
                    if let Ok(mut buffer) = buffer.lock() {
                        buffer.extend_from_slice(&mono);
                    }
                },
                |err| debug!("audio stream error: {err}"),
                None,
            ),

            // input_config only admits I16/F32
            _ => {
                let _ = tx.blocking_send(CaptureEvent::Ended(EndReason::Stopped));
                return;
            }
        };

        match stream_result {
            Ok(stream) => stream,
            Err(e) => {
                debug!("unable to build input stream: {e}");
                let _ = tx.blocking_send(CaptureEvent::Ended(EndReason::Stopped));
                return;
            }
        }
    };

    if let Err(e) = stream.play() {
        debug!("unable to start input stream: {e}");
        let _ = tx.blocking_send(CaptureEvent::Ended(EndReason::Stopped));
        return;
    }

    if tx
        .blocking_send(CaptureEvent::Started { sample_rate })
        .is_err()
    {
        return;
    }

    let started_at = Instant::now();
    let max_ms = options.max_speech.as_millis();

    // Whole take, kept for the end-of-take FLAC pass
    let mut take: Vec<i16> = Vec::new();
    let mut silent_ms: u64 = 0;
    let mut heard_speech = false;

    let reason = loop {
        std::thread::sleep(std::time::Duration::from_millis(DRAIN_INTERVAL_MS));

        let drained: Vec<i16> = match pcm_buffer.lock() {
            Ok(mut buffer) => std::mem::take(&mut *buffer),
            Err(_) => Vec::new(),
        };

        if drained.is_empty() || !block_has_speech(&drained) {
            silent_ms += DRAIN_INTERVAL_MS;
        } else {
            heard_speech = true;
            silent_ms = 0;
        }

        if !drained.is_empty() {
            match options.encoding {
                AudioEncoding::Wav => {
                    if tx
                        .blocking_send(CaptureEvent::Audio(pcm_bytes(&drained)))
                        .is_err()
                    {
                        break EndReason::Stopped;
                    }
                }
                AudioEncoding::Flac => take.extend_from_slice(&drained),
            }
        }

        if stop_requested.load(Ordering::SeqCst) {
            break EndReason::Stopped;
        }
        if started_at.elapsed().as_millis() as u64 >= max_ms {
            break EndReason::MaxLength;
        }
        if heard_speech && silent_ms >= SILENCE_TIMEOUT_MS {
            break EndReason::EndOfSpeech;
        }
    };

    drop(stream);

    // Flush whatever arrived after the last drain
    let tail: Vec<i16> = match pcm_buffer.lock() {
        Ok(mut buffer) => std::mem::take(&mut *buffer),
        Err(_) => Vec::new(),
    };

    match options.encoding {
        AudioEncoding::Wav => {
            if !tail.is_empty() && tx.blocking_send(CaptureEvent::Audio(pcm_bytes(&tail))).is_err()
            {
                return;
            }
        }
        AudioEncoding::Flac => {
            take.extend_from_slice(&tail);
            if !take.is_empty() {
                match encode_to_flac(&take, sample_rate) {
                    Ok(flac) => {
                        for chunk in flac.chunks(FLAC_CHUNK_BYTES) {
                            if tx
                                .blocking_send(CaptureEvent::Audio(chunk.to_vec()))
                                .is_err()
                            {
                                return;
                            }
                        }
                    }
                    Err(e) => debug!("unable to encode take: {e}"),
                }
            }
        }
    }

    let _ = tx.blocking_send(CaptureEvent::Ended(reason));
}

/// Whether a drained block contains speech-level audio
fn block_has_speech(samples: &[i16]) -> bool {
    samples
        .iter()
        .map(|s| s.unsigned_abs())
        .max()
        .unwrap_or(0)
        >= SPEECH_THRESHOLD
}

/// Mix interleaved channels down to mono
fn downmix_to_mono(samples: &[i16], channels: u16) -> Vec<i16> {
    if channels <= 1 {
        return samples.to_vec();
    }

    samples
        .chunks(channels as usize)
        .map(|frame| {
            let sum: i32 = frame.iter().map(|&s| s as i32).sum();
            (sum / channels as i32) as i16
        })
        .collect()
}

/// Serialize i16 samples as PCM16-LE bytes
fn pcm_bytes(samples: &[i16]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(samples.len() * 2);
    for sample in samples {
        bytes.extend_from_slice(&sample.to_le_bytes());
    }
    bytes
}
