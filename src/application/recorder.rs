//! Voice recorder service
//!
//! Glue between the capture primitive, the spool file, and the network
//! sender: relays capture events to subscribers, appends chunks to the
//! spool, and hands each finished take to a detached upload task.
//!
//! Failures past the start of a take are logged at debug level and
//! swallowed; the spool file is deleted after every upload attempt.

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::sync::Notify;
use tracing::debug;

use crate::domain::language::LanguageTag;
use crate::domain::recording::{AudioEncoding, SpeechLimit};

use super::ports::{
    CaptureError, CaptureEvent, CaptureOptions, EndReason, LocationProvider, SpeechSender,
    VoiceCapture,
};
use super::spool::SpoolDir;

/// Errors from starting a recording.
/// Nothing after a successful start is surfaced to the caller.
#[derive(Debug, Error)]
pub enum RecorderError {
    #[error("Capture failed to start: {0}")]
    Capture(#[from] CaptureError),
}

/// Subscriber interface for recording events.
/// All methods default to no-ops so subscribers implement only what
/// they care about.
pub trait RecorderListener: Send + Sync {
    /// The input stream is live
    fn on_record_start(&self, _sample_rate: u32) {}
    /// An encoded audio chunk was captured
    fn on_audio(&self, _chunk: &[u8]) {}
    /// The take is finished
    fn on_record_end(&self, _reason: EndReason) {}
}

/// Options for one recording
#[derive(Debug, Clone)]
pub struct RecordOptions {
    pub language: LanguageTag,
    pub encoding: AudioEncoding,
    pub max_speech: SpeechLimit,
}

impl RecordOptions {
    /// Options with the default encoding and speech limit
    pub fn new(language: LanguageTag) -> Self {
        Self {
            language,
            encoding: AudioEncoding::default(),
            max_speech: SpeechLimit::default(),
        }
    }
}

type Listeners = Arc<Mutex<Vec<Arc<dyn RecorderListener>>>>;

/// The recorder service.
///
/// One capture at a time; starting a new recording stops the previous
/// one first. Uploads are fire-and-forget: each finished take spawns
/// its own task and concurrent uploads never coordinate.
pub struct RecorderService {
    capture: Arc<dyn VoiceCapture>,
    sender: Arc<dyn SpeechSender>,
    location: Arc<dyn LocationProvider>,
    spool: Arc<SpoolDir>,
    listeners: Listeners,
    in_flight: Arc<AtomicUsize>,
    idle: Arc<Notify>,
}

impl RecorderService {
    /// Create a new service over the given collaborators
    pub fn new(
        capture: Arc<dyn VoiceCapture>,
        sender: Arc<dyn SpeechSender>,
        location: Arc<dyn LocationProvider>,
        spool: SpoolDir,
    ) -> Self {
        Self {
            capture,
            sender,
            location,
            spool: Arc::new(spool),
            listeners: Arc::new(Mutex::new(Vec::new())),
            in_flight: Arc::new(AtomicUsize::new(0)),
            idle: Arc::new(Notify::new()),
        }
    }

    /// Register a recording event subscriber
    pub fn add_listener(&self, listener: Arc<dyn RecorderListener>) {
        if let Ok(mut listeners) = self.listeners.lock() {
            listeners.push(listener);
        }
    }

    /// Remove a previously registered subscriber.
    /// It receives no events dispatched after this call returns.
    pub fn remove_listener(&self, listener: &Arc<dyn RecorderListener>) {
        if let Ok(mut listeners) = self.listeners.lock() {
            listeners.retain(|l| !Arc::ptr_eq(l, listener));
        }
    }

    /// Whether a take is currently being captured
    pub fn is_recording(&self) -> bool {
        self.capture.is_capturing()
    }

    /// Number of uploads still in flight
    pub fn pending_uploads(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Start recording a take.
    ///
    /// Stops any in-flight capture first. Once this returns Ok, the
    /// take runs to completion on its own: events are relayed to the
    /// registered listeners, chunks are spooled, and the finished file
    /// is uploaded and removed by a background task.
    pub async fn start_recording(&self, options: RecordOptions) -> Result<(), RecorderError> {
        if self.capture.is_capturing() {
            self.capture.stop().await;
        }

        let mut events = self
            .capture
            .start(CaptureOptions {
                encoding: options.encoding,
                max_speech: options.max_speech,
            })
            .await?;

        debug!("voice capture started");

        let listeners = Arc::clone(&self.listeners);
        let sender = Arc::clone(&self.sender);
        let location = Arc::clone(&self.location);
        let spool = Arc::clone(&self.spool);
        let in_flight = Arc::clone(&self.in_flight);
        let idle = Arc::clone(&self.idle);
        let active_path = self.spool.active_path(options.encoding);
        let mime_type = options.encoding.mime_type();
        let language = options.language;

        tokio::spawn(async move {
            let mut spool_file: Option<tokio::fs::File> = None;
            let mut sample_rate: u32 = 0;

            while let Some(event) = events.recv().await {
                match event {
                    CaptureEvent::Started { sample_rate: rate } => {
                        sample_rate = rate;
                        for listener in snapshot(&listeners) {
                            listener.on_record_start(rate);
                        }
                        match tokio::fs::File::create(&active_path).await {
                            Ok(file) => spool_file = Some(file),
                            Err(e) => debug!("unable to open spool file: {e}"),
                        }
                    }
                    CaptureEvent::Audio(chunk) => {
                        for listener in snapshot(&listeners) {
                            listener.on_audio(&chunk);
                        }
                        if let Some(file) = spool_file.as_mut() {
                            if let Err(e) = file.write_all(&chunk).await {
                                debug!("unable to append to spool file: {e}");
                            }
                        }
                    }
                    CaptureEvent::Ended(reason) => {
                        // Claim the upload slot before the end event goes
                        // out, so a subscriber observing the end can rely
                        // on wait_idle covering this take's upload.
                        let finished = spool_file.take();
                        if finished.is_some() {
                            in_flight.fetch_add(1, Ordering::SeqCst);
                        }
                        for listener in snapshot(&listeners) {
                            listener.on_record_end(reason);
                        }
                        if let Some(mut file) = finished {
                            if let Err(e) = file.flush().await {
                                debug!("unable to flush spool file: {e}");
                            }
                            drop(file);

                            let sender = Arc::clone(&sender);
                            let location = Arc::clone(&location);
                            let spool = Arc::clone(&spool);
                            let in_flight = Arc::clone(&in_flight);
                            let idle = Arc::clone(&idle);
                            let active_path = active_path.clone();
                            let language = language.clone();

                            tokio::spawn(async move {
                                upload_and_cleanup(
                                    spool,
                                    sender,
                                    location,
                                    active_path,
                                    mime_type,
                                    language,
                                    sample_rate,
                                )
                                .await;
                                in_flight.fetch_sub(1, Ordering::SeqCst);
                                idle.notify_waiters();
                            });
                        }
                        break;
                    }
                }
            }
        });

        Ok(())
    }

    /// Stop the current take.
    /// The normal end-of-take pipeline (upload, cleanup) still runs.
    pub async fn stop_recording(&self) {
        if self.capture.is_capturing() {
            self.capture.stop().await;
            debug!("voice capture stopped");
        }
    }

    /// Wait until no upload task remains in flight.
    /// Uploads stay mutually uncoordinated; this only lets a caller
    /// drain before shutting down.
    pub async fn wait_idle(&self) {
        loop {
            let notified = self.idle.notified();
            if self.in_flight.load(Ordering::SeqCst) == 0 {
                return;
            }
            notified.await;
        }
    }
}

fn snapshot(listeners: &Listeners) -> Vec<Arc<dyn RecorderListener>> {
    listeners
        .lock()
        .map(|listeners| listeners.clone())
        .unwrap_or_default()
}

/// Stage, upload, and unconditionally remove one finished take.
/// Every failure in here is logged and swallowed.
async fn upload_and_cleanup(
    spool: Arc<SpoolDir>,
    sender: Arc<dyn SpeechSender>,
    location: Arc<dyn LocationProvider>,
    active_path: PathBuf,
    mime_type: &'static str,
    language: LanguageTag,
    sample_rate: u32,
) {
    // A failed rename aborts the upload; the fixed-name file is simply
    // overwritten by the next take.
    let staged = match spool.finalize(&active_path) {
        Ok(path) => path,
        Err(e) => {
            debug!("unable to stage spool file for upload: {e}");
            return;
        }
    };

    let point = location.last_known().await.unwrap_or_default();

    match sender
        .send(&staged, mime_type, &language, point, sample_rate)
        .await
    {
        Ok(receipt) => debug!(
            voice_id = receipt.voice_id.as_deref().unwrap_or("-"),
            "voice uploaded"
        ),
        Err(e) => debug!("unable to send voice data to backend: {e}"),
    }

    if let Err(e) = tokio::fs::remove_file(&staged).await {
        debug!("unable to remove spool file: {e}");
    }
}
