use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use lofty::file::AudioFile;
use rodio::{OutputStream, OutputStreamBuilder, Sink};
use tracing::{debug, warn};

use crate::config::AudioSettings;

use super::backend::{AudioBackend, AudioError};
use super::sink::create_sink_at;
use super::types::{BackendEvent, TransportState};

struct Session {
    path: PathBuf,
    sink: Sink,
    /// Offset the current sink started from; `Sink::get_pos` counts from here.
    offset: Duration,
    total: Duration,
    finish_reported: bool,
}

impl Session {
    fn position(&self) -> Duration {
        let pos = self.offset + self.sink.get_pos();
        if self.total > Duration::ZERO {
            pos.min(self.total)
        } else {
            pos
        }
    }
}

type SessionSlot = Arc<Mutex<Option<Session>>>;
type NotifySlot = Arc<Mutex<Option<Sender<BackendEvent>>>>;

/// `AudioBackend` on the default output device.
///
/// A monitor thread polls the active sink and reports `Finished` once when a
/// playing sink runs dry. `stop` removes the session first, so intentional
/// stops are never reported; a live sink that drains well before its known
/// end is reported with an error.
pub struct RodioBackend {
    stream: OutputStream,
    session: SessionSlot,
    notify: NotifySlot,
    volume: f32,
    shutdown: Arc<AtomicBool>,
    monitor: Option<JoinHandle<()>>,
}

impl RodioBackend {
    /// `finish_tolerance` is how far short of the total a drain may stop and
    /// still count as reaching the end.
    pub fn new(settings: &AudioSettings, finish_tolerance: Duration) -> Result<Self, AudioError> {
        let mut stream = OutputStreamBuilder::open_default_stream()
            .map_err(|e| AudioError::Output(e.to_string()))?;
        // rodio logs to stderr when OutputStream is dropped. That's useful in debugging,
        // but noisy for a TUI app.
        stream.log_on_drop(false);

        let session: SessionSlot = Arc::new(Mutex::new(None));
        let notify: NotifySlot = Arc::new(Mutex::new(None));
        let shutdown = Arc::new(AtomicBool::new(false));

        let monitor = spawn_monitor(
            session.clone(),
            notify.clone(),
            shutdown.clone(),
            Duration::from_millis(settings.poll_ms.max(1)),
            finish_tolerance,
        );

        Ok(Self {
            stream,
            session,
            notify,
            volume: 1.0,
            shutdown,
            monitor: Some(monitor),
        })
    }

    fn with_session<T>(&self, f: impl FnOnce(&Session) -> T) -> Option<T> {
        self.session.lock().ok().and_then(|s| s.as_ref().map(f))
    }
}

fn spawn_monitor(
    session: SessionSlot,
    notify: NotifySlot,
    shutdown: Arc<AtomicBool>,
    poll: Duration,
    tolerance: Duration,
) -> JoinHandle<()> {
    thread::spawn(move || {
        while !shutdown.load(Ordering::Relaxed) {
            thread::sleep(poll);

            let finished = match session.lock() {
                Ok(mut guard) => match guard.as_mut() {
                    Some(s) if !s.finish_reported && !s.sink.is_paused() && s.sink.empty() => {
                        s.finish_reported = true;
                        Some(drain_error(s.position(), s.total, tolerance))
                    }
                    _ => None,
                },
                Err(_) => None,
            };

            let Some(error) = finished else {
                continue;
            };
            if let Some(err) = &error {
                warn!(error = %err, "output drained early");
            }
            if let Ok(tx) = notify.lock() {
                if let Some(tx) = tx.as_ref() {
                    let _ = tx.send(BackendEvent::Finished { error });
                }
            }
        }
    })
}

/// Error for a sink that ran dry more than `tolerance` before its known end,
/// e.g. a decoder giving up partway through a damaged file.
pub(super) fn drain_error(position: Duration, total: Duration, tolerance: Duration) -> Option<String> {
    if total.is_zero() || position + tolerance >= total {
        return None;
    }
    Some(format!("stream ended at {position:?} of {total:?}"))
}

/// Decoders for some formats (VBR mp3 in particular) don't know their length.
fn probe_duration(path: &Path) -> Option<Duration> {
    lofty::read_from_path(path)
        .ok()
        .map(|tagged| tagged.properties().duration())
        .filter(|d| !d.is_zero())
}

impl AudioBackend for RodioBackend {
    fn load(&mut self, path: &Path) -> Result<Duration, AudioError> {
        self.stop();

        let (sink, total) = create_sink_at(self.stream.mixer(), path, Duration::ZERO, self.volume)?;
        let total = total
            .filter(|d| !d.is_zero())
            .or_else(|| probe_duration(path))
            .unwrap_or(Duration::ZERO);

        debug!(path = %path.display(), ?total, "session loaded");

        if let Ok(mut slot) = self.session.lock() {
            *slot = Some(Session {
                path: path.to_path_buf(),
                sink,
                offset: Duration::ZERO,
                total,
                finish_reported: false,
            });
        }
        Ok(total)
    }

    fn play(&mut self) {
        self.with_session(|s| s.sink.play());
    }

    fn pause(&mut self) {
        self.with_session(|s| s.sink.pause());
    }

    fn resume(&mut self) {
        self.with_session(|s| s.sink.play());
    }

    fn stop(&mut self) {
        if let Ok(mut slot) = self.session.lock() {
            if let Some(s) = slot.take() {
                s.sink.stop();
            }
        }
    }

    fn seek(&mut self, to: Duration) -> Result<(), AudioError> {
        let mut slot = self
            .session
            .lock()
            .map_err(|_| AudioError::Output("session lock poisoned".to_string()))?;
        let Some(current) = slot.as_mut() else {
            return Err(AudioError::NoSession);
        };

        // Scrubbing: rebuild the current sink and skip into the file.
        let was_paused = current.sink.is_paused();
        let (sink, _) = create_sink_at(self.stream.mixer(), &current.path, to, self.volume)?;
        current.sink.stop();
        if !was_paused {
            sink.play();
        }

        current.sink = sink;
        current.offset = to;
        current.finish_reported = false;
        Ok(())
    }

    fn position(&self) -> Duration {
        self.with_session(Session::position).unwrap_or(Duration::ZERO)
    }

    fn total_duration(&self) -> Duration {
        self.with_session(|s| s.total).unwrap_or(Duration::ZERO)
    }

    fn state(&self) -> TransportState {
        self.with_session(|s| {
            if s.sink.empty() {
                TransportState::Stopped
            } else if s.sink.is_paused() {
                TransportState::Paused
            } else {
                TransportState::Playing
            }
        })
        .unwrap_or(TransportState::Stopped)
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
        let v = self.volume;
        self.with_session(|s| s.sink.set_volume(v));
    }

    fn on_finished(&mut self, notify: Sender<BackendEvent>) {
        match self.notify.lock() {
            Ok(mut slot) => *slot = Some(notify),
            Err(_) => warn!("finish notifier lock poisoned; events will be dropped"),
        }
    }
}

impl Drop for RodioBackend {
    fn drop(&mut self) {
        self.stop();
        self.shutdown.store(true, Ordering::Relaxed);
        if let Some(h) = self.monitor.take() {
            let _ = h.join();
        }
    }
}
