use std::sync::Mutex;

use quiz_core::playback::Cue;
use tokio::sync::mpsc;

/// Receives speech and sound requests from the playback driver.
///
/// Called from the driver task, so implementations must not block.
pub trait CueSink: Send + Sync {
    fn speak(&self, text: &str);
    fn cue(&self, cue: Cue);
}

/// A request forwarded by `ChannelCueSink`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CueEvent {
    Speak(String),
    Cue(Cue),
}

/// Forwards requests over a channel to whoever owns the audio output.
#[derive(Debug, Clone)]
pub struct ChannelCueSink {
    tx: mpsc::UnboundedSender<CueEvent>,
}

impl ChannelCueSink {
    #[must_use]
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<CueEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    fn forward(&self, event: CueEvent) {
        if self.tx.send(event).is_err() {
            log::debug!("cue receiver dropped");
        }
    }
}

impl CueSink for ChannelCueSink {
    fn speak(&self, text: &str) {
        self.forward(CueEvent::Speak(text.to_owned()));
    }

    fn cue(&self, cue: Cue) {
        self.forward(CueEvent::Cue(cue));
    }
}

/// Keeps every request in memory, in order.
#[derive(Debug, Default)]
pub struct RecordingCueSink {
    events: Mutex<Vec<CueEvent>>,
}

impl RecordingCueSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn events(&self) -> Vec<CueEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    fn push(&self, event: CueEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

impl CueSink for RecordingCueSink {
    fn speak(&self, text: &str) {
        self.push(CueEvent::Speak(text.to_owned()));
    }

    fn cue(&self, cue: Cue) {
        self.push(CueEvent::Cue(cue));
    }
}
