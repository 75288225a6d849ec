//! Runs the playback state machine against real time.
//!
//! `spawn_playback` moves a `Player` into a tokio task. The UI sends
//! `PlaybackCommand`s and renders the `PlaybackSnapshot`s published on a
//! watch channel; speech and sounds leave through a `CueSink`.

mod cues;
mod driver;
mod prepare;

pub use cues::{ChannelCueSink, CueEvent, CueSink, RecordingCueSink};
pub use driver::{
    AUTO_ADVANCE_DELAY, PlaybackCommand, PlaybackHandle, PlaybackSnapshot, TICK_INTERVAL,
    spawn_playback,
};
pub use prepare::prepare_quiz;
