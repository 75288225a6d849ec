#![forbid(unsafe_code)]

pub mod app_services;
pub mod error;
pub mod export_service;
pub mod playback;
pub mod quiz_service;

pub use quiz_core::Clock;

pub use app_services::AppServices;
pub use error::{AppServicesError, ExportError, PlaybackError, QuizServiceError};
pub use export_service::{ExportOptions, ExportService};
pub use playback::{
    ChannelCueSink, CueEvent, CueSink, PlaybackCommand, PlaybackHandle, PlaybackSnapshot,
    spawn_playback,
};
pub use quiz_service::{EditorForm, QuizService};
