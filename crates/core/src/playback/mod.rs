//! Quiz playback: a single-threaded state machine that turns answer, tick and
//! advance events into state changes plus a list of effects for the caller.

mod machine;
mod result;

pub use machine::{Cue, Effect, Player, PlayerState, Session};
pub use result::{AnswerRecord, FeedbackTier, QuizResult, percentage};
