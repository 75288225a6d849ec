mod ids;
mod question;
mod quiz;
mod settings;

pub use ids::{ParseIdError, QuizId};

pub use question::{OPTION_COUNT, Question, QuestionError};
pub use quiz::{MIN_TITLE_LEN, Quiz, QuizDraft, QuizErrors, QuizValidationError, validate_quiz};
pub use settings::PlaybackSettings;
