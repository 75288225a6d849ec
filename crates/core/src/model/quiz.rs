use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::ids::QuizId;
use crate::model::question::Question;
use crate::model::settings::PlaybackSettings;

/// Minimum number of characters in a quiz title (after trimming).
pub const MIN_TITLE_LEN: usize = 3;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

/// A single quiz-level validation failure.
///
/// The `Display` text is the user-facing message.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizValidationError {
    #[error("title must be at least {min} characters")]
    TitleTooShort { min: usize },

    #[error("quiz must contain at least one question")]
    NoQuestions,
}

/// Every validation failure found for one draft.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid quiz: {}", join_messages(.errors))]
pub struct QuizErrors {
    errors: Vec<QuizValidationError>,
}

impl QuizErrors {
    #[must_use]
    pub fn errors(&self) -> &[QuizValidationError] {
        &self.errors
    }

    /// User-facing messages, one per failure.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }
}

fn join_messages(errors: &[QuizValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

//
// ─── DRAFT ─────────────────────────────────────────────────────────────────────
//

/// Unvalidated quiz as assembled by the editor.
///
/// `id` and `created_at` are set when editing an existing quiz so that saving
/// replaces it instead of creating a new one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuizDraft {
    pub id: Option<QuizId>,
    pub title: String,
    pub description: Option<String>,
    pub questions: Vec<Question>,
    pub settings: Option<PlaybackSettings>,
    pub created_at: Option<DateTime<Utc>>,
}

impl QuizDraft {
    #[must_use]
    pub fn new(title: impl Into<String>, questions: Vec<Question>) -> Self {
        Self {
            title: title.into(),
            questions,
            ..Self::default()
        }
    }

    /// Collect every validation failure. Empty when the draft is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<QuizValidationError> {
        let mut errors = Vec::new();
        if self.title.trim().chars().count() < MIN_TITLE_LEN {
            errors.push(QuizValidationError::TitleTooShort { min: MIN_TITLE_LEN });
        }
        if self.questions.is_empty() {
            errors.push(QuizValidationError::NoQuestions);
        }
        errors
    }

    /// Validate and turn the draft into a `Quiz`.
    ///
    /// A fresh id is generated when the draft has none; `now` is used as the
    /// creation time when the draft has none.
    ///
    /// # Errors
    ///
    /// Returns `QuizErrors` listing every failed check.
    pub fn build(self, now: DateTime<Utc>) -> Result<Quiz, QuizErrors> {
        let errors = self.validate();
        if !errors.is_empty() {
            return Err(QuizErrors { errors });
        }

        let description = self
            .description
            .map(|d| d.trim().to_owned())
            .filter(|d| !d.is_empty());

        Ok(Quiz {
            id: self.id.unwrap_or_else(QuizId::generate),
            title: self.title.trim().to_owned(),
            description,
            questions: self.questions,
            created_at: self.created_at.unwrap_or(now),
            settings: self.settings.unwrap_or_default(),
        })
    }
}

/// Validate a draft and return user-facing messages; empty when valid.
#[must_use]
pub fn validate_quiz(draft: &QuizDraft) -> Vec<String> {
    draft.validate().iter().map(ToString::to_string).collect()
}

//
// ─── QUIZ ──────────────────────────────────────────────────────────────────────
//

/// A named, ordered collection of questions with playback settings.
///
/// Only constructible through validation, so a `Quiz` always has a title of
/// at least three characters and at least one question.
#[derive(Debug, Clone, PartialEq)]
pub struct Quiz {
    id: QuizId,
    title: String,
    description: Option<String>,
    questions: Vec<Question>,
    created_at: DateTime<Utc>,
    settings: PlaybackSettings,
}

impl Quiz {
    /// Rehydrate a quiz from persisted storage, re-running validation.
    ///
    /// # Errors
    ///
    /// Returns `QuizErrors` if the stored data no longer validates.
    pub fn from_persisted(
        id: QuizId,
        title: String,
        description: Option<String>,
        questions: Vec<Question>,
        created_at: DateTime<Utc>,
        settings: Option<PlaybackSettings>,
    ) -> Result<Self, QuizErrors> {
        QuizDraft {
            id: Some(id),
            title,
            description,
            questions,
            settings,
            created_at: Some(created_at),
        }
        .build(created_at)
    }

    // Accessors
    #[must_use]
    pub fn id(&self) -> QuizId {
        self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[must_use]
    pub fn settings(&self) -> &PlaybackSettings {
        &self.settings
    }

    /// Same quiz with a different question sequence (e.g. shuffled for play).
    ///
    /// Returns `None` for an empty list so the non-empty invariant holds.
    #[must_use]
    pub fn with_questions(&self, questions: Vec<Question>) -> Option<Self> {
        if questions.is_empty() {
            return None;
        }
        Some(Self {
            questions,
            ..self.clone()
        })
    }

    /// Editable copy that saves back onto this quiz's id.
    #[must_use]
    pub fn to_draft(&self) -> QuizDraft {
        QuizDraft {
            id: Some(self.id),
            title: self.title.clone(),
            description: self.description.clone(),
            questions: self.questions.clone(),
            settings: Some(self.settings),
            created_at: Some(self.created_at),
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
