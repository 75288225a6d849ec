use std::sync::Arc;

use quiz_core::model::{PlaybackSettings, Quiz, QuizDraft, QuizId};
use quiz_core::parser::{ParseReport, format_quiz_text, parse_quiz_text};
use storage::repository::QuizStore;

use crate::Clock;
use crate::error::QuizServiceError;

/// Raw editor fields, exactly as typed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EditorForm {
    /// Set when editing a saved quiz.
    pub id: Option<QuizId>,
    pub title: String,
    pub description: String,
    pub questions_text: String,
    pub settings: PlaybackSettings,
}

impl EditorForm {
    /// Form pre-filled from a saved quiz.
    #[must_use]
    pub fn from_quiz(quiz: &Quiz) -> Self {
        Self {
            id: Some(quiz.id()),
            title: quiz.title().to_owned(),
            description: quiz.description().unwrap_or_default().to_owned(),
            questions_text: format_quiz_text(quiz.questions()),
            settings: *quiz.settings(),
        }
    }
}

/// Orchestrates editing, validation and persistence of quizzes.
#[derive(Clone)]
pub struct QuizService {
    clock: Clock,
    quizzes: Arc<dyn QuizStore>,
}

impl QuizService {
    #[must_use]
    pub fn new(clock: Clock, quizzes: Arc<dyn QuizStore>) -> Self {
        Self { clock, quizzes }
    }

    /// All saved quizzes in store order.
    ///
    /// # Errors
    ///
    /// Returns `QuizServiceError::Storage` if the store cannot be read.
    pub async fn list(&self) -> Result<Vec<Quiz>, QuizServiceError> {
        Ok(self.quizzes.load_all().await?)
    }

    /// Fetch a quiz by id.
    ///
    /// # Errors
    ///
    /// Returns `QuizServiceError::NotFound` for unknown ids.
    /// Returns `QuizServiceError::Storage` if the store cannot be read.
    pub async fn get(&self, id: QuizId) -> Result<Quiz, QuizServiceError> {
        self.quizzes
            .get(id)
            .await?
            .ok_or(QuizServiceError::NotFound(id))
    }

    /// Parse the editor text and assemble an unvalidated draft.
    ///
    /// When the form edits a saved quiz, the draft keeps that quiz's creation
    /// time so saving replaces it in place.
    ///
    /// # Errors
    ///
    /// Returns `QuizServiceError::Storage` if the edited quiz cannot be read.
    pub async fn draft_from_editor(
        &self,
        form: &EditorForm,
    ) -> Result<(QuizDraft, ParseReport), QuizServiceError> {
        let created_at = match form.id {
            Some(id) => self.quizzes.get(id).await?.map(|quiz| quiz.created_at()),
            None => None,
        };
        Ok(build_draft(form, created_at))
    }

    /// Validate and persist a draft, returning the stored quiz.
    ///
    /// # Errors
    ///
    /// Returns `QuizServiceError::Validation` with every failed check.
    /// Returns `QuizServiceError::Storage` if persistence fails.
    pub async fn save(&self, draft: QuizDraft) -> Result<Quiz, QuizServiceError> {
        let quiz = draft.build(self.clock.now())?;
        self.quizzes.upsert(&quiz).await?;
        log::info!(
            "saved quiz {} ({} questions)",
            quiz.id(),
            quiz.question_count()
        );
        Ok(quiz)
    }

    /// Build a playable quiz from the form without saving it.
    ///
    /// # Errors
    ///
    /// Returns `QuizServiceError::Validation` with every failed check.
    pub fn preview(&self, form: &EditorForm) -> Result<Quiz, QuizServiceError> {
        let (draft, _) = build_draft(form, None);
        Ok(draft.build(self.clock.now())?)
    }

    /// Delete a quiz and return the remaining ones.
    ///
    /// # Errors
    ///
    /// Returns `QuizServiceError::Storage` if persistence fails.
    pub async fn delete(&self, id: QuizId) -> Result<Vec<Quiz>, QuizServiceError> {
        let remaining = self.quizzes.remove(id).await?;
        log::info!("deleted quiz {id}");
        Ok(remaining)
    }
}

/// Synchronous half of `draft_from_editor`, usable for live previews.
#[must_use]
pub fn build_draft(
    form: &EditorForm,
    created_at: Option<chrono::DateTime<chrono::Utc>>,
) -> (QuizDraft, ParseReport) {
    let report = parse_quiz_text(&form.questions_text);
    let description = Some(form.description.trim().to_owned()).filter(|d| !d.is_empty());
    let draft = QuizDraft {
        id: form.id,
        title: form.title.clone(),
        description,
        questions: report.questions.clone(),
        settings: Some(form.settings),
        created_at,
    };
    (draft, report)
}
