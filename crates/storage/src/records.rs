//! Persisted shape of quizzes.
//!
//! These mirror the domain types so the collection can be serialized as a
//! JSON array without leaking storage concerns into `quiz-core`. Loading goes
//! back through the domain constructors, so a stored record that no longer
//! validates never becomes a `Quiz`.

use chrono::{DateTime, Utc};
use quiz_core::model::{OPTION_COUNT, PlaybackSettings, Question, Quiz, QuizId};
use serde::{Deserialize, Serialize};

use crate::repository::StorageError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionRecord {
    pub text: String,
    pub options: [String; OPTION_COUNT],
    pub correct_index: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
#[allow(clippy::struct_excessive_bools)]
pub struct SettingsRecord {
    pub timer_seconds: u32,
    pub auto_advance: bool,
    pub voice_enabled: bool,
    pub sound_enabled: bool,
    pub shuffle_questions: bool,
    pub shuffle_options: bool,
}

impl Default for SettingsRecord {
    fn default() -> Self {
        Self::from_settings(&PlaybackSettings::default())
    }
}

impl SettingsRecord {
    #[must_use]
    pub fn from_settings(settings: &PlaybackSettings) -> Self {
        Self {
            timer_seconds: settings.timer_seconds(),
            auto_advance: settings.auto_advance(),
            voice_enabled: settings.voice_enabled(),
            sound_enabled: settings.sound_enabled(),
            shuffle_questions: settings.shuffle_questions(),
            shuffle_options: settings.shuffle_options(),
        }
    }

    #[must_use]
    pub fn into_settings(self) -> PlaybackSettings {
        PlaybackSettings::new(
            self.timer_seconds,
            self.auto_advance,
            self.voice_enabled,
            self.sound_enabled,
            self.shuffle_questions,
            self.shuffle_options,
        )
    }
}

/// One quiz as stored in the collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizRecord {
    pub id: QuizId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub questions: Vec<QuestionRecord>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<SettingsRecord>,
}

impl QuizRecord {
    #[must_use]
    pub fn from_quiz(quiz: &Quiz) -> Self {
        Self {
            id: quiz.id(),
            title: quiz.title().to_owned(),
            description: quiz.description().map(ToOwned::to_owned),
            questions: quiz
                .questions()
                .iter()
                .map(|q| QuestionRecord {
                    text: q.text().to_owned(),
                    options: q.options().clone(),
                    correct_index: q.correct_index(),
                })
                .collect(),
            created_at: quiz.created_at(),
            settings: Some(SettingsRecord::from_settings(quiz.settings())),
        }
    }

    /// Convert the record back into a domain `Quiz`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` if a question or the quiz itself
    /// fails validation.
    pub fn into_quiz(self) -> Result<Quiz, StorageError> {
        let questions = self
            .questions
            .into_iter()
            .map(|q| Question::new(q.text, q.options, q.correct_index))
            .collect::<Result<Vec<_>, _>>()
            .map_err(ser)?;

        Quiz::from_persisted(
            self.id,
            self.title,
            self.description,
            questions,
            self.created_at,
            self.settings.map(SettingsRecord::into_settings),
        )
        .map_err(ser)
    }
}

fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

//
// ─── COLLECTION CODEC ──────────────────────────────────────────────────────────
//

/// Serialize a whole collection as a JSON array.
///
/// # Errors
///
/// Returns `StorageError::Serialization` if encoding fails.
pub fn encode_collection(quizzes: &[Quiz], pretty: bool) -> Result<String, StorageError> {
    let records: Vec<QuizRecord> = quizzes.iter().map(QuizRecord::from_quiz).collect();
    if pretty {
        serde_json::to_string_pretty(&records).map_err(ser)
    } else {
        serde_json::to_string(&records).map_err(ser)
    }
}

/// Decode a stored collection, skipping entries that no longer validate.
///
/// # Errors
///
/// Returns `StorageError::Serialization` if the payload is not a JSON array.
pub fn decode_collection(raw: &str) -> Result<Vec<Quiz>, StorageError> {
    let values: Vec<serde_json::Value> = serde_json::from_str(raw).map_err(ser)?;
    let mut quizzes = Vec::with_capacity(values.len());
    for (idx, value) in values.into_iter().enumerate() {
        match serde_json::from_value::<QuizRecord>(value)
            .map_err(ser)
            .and_then(QuizRecord::into_quiz)
        {
            Ok(quiz) => quizzes.push(quiz),
            Err(err) => log::warn!("skipping stored quiz #{idx}: {err}"),
        }
    }
    Ok(quizzes)
}

/// Decode a collection where every entry must be valid.
///
/// # Errors
///
/// Returns `StorageError::Serialization` naming the first bad entry.
pub fn decode_collection_strict(raw: &str) -> Result<Vec<Quiz>, StorageError> {
    let records: Vec<QuizRecord> = serde_json::from_str(raw).map_err(ser)?;
    records
        .into_iter()
        .enumerate()
        .map(|(idx, record)| {
            let title = record.title.clone();
            record.into_quiz().map_err(|err| {
                StorageError::Serialization(format!("quiz #{idx} ({title:?}): {err}"))
            })
        })
        .collect()
}
