//! Backup bundles and standalone HTML players.
//!
//! A bundle is the same JSON array the store persists, pretty-printed. The
//! HTML export is a single self-contained document: quiz data sits in an
//! inert `application/json` script block and the player script and styles
//! are inlined, so the file plays offline.

use std::sync::Arc;

use serde::Serialize;

use quiz_core::model::{OPTION_COUNT, Quiz, QuizDraft, QuizId};
use storage::records::{decode_collection_strict, encode_collection};
use storage::repository::QuizStore;

use crate::Clock;
use crate::error::ExportError;

const PLAYER_SCRIPT: &str = include_str!("../assets/standalone_player.js");
const PLAYER_STYLE: &str = include_str!("../assets/standalone_player.css");

/// Optional text shown around the exported player.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportOptions {
    pub badge: Option<String>,
    pub about: Option<String>,
    pub footer: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PlayerQuestion<'a> {
    text: &'a str,
    options: &'a [String; OPTION_COUNT],
    correct_index: usize,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
#[allow(clippy::struct_excessive_bools)]
struct PlayerData<'a> {
    title: &'a str,
    description: Option<&'a str>,
    badge: Option<&'a str>,
    about: Option<&'a str>,
    footer: Option<&'a str>,
    timer_seconds: u32,
    auto_advance: bool,
    voice_enabled: bool,
    sound_enabled: bool,
    shuffle_questions: bool,
    shuffle_options: bool,
    questions: Vec<PlayerQuestion<'a>>,
}

impl<'a> PlayerData<'a> {
    fn new(quiz: &'a Quiz, options: &'a ExportOptions) -> Self {
        let settings = quiz.settings();
        Self {
            title: quiz.title(),
            description: quiz.description(),
            badge: options.badge.as_deref(),
            about: options.about.as_deref(),
            footer: options.footer.as_deref(),
            timer_seconds: settings.timer_seconds(),
            auto_advance: settings.auto_advance(),
            voice_enabled: settings.voice_enabled(),
            sound_enabled: settings.sound_enabled(),
            shuffle_questions: settings.shuffle_questions(),
            shuffle_options: settings.shuffle_options(),
            questions: quiz
                .questions()
                .iter()
                .map(|q| PlayerQuestion {
                    text: q.text(),
                    options: q.options(),
                    correct_index: q.correct_index(),
                })
                .collect(),
        }
    }
}

/// Exports and imports quizzes.
#[derive(Clone)]
pub struct ExportService {
    clock: Clock,
    quizzes: Arc<dyn QuizStore>,
}

impl ExportService {
    #[must_use]
    pub fn new(clock: Clock, quizzes: Arc<dyn QuizStore>) -> Self {
        Self { clock, quizzes }
    }

    /// Every saved quiz as a pretty-printed JSON bundle.
    ///
    /// # Errors
    ///
    /// Returns `ExportError::Empty` when nothing is saved.
    /// Returns `ExportError::Storage` if the store cannot be read.
    pub async fn export_bundle(&self) -> Result<String, ExportError> {
        let quizzes = self.quizzes.load_all().await?;
        if quizzes.is_empty() {
            return Err(ExportError::Empty);
        }
        bundle_json(&quizzes)
    }

    /// Replace the saved collection with the quizzes in `json`.
    ///
    /// Nothing is written unless every entry validates. Returns the number
    /// of imported quizzes.
    ///
    /// # Errors
    ///
    /// Returns `ExportError::NotAnArray` or `ExportError::InvalidBundle` for
    /// malformed input, `ExportError::Storage` if persistence fails.
    pub async fn import_bundle(&self, json: &str) -> Result<usize, ExportError> {
        let quizzes = parse_bundle(json)?;
        self.quizzes.save_all(&quizzes).await?;
        log::info!("imported {} quizzes", quizzes.len());
        Ok(quizzes.len())
    }

    /// Standalone HTML player for a saved quiz.
    ///
    /// # Errors
    ///
    /// Returns `ExportError::NotFound` for unknown ids.
    pub async fn export_player_html(
        &self,
        id: QuizId,
        options: &ExportOptions,
    ) -> Result<String, ExportError> {
        let quiz = self
            .quizzes
            .get(id)
            .await?
            .ok_or(ExportError::NotFound(id))?;
        player_html(&quiz, options)
    }

    /// Standalone HTML player for an unsaved editor draft.
    ///
    /// # Errors
    ///
    /// Returns `ExportError::Validation` if the draft is not a valid quiz.
    pub fn export_draft_html(
        &self,
        draft: QuizDraft,
        options: &ExportOptions,
    ) -> Result<String, ExportError> {
        let quiz = draft.build(self.clock.now())?;
        player_html(&quiz, options)
    }
}

/// Pretty-printed JSON array of quizzes.
///
/// # Errors
///
/// Returns `ExportError::Storage` if encoding fails.
pub fn bundle_json(quizzes: &[Quiz]) -> Result<String, ExportError> {
    Ok(encode_collection(quizzes, true)?)
}

/// Decode a bundle; every entry must be a valid quiz.
///
/// # Errors
///
/// Returns `ExportError::NotAnArray` when the top level is not an array.
/// Returns `ExportError::InvalidBundle` naming the first bad entry.
pub fn parse_bundle(json: &str) -> Result<Vec<Quiz>, ExportError> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    if !value.is_array() {
        return Err(ExportError::NotAnArray);
    }
    decode_collection_strict(json).map_err(|err| ExportError::InvalidBundle(err.to_string()))
}

/// Render the self-contained HTML player for `quiz`.
///
/// # Errors
///
/// Returns `ExportError::Json` if the quiz data cannot be serialized.
pub fn player_html(quiz: &Quiz, options: &ExportOptions) -> Result<String, ExportError> {
    let data = serde_json::to_string(&PlayerData::new(quiz, options))?;
    let title = ammonia::clean_text(quiz.title());
    Ok(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<style>
{PLAYER_STYLE}
</style>
</head>
<body>
<div id="quiz-app"></div>
<script id="quiz-data" type="application/json">{data}</script>
<script>
{PLAYER_SCRIPT}
</script>
</body>
</html>
"#,
        data = escape_script_json(&data),
    ))
}

// Keeps `</script>` inside string values from closing the data block.
fn escape_script_json(json: &str) -> String {
    json.replace("</", "<\\/").replace("<!--", "<\\u0021--")
}

#[cfg(test)]
mod tests {
    use super::*;

    use quiz_core::model::PlaybackSettings;
    use quiz_core::parser::parse_quiz_text;
    use quiz_core::time::{fixed_clock, fixed_now};
    use storage::repository::InMemoryRepository;

    fn quiz(title: &str) -> Quiz {
        let mut draft = QuizDraft::new(
            title,
            parse_quiz_text("2+2?||3||4||5||6||2\nSky?||Blue||Red||Green||Pink||1").questions,
        );
        draft.settings = Some(PlaybackSettings::default().with_timer_seconds(10));
        draft.build(fixed_now()).unwrap()
    }

    fn exporter() -> (ExportService, Arc<InMemoryRepository>) {
        let repo = Arc::new(InMemoryRepository::new());
        (ExportService::new(fixed_clock(), repo.clone()), repo)
    }

    #[tokio::test]
    async fn bundle_roundtrip_replaces_store() {
        let (service, repo) = exporter();
        assert!(matches!(service.export_bundle().await, Err(ExportError::Empty)));

        repo.save_all(&[quiz("First"), quiz("Second")]).await.unwrap();
        let bundle = service.export_bundle().await.unwrap();
        assert!(bundle.starts_with("[\n"), "pretty printed: {bundle}");

        let (other, other_repo) = exporter();
        other_repo.save_all(&[quiz("Stale")]).await.unwrap();
        assert_eq!(other.import_bundle(&bundle).await.unwrap(), 2);
        assert_eq!(
            other_repo.load_all().await.unwrap(),
            repo.load_all().await.unwrap()
        );
    }

    #[tokio::test]
    async fn import_rejects_non_array_and_invalid_entries() {
        let (service, repo) = exporter();
        repo.save_all(&[quiz("Keep me")]).await.unwrap();

        assert!(matches!(
            service.import_bundle("{\"title\": \"x\"}").await,
            Err(ExportError::NotAnArray)
        ));
        assert!(matches!(
            service.import_bundle("not json").await,
            Err(ExportError::Json(_))
        ));
        let invalid = r#"[{"id": "67e55044-10b1-426f-9247-bb680e5fe0c8", "title": "ab",
            "questions": [], "createdAt": "2023-11-14T22:13:20Z"}]"#;
        assert!(matches!(
            service.import_bundle(invalid).await,
            Err(ExportError::InvalidBundle(_))
        ));

        let kept = repo.load_all().await.unwrap();
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].title(), "Keep me");
    }

    #[test]
    fn player_html_embeds_quiz_without_remote_scripts() {
        let options = ExportOptions {
            badge: Some("Grade 3".into()),
            about: None,
            footer: Some("Made with Quiz Maker".into()),
        };
        let html = player_html(&quiz("Math & </script> tricks"), &options).unwrap();

        assert!(html.starts_with("<!DOCTYPE html>"));
        let title = html
            .split("<title>")
            .nth(1)
            .and_then(|rest| rest.split("</title>").next())
            .unwrap();
        assert!(title.contains("&amp;") && title.contains("&lt;"), "{title}");
        assert!(!title.contains('<'), "{title}");
        assert!(html.contains("\"timerSeconds\":10"));
        assert!(html.contains("\"correctIndex\":1"));
        assert!(html.contains("\"badge\":\"Grade 3\""));
        assert!(html.contains("Math & <\\/script> tricks"));
        assert!(!html.contains("src=\"http"));
        assert_eq!(html.matches("</script>").count(), 2);
    }

    #[tokio::test]
    async fn export_is_blocked_by_validation_errors() {
        let (service, _) = exporter();
        let draft = QuizDraft::new("ab", Vec::new());
        let err = service
            .export_draft_html(draft, &ExportOptions::default())
            .unwrap_err();
        match err {
            ExportError::Validation(errors) => assert_eq!(errors.errors().len(), 2),
            other => panic!("expected validation error, got {other:?}"),
        }

        let missing = QuizId::generate();
        assert!(matches!(
            service.export_player_html(missing, &ExportOptions::default()).await,
            Err(ExportError::NotFound(id)) if id == missing
        ));
    }
}
