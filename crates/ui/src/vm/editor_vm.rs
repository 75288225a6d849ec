use quiz_core::model::{QuizDraft, validate_quiz};
use quiz_core::parser::ParseReport;
use services::EditorForm;
use services::quiz_service::build_draft;

/// Live feedback shown under the editor while typing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EditorFeedbackVm {
    pub status: String,
    /// One entry per rejected line, e.g. `Line 3: expected 6 fields, found 5`.
    pub line_errors: Vec<String>,
    pub validation_errors: Vec<String>,
}

impl EditorFeedbackVm {
    #[must_use]
    pub fn can_save(&self) -> bool {
        self.validation_errors.is_empty()
    }
}

#[must_use]
pub fn editor_feedback(form: &EditorForm) -> EditorFeedbackVm {
    let (draft, report) = build_draft(form, None);
    feedback_from(&draft, &report)
}

fn feedback_from(draft: &QuizDraft, report: &ParseReport) -> EditorFeedbackVm {
    EditorFeedbackVm {
        status: report.status_message(),
        line_errors: report
            .rejections
            .iter()
            .map(|(line, reason)| format!("Line {line}: {reason}"))
            .collect(),
        validation_errors: validate_quiz(draft),
    }
}

/// Parse the timer field; anything that is not a whole number disables the timer.
#[must_use]
pub fn parse_timer_input(raw: &str) -> u32 {
    raw.trim().parse().unwrap_or(0)
}

/// File name for an exported player, derived from the quiz title.
#[must_use]
pub fn export_file_name(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    for ch in title.trim().chars() {
        if ch.is_alphanumeric() {
            slug.extend(ch.to_lowercase());
        } else if !slug.ends_with('-') && !slug.is_empty() {
            slug.push('-');
        }
    }
    let slug = slug.trim_end_matches('-');
    if slug.is_empty() {
        "quiz.html".to_string()
    } else {
        format!("{slug}.html")
    }
}
