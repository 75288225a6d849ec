//! Line-oriented quiz text format.
//!
//! One question per line:
//!
//! ```text
//! QUESTION || OPTION_A || OPTION_B || OPTION_C || OPTION_D || N
//! ```
//!
//! `N` is the 1-based number of the correct option. Blank lines are ignored.
//! Parsing is lenient: a malformed line is counted and reported, never fatal
//! for the rest of the batch.

use thiserror::Error;

use crate::error::Error;
use crate::model::{OPTION_COUNT, Question, QuestionError};

/// Field separator between question, options and answer number.
pub const DELIMITER: &str = "||";

/// Fields per line: question text, four options, answer number.
pub const FIELD_COUNT: usize = OPTION_COUNT + 2;

//
// ─── REJECTIONS ────────────────────────────────────────────────────────────────
//

/// Why a single line was not turned into a question.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum LineRejection {
    #[error("expected 6 fields separated by `||`, found {found}")]
    FieldCount { found: usize },

    #[error("question text is empty")]
    EmptyQuestion,

    #[error("option {position} is empty")]
    EmptyOption { position: usize },

    #[error("correct answer must be 1, 2, 3 or 4 (got `{raw}`)")]
    InvalidAnswer { raw: String },
}

//
// ─── SINGLE LINE ───────────────────────────────────────────────────────────────
//

/// Parse one line of quiz text.
///
/// # Errors
///
/// Returns the `LineRejection` describing the first problem found.
pub fn parse_line(line: &str) -> Result<Question, LineRejection> {
    let fields: Vec<&str> = line.split(DELIMITER).map(str::trim).collect();
    let [text, a, b, c, d, answer] = fields.as_slice() else {
        return Err(LineRejection::FieldCount {
            found: fields.len(),
        });
    };

    if text.is_empty() {
        return Err(LineRejection::EmptyQuestion);
    }

    let options = [*a, *b, *c, *d];
    if let Some(position) = options.iter().position(|option| option.is_empty()) {
        return Err(LineRejection::EmptyOption {
            position: position + 1,
        });
    }

    let correct_number = answer
        .parse::<usize>()
        .ok()
        .filter(|n| (1..=OPTION_COUNT).contains(n))
        .ok_or_else(|| LineRejection::InvalidAnswer {
            raw: (*answer).to_string(),
        })?;

    Question::new(
        *text,
        options.map(str::to_owned),
        correct_number - 1,
    )
    .map_err(|err| match err {
        QuestionError::EmptyText => LineRejection::EmptyQuestion,
        QuestionError::EmptyOption { position } => LineRejection::EmptyOption { position },
        _ => LineRejection::InvalidAnswer {
            raw: (*answer).to_string(),
        },
    })
}

//
// ─── WHOLE TEXT ────────────────────────────────────────────────────────────────
//

/// Outcome of parsing a block of quiz text.
///
/// `success + failed == total`, and `ok` is true only when at least one
/// question parsed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParseReport {
    pub ok: bool,
    pub total: usize,
    pub success: usize,
    pub failed: usize,
    pub questions: Vec<Question>,
    /// 1-based input line numbers of rejected lines, with the reason.
    pub rejections: Vec<(usize, LineRejection)>,
}

impl ParseReport {
    /// One-line summary for the editor status bar.
    #[must_use]
    pub fn status_message(&self) -> String {
        if self.total == 0 {
            return "No questions entered yet.".to_string();
        }
        format!(
            "Parsed {} of {} lines ({} failed)",
            self.success, self.total, self.failed
        )
    }
}

/// Parse every non-blank line, keeping good lines and counting bad ones.
#[must_use]
pub fn parse_quiz_text(text: &str) -> ParseReport {
    let mut report = ParseReport::default();

    for (line_no, line) in numbered_lines(text) {
        report.total += 1;
        match parse_line(line) {
            Ok(question) => {
                report.success += 1;
                report.questions.push(question);
            }
            Err(reason) => {
                report.failed += 1;
                report.rejections.push((line_no, reason));
            }
        }
    }

    report.ok = report.success > 0;
    report
}

/// Parse every non-blank line, failing on the first malformed one.
///
/// # Errors
///
/// Returns `Error::Line` naming the first rejected line.
pub fn parse_quiz_text_strict(text: &str) -> Result<Vec<Question>, Error> {
    numbered_lines(text)
        .map(|(line, raw)| parse_line(raw).map_err(|reason| Error::Line { line, reason }))
        .collect()
}

fn numbered_lines(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty())
}

//
// ─── FORMATTING ────────────────────────────────────────────────────────────────
//

/// Render a question back into the editor line format.
#[must_use]
pub fn format_question_line(question: &Question) -> String {
    let separator = format!(" {DELIMITER} ");
    let answer = (question.correct_index() + 1).to_string();
    let mut fields: Vec<&str> = Vec::with_capacity(FIELD_COUNT);
    fields.push(question.text());
    fields.extend(question.options().iter().map(String::as_str));
    fields.push(&answer);
    fields.join(&separator)
}

/// Render questions into editor text, one line each.
#[must_use]
pub fn format_quiz_text(questions: &[Question]) -> String {
    questions
        .iter()
        .map(format_question_line)
        .collect::<Vec<_>>()
        .join("\n")
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
