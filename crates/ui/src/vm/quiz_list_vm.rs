use chrono::{DateTime, Utc};
use quiz_core::model::{Quiz, QuizId};

/// One row on the saved-quizzes screen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuizCardVm {
    pub id: QuizId,
    pub title: String,
    pub description: Option<String>,
    pub meta: String,
}

#[must_use]
pub fn map_quiz_cards(quizzes: &[Quiz]) -> Vec<QuizCardVm> {
    quizzes.iter().map(map_quiz_card).collect()
}

fn map_quiz_card(quiz: &Quiz) -> QuizCardVm {
    let count = quiz.question_count();
    let noun = if count == 1 { "question" } else { "questions" };
    let mut meta = format!("{count} {noun} · created {}", format_date(quiz.created_at()));
    if quiz.settings().timer_enabled() {
        meta.push_str(&format!(" · {}s per question", quiz.settings().timer_seconds()));
    }
    QuizCardVm {
        id: quiz.id(),
        title: quiz.title().to_owned(),
        description: quiz.description().map(ToOwned::to_owned),
        meta,
    }
}

#[must_use]
pub fn format_date(value: DateTime<Utc>) -> String {
    value.format("%Y-%m-%d").to_string()
}
