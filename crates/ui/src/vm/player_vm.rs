use quiz_core::playback::{AnswerRecord, PlayerState};
use services::PlaybackSnapshot;

/// How an option button is drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OptionState {
    Open,
    Correct,
    Incorrect,
    Dimmed,
}

impl OptionState {
    #[must_use]
    pub fn class(self) -> &'static str {
        match self {
            Self::Open => "option",
            Self::Correct => "option correct",
            Self::Incorrect => "option incorrect",
            Self::Dimmed => "option dimmed",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OptionVm {
    pub index: usize,
    pub text: String,
    pub state: OptionState,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuestionVm {
    pub number: usize,
    pub total: usize,
    pub score: u32,
    pub text: String,
    pub options: Vec<OptionVm>,
    pub locked: bool,
    pub timer_label: Option<String>,
    pub progress_percent: usize,
    /// Show the manual "next" button.
    pub show_next: bool,
    pub next_label: &'static str,
    pub timed_out: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResultVm {
    pub score: u32,
    pub total: u32,
    pub percentage: u32,
    pub message: &'static str,
    pub tier_class: &'static str,
}

/// What the player screen renders for a snapshot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PlayerVm {
    Menu {
        title: String,
        description: Option<String>,
        question_count: usize,
        timer_label: Option<String>,
    },
    Question(QuestionVm),
    Result(ResultVm),
}

impl PlayerVm {
    #[must_use]
    pub fn from_snapshot(snapshot: &PlaybackSnapshot) -> Self {
        match &snapshot.state {
            PlayerState::Menu => Self::Menu {
                title: snapshot.title.clone(),
                description: snapshot.description.clone(),
                question_count: snapshot.total,
                timer_label: snapshot
                    .settings
                    .timer_enabled()
                    .then(|| format!("{} seconds per question", snapshot.settings.timer_seconds())),
            },
            PlayerState::Playing(session) => {
                let locked = session.locked();
                let answer = session.last_answer().copied();
                let number = session.current_index() + 1;
                let options = snapshot
                    .question
                    .as_ref()
                    .map(|question| {
                        question
                            .options()
                            .iter()
                            .enumerate()
                            .map(|(index, text)| OptionVm {
                                index,
                                text: text.clone(),
                                state: option_state(
                                    index,
                                    question.correct_index(),
                                    locked,
                                    answer,
                                ),
                            })
                            .collect()
                    })
                    .unwrap_or_default();
                Self::Question(QuestionVm {
                    number,
                    total: snapshot.total,
                    score: session.score(),
                    text: snapshot
                        .question
                        .as_ref()
                        .map(|q| q.text().to_owned())
                        .unwrap_or_default(),
                    options,
                    locked,
                    timer_label: snapshot.remaining_seconds().map(format_timer),
                    progress_percent: progress_percent(number - 1, snapshot.total),
                    show_next: locked && !snapshot.settings.auto_advance(),
                    next_label: if number < snapshot.total {
                        "Next question"
                    } else {
                        "See result"
                    },
                    timed_out: answer.is_some_and(|a| a.selected.is_none()),
                })
            }
            PlayerState::Finished(result) => Self::Result(ResultVm {
                score: result.score(),
                total: result.total(),
                percentage: result.percentage(),
                message: result.tier().message(),
                tier_class: result.tier().as_str(),
            }),
        }
    }
}

fn option_state(
    index: usize,
    correct_index: usize,
    locked: bool,
    answer: Option<AnswerRecord>,
) -> OptionState {
    if !locked {
        return OptionState::Open;
    }
    if index == correct_index {
        return OptionState::Correct;
    }
    match answer.and_then(|a| a.selected) {
        Some(selected) if selected == index => OptionState::Incorrect,
        _ => OptionState::Dimmed,
    }
}

fn progress_percent(answered: usize, total: usize) -> usize {
    if total == 0 {
        0
    } else {
        answered * 100 / total
    }
}

/// `MM:SS` countdown label.
#[must_use]
pub fn format_timer(seconds: u32) -> String {
    let minutes = seconds / 60;
    let remainder = seconds % 60;
    format!("{minutes:02}:{remainder:02}")
}
