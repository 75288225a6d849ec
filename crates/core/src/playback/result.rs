/// Feedback bucket for a finished quiz.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackTier {
    Perfect,
    Great,
    Good,
    KeepPracticing,
}

impl FeedbackTier {
    /// Classify a percentage: 100, at least 70, at least 50, anything lower.
    #[must_use]
    pub fn from_percentage(percentage: u32) -> Self {
        match percentage {
            100.. => Self::Perfect,
            70..=99 => Self::Great,
            50..=69 => Self::Good,
            _ => Self::KeepPracticing,
        }
    }

    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Self::Perfect => "Perfect score! Outstanding!",
            Self::Great => "Great job!",
            Self::Good => "Good effort!",
            Self::KeepPracticing => "Keep practicing!",
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Perfect => "perfect",
            Self::Great => "great",
            Self::Good => "good",
            Self::KeepPracticing => "keep_practicing",
        }
    }
}

/// How one question was answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnswerRecord {
    pub question_index: usize,
    /// `None` when the timer ran out.
    pub selected: Option<usize>,
    pub correct: bool,
}

/// Final score of a completed session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizResult {
    score: u32,
    total: u32,
    percentage: u32,
    tier: FeedbackTier,
    answers: Vec<AnswerRecord>,
}

impl QuizResult {
    #[must_use]
    pub fn new(score: u32, total: u32, answers: Vec<AnswerRecord>) -> Self {
        let percentage = percentage(score, total);
        Self {
            score,
            total,
            percentage,
            tier: FeedbackTier::from_percentage(percentage),
            answers,
        }
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.total
    }

    #[must_use]
    pub fn percentage(&self) -> u32 {
        self.percentage
    }

    #[must_use]
    pub fn tier(&self) -> FeedbackTier {
        self.tier
    }

    #[must_use]
    pub fn answers(&self) -> &[AnswerRecord] {
        &self.answers
    }

    #[must_use]
    pub fn timed_out(&self) -> usize {
        self.answers.iter().filter(|a| a.selected.is_none()).count()
    }
}

/// `round(100 * score / total)`, rounding halves up. Zero when `total` is zero.
#[must_use]
pub fn percentage(score: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    let score = u64::from(score);
    let total = u64::from(total);
    let rounded = (200 * score + total) / (2 * total);
    u32::try_from(rounded).unwrap_or(u32::MAX)
}
