use thiserror::Error;

/// Number of answer options every question carries.
pub const OPTION_COUNT: usize = 4;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question text cannot be empty")]
    EmptyText,

    #[error("option {position} cannot be empty")]
    EmptyOption { position: usize },

    #[error("correct answer index {index} is out of range")]
    InvalidCorrectIndex { index: usize },

    #[error("option order must be a permutation of 0..4")]
    InvalidPermutation,
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// One prompt with exactly four options and one correct answer.
///
/// Fields are trimmed and validated once, at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    text: String,
    options: [String; OPTION_COUNT],
    correct_index: usize,
}

impl Question {
    /// Creates a validated question.
    ///
    /// `correct_index` is 0-based.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if the text or any option is blank, or if the
    /// index does not point at one of the four options.
    pub fn new(
        text: impl Into<String>,
        options: [String; OPTION_COUNT],
        correct_index: usize,
    ) -> Result<Self, QuestionError> {
        let text = text.into().trim().to_owned();
        if text.is_empty() {
            return Err(QuestionError::EmptyText);
        }

        let options = options.map(|option| option.trim().to_owned());
        if let Some(position) = options.iter().position(String::is_empty) {
            return Err(QuestionError::EmptyOption {
                position: position + 1,
            });
        }

        if correct_index >= OPTION_COUNT {
            return Err(QuestionError::InvalidCorrectIndex {
                index: correct_index,
            });
        }

        Ok(Self {
            text,
            options,
            correct_index,
        })
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn options(&self) -> &[String; OPTION_COUNT] {
        &self.options
    }

    #[must_use]
    pub fn option(&self, index: usize) -> Option<&str> {
        self.options.get(index).map(String::as_str)
    }

    #[must_use]
    pub fn correct_index(&self) -> usize {
        self.correct_index
    }

    #[must_use]
    pub fn correct_option(&self) -> &str {
        &self.options[self.correct_index]
    }

    #[must_use]
    pub fn is_correct(&self, selected: usize) -> bool {
        selected == self.correct_index
    }

    /// Returns a copy with options rearranged so that new slot `i` holds the
    /// old option `order[i]`. The correct index follows its option.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::InvalidPermutation` unless `order` contains
    /// each of `0..4` exactly once.
    pub fn with_option_order(&self, order: [usize; OPTION_COUNT]) -> Result<Self, QuestionError> {
        let mut seen = [false; OPTION_COUNT];
        for &slot in &order {
            if slot >= OPTION_COUNT || seen[slot] {
                return Err(QuestionError::InvalidPermutation);
            }
            seen[slot] = true;
        }

        let options = order.map(|old| self.options[old].clone());
        let correct_index = order
            .iter()
            .position(|&old| old == self.correct_index)
            .ok_or(QuestionError::InvalidPermutation)?;

        Ok(Self {
            text: self.text.clone(),
            options,
            correct_index,
        })
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
