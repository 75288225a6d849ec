use thiserror::Error;

use crate::parser::LineRejection;

/// Error from all-or-nothing parsing.
#[derive(Debug, Error)]
pub enum Error {
    #[error("line {line}: {reason}")]
    Line { line: usize, reason: LineRejection },
}
