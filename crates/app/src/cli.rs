use std::path::PathBuf;

use clap::{Parser, Subcommand};
use quiz_core::model::QuizId;

/// Default database when neither `--db` nor `QUIZ_DB_URL` is given.
pub const DEFAULT_DB_URL: &str = "sqlite://quiz-maker.sqlite3";

#[derive(Debug, Parser)]
#[command(name = "quiz-maker")]
#[command(about = "Write multiple-choice quizzes, play them, and export them as standalone HTML")]
#[command(version)]
pub struct Args {
    #[arg(
        long = "db",
        env = "QUIZ_DB_URL",
        default_value = DEFAULT_DB_URL,
        global = true,
        help = "SQLite database URL or file path"
    )]
    pub db_url: String,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand, PartialEq, Eq)]
pub enum Command {
    /// Launch the desktop app (default).
    Ui,
    /// Import a JSON bundle, or a text file with one question per line.
    Import {
        file: PathBuf,
        #[arg(long, help = "Title for a quiz imported from a text file")]
        title: Option<String>,
    },
    /// Export one quiz as a standalone HTML player.
    Export {
        #[arg(long)]
        id: QuizId,
        #[arg(long, help = "Output file (defaults to stdout)")]
        out: Option<PathBuf>,
    },
    /// Export every saved quiz as a JSON bundle.
    ExportBundle {
        #[arg(long, help = "Output file (defaults to stdout)")]
        out: Option<PathBuf>,
    },
    /// List saved quizzes.
    List,
}

impl Args {
    #[must_use]
    pub fn command(&self) -> &Command {
        self.command.as_ref().unwrap_or(&Command::Ui)
    }
}

/// Turn a bare path or `sqlite:` URL into an absolute `sqlite://` URL.
#[must_use]
pub fn normalize_sqlite_url(raw: &str) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw.to_string();
    }

    let trimmed = raw.trim();
    let path_str = trimmed.strip_prefix("sqlite:").unwrap_or(trimmed);
    let path = std::path::Path::new(path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}
