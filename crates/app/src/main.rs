mod cli;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Parser;
use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use services::{AppServices, Clock, EditorForm, ExportOptions, ExportService, QuizService};
use ui::{App, UiApp, build_app_context};

use crate::cli::{Args, Command, normalize_sqlite_url};

type AppResult<T> = Result<T, Box<dyn std::error::Error>>;

struct DesktopApp {
    quizzes: Arc<QuizService>,
    export: Arc<ExportService>,
}

impl UiApp for DesktopApp {
    fn quiz_service(&self) -> Arc<QuizService> {
        Arc::clone(&self.quizzes)
    }

    fn export_service(&self) -> Arc<ExportService> {
        Arc::clone(&self.export)
    }
}

#[derive(Debug, thiserror::Error)]
#[error("invalid --db value: {raw}")]
struct InvalidDbUrl {
    raw: String,
}

async fn run(args: Args) -> AppResult<()> {
    let db_url = normalize_sqlite_url(&args.db_url);

    // Open + migrate SQLite at startup. Keep this in the binary glue so core/services stay pure.
    prepare_sqlite_file(&db_url)?;
    let services = AppServices::new_sqlite(&db_url, Clock::system()).await?;
    log::debug!("using database {db_url}");

    match args.command() {
        Command::Ui => {
            launch_desktop(&services);
            Ok(())
        }
        Command::Import { file, title } => import(&services, file, title.as_deref()).await,
        Command::Export { id, out } => {
            let html = services
                .export()
                .export_player_html(*id, &ExportOptions::default())
                .await?;
            write_output(out.as_deref(), &html).await
        }
        Command::ExportBundle { out } => {
            let json = services.export().export_bundle().await?;
            write_output(out.as_deref(), &json).await
        }
        Command::List => {
            for quiz in services.quizzes().list().await? {
                println!(
                    "{}  {}  ({} questions)",
                    quiz.id(),
                    quiz.title(),
                    quiz.question_count()
                );
            }
            Ok(())
        }
    }
}

fn launch_desktop(services: &AppServices) {
    let app: Arc<dyn UiApp> = Arc::new(DesktopApp {
        quizzes: services.quizzes(),
        export: services.export(),
    });
    let context = build_app_context(&app);

    // On macOS, Dioxus/tao can default to an always-on-top window in some dev setups.
    let desktop_cfg = DesktopConfig::new().with_window(
        WindowBuilder::new()
            .with_title("Quiz Maker")
            .with_always_on_top(false),
    );

    LaunchBuilder::desktop()
        .with_cfg(desktop_cfg)
        .with_context(context)
        .launch(App);
}

/// A file starting with `[` is a bundle; anything else is quiz text.
async fn import(services: &AppServices, file: &Path, title: Option<&str>) -> AppResult<()> {
    let raw = tokio::fs::read_to_string(file).await?;

    if raw.trim_start().starts_with('[') {
        let count = services.export().import_bundle(&raw).await?;
        println!("Imported {count} quizzes from {}", file.display());
        return Ok(());
    }

    let title = title.map_or_else(|| title_from_path(file), ToOwned::to_owned);
    let form = EditorForm {
        title,
        questions_text: raw,
        ..EditorForm::default()
    };
    let quizzes = services.quizzes();
    let (draft, report) = quizzes.draft_from_editor(&form).await?;
    for (line, rejection) in &report.rejections {
        log::warn!("{}:{line}: {rejection}", file.display());
    }
    let quiz = quizzes.save(draft).await?;
    println!("{}", report.status_message());
    println!("Saved {:?} as {}", quiz.title(), quiz.id());
    Ok(())
}

fn title_from_path(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().replace(['_', '-'], " "))
        .unwrap_or_default()
}

async fn write_output(out: Option<&Path>, contents: &str) -> AppResult<()> {
    match out {
        Some(path) => {
            tokio::fs::write(path, contents).await?;
            log::info!("wrote {}", path.display());
        }
        None => println!("{contents}"),
    }
    Ok(())
}

fn prepare_sqlite_file(db_url: &str) -> AppResult<()> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = PathBuf::from(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(&path)?;
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    if let Err(err) = run(args).await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
