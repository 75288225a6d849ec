use std::sync::Arc;

use storage::repository::Storage;

use crate::Clock;
use crate::error::AppServicesError;
use crate::export_service::ExportService;
use crate::quiz_service::QuizService;

/// Assembles app-facing services over one store.
#[derive(Clone)]
pub struct AppServices {
    quizzes: Arc<QuizService>,
    export: Arc<ExportService>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails.
    pub async fn new_sqlite(db_url: &str, clock: Clock) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Ok(Self::from_storage(&storage, clock))
    }

    /// Build services over an existing storage aggregate.
    #[must_use]
    pub fn from_storage(storage: &Storage, clock: Clock) -> Self {
        Self {
            quizzes: Arc::new(QuizService::new(clock, Arc::clone(&storage.quizzes))),
            export: Arc::new(ExportService::new(clock, Arc::clone(&storage.quizzes))),
        }
    }

    /// Services over a fresh in-memory store.
    #[must_use]
    pub fn in_memory(clock: Clock) -> Self {
        Self::from_storage(&Storage::in_memory(), clock)
    }

    #[must_use]
    pub fn quizzes(&self) -> Arc<QuizService> {
        Arc::clone(&self.quizzes)
    }

    #[must_use]
    pub fn export(&self) -> Arc<ExportService> {
        Arc::clone(&self.export)
    }
}
