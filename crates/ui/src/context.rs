use std::sync::Arc;

use services::{ExportService, QuizService};

/// What the UI needs from the application composition root.
pub trait UiApp: Send + Sync {
    fn quiz_service(&self) -> Arc<QuizService>;
    fn export_service(&self) -> Arc<ExportService>;
}

#[derive(Clone)]
pub struct AppContext {
    quizzes: Arc<QuizService>,
    export: Arc<ExportService>,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            quizzes: app.quiz_service(),
            export: app.export_service(),
        }
    }

    #[must_use]
    pub fn quiz_service(&self) -> Arc<QuizService> {
        Arc::clone(&self.quizzes)
    }

    #[must_use]
    pub fn export_service(&self) -> Arc<ExportService> {
        Arc::clone(&self.export)
    }
}

// Provided by the application composition root (`crates/app`).

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
