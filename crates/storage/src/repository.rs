use async_trait::async_trait;
use quiz_core::model::{Quiz, QuizId};
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Repository contract for the saved quiz collection.
///
/// The collection is loaded and saved as a whole. `upsert`, `remove` and
/// `get` are expressed in terms of `load_all`/`save_all`; backends may
/// override them to run atomically.
#[async_trait]
pub trait QuizStore: Send + Sync {
    /// Load every saved quiz in stored order.
    ///
    /// `upsert` puts new quizzes at the front and keeps edited ones in place.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the collection cannot be read or decoded.
    async fn load_all(&self) -> Result<Vec<Quiz>, StorageError>;

    /// Replace the whole collection.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the collection cannot be stored.
    async fn save_all(&self, quizzes: &[Quiz]) -> Result<(), StorageError>;

    /// Fetch a quiz by ID. Returns `Ok(None)` when it does not exist.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the collection cannot be read.
    async fn get(&self, id: QuizId) -> Result<Option<Quiz>, StorageError> {
        let all = self.load_all().await?;
        Ok(all.into_iter().find(|quiz| quiz.id() == id))
    }

    /// Replace the quiz with the same id in place, or insert it at the front.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the collection cannot be read or stored.
    async fn upsert(&self, quiz: &Quiz) -> Result<(), StorageError> {
        let mut all = self.load_all().await?;
        upsert_into(&mut all, quiz.clone());
        self.save_all(&all).await
    }

    /// Delete a quiz by id and return what remains.
    ///
    /// Removing an unknown id is not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the collection cannot be read or stored.
    async fn remove(&self, id: QuizId) -> Result<Vec<Quiz>, StorageError> {
        let mut all = self.load_all().await?;
        all.retain(|quiz| quiz.id() != id);
        self.save_all(&all).await?;
        Ok(all)
    }
}

/// Replace-by-id, otherwise insert at the front.
pub fn upsert_into(all: &mut Vec<Quiz>, quiz: Quiz) {
    match all.iter().position(|existing| existing.id() == quiz.id()) {
        Some(idx) => all[idx] = quiz,
        None => all.insert(0, quiz),
    }
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    quizzes: Arc<Mutex<Vec<Quiz>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self {
            quizzes: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

#[async_trait]
impl QuizStore for InMemoryRepository {
    async fn load_all(&self) -> Result<Vec<Quiz>, StorageError> {
        let guard = self
            .quizzes
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.clone())
    }

    async fn save_all(&self, quizzes: &[Quiz]) -> Result<(), StorageError> {
        let mut guard = self
            .quizzes
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        *guard = quizzes.to_vec();
        Ok(())
    }
}

/// Aggregates the repositories used by services.
#[derive(Clone)]
pub struct Storage {
    pub quizzes: Arc<dyn QuizStore>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            quizzes: Arc::new(InMemoryRepository::new()),
        }
    }
}
