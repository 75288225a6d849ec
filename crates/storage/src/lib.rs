#![forbid(unsafe_code)]

pub mod records;
pub mod repository;
pub mod sqlite;

pub use repository::{InMemoryRepository, QuizStore, Storage, StorageError};
