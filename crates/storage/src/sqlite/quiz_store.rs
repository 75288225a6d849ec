use async_trait::async_trait;
use chrono::Utc;
use quiz_core::model::{Quiz, QuizId};
use sqlx::{Row, SqliteConnection};

use super::SqliteRepository;
use crate::records::{decode_collection, encode_collection};
use crate::repository::{QuizStore, StorageError, upsert_into};

/// Key under which the whole quiz collection is stored.
pub const QUIZ_COLLECTION_KEY: &str = "quiz_maker.quizzes.v1";

fn conn_err(e: sqlx::Error) -> StorageError {
    StorageError::Connection(e.to_string())
}

async fn read_collection(conn: &mut SqliteConnection) -> Result<Vec<Quiz>, StorageError> {
    let row = sqlx::query("SELECT value FROM kv_store WHERE key = ?1")
        .bind(QUIZ_COLLECTION_KEY)
        .fetch_optional(&mut *conn)
        .await
        .map_err(conn_err)?;

    let Some(row) = row else {
        return Ok(Vec::new());
    };
    let raw: String = row
        .try_get("value")
        .map_err(|e| StorageError::Serialization(e.to_string()))?;
    decode_collection(&raw)
}

async fn write_collection(
    conn: &mut SqliteConnection,
    quizzes: &[Quiz],
) -> Result<(), StorageError> {
    let raw = encode_collection(quizzes, false)?;
    sqlx::query(
        r"
        INSERT INTO kv_store (key, value, updated_at)
        VALUES (?1, ?2, ?3)
        ON CONFLICT(key) DO UPDATE SET
            value = excluded.value,
            updated_at = excluded.updated_at
        ",
    )
    .bind(QUIZ_COLLECTION_KEY)
    .bind(raw)
    .bind(Utc::now())
    .execute(&mut *conn)
    .await
    .map_err(conn_err)?;
    Ok(())
}

// Take the write lock up front so concurrent read-modify-write calls queue
// on `busy_timeout` instead of failing on lock upgrade.
const BEGIN_WRITE: &str = "BEGIN IMMEDIATE";

#[async_trait]
impl QuizStore for SqliteRepository {
    async fn load_all(&self) -> Result<Vec<Quiz>, StorageError> {
        let mut conn = self.pool.acquire().await.map_err(conn_err)?;
        read_collection(&mut conn).await
    }

    async fn save_all(&self, quizzes: &[Quiz]) -> Result<(), StorageError> {
        let mut conn = self.pool.acquire().await.map_err(conn_err)?;
        write_collection(&mut conn, quizzes).await
    }

    async fn upsert(&self, quiz: &Quiz) -> Result<(), StorageError> {
        let mut tx = self.pool.begin_with(BEGIN_WRITE).await.map_err(conn_err)?;
        let mut all = read_collection(&mut tx).await?;
        upsert_into(&mut all, quiz.clone());
        write_collection(&mut tx, &all).await?;
        tx.commit().await.map_err(conn_err)?;
        Ok(())
    }

    async fn remove(&self, id: QuizId) -> Result<Vec<Quiz>, StorageError> {
        let mut tx = self.pool.begin_with(BEGIN_WRITE).await.map_err(conn_err)?;
        let mut all = read_collection(&mut tx).await?;
        all.retain(|quiz| quiz.id() != id);
        write_collection(&mut tx, &all).await?;
        tx.commit().await.map_err(conn_err)?;
        Ok(all)
    }
}
