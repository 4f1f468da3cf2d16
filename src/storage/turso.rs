use async_trait::async_trait;
use chrono::{DateTime, Utc};
use libsql::{params, Builder, Connection, Database, Row, Value};
use std::sync::Arc;
use teloxide::types::ChatId;

use crate::config::StorageConfig;

use super::{migration::run_migrations, NewQuestion, QuestionId, QuestionRecord, QuestionRepository, StorageError};

const SELECT_COLUMNS: &str = "SELECT id, user_id, username, question, answer, answered, created_at, answered_at FROM questions";

/// libsql-backed repository, either a local SQLite file or a remote Turso database.
///
/// A single connection is shared so every read observes the previous write.
#[derive(Clone)]
pub struct TursoRepository {
    _db: Arc<Database>,
    conn: Connection,
}

impl TursoRepository {
    pub async fn open(config: &StorageConfig) -> Result<Self, StorageError> {
        let db = match config {
            StorageConfig::Local { path } => {
                info!("Opening local database at {}", path);
                Builder::new_local(path).build().await?
            }
            StorageConfig::Remote { url, token } => {
                info!("Connecting to remote database at {}", url);
                Builder::new_remote(url.to_string(), token.to_string()).build().await?
            }
        };

        let repository = Self::from_database(db).await?;
        info!("Question repository ready");
        Ok(repository)
    }

    #[cfg(test)]
    pub async fn in_memory() -> Result<Self, StorageError> {
        let db = Builder::new_local(":memory:").build().await?;
        Self::from_database(db).await
    }

    async fn from_database(db: Database) -> Result<Self, StorageError> {
        let conn = db.connect()?;
        run_migrations(&conn).await?;

        Ok(Self {
            _db: Arc::new(db),
            conn,
        })
    }

    async fn query_records(
        &self,
        sql: &str,
        params: impl libsql::params::IntoParams,
    ) -> Result<Vec<QuestionRecord>, StorageError> {
        let mut rows = self.conn.query(sql, params).await?;

        let mut records = Vec::new();
        while let Some(row) = rows.next().await? {
            records.push(row_to_record(&row)?);
        }

        Ok(records)
    }
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, StorageError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StorageError::CorruptRow(format!("invalid timestamp {:?}: {}", value, e)))
}

fn row_to_record(row: &Row) -> Result<QuestionRecord, StorageError> {
    let answered_at = match row.get_value(7)? {
        Value::Null => None,
        Value::Text(text) => Some(parse_timestamp(&text)?),
        other => return Err(StorageError::CorruptRow(format!("unexpected answered_at value: {:?}", other))),
    };

    Ok(QuestionRecord {
        id: QuestionId(row.get::<i64>(0)?),
        user_id: ChatId(row.get::<i64>(1)?),
        username: row.get::<String>(2)?,
        question: row.get::<String>(3)?,
        answer: row.get::<String>(4)?,
        answered: row.get::<i64>(5)? != 0,
        created_at: parse_timestamp(&row.get::<String>(6)?)?,
        answered_at,
    })
}

#[async_trait]
impl QuestionRepository for TursoRepository {
    async fn create(&self, question: NewQuestion) -> Result<QuestionId, StorageError> {
        self.conn
            .execute(
                "INSERT INTO questions (user_id, username, question, created_at) VALUES (?1, ?2, ?3, ?4)",
                params![
                    question.user_id.0,
                    question.username,
                    question.question,
                    Utc::now().to_rfc3339()
                ],
            )
            .await?;

        let id = QuestionId(self.conn.last_insert_rowid());
        debug!("Stored question {}", id);
        Ok(id)
    }

    async fn get_by_id(&self, id: QuestionId) -> Result<Option<QuestionRecord>, StorageError> {
        let sql = format!("{} WHERE id = ?1 LIMIT 1", SELECT_COLUMNS);
        let mut records = self.query_records(&sql, params![id.0]).await?;
        Ok(records.pop())
    }

    async fn list_unanswered(&self) -> Result<Vec<QuestionRecord>, StorageError> {
        let sql = format!("{} WHERE answered = 0 ORDER BY id", SELECT_COLUMNS);
        self.query_records(&sql, ()).await
    }

    async fn list_answered(&self) -> Result<Vec<QuestionRecord>, StorageError> {
        let sql = format!("{} WHERE answered = 1 ORDER BY id", SELECT_COLUMNS);
        self.query_records(&sql, ()).await
    }

    async fn list_by_username(&self, username: &str) -> Result<Vec<QuestionRecord>, StorageError> {
        let sql = format!("{} WHERE username = ?1 ORDER BY id", SELECT_COLUMNS);
        self.query_records(&sql, params![username.to_string()]).await
    }

    async fn set_answer(&self, id: QuestionId, answer: &str) -> Result<(), StorageError> {
        if answer.trim().is_empty() {
            return Err(StorageError::EmptyAnswer);
        }

        let updated = self
            .conn
            .execute(
                "UPDATE questions SET answer = ?1, answered = 1, answered_at = ?2 WHERE id = ?3 AND answered = 0",
                params![answer.to_string(), Utc::now().to_rfc3339(), id.0],
            )
            .await?;

        if updated == 0 {
            return Err(StorageError::QuestionNotFound(id));
        }

        debug!("Stored answer for question {}", id);
        Ok(())
    }
}
