use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use std::sync::{
    atomic::{AtomicI64, Ordering},
    Arc,
};

use super::{NewQuestion, QuestionId, QuestionRecord, QuestionRepository, StorageError};

/// Process-local repository backing the relay tests.
#[derive(Clone, Debug, Default)]
pub struct MemoryRepository {
    records: Arc<DashMap<QuestionId, QuestionRecord>>,
    last_id: Arc<AtomicI64>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn collect<F>(&self, predicate: F) -> Vec<QuestionRecord>
    where
        F: Fn(&QuestionRecord) -> bool,
    {
        let mut records: Vec<QuestionRecord> = self
            .records
            .iter()
            .filter(|entry| predicate(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();
        records.sort_by_key(|record| record.id);
        records
    }
}

#[async_trait]
impl QuestionRepository for MemoryRepository {
    async fn create(&self, question: NewQuestion) -> Result<QuestionId, StorageError> {
        let id = QuestionId(self.last_id.fetch_add(1, Ordering::SeqCst) + 1);

        self.records.insert(
            id,
            QuestionRecord {
                id,
                user_id: question.user_id,
                username: question.username,
                question: question.question,
                answer: String::new(),
                answered: false,
                created_at: Utc::now(),
                answered_at: None,
            },
        );

        Ok(id)
    }

    async fn get_by_id(&self, id: QuestionId) -> Result<Option<QuestionRecord>, StorageError> {
        Ok(self.records.get(&id).map(|entry| entry.value().clone()))
    }

    async fn list_unanswered(&self) -> Result<Vec<QuestionRecord>, StorageError> {
        Ok(self.collect(|record| !record.answered))
    }

    async fn list_answered(&self) -> Result<Vec<QuestionRecord>, StorageError> {
        Ok(self.collect(|record| record.answered))
    }

    async fn list_by_username(&self, username: &str) -> Result<Vec<QuestionRecord>, StorageError> {
        Ok(self.collect(|record| record.username == username))
    }

    async fn set_answer(&self, id: QuestionId, answer: &str) -> Result<(), StorageError> {
        if answer.trim().is_empty() {
            return Err(StorageError::EmptyAnswer);
        }

        match self.records.get_mut(&id) {
            Some(mut entry) if !entry.answered => {
                let record = entry.value_mut();
                record.answer = answer.to_string();
                record.answered = true;
                record.answered_at = Some(Utc::now());
                Ok(())
            }
            _ => Err(StorageError::QuestionNotFound(id)),
        }
    }
}

#[cfg(test)]
mod tests {
    use teloxide::types::ChatId;

    use super::*;

    fn new_question(user_id: i64, username: &str, question: &str) -> NewQuestion {
        NewQuestion {
            user_id: ChatId(user_id),
            username: username.to_string(),
            question: question.to_string(),
        }
    }

    #[tokio::test]
    async fn test_ids_are_monotonic() {
        let repo = MemoryRepository::new();
        let first = repo.create(new_question(1, "a", "q1")).await.unwrap();
        let second = repo.create(new_question(2, "b", "q2")).await.unwrap();
        assert!(second > first);
    }

    #[tokio::test]
    async fn test_answer_lifecycle() {
        let repo = MemoryRepository::new();
        let id = repo.create(new_question(42, "alice", "When?")).await.unwrap();

        let record = repo.get_by_id(id).await.unwrap().unwrap();
        assert!(!record.answered);
        assert!(record.answer.is_empty());

        repo.set_answer(id, "Now").await.unwrap();
        let record = repo.get_by_id(id).await.unwrap().unwrap();
        assert!(record.answered);
        assert_eq!(record.answer, "Now");
        assert!(record.answered_at.is_some());

        // A second answer is refused and the first one is kept
        assert!(matches!(
            repo.set_answer(id, "Later").await,
            Err(StorageError::QuestionNotFound(_))
        ));
        assert_eq!(repo.get_by_id(id).await.unwrap().unwrap().answer, "Now");
    }

    #[tokio::test]
    async fn test_set_answer_unknown_id_creates_nothing() {
        let repo = MemoryRepository::new();
        assert!(repo.set_answer(QuestionId(9999), "A").await.is_err());
        assert!(repo.get_by_id(QuestionId(9999)).await.unwrap().is_none());
        assert!(repo.list_answered().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_lists_are_filtered_and_ordered() {
        let repo = MemoryRepository::new();
        let a = repo.create(new_question(1, "alice", "q1")).await.unwrap();
        let b = repo.create(new_question(2, "bob", "q2")).await.unwrap();
        let c = repo.create(new_question(1, "alice", "q3")).await.unwrap();
        repo.set_answer(b, "a2").await.unwrap();

        let unanswered: Vec<_> = repo.list_unanswered().await.unwrap().iter().map(|r| r.id).collect();
        assert_eq!(unanswered, vec![a, c]);

        let answered: Vec<_> = repo.list_answered().await.unwrap().iter().map(|r| r.id).collect();
        assert_eq!(answered, vec![b]);

        let alice: Vec<_> = repo
            .list_by_username("alice")
            .await
            .unwrap()
            .iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(alice, vec![a, c]);
    }
}
