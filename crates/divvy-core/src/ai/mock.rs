//! Mock extractor for testing
//!
//! Replays scripted responses in order; an exhausted script yields a
//! refusal so tests fail loudly instead of inventing expenses.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::models::Category;

use super::{ExtractedExpense, ExtractorBackend};

/// One scripted mock response
#[derive(Debug, Clone)]
pub enum MockReply {
    Expense(ExtractedExpense),
    Refusal(String),
}

/// Scripted extractor backend
#[derive(Clone, Default)]
pub struct MockExtractor {
    replies: Arc<Mutex<VecDeque<MockReply>>>,
}

impl MockExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful extraction
    pub fn push_expense(&self, amount: f64, category_name: &str, note: Option<&str>) {
        self.push(MockReply::Expense(ExtractedExpense {
            amount,
            category_name: category_name.to_string(),
            note: note.map(String::from),
        }));
    }

    /// Queue a refusal
    pub fn push_refusal(&self, reason: &str) {
        self.push(MockReply::Refusal(reason.to_string()));
    }

    fn push(&self, reply: MockReply) {
        self.replies
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(reply);
    }
}

#[async_trait]
impl ExtractorBackend for MockExtractor {
    async fn extract(&self, _message: &str, _categories: &[Category]) -> Result<ExtractedExpense> {
        let reply = self
            .replies
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front();
        match reply {
            Some(MockReply::Expense(e)) => Ok(e),
            Some(MockReply::Refusal(reason)) => Err(Error::Resolution(reason)),
            None => Err(Error::Resolution(
                "mock extractor has no scripted reply".to_string(),
            )),
        }
    }

    async fn health_check(&self) -> bool {
        true
    }

    fn name(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_replies_in_order() {
        let mock = MockExtractor::new();
        mock.push_expense(10.0, "Food", None);
        mock.push_refusal("not an expense");

        let first = mock.extract("anything", &[]).await.unwrap();
        assert_eq!(first.category_name, "Food");

        let second = mock.extract("anything", &[]).await.unwrap_err();
        assert!(matches!(second, Error::Resolution(_)));
    }

    #[tokio::test]
    async fn test_exhausted_script_refuses() {
        let mock = MockExtractor::new();
        assert!(mock.extract("x", &[]).await.is_err());
    }
}
