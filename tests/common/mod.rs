//! Common test utilities
//!
//! This module is shared across all integration tests

#![allow(dead_code)]

use std::sync::Arc;

use tempfile::TempDir;

use induktr_bot::storage::leads::NewLead;
use induktr_bot::storage::{create_pool, DbPool};
use induktr_bot::Action;

/// A pooled SQLite database backed by a temp directory.
/// The directory lives as long as the struct.
pub struct TestDb {
    pub pool: Arc<DbPool>,
    _dir: TempDir,
}

pub fn test_db() -> TestDb {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("test.sqlite");
    let pool = create_pool(path.to_str().expect("utf-8 path")).expect("pool");
    TestDb { pool: Arc::new(pool), _dir: dir }
}

pub fn sample_lead() -> NewLead {
    NewLead {
        name: "Alice Example".to_string(),
        contact: "alice@example.com".to_string(),
        project_type: "landing".to_string(),
        budget: "1000".to_string(),
        deadline: Some("2026-10-01".to_string()),
        description: Some("Landing page for a coffee brand".to_string()),
        payment_method: Some("card".to_string()),
        order_type: "custom".to_string(),
        template_id: None,
    }
}

/// Texts of all Send actions addressed to a chat.
pub fn texts_sent_to(actions: &[Action], chat_id: i64) -> Vec<&str> {
    actions
        .iter()
        .filter_map(|a| match a {
            Action::Send { chat_id: c, text, .. } if *c == chat_id => Some(text.as_str()),
            _ => None,
        })
        .collect()
}

/// Total number of Send actions.
pub fn send_count(actions: &[Action]) -> usize {
    actions
        .iter()
        .filter(|a| matches!(a, Action::Send { .. }))
        .count()
}

/// The callback answer texts, in order.
pub fn callback_answers(actions: &[Action]) -> Vec<Option<&str>> {
    actions
        .iter()
        .filter_map(|a| match a {
            Action::AnswerCallback { text } => Some(text.as_deref()),
            _ => None,
        })
        .collect()
}
