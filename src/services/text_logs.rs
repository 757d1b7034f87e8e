//! Free-text logs for categories that are not counted

use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::{text_log::TextLogEntry, Actor, Categories},
    repository::TextLogStore,
};

pub const DEFAULT_LOG_LIMIT: i64 = 50;
const MAX_LOG_LIMIT: i64 = 500;

#[derive(Clone)]
pub struct TextLogsService {
    store: Arc<dyn TextLogStore>,
    categories: Arc<Categories>,
}

impl TextLogsService {
    pub fn new(store: Arc<dyn TextLogStore>, categories: Arc<Categories>) -> Self {
        Self { store, categories }
    }

    /// Record what someone took from a text-log category
    pub async fn log_entry(&self, actor: &Actor, category: &str, entry: &str) -> AppResult<TextLogEntry> {
        let category = self.categories.require_text_log(category)?;
        if actor.is_guest() {
            return Err(AppError::Unauthorized(
                "Pick your name before logging".to_string(),
            ));
        }
        let entry = entry.trim();
        if entry.is_empty() {
            return Err(AppError::Validation("Log entry cannot be empty".to_string()));
        }

        self.store.append_entry(&category.name, &actor.name, entry).await
    }

    pub async fn recent_entries(&self, category: &str, limit: Option<i64>) -> AppResult<Vec<TextLogEntry>> {
        let category = self.categories.require_text_log(category)?;
        let limit = limit.unwrap_or(DEFAULT_LOG_LIMIT).clamp(1, MAX_LOG_LIMIT);
        self.store.recent_entries(&category.name, limit).await
    }
}
