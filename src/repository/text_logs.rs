//! Text log repository

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Pool, Postgres};

use super::TextLogStore;
use crate::{error::AppResult, models::text_log::TextLogEntry};

#[derive(Clone)]
pub struct TextLogsRepository {
    pool: Pool<Postgres>,
}

impl TextLogsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TextLogStore for TextLogsRepository {
    async fn append_entry(
        &self,
        category: &str,
        actor: &str,
        entry: &str,
    ) -> AppResult<TextLogEntry> {
        let row = sqlx::query_as::<_, TextLogEntry>(
            r#"
            INSERT INTO text_log_entries (category, actor_name, entry, ts)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(category)
        .bind(actor)
        .bind(entry)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn recent_entries(&self, category: &str, limit: i64) -> AppResult<Vec<TextLogEntry>> {
        let rows = sqlx::query_as::<_, TextLogEntry>(
            r#"
            SELECT * FROM text_log_entries
            WHERE category = $1
            ORDER BY ts DESC, id DESC
            LIMIT $2
            "#,
        )
        .bind(category)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
