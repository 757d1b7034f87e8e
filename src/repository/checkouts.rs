//! Checkout ledger repository

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use super::LedgerStore;
use crate::{
    error::AppResult,
    models::{
        checkout::{CheckoutEvent, CheckoutRow, NewCheckoutEvent},
        ToolId,
    },
};

#[derive(Clone)]
pub struct CheckoutsRepository {
    pool: Pool<Postgres>,
}

impl CheckoutsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

fn into_events(rows: Vec<CheckoutRow>) -> AppResult<Vec<CheckoutEvent>> {
    rows.into_iter().map(CheckoutEvent::try_from).collect()
}

#[async_trait]
impl LedgerStore for CheckoutsRepository {
    async fn append(&self, event: NewCheckoutEvent) -> AppResult<CheckoutEvent> {
        let row = sqlx::query_as::<_, CheckoutRow>(
            r#"
            INSERT INTO checkouts (tool_id, actor_name, action, recorded_by, ts)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, tool_id, actor_name, action, recorded_by, ts
            "#,
        )
        .bind(event.tool_id)
        .bind(&event.actor_name)
        .bind(event.action.as_str())
        .bind(&event.recorded_by)
        .bind(event.timestamp)
        .fetch_one(&self.pool)
        .await?;

        row.try_into()
    }

    async fn events_for(&self, tool_id: ToolId) -> AppResult<Vec<CheckoutEvent>> {
        let rows = sqlx::query_as::<_, CheckoutRow>(
            r#"
            SELECT id, tool_id, actor_name, action, recorded_by, ts
            FROM checkouts
            WHERE tool_id = $1
            ORDER BY ts, id
            "#,
        )
        .bind(tool_id)
        .fetch_all(&self.pool)
        .await?;

        into_events(rows)
    }

    async fn events_by_actor(&self, actor: &str) -> AppResult<Vec<CheckoutEvent>> {
        let rows = sqlx::query_as::<_, CheckoutRow>(
            r#"
            SELECT id, tool_id, actor_name, action, recorded_by, ts
            FROM checkouts
            WHERE actor_name = $1
            ORDER BY ts, id
            "#,
        )
        .bind(actor)
        .fetch_all(&self.pool)
        .await?;

        into_events(rows)
    }

    async fn recent(&self, limit: i64) -> AppResult<Vec<CheckoutEvent>> {
        let rows = sqlx::query_as::<_, CheckoutRow>(
            r#"
            SELECT id, tool_id, actor_name, action, recorded_by, ts
            FROM checkouts
            ORDER BY ts DESC, id DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        into_events(rows)
    }

    async fn delete_events_for(&self, tool_id: ToolId) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM checkouts WHERE tool_id = $1")
            .bind(tool_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
