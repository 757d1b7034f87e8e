//! Tools repository for database operations

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use super::CatalogStore;
use crate::{
    error::{AppError, AppResult},
    models::tool::{NewTool, Tool, ToolId, ToolUpdate},
};

#[derive(Clone)]
pub struct ToolsRepository {
    pool: Pool<Postgres>,
}

impl ToolsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CatalogStore for ToolsRepository {
    /// Get tool by ID
    async fn get(&self, id: ToolId) -> AppResult<Tool> {
        sqlx::query_as::<_, Tool>("SELECT * FROM tools WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Tool {} not found", id)))
    }

    async fn find_by_name(&self, category: &str, name: &str) -> AppResult<Option<Tool>> {
        let tool = sqlx::query_as::<_, Tool>(
            "SELECT * FROM tools WHERE category = $1 AND name = $2",
        )
        .bind(category)
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;
        Ok(tool)
    }

    /// Insert a tool, or update it in place when the name exists in the category
    async fn upsert(&self, tool: &NewTool) -> AppResult<Tool> {
        let row = sqlx::query_as::<_, Tool>(
            r#"
            INSERT INTO tools (name, category, quantity, image_url)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (category, name)
            DO UPDATE SET quantity = EXCLUDED.quantity,
                          image_url = EXCLUDED.image_url
            RETURNING *
            "#,
        )
        .bind(&tool.name)
        .bind(&tool.category)
        .bind(tool.quantity)
        .bind(&tool.image_url)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn update(&self, id: ToolId, fields: &ToolUpdate) -> AppResult<Tool> {
        let mut sets = Vec::new();
        let mut idx = 1;

        macro_rules! add_field {
            ($field:expr, $name:expr) => {
                if $field.is_some() {
                    sets.push(format!("{} = ${}", $name, idx));
                    idx += 1;
                }
            };
        }

        add_field!(fields.name, "name");
        add_field!(fields.category, "category");
        add_field!(fields.quantity, "quantity");
        add_field!(fields.image_url, "image_url");

        if sets.is_empty() {
            return self.get(id).await;
        }

        let query = format!(
            "UPDATE tools SET {} WHERE id = ${} RETURNING *",
            sets.join(", "),
            idx
        );

        let mut builder = sqlx::query_as::<_, Tool>(&query);

        macro_rules! bind_field {
            ($field:expr) => {
                if let Some(ref val) = $field {
                    builder = builder.bind(val);
                }
            };
        }

        bind_field!(fields.name);
        bind_field!(fields.category);
        bind_field!(fields.quantity);
        bind_field!(fields.image_url);

        builder
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Tool {} not found", id)))
    }

    async fn delete(&self, id: ToolId) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM tools WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Tool {} not found", id)));
        }
        Ok(())
    }

    async fn list_by_category(&self, category: &str) -> AppResult<Vec<Tool>> {
        let rows = sqlx::query_as::<_, Tool>(
            "SELECT * FROM tools WHERE category = $1 ORDER BY name",
        )
        .bind(category)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn list_all(&self) -> AppResult<Vec<Tool>> {
        let rows = sqlx::query_as::<_, Tool>("SELECT * FROM tools ORDER BY category, name")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }
}
