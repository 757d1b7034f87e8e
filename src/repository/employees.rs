//! Employee roster repository

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use super::RosterStore;
use crate::{
    error::AppResult,
    models::employee::{Employee, NewEmployee},
};

#[derive(Clone)]
pub struct EmployeesRepository {
    pool: Pool<Postgres>,
}

impl EmployeesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RosterStore for EmployeesRepository {
    async fn list(&self) -> AppResult<Vec<Employee>> {
        let rows = sqlx::query_as::<_, Employee>("SELECT * FROM employees ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn find(&self, name: &str) -> AppResult<Option<Employee>> {
        let row = sqlx::query_as::<_, Employee>("SELECT * FROM employees WHERE name = $1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn add(&self, employee: &NewEmployee) -> AppResult<Employee> {
        // The no-op update makes RETURNING yield the existing row on conflict.
        let row = sqlx::query_as::<_, Employee>(
            r#"
            INSERT INTO employees (name, pin)
            VALUES ($1, $2)
            ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
            RETURNING *
            "#,
        )
        .bind(&employee.name)
        .bind(&employee.pin)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn remove(&self, name: &str) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM employees WHERE name = $1")
            .bind(name)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
