//! Repository layer: storage contracts and their backends
//!
//! Services only see the traits below. `Repository` implements them on
//! PostgreSQL; `memory::MemoryStore` implements them in process.

pub mod checkouts;
pub mod employees;
pub mod memory;
pub mod text_logs;
pub mod tools;

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use crate::{
    error::AppResult,
    models::{
        employee::{Employee, NewEmployee},
        text_log::TextLogEntry,
        tool::{NewTool, ToolUpdate},
        CheckoutEvent, NewCheckoutEvent, Tool, ToolId,
    },
};

/// Mutable tool records
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn get(&self, id: ToolId) -> AppResult<Tool>;

    async fn find_by_name(&self, category: &str, name: &str) -> AppResult<Option<Tool>>;

    /// Insert, or update in place when (category, name) already exists
    async fn upsert(&self, tool: &NewTool) -> AppResult<Tool>;

    async fn update(&self, id: ToolId, fields: &ToolUpdate) -> AppResult<Tool>;

    async fn delete(&self, id: ToolId) -> AppResult<()>;

    /// Tools of one category, ordered by name
    async fn list_by_category(&self, category: &str) -> AppResult<Vec<Tool>>;

    async fn list_all(&self) -> AppResult<Vec<Tool>>;
}

/// Append-only checkout ledger
#[async_trait]
pub trait LedgerStore: Send + Sync {
    async fn append(&self, event: NewCheckoutEvent) -> AppResult<CheckoutEvent>;

    /// Events of one tool ordered by (timestamp, id)
    async fn events_for(&self, tool_id: ToolId) -> AppResult<Vec<CheckoutEvent>>;

    /// Events whose holder is `actor`, ordered by (timestamp, id)
    async fn events_by_actor(&self, actor: &str) -> AppResult<Vec<CheckoutEvent>>;

    /// Most recent events first
    async fn recent(&self, limit: i64) -> AppResult<Vec<CheckoutEvent>>;

    /// Returns the number of events removed
    async fn delete_events_for(&self, tool_id: ToolId) -> AppResult<u64>;
}

/// Catalog and ledger living in the same backend
#[async_trait]
pub trait InventoryStore: CatalogStore + LedgerStore {
    /// Remove a tool together with its whole history.
    ///
    /// Backends with transactions should override this so both deletions
    /// commit or fail together.
    async fn purge_tool(&self, id: ToolId) -> AppResult<()> {
        self.delete_events_for(id).await?;
        self.delete(id).await
    }
}

/// Employee roster
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RosterStore: Send + Sync {
    async fn list(&self) -> AppResult<Vec<Employee>>;

    async fn find(&self, name: &str) -> AppResult<Option<Employee>>;

    /// Adds the employee unless the name is already on the roster
    async fn add(&self, employee: &NewEmployee) -> AppResult<Employee>;

    /// Returns false when no such name exists
    async fn remove(&self, name: &str) -> AppResult<bool>;
}

/// Free-text logs of the text-log categories
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TextLogStore: Send + Sync {
    async fn append_entry(&self, category: &str, actor: &str, entry: &str)
        -> AppResult<TextLogEntry>;

    /// Newest first
    async fn recent_entries(&self, category: &str, limit: i64) -> AppResult<Vec<TextLogEntry>>;
}

/// PostgreSQL backend holding the database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub tools: tools::ToolsRepository,
    pub checkouts: checkouts::CheckoutsRepository,
    pub employees: employees::EmployeesRepository,
    pub text_logs: text_logs::TextLogsRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            tools: tools::ToolsRepository::new(pool.clone()),
            checkouts: checkouts::CheckoutsRepository::new(pool.clone()),
            employees: employees::EmployeesRepository::new(pool.clone()),
            text_logs: text_logs::TextLogsRepository::new(pool.clone()),
            pool,
        }
    }
}

#[async_trait]
impl CatalogStore for Repository {
    async fn get(&self, id: ToolId) -> AppResult<Tool> {
        self.tools.get(id).await
    }

    async fn find_by_name(&self, category: &str, name: &str) -> AppResult<Option<Tool>> {
        self.tools.find_by_name(category, name).await
    }

    async fn upsert(&self, tool: &NewTool) -> AppResult<Tool> {
        self.tools.upsert(tool).await
    }

    async fn update(&self, id: ToolId, fields: &ToolUpdate) -> AppResult<Tool> {
        self.tools.update(id, fields).await
    }

    async fn delete(&self, id: ToolId) -> AppResult<()> {
        self.tools.delete(id).await
    }

    async fn list_by_category(&self, category: &str) -> AppResult<Vec<Tool>> {
        self.tools.list_by_category(category).await
    }

    async fn list_all(&self) -> AppResult<Vec<Tool>> {
        self.tools.list_all().await
    }
}

#[async_trait]
impl LedgerStore for Repository {
    async fn append(&self, event: NewCheckoutEvent) -> AppResult<CheckoutEvent> {
        self.checkouts.append(event).await
    }

    async fn events_for(&self, tool_id: ToolId) -> AppResult<Vec<CheckoutEvent>> {
        self.checkouts.events_for(tool_id).await
    }

    async fn events_by_actor(&self, actor: &str) -> AppResult<Vec<CheckoutEvent>> {
        self.checkouts.events_by_actor(actor).await
    }

    async fn recent(&self, limit: i64) -> AppResult<Vec<CheckoutEvent>> {
        self.checkouts.recent(limit).await
    }

    async fn delete_events_for(&self, tool_id: ToolId) -> AppResult<u64> {
        self.checkouts.delete_events_for(tool_id).await
    }
}

#[async_trait]
impl InventoryStore for Repository {
    async fn purge_tool(&self, id: ToolId) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM checkouts WHERE tool_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM tools WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() == 0 {
            // Dropping the transaction rolls the history deletion back.
            return Err(crate::error::AppError::NotFound(format!(
                "Tool {} not found",
                id
            )));
        }

        tx.commit().await?;
        Ok(())
    }
}

#[async_trait]
impl RosterStore for Repository {
    async fn list(&self) -> AppResult<Vec<Employee>> {
        self.employees.list().await
    }

    async fn find(&self, name: &str) -> AppResult<Option<Employee>> {
        self.employees.find(name).await
    }

    async fn add(&self, employee: &NewEmployee) -> AppResult<Employee> {
        self.employees.add(employee).await
    }

    async fn remove(&self, name: &str) -> AppResult<bool> {
        self.employees.remove(name).await
    }
}

#[async_trait]
impl TextLogStore for Repository {
    async fn append_entry(&self, category: &str, actor: &str, entry: &str)
        -> AppResult<TextLogEntry> {
        self.text_logs.append_entry(category, actor, entry).await
    }

    async fn recent_entries(&self, category: &str, limit: i64) -> AppResult<Vec<TextLogEntry>> {
        self.text_logs.recent_entries(category, limit).await
    }
}
