//! In-process backend.
//!
//! Intended for tests and local runs without a database. Data lives only as
//! long as the process.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;

use super::{CatalogStore, InventoryStore, LedgerStore, RosterStore, TextLogStore};
use crate::{
    error::{AppError, AppResult},
    models::{
        employee::{Employee, NewEmployee},
        text_log::TextLogEntry,
        tool::{NewTool, ToolUpdate},
        CheckoutEvent, NewCheckoutEvent, Tool, ToolId,
    },
};

#[derive(Debug, Default)]
struct State {
    tools: Vec<Tool>,
    events: Vec<CheckoutEvent>,
    employees: Vec<Employee>,
    text_logs: Vec<TextLogEntry>,
    next_tool_id: ToolId,
    next_event_id: i64,
    next_employee_id: i32,
    next_entry_id: i64,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> AppResult<MutexGuard<'_, State>> {
        self.state
            .lock()
            .map_err(|_| AppError::Internal("memory store lock poisoned".to_string()))
    }
}

fn sorted(mut events: Vec<CheckoutEvent>) -> Vec<CheckoutEvent> {
    events.sort_by(|a, b| (a.timestamp, a.id).cmp(&(b.timestamp, b.id)));
    events
}

#[async_trait]
impl CatalogStore for MemoryStore {
    async fn get(&self, id: ToolId) -> AppResult<Tool> {
        self.state()?
            .tools
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Tool {} not found", id)))
    }

    async fn find_by_name(&self, category: &str, name: &str) -> AppResult<Option<Tool>> {
        Ok(self
            .state()?
            .tools
            .iter()
            .find(|t| t.category == category && t.name == name)
            .cloned())
    }

    async fn upsert(&self, tool: &NewTool) -> AppResult<Tool> {
        let mut state = self.state()?;

        if let Some(existing) = state
            .tools
            .iter_mut()
            .find(|t| t.category == tool.category && t.name == tool.name)
        {
            existing.quantity = tool.quantity;
            existing.image_url = tool.image_url.clone();
            return Ok(existing.clone());
        }

        state.next_tool_id += 1;
        let created = Tool {
            id: state.next_tool_id,
            name: tool.name.clone(),
            category: tool.category.clone(),
            quantity: tool.quantity,
            image_url: tool.image_url.clone(),
        };
        state.tools.push(created.clone());
        Ok(created)
    }

    async fn update(&self, id: ToolId, fields: &ToolUpdate) -> AppResult<Tool> {
        let mut state = self.state()?;

        let current = state
            .tools
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Tool {} not found", id)))?;
        let name = fields.name.clone().unwrap_or(current.name);
        let category = fields.category.clone().unwrap_or(current.category);

        if state
            .tools
            .iter()
            .any(|t| t.id != id && t.category == category && t.name == name)
        {
            return Err(AppError::Conflict(format!(
                "A tool named '{}' already exists in '{}'",
                name, category
            )));
        }

        let tool = state
            .tools
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Tool {} not found", id)))?;
        tool.name = name;
        tool.category = category;
        if let Some(quantity) = fields.quantity {
            tool.quantity = quantity;
        }
        if let Some(ref image_url) = fields.image_url {
            tool.image_url = Some(image_url.clone());
        }
        Ok(tool.clone())
    }

    async fn delete(&self, id: ToolId) -> AppResult<()> {
        let mut state = self.state()?;
        let before = state.tools.len();
        state.tools.retain(|t| t.id != id);
        if state.tools.len() == before {
            return Err(AppError::NotFound(format!("Tool {} not found", id)));
        }
        Ok(())
    }

    async fn list_by_category(&self, category: &str) -> AppResult<Vec<Tool>> {
        let mut tools: Vec<Tool> = self
            .state()?
            .tools
            .iter()
            .filter(|t| t.category == category)
            .cloned()
            .collect();
        tools.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(tools)
    }

    async fn list_all(&self) -> AppResult<Vec<Tool>> {
        let mut tools = self.state()?.tools.clone();
        tools.sort_by(|a, b| (&a.category, &a.name).cmp(&(&b.category, &b.name)));
        Ok(tools)
    }
}

#[async_trait]
impl LedgerStore for MemoryStore {
    async fn append(&self, event: NewCheckoutEvent) -> AppResult<CheckoutEvent> {
        let mut state = self.state()?;
        state.next_event_id += 1;
        let stored = CheckoutEvent {
            id: state.next_event_id,
            tool_id: event.tool_id,
            actor_name: event.actor_name,
            action: event.action,
            recorded_by: event.recorded_by,
            timestamp: event.timestamp,
        };
        state.events.push(stored.clone());
        Ok(stored)
    }

    async fn events_for(&self, tool_id: ToolId) -> AppResult<Vec<CheckoutEvent>> {
        let state = self.state()?;
        Ok(sorted(
            state
                .events
                .iter()
                .filter(|e| e.tool_id == tool_id)
                .cloned()
                .collect(),
        ))
    }

    async fn events_by_actor(&self, actor: &str) -> AppResult<Vec<CheckoutEvent>> {
        let state = self.state()?;
        Ok(sorted(
            state
                .events
                .iter()
                .filter(|e| e.actor_name == actor)
                .cloned()
                .collect(),
        ))
    }

    async fn recent(&self, limit: i64) -> AppResult<Vec<CheckoutEvent>> {
        let state = self.state()?;
        let mut events = sorted(state.events.clone());
        events.reverse();
        events.truncate(usize::try_from(limit).unwrap_or(0));
        Ok(events)
    }

    async fn delete_events_for(&self, tool_id: ToolId) -> AppResult<u64> {
        let mut state = self.state()?;
        let before = state.events.len();
        state.events.retain(|e| e.tool_id != tool_id);
        Ok((before - state.events.len()) as u64)
    }
}

// Each step holds the lock and cannot fail halfway, and callers serialize
// per tool, so the default two-step purge is atomic enough here.
impl InventoryStore for MemoryStore {}

#[async_trait]
impl RosterStore for MemoryStore {
    async fn list(&self) -> AppResult<Vec<Employee>> {
        let mut employees = self.state()?.employees.clone();
        employees.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(employees)
    }

    async fn find(&self, name: &str) -> AppResult<Option<Employee>> {
        Ok(self
            .state()?
            .employees
            .iter()
            .find(|e| e.name == name)
            .cloned())
    }

    async fn add(&self, employee: &NewEmployee) -> AppResult<Employee> {
        let mut state = self.state()?;
        if let Some(existing) = state.employees.iter().find(|e| e.name == employee.name) {
            return Ok(existing.clone());
        }
        state.next_employee_id += 1;
        let created = Employee {
            id: state.next_employee_id,
            name: employee.name.clone(),
            pin: employee.pin.clone(),
        };
        state.employees.push(created.clone());
        Ok(created)
    }

    async fn remove(&self, name: &str) -> AppResult<bool> {
        let mut state = self.state()?;
        let before = state.employees.len();
        state.employees.retain(|e| e.name != name);
        Ok(state.employees.len() != before)
    }
}

#[async_trait]
impl TextLogStore for MemoryStore {
    async fn append_entry(
        &self,
        category: &str,
        actor: &str,
        entry: &str,
    ) -> AppResult<TextLogEntry> {
        let mut state = self.state()?;
        state.next_entry_id += 1;
        let created = TextLogEntry {
            id: state.next_entry_id,
            category: category.to_string(),
            actor_name: actor.to_string(),
            entry: entry.to_string(),
            ts: Utc::now(),
        };
        state.text_logs.push(created.clone());
        Ok(created)
    }

    async fn recent_entries(&self, category: &str, limit: i64) -> AppResult<Vec<TextLogEntry>> {
        let state = self.state()?;
        Ok(state
            .text_logs
            .iter()
            .rev()
            .filter(|e| e.category == category)
            .take(usize::try_from(limit).unwrap_or(0))
            .cloned()
            .collect())
    }
}
