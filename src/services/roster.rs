//! Employee roster service

use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::{
        actor::is_guest_name,
        employee::{Employee, NewEmployee},
        Actor,
    },
    repository::RosterStore,
};

#[derive(Clone)]
pub struct RosterService {
    store: Arc<dyn RosterStore>,
}

impl RosterService {
    pub fn new(store: Arc<dyn RosterStore>) -> Self {
        Self { store }
    }

    /// Names for the "select your name" picker
    pub async fn list(&self) -> AppResult<Vec<Employee>> {
        self.store.list().await
    }

    /// Add a name to the roster; adding an existing name changes nothing
    pub async fn add(&self, actor: &Actor, employee: NewEmployee) -> AppResult<Employee> {
        actor.require_admin()?;

        let name = employee.name.trim();
        if is_guest_name(name) {
            return Err(AppError::Validation(format!(
                "'{}' cannot be used as an employee name",
                employee.name
            )));
        }

        let employee = NewEmployee {
            name: name.to_string(),
            pin: employee
                .pin
                .as_deref()
                .map(str::trim)
                .filter(|pin| !pin.is_empty())
                .map(str::to_string),
        };

        if let Some(existing) = self.store.find(&employee.name).await? {
            tracing::debug!("Roster: {} is already listed", existing.name);
            return Ok(existing);
        }

        let saved = self.store.add(&employee).await?;
        tracing::info!("Roster: added {}", saved.name);
        Ok(saved)
    }

    pub async fn remove(&self, actor: &Actor, name: &str) -> AppResult<()> {
        actor.require_admin()?;

        if !self.store.remove(name).await? {
            return Err(AppError::NotFound(format!("Employee '{}' not found", name)));
        }
        tracing::info!("Roster: removed {}", name);
        Ok(())
    }
}
