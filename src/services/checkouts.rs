//! Checkout and check-in service
//!
//! Drives the ledger engine against the store: every write to a tool's ledger
//! happens inside that tool's lock, decisions are made on a fresh replay of
//! the ledger, and the cached projection is replaced after each append.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;

use crate::{
    error::{AppError, AppResult},
    ledger::{self, HolderSet, Lookup, ProjectionCache, ToolLocks},
    models::{
        checkout::ActivityEntry,
        tool::HeldTool,
        Actor, CheckoutAction, CheckoutEvent, NewCheckoutEvent, Tool, ToolId, ToolStatus,
    },
    repository::{CatalogStore, InventoryStore, LedgerStore},
};

pub const DEFAULT_ACTIVITY_LIMIT: i64 = 100;
pub const MAX_ACTIVITY_LIMIT: i64 = 500;

#[derive(Clone)]
pub struct CheckoutsService {
    store: Arc<dyn InventoryStore>,
    locks: Arc<ToolLocks>,
    projections: Arc<ProjectionCache>,
}

impl CheckoutsService {
    pub fn new(store: Arc<dyn InventoryStore>) -> Self {
        Self {
            store,
            locks: Arc::new(ToolLocks::new()),
            projections: Arc::new(ProjectionCache::new()),
        }
    }

    /// Current holders, served from the projection when it is fresh
    pub async fn holders(&self, tool_id: ToolId) -> AppResult<HolderSet> {
        match self.projections.lookup(tool_id) {
            Lookup::Hit(holders) => Ok(holders),
            Lookup::Miss { epoch } => {
                let holders = self.replay(tool_id).await?;
                self.projections.fill(tool_id, epoch, holders.clone());
                Ok(holders)
            }
        }
    }

    /// Holders recomputed from the ledger, bypassing the projection
    pub async fn replay(&self, tool_id: ToolId) -> AppResult<HolderSet> {
        let events = self.store.events_for(tool_id).await?;
        Ok(ledger::holders(&events))
    }

    pub async fn status(&self, tool: Tool) -> AppResult<ToolStatus> {
        let holders = self.holders(tool.id).await?;
        Ok(Self::status_from(tool, &holders))
    }

    fn status_from(tool: Tool, holders: &HolderSet) -> ToolStatus {
        ToolStatus {
            outstanding: holders.len(),
            available: ledger::available(tool.quantity, holders),
            holders: holders.entries(),
            tool,
        }
    }

    /// Check out one unit for `actor`
    pub async fn check_out(&self, tool_id: ToolId, actor: &Actor) -> AppResult<CheckoutEvent> {
        if !ledger::can_check_out(&actor.name) {
            return Err(AppError::Unauthorized(
                "Pick your name before checking out tools".to_string(),
            ));
        }

        let _guard = self.locks.acquire(tool_id).await;

        let tool = self.store.get(tool_id).await?;
        let holders = self.replay(tool_id).await?;
        if ledger::available(tool.quantity, &holders) == 0 {
            return Err(AppError::NoUnitsAvailable(format!(
                "No units of '{}' are available",
                tool.name
            )));
        }

        let event = self
            .record(holders, tool_id, &actor.name, CheckoutAction::CheckOut, &actor.name)
            .await?;
        tracing::info!("Tool {} ('{}') checked out by {}", tool_id, tool.name, actor.name);
        Ok(event)
    }

    /// Append a check-in without consulting the access policy
    pub async fn append_checkin(&self, tool_id: ToolId, actor_name: &str) -> AppResult<CheckoutEvent> {
        let _guard = self.locks.acquire(tool_id).await;

        self.store.get(tool_id).await?;
        let holders = self.replay(tool_id).await?;
        self.record(holders, tool_id, actor_name, CheckoutAction::CheckIn, actor_name)
            .await
    }

    /// Check in one unit, subject to the access policy.
    ///
    /// The returned unit is attributed to `on_behalf_of` when given, otherwise
    /// to the requester. An admin who holds nothing and names nobody returns
    /// the unit of the sole holder; with several holders the admin must name
    /// one. The requester is always stored as `recorded_by`.
    ///
    /// A check-in that would return no unit is rejected with `Validation`.
    pub async fn check_in(
        &self,
        tool_id: ToolId,
        on_behalf_of: Option<&str>,
        requester: &Actor,
    ) -> AppResult<CheckoutEvent> {
        let on_behalf_of = on_behalf_of.map(str::trim).filter(|name| !name.is_empty());
        if let Some(name) = on_behalf_of {
            if !requester.is_admin && name != requester.name {
                return Err(AppError::Unauthorized(
                    "Only an admin can check in tools for someone else".to_string(),
                ));
            }
        }

        let _guard = self.locks.acquire(tool_id).await;

        let tool = self.store.get(tool_id).await?;
        let holders = self.replay(tool_id).await?;
        if !ledger::can_check_in(&requester.name, &holders, requester.is_admin) {
            return Err(AppError::Unauthorized(format!(
                "Only the current holder or an admin can check in '{}'",
                tool.name
            )));
        }

        let holder = match on_behalf_of {
            Some(name) => name.to_string(),
            None if holders.holds(&requester.name) => requester.name.clone(),
            None => match holders.iter().collect::<Vec<_>>().as_slice() {
                [(sole, _)] => sole.to_string(),
                [] => {
                    return Err(AppError::Validation(format!(
                        "No units of '{}' are checked out",
                        tool.name
                    )))
                }
                _ => {
                    return Err(AppError::Validation(format!(
                        "'{}' has several holders; name the holder in on_behalf_of",
                        tool.name
                    )))
                }
            },
        };
        if !holders.holds(&holder) {
            return Err(AppError::Validation(format!(
                "{} holds no units of '{}'",
                holder, tool.name
            )));
        }

        let event = self
            .record(holders, tool_id, &holder, CheckoutAction::CheckIn, &requester.name)
            .await?;
        if holder == requester.name {
            tracing::info!("Tool {} ('{}') checked in by {}", tool_id, tool.name, holder);
        } else {
            tracing::info!(
                "Tool {} ('{}') checked in for {} by {}",
                tool_id,
                tool.name,
                holder,
                requester.name
            );
        }
        Ok(event)
    }

    /// Check in every unit the requester holds
    pub async fn return_all(&self, tool_id: ToolId, requester: &Actor) -> AppResult<Vec<CheckoutEvent>> {
        let _guard = self.locks.acquire(tool_id).await;

        let tool = self.store.get(tool_id).await?;
        let mut holders = self.replay(tool_id).await?;
        let units = holders.units_held_by(&requester.name);
        if units == 0 {
            return Err(AppError::Unauthorized(format!(
                "{} holds no units of '{}'",
                requester.name, tool.name
            )));
        }

        let mut events = Vec::with_capacity(units as usize);
        for _ in 0..units {
            let event = self
                .record(
                    holders.clone(),
                    tool_id,
                    &requester.name,
                    CheckoutAction::CheckIn,
                    &requester.name,
                )
                .await?;
            holders.apply(&event.actor_name, event.action);
            events.push(event);
        }

        tracing::info!(
            "Tool {} ('{}'): {} returned all {} units",
            tool_id,
            tool.name,
            requester.name,
            units
        );
        Ok(events)
    }

    /// Tools the actor currently holds, by category then name
    pub async fn current_tools(&self, actor: &Actor) -> AppResult<Vec<HeldTool>> {
        if actor.is_guest() {
            return Ok(Vec::new());
        }

        let events = self.store.events_by_actor(&actor.name).await?;
        let mut held = Vec::new();
        for (tool_id, units_held) in ledger::outstanding_by_tool(&events) {
            let tool = match self.store.get(tool_id).await {
                Ok(tool) => tool,
                Err(AppError::NotFound(_)) => continue,
                Err(e) => return Err(e),
            };
            let outstanding = self.holders(tool_id).await?.len();
            held.push(HeldTool {
                tool,
                units_held,
                outstanding,
            });
        }

        held.sort_by(|a, b| {
            (&a.tool.category, &a.tool.name).cmp(&(&b.tool.category, &b.tool.name))
        });
        Ok(held)
    }

    /// Latest ledger events, newest first (admin only)
    pub async fn activity(&self, requester: &Actor, limit: Option<i64>) -> AppResult<Vec<ActivityEntry>> {
        requester.require_admin()?;

        let limit = limit
            .unwrap_or(DEFAULT_ACTIVITY_LIMIT)
            .clamp(1, MAX_ACTIVITY_LIMIT);
        let events = self.store.recent(limit).await?;
        let names: HashMap<ToolId, String> = self
            .store
            .list_all()
            .await?
            .into_iter()
            .map(|t| (t.id, t.name))
            .collect();

        Ok(events
            .into_iter()
            .map(|e| ActivityEntry {
                tool_name: names
                    .get(&e.tool_id)
                    .cloned()
                    .unwrap_or_else(|| format!("Tool #{}", e.tool_id)),
                timestamp: e.timestamp,
                actor_name: e.actor_name,
                recorded_by: e.recorded_by,
                action: e.action,
                tool_id: e.tool_id,
            })
            .collect())
    }

    /// Run `f` while holding the tool's lock, then drop its projection
    pub(crate) async fn with_tool_locked<F, Fut, T>(&self, tool_id: ToolId, f: F) -> AppResult<T>
    where
        F: FnOnce(HolderSet) -> Fut,
        Fut: std::future::Future<Output = AppResult<T>>,
    {
        let guard = self.locks.acquire(tool_id).await;
        let holders = self.replay(tool_id).await?;
        let result = f(holders).await;
        self.projections.invalidate(tool_id);
        drop(guard);
        result
    }

    /// Release per-tool state of a deleted tool
    pub(crate) fn forget(&self, tool_id: ToolId) {
        self.projections.invalidate(tool_id);
        self.locks.forget(tool_id);
    }

    /// Append one event; caller must hold the tool's lock
    async fn record(
        &self,
        mut holders: HolderSet,
        tool_id: ToolId,
        actor_name: &str,
        action: CheckoutAction,
        recorded_by: &str,
    ) -> AppResult<CheckoutEvent> {
        let event = NewCheckoutEvent {
            tool_id,
            actor_name: actor_name.to_string(),
            action,
            recorded_by: recorded_by.to_string(),
            timestamp: Utc::now(),
        };

        match self.store.append(event).await {
            Ok(stored) => {
                holders.apply(&stored.actor_name, stored.action);
                self.projections.replace(tool_id, holders);
                Ok(stored)
            }
            Err(e) => {
                // The append may or may not have landed.
                self.projections.invalidate(tool_id);
                Err(e)
            }
        }
    }
}
