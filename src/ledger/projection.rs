//! Memoized per-tool holder projection
//!
//! The ledger is the only source of truth; this cache just saves replaying it
//! on every read. Each tool slot carries an epoch that is bumped whenever the
//! tool's ledger changes, so a reader that started replaying before a write
//! cannot store its stale result afterwards.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use super::availability::HolderSet;
use crate::models::ToolId;

#[derive(Debug, Default)]
struct Slot {
    epoch: u64,
    holders: Option<HolderSet>,
}

/// Result of a cache lookup
#[derive(Debug, PartialEq, Eq)]
pub enum Lookup {
    Hit(HolderSet),
    /// Replay the ledger, then `fill` with this epoch
    Miss { epoch: u64 },
}

#[derive(Debug, Default)]
pub struct ProjectionCache {
    slots: Mutex<HashMap<ToolId, Slot>>,
}

impl ProjectionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lookup(&self, tool_id: ToolId) -> Lookup {
        let slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        match slots.get(&tool_id) {
            Some(Slot {
                holders: Some(holders),
                ..
            }) => Lookup::Hit(holders.clone()),
            Some(slot) => Lookup::Miss { epoch: slot.epoch },
            None => Lookup::Miss { epoch: 0 },
        }
    }

    /// Store a replayed projection unless the tool changed since `epoch`
    pub fn fill(&self, tool_id: ToolId, epoch: u64, holders: HolderSet) -> bool {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        let slot = slots.entry(tool_id).or_default();
        if slot.epoch != epoch {
            return false;
        }
        slot.holders = Some(holders);
        true
    }

    /// Record a fresh projection computed by the writer that just appended
    pub fn replace(&self, tool_id: ToolId, holders: HolderSet) {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        let slot = slots.entry(tool_id).or_default();
        slot.epoch += 1;
        slot.holders = Some(holders);
    }

    /// Drop the projection, forcing the next read to replay the ledger
    pub fn invalidate(&self, tool_id: ToolId) {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        let slot = slots.entry(tool_id).or_default();
        slot.epoch += 1;
        slot.holders = None;
    }
}
