//! Per-tool serialization for check-then-append sequences

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::models::ToolId;

/// One async mutex per tool. Writers to the same tool queue up; writers to
/// different tools never wait on each other.
#[derive(Debug, Default)]
pub struct ToolLocks {
    locks: Mutex<HashMap<ToolId, Arc<AsyncMutex<()>>>>,
}

impl ToolLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&self, tool_id: ToolId) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            locks.entry(tool_id).or_default().clone()
        };
        lock.lock_owned().await
    }

    /// Drop the lock of a deleted tool
    pub fn forget(&self, tool_id: ToolId) {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        locks.remove(&tool_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_same_tool_is_serialized() {
        let locks = ToolLocks::new();
        let _held = locks.acquire(1).await;
        let second = tokio::time::timeout(Duration::from_millis(50), locks.acquire(1)).await;
        assert!(second.is_err());
    }

    #[tokio::test]
    async fn test_different_tools_do_not_contend() {
        let locks = ToolLocks::new();
        let _held = locks.acquire(1).await;
        let other = tokio::time::timeout(Duration::from_millis(50), locks.acquire(2)).await;
        assert!(other.is_ok());
    }
}
