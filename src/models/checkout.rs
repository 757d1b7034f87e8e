//! Checkout ledger event model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use super::tool::ToolId;
use crate::error::AppError;

/// Ledger action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutAction {
    CheckOut,
    CheckIn,
}

impl CheckoutAction {
    /// Value stored in the `action` column
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckoutAction::CheckOut => "check_out",
            CheckoutAction::CheckIn => "check_in",
        }
    }
}

impl std::str::FromStr for CheckoutAction {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "check_out" => Ok(CheckoutAction::CheckOut),
            "check_in" => Ok(CheckoutAction::CheckIn),
            other => Err(AppError::Internal(format!("Unknown ledger action '{}'", other))),
        }
    }
}

impl std::fmt::Display for CheckoutAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            CheckoutAction::CheckOut => "Checked Out",
            CheckoutAction::CheckIn => "Checked In",
        };
        write!(f, "{}", label)
    }
}

/// Immutable ledger event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CheckoutEvent {
    /// Insertion sequence number, tie-break for equal timestamps
    pub id: i64,
    pub tool_id: ToolId,
    /// Whose holding this event changes
    pub actor_name: String,
    pub action: CheckoutAction,
    /// Identity that issued the request
    pub recorded_by: String,
    pub timestamp: DateTime<Utc>,
}

/// Event fields before the store assigns an id
#[derive(Debug, Clone)]
pub struct NewCheckoutEvent {
    pub tool_id: ToolId,
    pub actor_name: String,
    pub action: CheckoutAction,
    pub recorded_by: String,
    pub timestamp: DateTime<Utc>,
}

/// Raw `checkouts` row
#[derive(Debug, FromRow)]
pub struct CheckoutRow {
    pub id: i64,
    pub tool_id: i32,
    pub actor_name: String,
    pub action: String,
    pub recorded_by: String,
    pub ts: DateTime<Utc>,
}

impl TryFrom<CheckoutRow> for CheckoutEvent {
    type Error = AppError;

    fn try_from(row: CheckoutRow) -> Result<Self, Self::Error> {
        Ok(CheckoutEvent {
            id: row.id,
            tool_id: row.tool_id,
            actor_name: row.actor_name,
            action: row.action.parse()?,
            recorded_by: row.recorded_by,
            timestamp: row.ts,
        })
    }
}

/// Activity log line, joined with the tool name
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ActivityEntry {
    pub timestamp: DateTime<Utc>,
    pub actor_name: String,
    pub recorded_by: String,
    pub action: CheckoutAction,
    pub tool_id: ToolId,
    pub tool_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_round_trips_through_column_value() {
        for action in [CheckoutAction::CheckOut, CheckoutAction::CheckIn] {
            assert_eq!(action.as_str().parse::<CheckoutAction>().unwrap(), action);
        }
        assert!("lost".parse::<CheckoutAction>().is_err());
    }

    #[test]
    fn test_action_display() {
        assert_eq!(CheckoutAction::CheckOut.to_string(), "Checked Out");
        assert_eq!(CheckoutAction::CheckIn.to_string(), "Checked In");
    }
}
