//! Employee roster model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Roster entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Employee {
    pub id: i32,
    pub name: String,
    #[serde(skip_serializing)]
    pub pin: Option<String>,
}

/// Add employee request
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct NewEmployee {
    pub name: String,
    pub pin: Option<String>,
}
