//! Free-text log entries for categories without quantities

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct TextLogEntry {
    pub id: i64,
    pub category: String,
    pub actor_name: String,
    pub entry: String,
    pub ts: DateTime<Utc>,
}

/// Log entry request
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct NewTextLogEntry {
    /// e.g. "1 Milwaukee bag with 2 fine tool blades"
    pub entry: String,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LimitQuery {
    pub limit: Option<i64>,
}
