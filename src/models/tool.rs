//! Tool (catalog record) model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

/// Stable tool identity, assigned at creation
pub type ToolId = i32;

/// Tool record from the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Tool {
    pub id: ToolId,
    /// Display name, unique within its category
    pub name: String,
    pub category: String,
    /// Total units owned. Never clamped in storage.
    pub quantity: i32,
    /// Optional image reference (URL)
    pub image_url: Option<String>,
}

/// Create-or-update request, keyed by (category, name)
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct NewTool {
    pub name: String,
    pub category: String,
    pub quantity: i32,
    pub image_url: Option<String>,
}

/// Partial update of a tool
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct ToolUpdate {
    pub name: Option<String>,
    pub category: Option<String>,
    pub quantity: Option<i32>,
    pub image_url: Option<String>,
}

/// One holder and the number of units they have out
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct HolderEntry {
    pub name: String,
    pub units: u32,
}

/// Tool with its availability computed from the ledger
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ToolStatus {
    #[serde(flatten)]
    pub tool: Tool,
    /// Units currently checked out (all holders)
    pub outstanding: u32,
    /// Units that can be checked out right now
    pub available: u32,
    pub holders: Vec<HolderEntry>,
}

/// A tool the requesting actor currently holds
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct HeldTool {
    #[serde(flatten)]
    pub tool: Tool,
    /// Units held by the requesting actor
    pub units_held: u32,
    /// Units out across all holders
    pub outstanding: u32,
}

/// Tool listing filters
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ToolQuery {
    /// Case-insensitive name filter
    pub search: Option<String>,
}

/// Tool deletion options
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DeleteToolQuery {
    /// Also delete every checkout event of the tool
    #[serde(default)]
    pub delete_history: bool,
}
