//! Fixed category set, loaded from configuration

use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    config::{CategoryKindConfig, InventoryConfig},
    error::{AppError, AppResult},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum CategoryKind {
    /// Counted tools, tracked by the checkout ledger
    Tools,
    /// Free-text "what I took" log, no quantities
    TextLog,
}

impl From<CategoryKindConfig> for CategoryKind {
    fn from(kind: CategoryKindConfig) -> Self {
        match kind {
            CategoryKindConfig::Tools => CategoryKind::Tools,
            CategoryKindConfig::TextLog => CategoryKind::TextLog,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Category {
    pub name: String,
    pub kind: CategoryKind,
}

/// Ordered, enumerated category list
#[derive(Debug, Clone)]
pub struct Categories {
    entries: Vec<Category>,
}

impl Categories {
    pub fn new(entries: Vec<Category>) -> Self {
        Self { entries }
    }

    pub fn from_config(config: &InventoryConfig) -> Self {
        Self::new(
            config
                .categories
                .iter()
                .map(|c| Category {
                    name: c.name.clone(),
                    kind: c.kind.into(),
                })
                .collect(),
        )
    }

    pub fn all(&self) -> &[Category] {
        &self.entries
    }

    pub fn get(&self, name: &str) -> AppResult<&Category> {
        self.entries
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| AppError::NotFound(format!("Category '{}' not found", name)))
    }

    /// Category that holds counted tools
    pub fn require_tools(&self, name: &str) -> AppResult<&Category> {
        let category = self.get(name)?;
        if category.kind != CategoryKind::Tools {
            return Err(AppError::Validation(format!(
                "Category '{}' is a text log and holds no tools",
                name
            )));
        }
        Ok(category)
    }

    pub fn require_text_log(&self, name: &str) -> AppResult<&Category> {
        let category = self.get(name)?;
        if category.kind != CategoryKind::TextLog {
            return Err(AppError::Validation(format!(
                "Category '{}' is not a text log",
                name
            )));
        }
        Ok(category)
    }
}
