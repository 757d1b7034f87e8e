//! Catalog management service

use std::sync::Arc;

use super::checkouts::CheckoutsService;
use crate::{
    error::{AppError, AppResult},
    models::{
        tool::{NewTool, ToolUpdate},
        Actor, Categories, Category, Tool, ToolId, ToolStatus,
    },
    repository::{CatalogStore, InventoryStore},
};

#[derive(Clone)]
pub struct CatalogService {
    store: Arc<dyn InventoryStore>,
    categories: Arc<Categories>,
    checkouts: CheckoutsService,
}

fn clean_name(name: &str) -> AppResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::Validation("Tool name cannot be empty".to_string()));
    }
    Ok(name.to_string())
}

fn check_quantity(quantity: i32) -> AppResult<i32> {
    if quantity < 0 {
        return Err(AppError::Validation(format!(
            "Quantity must not be negative (got {})",
            quantity
        )));
    }
    Ok(quantity)
}

fn clean_image_url(image_url: Option<&str>) -> Option<String> {
    image_url
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .map(str::to_string)
}

impl CatalogService {
    pub fn new(
        store: Arc<dyn InventoryStore>,
        categories: Arc<Categories>,
        checkouts: CheckoutsService,
    ) -> Self {
        Self {
            store,
            categories,
            checkouts,
        }
    }

    pub fn categories(&self) -> &[Category] {
        self.categories.all()
    }

    /// Tools of a category with their availability, optionally filtered by name
    pub async fn list_by_category(
        &self,
        category: &str,
        search: Option<&str>,
    ) -> AppResult<Vec<ToolStatus>> {
        self.categories.require_tools(category)?;

        let needle = search
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty());

        let mut result = Vec::new();
        for tool in self.store.list_by_category(category).await? {
            if let Some(ref needle) = needle {
                if !tool.name.to_lowercase().contains(needle.as_str()) {
                    continue;
                }
            }
            result.push(self.checkouts.status(tool).await?);
        }
        Ok(result)
    }

    pub async fn get_tool(&self, id: ToolId) -> AppResult<ToolStatus> {
        let tool = self.store.get(id).await?;
        self.checkouts.status(tool).await
    }

    /// Add a tool, or update it in place when its name already exists in the category
    pub async fn create_tool(&self, actor: &Actor, tool: NewTool) -> AppResult<Tool> {
        actor.require_admin()?;

        let tool = NewTool {
            name: clean_name(&tool.name)?,
            quantity: check_quantity(tool.quantity)?,
            image_url: clean_image_url(tool.image_url.as_deref()),
            category: self.categories.require_tools(&tool.category)?.name.clone(),
        };

        let saved = self.store.upsert(&tool).await?;
        tracing::info!(
            "Catalog: saved tool id={} '{}' in '{}' (quantity {})",
            saved.id,
            saved.name,
            saved.category,
            saved.quantity
        );
        Ok(saved)
    }

    /// Change name, category, quantity or image of a tool
    pub async fn update_tool(&self, actor: &Actor, id: ToolId, update: ToolUpdate) -> AppResult<Tool> {
        actor.require_admin()?;

        let update = ToolUpdate {
            name: update.name.as_deref().map(clean_name).transpose()?,
            category: match update.category.as_deref() {
                Some(category) => Some(self.categories.require_tools(category)?.name.clone()),
                None => None,
            },
            quantity: update.quantity.map(check_quantity).transpose()?,
            image_url: update
                .image_url
                .as_deref()
                .map(|url| clean_image_url(Some(url)).unwrap_or_default()),
        };

        let current = self.store.get(id).await?;
        if update.name.is_some() || update.category.is_some() {
            let name = update.name.as_deref().unwrap_or(&current.name);
            let category = update.category.as_deref().unwrap_or(&current.category);
            if let Some(existing) = self.store.find_by_name(category, name).await? {
                if existing.id != id {
                    return Err(AppError::Conflict(format!(
                        "A tool named '{}' already exists in '{}'",
                        name, category
                    )));
                }
            }
        }

        let updated = self.store.update(id, &update).await?;

        if let Some(quantity) = update.quantity {
            let outstanding = self.checkouts.holders(id).await?.len();
            if i64::from(quantity) < i64::from(outstanding) {
                tracing::warn!(
                    "Catalog: tool id={} quantity set to {} with {} units still out",
                    id,
                    quantity,
                    outstanding
                );
            }
        }

        Ok(updated)
    }

    /// Delete a tool. Refused while units are out unless the history goes too.
    pub async fn delete_tool(&self, actor: &Actor, id: ToolId, delete_history: bool) -> AppResult<()> {
        actor.require_admin()?;

        let store = self.store.clone();
        self.checkouts
            .with_tool_locked(id, |holders| async move {
                let tool = store.get(id).await?;
                if delete_history {
                    store.purge_tool(id).await?;
                    tracing::info!("Catalog: deleted tool id={} '{}' and its history", id, tool.name);
                    return Ok(());
                }

                if !holders.is_empty() {
                    return Err(AppError::ToolInUse(format!(
                        "'{}' still has {} unit(s) checked out",
                        tool.name,
                        holders.len()
                    )));
                }
                store.delete(id).await?;
                tracing::info!("Catalog: deleted tool id={} '{}'", id, tool.name);
                Ok(())
            })
            .await?;

        self.checkouts.forget(id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::InventoryConfig,
        repository::{memory::MemoryStore, LedgerStore},
    };

    fn service() -> (Arc<MemoryStore>, CatalogService) {
        let store = Arc::new(MemoryStore::new());
        let checkouts = CheckoutsService::new(store.clone());
        let categories = Arc::new(Categories::from_config(&InventoryConfig::default()));
        (store.clone(), CatalogService::new(store, categories, checkouts))
    }

    fn admin() -> Actor {
        Actor::admin("Boss")
    }

    fn new_tool(name: &str, category: &str, quantity: i32) -> NewTool {
        NewTool {
            name: name.to_string(),
            category: category.to_string(),
            quantity,
            image_url: None,
        }
    }

    #[tokio::test]
    async fn test_create_requires_admin_and_valid_fields() {
        let (_store, catalog) = service();

        let denied = catalog
            .create_tool(&Actor::new("Alice"), new_tool("Saw", "Hand Tools", 1))
            .await;
        assert!(matches!(denied, Err(AppError::Unauthorized(_))));

        for bad in [
            new_tool("  ", "Hand Tools", 1),
            new_tool("Saw", "Hand Tools", -1),
            new_tool("Saw", "Extra Material", 1),
        ] {
            assert!(matches!(
                catalog.create_tool(&admin(), bad).await,
                Err(AppError::Validation(_))
            ));
        }
        assert!(matches!(
            catalog.create_tool(&admin(), new_tool("Saw", "Boats", 1)).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_create_upserts_by_name_within_category() {
        let (_store, catalog) = service();
        let first = catalog
            .create_tool(&admin(), new_tool(" Saw ", "Hand Tools", 1))
            .await
            .unwrap();
        assert_eq!(first.name, "Saw");

        let second = catalog
            .create_tool(&admin(), new_tool("Saw", "Hand Tools", 4))
            .await
            .unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(second.quantity, 4);

        let elsewhere = catalog
            .create_tool(&admin(), new_tool("Saw", "Uncommon Tools", 1))
            .await
            .unwrap();
        assert_ne!(elsewhere.id, first.id);
    }

    #[tokio::test]
    async fn test_list_filters_by_search() {
        let (_store, catalog) = service();
        for name in ["Circular Saw", "Jigsaw", "Drill"] {
            catalog
                .create_tool(&admin(), new_tool(name, "Power Tools", 2))
                .await
                .unwrap();
        }

        let all = catalog.list_by_category("Power Tools", None).await.unwrap();
        let names: Vec<_> = all.iter().map(|s| s.tool.name.as_str()).collect();
        assert_eq!(names, vec!["Circular Saw", "Drill", "Jigsaw"]);
        assert!(all.iter().all(|s| s.available == 2));

        let saws = catalog
            .list_by_category("Power Tools", Some("SAW"))
            .await
            .unwrap();
        assert_eq!(saws.len(), 2);

        assert!(matches!(
            catalog.list_by_category("Extra Material", None).await,
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_rename_onto_existing_name_conflicts() {
        let (_store, catalog) = service();
        catalog
            .create_tool(&admin(), new_tool("Drill", "Power Tools", 1))
            .await
            .unwrap();
        let sander = catalog
            .create_tool(&admin(), new_tool("Sander", "Power Tools", 1))
            .await
            .unwrap();

        let result = catalog
            .update_tool(
                &admin(),
                sander.id,
                ToolUpdate {
                    name: Some("Drill".into()),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(result, Err(AppError::Conflict(_))));

        let moved = catalog
            .update_tool(
                &admin(),
                sander.id,
                ToolUpdate {
                    name: Some("Drill".into()),
                    category: Some("Uncommon Tools".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(moved.category, "Uncommon Tools");
    }

    #[tokio::test]
    async fn test_delete_guard_and_history_purge() {
        let (store, catalog) = service();
        let ladder = catalog
            .create_tool(&admin(), new_tool("Ladder", "Ladders", 2))
            .await
            .unwrap();
        catalog
            .checkouts
            .check_out(ladder.id, &Actor::new("Alice"))
            .await
            .unwrap();

        let refused = catalog.delete_tool(&admin(), ladder.id, false).await;
        assert!(matches!(refused, Err(AppError::ToolInUse(_))));
        assert!(catalog.get_tool(ladder.id).await.is_ok());

        catalog.delete_tool(&admin(), ladder.id, true).await.unwrap();
        assert!(store.events_for(ladder.id).await.unwrap().is_empty());
        assert!(matches!(
            catalog.get_tool(ladder.id).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_without_history_keeps_events() {
        let (store, catalog) = service();
        let cord = catalog
            .create_tool(&admin(), new_tool("Cord", "Extension Cords", 1))
            .await
            .unwrap();
        let alice = Actor::new("Alice");
        catalog.checkouts.check_out(cord.id, &alice).await.unwrap();
        catalog.checkouts.check_in(cord.id, None, &alice).await.unwrap();

        catalog.delete_tool(&admin(), cord.id, false).await.unwrap();
        assert_eq!(store.events_for(cord.id).await.unwrap().len(), 2);

        let log = catalog.checkouts.activity(&admin(), None).await.unwrap();
        assert_eq!(log[0].tool_name, format!("Tool #{}", cord.id));
    }
}
