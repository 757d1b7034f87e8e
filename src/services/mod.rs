//! Business logic services

pub mod auth;
pub mod catalog;
pub mod checkouts;
pub mod roster;
pub mod text_logs;

use std::sync::Arc;

use crate::{
    config::AppConfig,
    models::Categories,
    repository::{memory::MemoryStore, InventoryStore, Repository, RosterStore, TextLogStore},
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub auth: auth::AuthService,
    pub catalog: catalog::CatalogService,
    pub checkouts: checkouts::CheckoutsService,
    pub roster: roster::RosterService,
    pub text_logs: text_logs::TextLogsService,
}

impl Services {
    /// Create all services on top of the PostgreSQL repository
    pub fn new(repository: Repository, config: &AppConfig) -> Self {
        let repository = Arc::new(repository);
        Self::with_stores(repository.clone(), repository.clone(), repository, config)
    }

    /// Create all services on an in-process store
    pub fn in_memory(config: &AppConfig) -> Self {
        let store = Arc::new(MemoryStore::new());
        Self::with_stores(store.clone(), store.clone(), store, config)
    }

    pub fn with_stores(
        inventory: Arc<dyn InventoryStore>,
        roster: Arc<dyn RosterStore>,
        text_logs: Arc<dyn TextLogStore>,
        config: &AppConfig,
    ) -> Self {
        let categories = Arc::new(Categories::from_config(&config.inventory));
        let checkouts = checkouts::CheckoutsService::new(inventory.clone());

        Self {
            auth: auth::AuthService::new(&config.auth),
            catalog: catalog::CatalogService::new(inventory, categories.clone(), checkouts.clone()),
            checkouts,
            roster: roster::RosterService::new(roster),
            text_logs: text_logs::TextLogsService::new(text_logs, categories),
        }
    }
}
