//! Tool Crib Server
//!
//! Shop tool checkout ledger: a fixed set of categories, a catalog of tools
//! with unit quantities, and an append-only checkout log from which holders
//! and availability are derived. Served as a REST JSON API.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod ledger;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
