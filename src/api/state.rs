//! Application state - Dependency injection container.
//!
//! Provides centralized access to all application services and infrastructure.

use std::sync::Arc;

use crate::config::Config;
use crate::infra::Database;
use crate::services::{AuthService, CatalogService, ServiceContainer, Services};

/// Application state containing all services (DI container).
#[derive(Clone)]
pub struct AppState {
    /// Authentication service
    pub auth_service: Arc<dyn AuthService>,
    /// Catalog service
    pub catalog_service: Arc<dyn CatalogService>,
    /// Database connection, pinged by the health endpoint
    pub database: Option<Arc<Database>>,
}

impl AppState {
    /// Create application state from a connected database and config.
    pub fn from_config(database: Arc<Database>, config: &Config) -> Self {
        let container = Services::from_connection(database.get_connection(), config);

        Self {
            auth_service: container.auth(),
            catalog_service: container.catalog(),
            database: Some(database),
        }
    }

    /// Create application state from an assembled service container.
    pub fn from_services(services: &dyn ServiceContainer) -> Self {
        Self::new(services.auth(), services.catalog())
    }

    /// Create new application state with manually injected services.
    pub fn new(
        auth_service: Arc<dyn AuthService>,
        catalog_service: Arc<dyn CatalogService>,
    ) -> Self {
        Self {
            auth_service,
            catalog_service,
            database: None,
        }
    }
}
