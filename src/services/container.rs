//! Service Container - Centralized service access.
//!
//! Services are built once from an explicit connection and configuration
//! and shared behind `Arc`; nothing is held in globals.

use std::sync::Arc;

use super::{AuthService, CatalogService, TokenIssuer, TokenService};
use crate::config::Config;
use crate::infra::Persistence;

/// Service container trait for dependency injection.
pub trait ServiceContainer: Send + Sync {
    /// Get authentication service
    fn auth(&self) -> Arc<dyn AuthService>;

    /// Get catalog service
    fn catalog(&self) -> Arc<dyn CatalogService>;
}

/// Concrete implementation of ServiceContainer
pub struct Services {
    auth_service: Arc<dyn AuthService>,
    catalog_service: Arc<dyn CatalogService>,
}

impl Services {
    /// Create a new service container from already built services
    pub fn new(
        auth_service: Arc<dyn AuthService>,
        catalog_service: Arc<dyn CatalogService>,
    ) -> Self {
        Self {
            auth_service,
            catalog_service,
        }
    }

    /// Create service container from database connection and config
    pub fn from_connection(db: sea_orm::DatabaseConnection, config: &Config) -> Self {
        Self::from_unit_of_work(Arc::new(Persistence::new(db)), config)
    }

    /// Create service container over any repository provider
    pub fn from_unit_of_work<U>(uow: Arc<U>, config: &Config) -> Self
    where
        U: crate::infra::UnitOfWork + 'static,
    {
        use super::{Authenticator, Catalog};

        let tokens: Arc<dyn TokenService> = Arc::new(TokenIssuer::from_config(config));
        let auth_service = Arc::new(Authenticator::new(uow.clone(), tokens));
        let catalog_service = Arc::new(Catalog::new(uow));

        Self {
            auth_service,
            catalog_service,
        }
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth_service.clone()
    }

    fn catalog(&self) -> Arc<dyn CatalogService> {
        self.catalog_service.clone()
    }
}
