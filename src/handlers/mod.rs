pub mod common;
pub mod products;

use crate::repositories::{ProductRepository, SeaOrmProductRepository};
use crate::services::ProductService;
use sea_orm::DatabaseConnection;
use std::sync::Arc;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer that encapsulates business logic used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub products: Arc<ProductService>,
}

impl AppServices {
    /// Wire the services against the SeaORM repositories.
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self::with_repository(Arc::new(SeaOrmProductRepository::new(db)))
    }

    /// Wire the services against any product repository implementation.
    pub fn with_repository(repository: Arc<dyn ProductRepository>) -> Self {
        Self {
            products: Arc::new(ProductService::new(repository)),
        }
    }
}
