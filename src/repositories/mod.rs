use async_trait::async_trait;
use sea_orm::DbErr;

use crate::entities::ProductModel;

pub mod product_repository;

pub use product_repository::SeaOrmProductRepository;

/// Storage-level failures surfaced by repositories
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record not found")]
    NotFound,

    #[error(transparent)]
    Database(#[from] DbErr),
}

/// Persistence operations the product service needs.
///
/// Object safe so the service can hold `Arc<dyn ProductRepository>` and tests
/// can swap in a fake.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// All products that have not been soft-deleted.
    async fn find_all(&self) -> Result<Vec<ProductModel>, RepositoryError>;

    /// A single live product, or `RepositoryError::NotFound`.
    async fn find_by_id(&self, id: &str) -> Result<ProductModel, RepositoryError>;

    /// Inserts the product and returns the stored row with its generated id.
    async fn create(&self, product: ProductModel) -> Result<ProductModel, RepositoryError>;

    /// Overwrites the stored business fields of `id` with those of `product`.
    async fn update(
        &self,
        id: &str,
        product: ProductModel,
    ) -> Result<ProductModel, RepositoryError>;

    /// Soft-deletes `id`. Existence is not checked here.
    async fn delete(&self, id: &str) -> Result<(), RepositoryError>;
}
