use std::sync::Arc;
use tracing::{error, info, instrument, warn};

use crate::{
    dto::{ProductRequest, ProductResponse},
    errors::ServiceError,
    repositories::ProductRepository,
};

/// Service for managing products
#[derive(Clone)]
pub struct ProductService {
    repository: Arc<dyn ProductRepository>,
}

impl ProductService {
    /// Creates a new product service instance
    pub fn new(repository: Arc<dyn ProductRepository>) -> Self {
        Self { repository }
    }

    /// List every live product
    #[instrument(skip(self))]
    pub async fn get_all_products(&self) -> Result<Vec<ProductResponse>, ServiceError> {
        let products = self.repository.find_all().await.map_err(|e| {
            error!(error = %e, "failed to load product list");
            ServiceError::ListUnavailable(e)
        })?;

        Ok(ProductResponse::from_list(products))
    }

    /// Persist a new product from an already validated request
    #[instrument(skip(self, request), fields(name = %request.name))]
    pub async fn create_product(
        &self,
        request: ProductRequest,
    ) -> Result<ProductResponse, ServiceError> {
        let product = self.repository.create(request.into_model()).await?;

        info!(product_id = %product.id, "Product created successfully");
        Ok(ProductResponse::from(product))
    }

    /// Get a product by ID
    #[instrument(skip(self))]
    pub async fn get_product(&self, id: &str) -> Result<ProductResponse, ServiceError> {
        let product = self
            .repository
            .find_by_id(id)
            .await
            .map_err(ServiceError::NotFound)?;

        Ok(ProductResponse::from(product))
    }

    /// Overwrite name, price and stock of an existing product
    #[instrument(skip(self, request))]
    pub async fn update_product(
        &self,
        id: &str,
        request: ProductRequest,
    ) -> Result<ProductResponse, ServiceError> {
        let mut product = self
            .repository
            .find_by_id(id)
            .await
            .map_err(ServiceError::NotFound)?;

        request.apply_to(&mut product);

        let product = self.repository.update(id, product).await.map_err(|e| {
            error!(product_id = %id, error = %e, "failed to update product");
            ServiceError::UpdateFailed(e)
        })?;

        info!(product_id = %product.id, "Product updated successfully");
        Ok(ProductResponse::from(product))
    }

    /// Soft-delete an existing product
    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: &str) -> Result<(), ServiceError> {
        self.get_product(id).await?;

        self.repository.delete(id).await.map_err(|e| {
            warn!(product_id = %id, error = %e, "failed to delete product");
            ServiceError::DeleteFailed(e)
        })?;

        info!(product_id = %id, "Product deleted successfully");
        Ok(())
    }
}
