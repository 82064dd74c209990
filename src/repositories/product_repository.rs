use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ActiveValue::NotSet, ActiveValue::Unchanged, ColumnTrait,
    DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use std::sync::Arc;
use tracing::{debug, instrument};

use super::{ProductRepository, RepositoryError};
use crate::entities::{Product, ProductActiveModel, ProductColumn, ProductModel};

/// SeaORM-backed product repository
#[derive(Debug, Clone)]
pub struct SeaOrmProductRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmProductRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    pub fn get_db(&self) -> &DatabaseConnection {
        &self.db
    }
}

#[async_trait]
impl ProductRepository for SeaOrmProductRepository {
    #[instrument(skip(self))]
    async fn find_all(&self) -> Result<Vec<ProductModel>, RepositoryError> {
        let products = Product::find()
            .filter(ProductColumn::DeletedAt.is_null())
            .order_by_asc(ProductColumn::CreatedAt)
            .all(self.get_db())
            .await?;

        debug!(count = products.len(), "loaded products");
        Ok(products)
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: &str) -> Result<ProductModel, RepositoryError> {
        Product::find_by_id(id.to_owned())
            .filter(ProductColumn::DeletedAt.is_null())
            .one(self.get_db())
            .await?
            .ok_or(RepositoryError::NotFound)
    }

    #[instrument(skip(self, product), fields(name = %product.name))]
    async fn create(&self, product: ProductModel) -> Result<ProductModel, RepositoryError> {
        let active = ProductActiveModel {
            id: if product.id.is_empty() {
                NotSet
            } else {
                Set(product.id)
            },
            name: Set(product.name),
            price: Set(product.price),
            stock: Set(product.stock),
            ..Default::default()
        };

        let created = active.insert(self.get_db()).await?;
        debug!(product_id = %created.id, "inserted product");
        Ok(created)
    }

    #[instrument(skip(self, product))]
    async fn update(
        &self,
        id: &str,
        product: ProductModel,
    ) -> Result<ProductModel, RepositoryError> {
        let active = ProductActiveModel {
            id: Unchanged(id.to_owned()),
            name: Set(product.name),
            price: Set(product.price),
            stock: Set(product.stock),
            created_at: Unchanged(product.created_at),
            updated_at: NotSet,
            deleted_at: Unchanged(product.deleted_at),
        };

        let updated = active.update(self.get_db()).await?;
        Ok(updated)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: &str) -> Result<(), RepositoryError> {
        let result = Product::update_many()
            .col_expr(ProductColumn::DeletedAt, Expr::value(Utc::now()))
            .filter(ProductColumn::Id.eq(id))
            .filter(ProductColumn::DeletedAt.is_null())
            .exec(self.get_db())
            .await?;

        debug!(rows = result.rows_affected, "soft-deleted product");
        Ok(())
    }
}
