use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveModelBehavior, ActiveValue, ActiveValue::Set, ConnectionTrait};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Product entity
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    /// Primary key, a UUID v4 rendered as text
    #[sea_orm(primary_key, auto_increment = false, column_type = "Text")]
    pub id: String,

    /// Product name
    pub name: String,

    /// Price in the smallest currency unit
    pub price: i64,

    /// Units on hand
    pub stock: i32,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,

    /// Soft deletion marker
    #[sea_orm(indexed)]
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl Model {
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        let mut active_model = self;
        let now = Utc::now();

        if insert {
            // Identifiers are assigned exactly once, here.
            let has_id = matches!(&active_model.id, ActiveValue::Set(id) if !id.is_empty());
            if !has_id {
                active_model.id = Set(Uuid::new_v4().to_string());
            }

            active_model.created_at = Set(now);
            active_model.deleted_at = Set(None);
        }

        active_model.updated_at = Set(now);

        Ok(active_model)
    }
}
