use async_trait::async_trait;
use chrono::Utc;
use contracts::domain::a001_product_profile::{ProductProfile, ProductProfileId};
use contracts::domain::common::{BaseAggregate, EntityMetadata};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, Set};

use crate::shared::data::db::get_connection;

/// Persistence capability for the toner catalog. Profiles are immutable,
/// so there is no update operation.
#[async_trait]
pub trait ProductProfileStore: Send + Sync {
    /// Persist a new profile and hand back the stored record.
    async fn create(&self, profile: ProductProfile) -> anyhow::Result<ProductProfile>;
    async fn list(&self) -> anyhow::Result<Vec<ProductProfile>>;
    async fn get_by_model(&self, model: &str) -> anyhow::Result<Option<ProductProfile>>;
    /// Soft-delete by id; false when nothing matched.
    async fn delete(&self, id: Uuid) -> anyhow::Result<bool>;
}

// =============================================================================
// Sqlite implementation
// =============================================================================

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a001_product_profile")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub code: String,
    pub description: String,
    pub comment: Option<String>,
    pub model: String,
    pub empty_weight_g: f64,
    pub full_weight_g: f64,
    pub grammage_g: f64,
    pub sheet_capacity: i32,
    pub price_per_sheet: f64,
    pub is_deleted: bool,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for ProductProfile {
    fn from(m: Model) -> Self {
        let metadata = EntityMetadata {
            created_at: m.created_at.unwrap_or_else(Utc::now),
            updated_at: m.updated_at.unwrap_or_else(Utc::now),
            is_deleted: m.is_deleted,
            version: m.version,
        };
        let uuid = Uuid::parse_str(&m.id).unwrap_or_else(|_| Uuid::new_v4());

        ProductProfile {
            base: BaseAggregate::with_metadata(
                ProductProfileId(uuid),
                m.code,
                m.description,
                m.comment,
                metadata,
            ),
            model: m.model,
            empty_weight_g: m.empty_weight_g,
            full_weight_g: m.full_weight_g,
            grammage_g: m.grammage_g,
            sheet_capacity: m.sheet_capacity,
            price_per_sheet: m.price_per_sheet,
        }
    }
}

fn to_active_model(aggregate: &ProductProfile) -> ActiveModel {
    ActiveModel {
        id: Set(aggregate.base.id.value().to_string()),
        code: Set(aggregate.base.code.clone()),
        description: Set(aggregate.base.description.clone()),
        comment: Set(aggregate.base.comment.clone()),
        model: Set(aggregate.model.clone()),
        empty_weight_g: Set(aggregate.empty_weight_g),
        full_weight_g: Set(aggregate.full_weight_g),
        grammage_g: Set(aggregate.grammage_g),
        sheet_capacity: Set(aggregate.sheet_capacity),
        price_per_sheet: Set(aggregate.price_per_sheet),
        is_deleted: Set(aggregate.base.metadata.is_deleted),
        created_at: Set(Some(aggregate.base.metadata.created_at)),
        updated_at: Set(Some(aggregate.base.metadata.updated_at)),
        version: Set(aggregate.base.metadata.version),
    }
}

/// Store backed by the shared sqlite connection.
pub struct SqliteProductProfileStore;

#[async_trait]
impl ProductProfileStore for SqliteProductProfileStore {
    async fn create(&self, profile: ProductProfile) -> anyhow::Result<ProductProfile> {
        to_active_model(&profile).insert(get_connection()).await?;
        Ok(profile)
    }

    async fn list(&self) -> anyhow::Result<Vec<ProductProfile>> {
        let mut items: Vec<ProductProfile> = Entity::find()
            .filter(Column::IsDeleted.eq(false))
            .all(get_connection())
            .await?
            .into_iter()
            .map(Into::into)
            .collect();
        items.sort_by(|a, b| a.model.cmp(&b.model));
        Ok(items)
    }

    async fn get_by_model(&self, model: &str) -> anyhow::Result<Option<ProductProfile>> {
        let result = Entity::find()
            .filter(Column::Model.eq(model))
            .filter(Column::IsDeleted.eq(false))
            .one(get_connection())
            .await?;
        Ok(result.map(Into::into))
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<bool> {
        use sea_orm::sea_query::Expr;
        let result = Entity::update_many()
            .col_expr(Column::IsDeleted, Expr::value(true))
            .col_expr(Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(Column::Id.eq(id.to_string()))
            .exec(get_connection())
            .await?;
        Ok(result.rows_affected > 0)
    }
}

// =============================================================================
// In-memory implementation (tests, offline tooling)
// =============================================================================

#[derive(Default)]
pub struct InMemoryProductProfileStore {
    rows: RwLock<Vec<ProductProfile>>,
}

impl InMemoryProductProfileStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProductProfileStore for InMemoryProductProfileStore {
    async fn create(&self, profile: ProductProfile) -> anyhow::Result<ProductProfile> {
        let mut rows = self.rows.write().await;
        rows.push(profile.clone());
        Ok(profile)
    }

    async fn list(&self) -> anyhow::Result<Vec<ProductProfile>> {
        let rows = self.rows.read().await;
        let mut items: Vec<ProductProfile> = rows
            .iter()
            .filter(|p| !p.base.metadata.is_deleted)
            .cloned()
            .collect();
        items.sort_by(|a, b| a.model.cmp(&b.model));
        Ok(items)
    }

    async fn get_by_model(&self, model: &str) -> anyhow::Result<Option<ProductProfile>> {
        let rows = self.rows.read().await;
        Ok(rows
            .iter()
            .find(|p| p.model == model && !p.base.metadata.is_deleted)
            .cloned())
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<bool> {
        let mut rows = self.rows.write().await;
        let mut deleted = false;
        for profile in rows.iter_mut() {
            if profile.base.id.value() == id && !profile.base.metadata.is_deleted {
                profile.base.metadata.is_deleted = true;
                profile.base.touch();
                deleted = true;
            }
        }
        Ok(deleted)
    }
}
