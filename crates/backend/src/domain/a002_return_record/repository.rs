use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use contracts::domain::a002_return_record::{ReturnRecord, ReturnRecordId};
use contracts::domain::common::{BaseAggregate, EntityMetadata, Origin};
use contracts::enums::Destination;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

use crate::shared::data::db::get_connection;

/// Persistence capability for return records: create, list, delete by id.
/// Records are never updated in place.
#[async_trait]
pub trait ReturnRecordStore: Send + Sync {
    /// Persist a new record and hand back the stored row.
    async fn create(&self, record: ReturnRecord) -> anyhow::Result<ReturnRecord>;
    async fn list(&self) -> anyhow::Result<Vec<ReturnRecord>>;
    /// Soft-delete by id; false when nothing matched.
    async fn delete(&self, id: Uuid) -> anyhow::Result<bool>;
}

// =============================================================================
// Sqlite implementation
// =============================================================================

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a002_return_record")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub code: String,
    pub description: String,
    pub comment: Option<String>,
    pub customer_id: i64,
    pub product_model: String,
    pub measured_weight_g: Option<f64>,
    pub destination: String,
    pub recovered_value: Option<f64>,
    pub branch: String,
    pub registered_at: String, // stored as YYYY-MM-DD
    pub origin: String,
    pub is_deleted: bool,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for ReturnRecord {
    fn from(m: Model) -> Self {
        let metadata = EntityMetadata {
            created_at: m.created_at.unwrap_or_else(Utc::now),
            updated_at: m.updated_at.unwrap_or_else(Utc::now),
            is_deleted: m.is_deleted,
            version: m.version,
        };
        let uuid = Uuid::parse_str(&m.id).unwrap_or_else(|_| Uuid::new_v4());
        let registered_at = NaiveDate::parse_from_str(&m.registered_at, "%Y-%m-%d")
            .unwrap_or_else(|_| Utc::now().date_naive());
        let destination =
            Destination::from_label(&m.destination).unwrap_or(Destination::Stock);
        let origin = match m.origin.as_str() {
            "bulk_import" => Origin::BulkImport,
            _ => Origin::Manual,
        };

        ReturnRecord {
            base: BaseAggregate::with_metadata(
                ReturnRecordId(uuid),
                m.code,
                m.description,
                m.comment,
                metadata,
            ),
            customer_id: m.customer_id,
            product_model: m.product_model,
            measured_weight_g: m.measured_weight_g,
            destination,
            recovered_value: m.recovered_value,
            branch: m.branch,
            registered_at,
            origin,
        }
    }
}

fn to_active_model(aggregate: &ReturnRecord) -> ActiveModel {
    ActiveModel {
        id: Set(aggregate.base.id.value().to_string()),
        code: Set(aggregate.base.code.clone()),
        description: Set(aggregate.base.description.clone()),
        comment: Set(aggregate.base.comment.clone()),
        customer_id: Set(aggregate.customer_id),
        product_model: Set(aggregate.product_model.clone()),
        measured_weight_g: Set(aggregate.measured_weight_g),
        destination: Set(aggregate.destination.label().to_string()),
        recovered_value: Set(aggregate.recovered_value),
        branch: Set(aggregate.branch.clone()),
        registered_at: Set(aggregate.registered_at.format("%Y-%m-%d").to_string()),
        origin: Set(aggregate.origin.as_str().to_string()),
        is_deleted: Set(aggregate.base.metadata.is_deleted),
        created_at: Set(Some(aggregate.base.metadata.created_at)),
        updated_at: Set(Some(aggregate.base.metadata.updated_at)),
        version: Set(aggregate.base.metadata.version),
    }
}

/// Store backed by the shared sqlite connection.
pub struct SqliteReturnRecordStore;

#[async_trait]
impl ReturnRecordStore for SqliteReturnRecordStore {
    async fn create(&self, record: ReturnRecord) -> anyhow::Result<ReturnRecord> {
        to_active_model(&record).insert(get_connection()).await?;
        Ok(record)
    }

    async fn list(&self) -> anyhow::Result<Vec<ReturnRecord>> {
        let items: Vec<ReturnRecord> = Entity::find()
            .filter(Column::IsDeleted.eq(false))
            .order_by_desc(Column::RegisteredAt)
            .all(get_connection())
            .await?
            .into_iter()
            .map(Into::into)
            .collect();
        Ok(items)
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
pub struct InMemoryReturnRecordStore {
    rows: RwLock<Vec<ReturnRecord>>,
}

impl InMemoryReturnRecordStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ReturnRecordStore for InMemoryReturnRecordStore {
    async fn create(&self, record: ReturnRecord) -> anyhow::Result<ReturnRecord> {
        let mut rows = self.rows.write().await;
        rows.push(record.clone());
        Ok(record)
    }

    async fn list(&self) -> anyhow::Result<Vec<ReturnRecord>> {
        let rows = self.rows.read().await;
        let mut items: Vec<ReturnRecord> = rows
            .iter()
            .filter(|r| !r.base.metadata.is_deleted)
            .cloned()
            .collect();
        items.sort_by(|a, b| b.registered_at.cmp(&a.registered_at));
        Ok(items)
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<bool> {
        let mut rows = self.rows.write().await;
        let mut deleted = false;
        for record in rows.iter_mut() {
            if record.base.id.value() == id && !record.base.metadata.is_deleted {
                record.base.metadata.is_deleted = true;
                record.base.touch();
                deleted = true;
            }
        }
        Ok(deleted)
    }
}
