use anyhow::Result;
use chrono::Utc;
use contracts::domain::a001_sales_record::{SalesRecord, SalesRecordId};
use contracts::shared::date_utils::normalize_sales_date;
use sea_orm::entity::prelude::*;
use sea_orm::{EntityTrait, QueryOrder, Set, TransactionTrait};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "sales_records")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Always `YYYY-MM-DD`, so ordering by this column is chronological
    pub date: String,
    pub product: String,
    pub category: String,
    pub region: String,
    pub customer_type: Option<String>,
    pub quantity: f64,
    pub revenue: f64,
    pub cost: f64,
    pub profit: f64,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for SalesRecord {
    fn from(m: Model) -> Self {
        let uuid = Uuid::parse_str(&m.id).unwrap_or_else(|e| {
            tracing::warn!(
                "Stored sales record has a malformed id '{}' ({}), it cannot be deleted by id",
                m.id,
                e
            );
            Uuid::new_v4()
        });
        SalesRecord {
            id: SalesRecordId::new(uuid),
            date: m.date,
            product: m.product,
            category: m.category,
            region: m.region,
            customer_type: m.customer_type,
            quantity: m.quantity,
            revenue: m.revenue,
            cost: m.cost,
            profit: m.profit,
        }
    }
}

fn to_active_model(record: &SalesRecord) -> ActiveModel {
    let date = normalize_sales_date(&record.date).unwrap_or_else(|| record.date.clone());
    ActiveModel {
        id: Set(record.id.as_string()),
        date: Set(date),
        product: Set(record.product.clone()),
        category: Set(record.category.clone()),
        region: Set(record.region.clone()),
        customer_type: Set(record.customer_type.clone()),
        quantity: Set(record.quantity),
        revenue: Set(record.revenue),
        cost: Set(record.cost),
        profit: Set(record.profit),
        created_at: Set(Some(Utc::now())),
    }
}

/// Insert all records in a single transaction: either every row lands or none.
/// Records that fail `SalesRecord::validate` reject the whole batch up front.
pub async fn insert_batch(db: &DatabaseConnection, records: &[SalesRecord]) -> Result<usize> {
    for record in records {
        record
            .validate()
            .map_err(|e| anyhow::anyhow!("Sales record {} rejected: {}", record.id, e))?;
    }

    let txn = db.begin().await?;

    for (idx, record) in records.iter().enumerate() {
        if idx > 0 && idx % 1000 == 0 {
            tracing::info!("Saving sales records: {} rows written...", idx);
        }
        if let Err(e) = Entity::insert(to_active_model(record)).exec(&txn).await {
            tracing::error!("Failed to insert sales record {}: {}", record.id, e);
            if let Err(rollback_err) = txn.rollback().await {
                tracing::warn!("Rollback after failed insert also failed: {}", rollback_err);
            }
            return Err(e.into());
        }
    }

    txn.commit().await?;
    Ok(records.len())
}

/// All records, oldest first
pub async fn list_all(db: &DatabaseConnection) -> Result<Vec<SalesRecord>> {
    let items: Vec<SalesRecord> = Entity::find()
        .order_by_asc(Column::Date)
        .order_by_asc(Column::CreatedAt)
        .all(db)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(items)
}

/// Returns true if a row was removed
pub async fn delete_by_id(db: &DatabaseConnection, id: Uuid) -> Result<bool> {
    let result = Entity::delete_by_id(id.to_string()).exec(db).await?;
    Ok(result.rows_affected > 0)
}

/// Returns the number of removed rows
pub async fn delete_all(db: &DatabaseConnection) -> Result<u64> {
    let result = Entity::delete_many().exec(db).await?;
    Ok(result.rows_affected)
}
