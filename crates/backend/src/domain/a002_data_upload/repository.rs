use anyhow::Result;
use chrono::Utc;
use contracts::domain::a002_data_upload::DataUpload;
use sea_orm::entity::prelude::*;
use sea_orm::{EntityTrait, QueryOrder, QuerySelect, Set};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "data_uploads")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub file_name: String,
    pub record_count: i64,
    pub uploaded_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for DataUpload {
    fn from(m: Model) -> Self {
        DataUpload {
            id: m.id,
            file_name: m.file_name,
            record_count: m.record_count,
            uploaded_at: m.uploaded_at,
        }
    }
}

/// Append an upload history entry
pub async fn insert(db: &DatabaseConnection, file_name: &str, record_count: usize) -> Result<()> {
    let active = ActiveModel {
        id: sea_orm::ActiveValue::NotSet,
        file_name: Set(file_name.to_string()),
        record_count: Set(record_count as i64),
        uploaded_at: Set(Utc::now()),
    };
    active.insert(db).await?;
    Ok(())
}

/// Latest uploads, newest first
pub async fn list_recent(db: &DatabaseConnection, limit: u64) -> Result<Vec<DataUpload>> {
    let items: Vec<DataUpload> = Entity::find()
        .order_by_desc(Column::Id)
        .limit(limit)
        .all(db)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(items)
}
