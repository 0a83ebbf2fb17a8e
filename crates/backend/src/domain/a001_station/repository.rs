use chrono::Utc;
use contracts::domain::a001_station::aggregate::{Station, StationId};
use contracts::domain::common::{AggregateId, BaseAggregate, EntityMetadata};
use serde::{Deserialize, Serialize};

use sea_orm::entity::prelude::*;
use sea_orm::{ConnectionTrait, DatabaseBackend, QueryOrder, Statement};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a001_station")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub code: String,
    pub name_key: String,
    pub name: String,
    pub description: Option<String>,
    pub location: String,
    pub phone: String,
    pub email: String,
    pub is_active: bool,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Station {
    fn from(m: Model) -> Self {
        let metadata = EntityMetadata {
            created_at: m.created_at.unwrap_or_else(Utc::now),
            updated_at: m.updated_at.unwrap_or_else(Utc::now),
            is_active: m.is_active,
        };
        let id = StationId::from_string(&m.id).unwrap_or_else(|_| StationId::new_v4());

        Station {
            base: BaseAggregate::with_metadata(
                id,
                m.code,
                m.name,
                m.description,
                metadata,
            ),
            location: m.location,
            phone: m.phone,
            email: m.email,
        }
    }
}

pub async fn list_all<C: ConnectionTrait>(conn: &C) -> anyhow::Result<Vec<Station>> {
    let items = Entity::find()
        .order_by_asc(Column::Code)
        .all(conn)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(items)
}

pub async fn get_by_name_key<C: ConnectionTrait>(
    conn: &C,
    name_key: &str,
) -> anyhow::Result<Option<Station>> {
    let result = Entity::find()
        .filter(Column::NameKey.eq(name_key))
        .one(conn)
        .await?;
    Ok(result.map(Into::into))
}

pub async fn code_exists<C: ConnectionTrait>(conn: &C, code: &str) -> anyhow::Result<bool> {
    let count = Entity::find().filter(Column::Code.eq(code)).count(conn).await?;
    Ok(count > 0)
}

/// Atomic insert guarded by the unique `code` and `name_key` columns.
/// Returns `false` when another row already holds either key.
pub async fn insert_or_ignore<C: ConnectionTrait>(
    conn: &C,
    aggregate: &Station,
    name_key: &str,
) -> anyhow::Result<bool> {
    let result = conn
        .execute(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "INSERT OR IGNORE INTO a001_station
                (id, code, name_key, name, description, location, phone, email, is_active, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            [
                aggregate.base.id.as_string().into(),
                aggregate.base.code.clone().into(),
                name_key.to_string().into(),
                aggregate.base.name.clone().into(),
                aggregate.base.description.clone().into(),
                aggregate.location.clone().into(),
                aggregate.phone.clone().into(),
                aggregate.email.clone().into(),
                aggregate.base.metadata.is_active.into(),
                aggregate.base.metadata.created_at.into(),
                aggregate.base.metadata.updated_at.into(),
            ],
        ))
        .await?;
    Ok(result.rows_affected() > 0)
}
