use chrono::Utc;
use contracts::domain::a002_division::aggregate::{Division, DivisionId};
use contracts::domain::common::{AggregateId, BaseAggregate, EntityMetadata};
use serde::{Deserialize, Serialize};

use sea_orm::entity::prelude::*;
use sea_orm::{ConnectionTrait, DatabaseBackend, Statement};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a002_division")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub code: String,
    pub name_key: String,
    pub name: String,
    pub description: Option<String>,
    pub directorate: String,
    pub is_active: bool,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Division {
    fn from(m: Model) -> Self {
        let metadata = EntityMetadata {
            created_at: m.created_at.unwrap_or_else(Utc::now),
            updated_at: m.updated_at.unwrap_or_else(Utc::now),
            is_active: m.is_active,
        };
        let id = DivisionId::from_string(&m.id).unwrap_or_else(|_| DivisionId::new_v4());

        Division {
            base: BaseAggregate::with_metadata(
                id,
                m.code,
                m.name,
                m.description,
                metadata,
            ),
            directorate: m.directorate,
        }
    }
}

pub async fn get_by_name_key<C: ConnectionTrait>(
    conn: &C,
    name_key: &str,
) -> anyhow::Result<Option<Division>> {
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

/// Insert unless `code` or `name_key` is taken; `true` when a row was written
pub async fn insert_or_ignore<C: ConnectionTrait>(
    conn: &C,
    aggregate: &Division,
    name_key: &str,
) -> anyhow::Result<bool> {
    let result = conn
        .execute(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "INSERT OR IGNORE INTO a002_division
                (id, code, name_key, name, description, directorate, is_active, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
            [
                aggregate.base.id.as_string().into(),
                aggregate.base.code.clone().into(),
                name_key.to_string().into(),
                aggregate.base.name.clone().into(),
                aggregate.base.description.clone().into(),
                aggregate.directorate.clone().into(),
                aggregate.base.metadata.is_active.into(),
                aggregate.base.metadata.created_at.into(),
                aggregate.base.metadata.updated_at.into(),
            ],
        ))
        .await?;
    Ok(result.rows_affected() > 0)
}
