use async_trait::async_trait;
use contracts::domain::a002_division::aggregate::Division;
use contracts::domain::common::AggregateRoot;
use contracts::usecases::u501_import_roster::LookupKind;
use sea_orm::ConnectionTrait;

use super::repository;
use crate::domain::lookup::{self, LookupStore, Resolved};

pub struct DivisionStore;

#[async_trait]
impl LookupStore for DivisionStore {
    type Entity = Division;

    const KIND: LookupKind = LookupKind::Division;
    const DEFAULT_CODE: &'static str = "DIV";

    async fn find_by_name_key<C: ConnectionTrait>(
        conn: &C,
        name_key: &str,
    ) -> anyhow::Result<Option<Division>> {
        repository::get_by_name_key(conn, name_key).await
    }

    async fn code_exists<C: ConnectionTrait>(conn: &C, code: &str) -> anyhow::Result<bool> {
        repository::code_exists(conn, code).await
    }

    async fn try_insert<C: ConnectionTrait>(
        conn: &C,
        code: &str,
        name: &str,
        name_key: &str,
        directorate: Option<&str>,
    ) -> anyhow::Result<Option<Division>> {
        let division = Division::new_for_insert(
            code.to_string(),
            name.to_string(),
            directorate.map(str::to_string),
        );
        division
            .validate()
            .map_err(|e| anyhow::anyhow!("Validation failed: {}", e))?;

        if repository::insert_or_ignore(conn, &division, name_key).await? {
            tracing::info!("Created {} {} ({})", Division::element_name(), code, name);
            Ok(Some(division))
        } else {
            Ok(None)
        }
    }

    fn identity(entity: &Division) -> (String, String, String) {
        (
            entity.base.id.value().to_string(),
            entity.base.code.clone(),
            entity.name().to_string(),
        )
    }
}

/// Division by case-insensitive name; a new one takes the supplied directorate
pub async fn get_or_create<C: ConnectionTrait>(
    conn: &C,
    name: &str,
    directorate: Option<&str>,
) -> anyhow::Result<Resolved<Division>> {
    lookup::get_or_create::<DivisionStore, C>(conn, name, directorate).await
}
