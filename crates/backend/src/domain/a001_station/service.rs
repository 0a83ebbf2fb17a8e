use async_trait::async_trait;
use contracts::domain::a001_station::aggregate::Station;
use contracts::domain::common::AggregateRoot;
use contracts::usecases::u501_import_roster::LookupKind;
use sea_orm::ConnectionTrait;

use super::repository;
use crate::domain::lookup::{self, LookupStore, Resolved};

pub struct StationStore;

#[async_trait]
impl LookupStore for StationStore {
    type Entity = Station;

    const KIND: LookupKind = LookupKind::Station;
    const DEFAULT_CODE: &'static str = "STN";

    async fn find_by_name_key<C: ConnectionTrait>(
        conn: &C,
        name_key: &str,
    ) -> anyhow::Result<Option<Station>> {
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
        _directorate: Option<&str>,
    ) -> anyhow::Result<Option<Station>> {
        let station = Station::new_for_insert(code.to_string(), name.to_string());
        station
            .validate()
            .map_err(|e| anyhow::anyhow!("Validation failed: {}", e))?;

        if repository::insert_or_ignore(conn, &station, name_key).await? {
            tracing::info!("Created {} {} ({})", Station::element_name(), code, name);
            Ok(Some(station))
        } else {
            Ok(None)
        }
    }

    fn identity(entity: &Station) -> (String, String, String) {
        (
            entity.base.id.value().to_string(),
            entity.base.code.clone(),
            entity.name().to_string(),
        )
    }
}

/// Station by case-insensitive name, created with a generated code when absent
pub async fn get_or_create<C: ConnectionTrait>(
    conn: &C,
    name: &str,
) -> anyhow::Result<Resolved<Station>> {
    lookup::get_or_create::<StationStore, C>(conn, name, None).await
}
