use crate::domain::common::{AggregateRoot, BaseAggregate, EntityMetadata};
use crate::uuid_aggregate_id;
use serde::{Deserialize, Serialize};

uuid_aggregate_id!(DivisionId);

/// Подразделение (департамент), опционально привязанное к дирекции
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Division {
    #[serde(flatten)]
    pub base: BaseAggregate<DivisionId>,

    /// Пустая строка, если дирекция не указана
    pub directorate: String,
}

impl Division {
    pub fn new_for_insert(code: String, name: String, directorate: Option<String>) -> Self {
        Self {
            base: BaseAggregate::new(DivisionId::new_v4(), code, name),
            directorate: directorate.unwrap_or_default(),
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        self.base.validate("Division")
    }
}

impl AggregateRoot for Division {
    type Id = DivisionId;

    fn id(&self) -> Self::Id {
        self.base.id
    }

    fn code(&self) -> &str {
        &self.base.code
    }

    fn name(&self) -> &str {
        &self.base.name
    }

    fn metadata(&self) -> &EntityMetadata {
        &self.base.metadata
    }

    fn aggregate_index() -> &'static str {
        "a002"
    }

    fn collection_name() -> &'static str {
        "division"
    }

    fn element_name() -> &'static str {
        "division"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_name_joins_index_and_collection() {
        assert_eq!(Division::table_name(), "a002_division");
        let division = Division::new_for_insert("FIN".into(), "Finance".into(), None);
        assert_eq!(division.name(), "Finance");
        assert_eq!(division.directorate, "");
        assert!(division.validate().is_ok());
    }
}
