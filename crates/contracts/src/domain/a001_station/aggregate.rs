use crate::domain::common::{AggregateRoot, BaseAggregate, EntityMetadata};
use crate::uuid_aggregate_id;
use serde::{Deserialize, Serialize};

uuid_aggregate_id!(StationId);

/// Станция (офис / отделение), к которой приписан сотрудник
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Station {
    #[serde(flatten)]
    pub base: BaseAggregate<StationId>,

    /// Физический адрес
    pub location: String,
    pub phone: String,
    pub email: String,
}

impl Station {
    /// Новая активная станция; контакты заполняются позже вручную
    pub fn new_for_insert(code: String, name: String) -> Self {
        Self {
            base: BaseAggregate::new(StationId::new_v4(), code, name),
            location: String::new(),
            phone: String::new(),
            email: String::new(),
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        self.base.validate("Station")
    }
}

impl AggregateRoot for Station {
    type Id = StationId;

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
        "a001"
    }

    fn collection_name() -> &'static str {
        "station"
    }

    fn element_name() -> &'static str {
        "station"
    }
}
