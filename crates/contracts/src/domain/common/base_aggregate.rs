use super::EntityMetadata;
use serde::{Deserialize, Serialize};

/// Поля, общие для справочников (станции, подразделения)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaseAggregate<Id> {
    pub id: Id,
    /// Сгенерированный уникальный код: "ACC", "ACC01"
    pub code: String,
    /// Название как в загруженном файле
    pub name: String,
    pub description: Option<String>,
    pub metadata: EntityMetadata,
}

impl<Id> BaseAggregate<Id> {
    pub fn new(id: Id, code: String, name: String) -> Self {
        Self {
            id,
            code,
            name,
            description: None,
            metadata: EntityMetadata::new(),
        }
    }

    /// Для загрузки из БД
    pub fn with_metadata(
        id: Id,
        code: String,
        name: String,
        description: Option<String>,
        metadata: EntityMetadata,
    ) -> Self {
        Self {
            id,
            code,
            name,
            description,
            metadata,
        }
    }

    /// Код не короче трех символов, название непустое
    pub fn validate(&self, element_name: &str) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err(format!("{} name cannot be empty", element_name));
        }
        if self.code.trim().chars().count() < 3 {
            return Err(format!(
                "{} code must have at least 3 characters",
                element_name
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_code_is_rejected() {
        let ok = BaseAggregate::new(1u8, "HOX".into(), "Ho".into());
        assert!(ok.validate("Station").is_ok());
        assert!(ok.metadata.is_active);

        let short = BaseAggregate::new(1u8, "HO".into(), "Ho".into());
        assert_eq!(
            short.validate("Station").unwrap_err(),
            "Station code must have at least 3 characters"
        );

        let blank = BaseAggregate::new(1u8, "DIV".into(), "  ".into());
        assert!(blank.validate("Division").is_err());
    }
}
