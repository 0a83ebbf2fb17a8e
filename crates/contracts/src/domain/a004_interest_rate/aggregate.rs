use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RateType {
    Savings,
    Loan,
}

impl RateType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RateType::Savings => "SAVINGS",
            RateType::Loan => "LOAN",
        }
    }
}

impl std::fmt::Display for RateType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Процентная ставка. Активной считается самая свежая активная запись типа.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterestRate {
    pub id: String,
    pub rate_type: RateType,
    pub rate: f64,
    pub is_active: bool,
    pub effective_from: DateTime<Utc>,
}
