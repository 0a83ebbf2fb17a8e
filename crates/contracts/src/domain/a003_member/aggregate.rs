use crate::uuid_aggregate_id;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

uuid_aggregate_id!(MemberId);

/// Член кредитного союза. Ровно один на пользователя справочника.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    pub id: MemberId,
    pub user_id: String,
    pub entrance_fee: f64,
    pub nominee: Option<String>,
    pub address: Option<String>,
    pub witness: Option<String>,
    pub relationship: Option<String>,
    pub joined_at: DateTime<Utc>,
    pub is_active: bool,
}

impl Member {
    pub fn new_for_insert(user_id: String, joined_at: DateTime<Utc>) -> Self {
        Self {
            id: MemberId::new_v4(),
            user_id,
            entrance_fee: 0.0,
            nominee: None,
            address: None,
            witness: None,
            relationship: None,
            joined_at,
            is_active: true,
        }
    }
}

/// Кошелек члена союза
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wallet {
    pub id: String,
    pub member_id: String,
    pub balance: f64,
    /// Уникальный номер кошелька: префикс + табельный номер + YYMM
    pub wallet_number: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl Wallet {
    /// Номер кошелька строится детерминированно из табельного номера и месяца импорта
    pub fn number_for(prefix: &str, staff_id: &str, at: DateTime<Utc>) -> String {
        format!("{}{}{}", prefix, staff_id, at.format("%y%m"))
    }
}

/// Сберегательный счет члена союза
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavingsAccount {
    pub id: String,
    pub member_id: String,
    pub balance: f64,
    pub interest_rate_id: Option<String>,
    pub last_interest_applied: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn wallet_number_uses_two_digit_year_and_month() {
        let at = Utc.with_ymd_and_hms(2026, 3, 9, 12, 0, 0).unwrap();
        assert_eq!(Wallet::number_for("CH", "10442", at), "CH104422603");
    }
}
