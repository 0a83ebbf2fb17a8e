use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    SuperAdmin,
    Admin,
    #[default]
    Staff,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::SuperAdmin => "SUPER_ADMIN",
            Role::Admin => "ADMIN",
            Role::Staff => "STAFF",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "SUPER_ADMIN" => Some(Role::SuperAdmin),
            "ADMIN" => Some(Role::Admin),
            "STAFF" => Some(Role::Staff),
            _ => None,
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::SuperAdmin | Role::Admin)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Gender {
    Male,
    Female,
    #[default]
    Other,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "MALE",
            Gender::Female => "FEMALE",
            Gender::Other => "OTHER",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "MALE" => Some(Gender::Male),
            "FEMALE" => Some(Gender::Female),
            "OTHER" => Some(Gender::Other),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MaritalStatus {
    #[default]
    Single,
    Married,
    Divorced,
    Widowed,
    Separated,
}

impl MaritalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MaritalStatus::Single => "SINGLE",
            MaritalStatus::Married => "MARRIED",
            MaritalStatus::Divorced => "DIVORCED",
            MaritalStatus::Widowed => "WIDOWED",
            MaritalStatus::Separated => "SEPARATED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "SINGLE" => Some(MaritalStatus::Single),
            "MARRIED" => Some(MaritalStatus::Married),
            "DIVORCED" => Some(MaritalStatus::Divorced),
            "WIDOWED" => Some(MaritalStatus::Widowed),
            "SEPARATED" => Some(MaritalStatus::Separated),
            _ => None,
        }
    }
}

/// Directory record. `staff_id` is the immutable business key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub employee_id: String,
    pub staff_id: String,
    pub email: Option<String>,
    pub full_name: String,
    pub title: String,
    pub gender: Gender,
    pub date_of_birth: Option<NaiveDate>,
    pub phone_number: String,
    pub marital_status: MaritalStatus,
    pub number_of_dependents: u32,
    pub role: Role,
    pub pb_number: String,
    pub directorate: String,
    pub station_id: Option<String>,
    pub division_id: Option<String>,
    pub date_registered: DateTime<Utc>,
    pub discontinued: bool,
    pub discontinued_date: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub created_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// New STAFF record with defaults for every optional attribute
    pub fn new_for_insert(staff_id: String, full_name: String, now: DateTime<Utc>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            employee_id: uuid::Uuid::new_v4().to_string(),
            staff_id,
            email: None,
            full_name,
            title: String::new(),
            gender: Gender::default(),
            date_of_birth: None,
            phone_number: String::new(),
            marital_status: MaritalStatus::default(),
            number_of_dependents: 0,
            role: Role::default(),
            pb_number: String::new(),
            directorate: String::new(),
            station_id: None,
            division_id: None,
            date_registered: now,
            discontinued: false,
            discontinued_date: None,
            is_active: true,
            created_by: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Keeps `discontinued_date` in step with the `discontinued` flag
    pub fn sync_discontinued(&mut self, now: DateTime<Utc>) {
        if self.discontinued && self.discontinued_date.is_none() {
            self.discontinued_date = Some(now);
        } else if !self.discontinued {
            self.discontinued_date = None;
        }
    }
}
