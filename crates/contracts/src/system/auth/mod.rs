use serde::{Deserialize, Serialize};

use super::users::Role;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    pub sub: String, // user_id
    pub staff_id: String,
    #[serde(default)]
    pub email: Option<String>,
    pub role: Role,
    pub exp: usize, // expiration timestamp
    pub iat: usize, // issued at
}

impl TokenClaims {
    /// Identity string recorded as "imported_by" and in audit metadata
    pub fn identity(&self) -> String {
        match &self.email {
            Some(email) if !email.is_empty() => email.clone(),
            _ => self.staff_id.clone(),
        }
    }
}
