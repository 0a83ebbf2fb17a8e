use serde::{Deserialize, Serialize};

/// Which directory records an upload creates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportProfile {
    /// New directory records (staff onboarding)
    User,
    /// Enrols existing directory records as members
    Member,
}

impl ImportProfile {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImportProfile::User => "user",
            ImportProfile::Member => "member",
        }
    }

    /// Action name written to the audit trail
    pub fn audit_action(&self) -> &'static str {
        match self {
            ImportProfile::User => "USER_EXCEL_IMPORT",
            ImportProfile::Member => "MEMBER_EXCEL_IMPORT",
        }
    }

    /// Action name written when the upload aborts
    pub fn failure_action(&self) -> &'static str {
        match self {
            ImportProfile::User => "EXCEL_IMPORT_FAILED",
            ImportProfile::Member => "MEMBER_IMPORT_FAILED",
        }
    }

    pub fn audit_target(&self) -> &'static str {
        match self {
            ImportProfile::User => "User",
            ImportProfile::Member => "Member",
        }
    }

    /// Plural noun for response messages
    pub fn noun(&self) -> &'static str {
        match self {
            ImportProfile::User => "users",
            ImportProfile::Member => "members",
        }
    }
}

impl std::fmt::Display for ImportProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
