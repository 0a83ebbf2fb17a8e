use serde::{Deserialize, Serialize};

use super::report::ImportReport;

/// 201 body of a completed import
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportResponse {
    pub message: String,
    pub report: ImportReport,
}

/// Column layout an upload must follow
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportTemplate {
    pub profile: super::ImportProfile,
    /// Required headers; the first alias of each is shown
    pub required_headers: Vec<String>,
    pub optional_headers: Vec<String>,
    pub accepted_extensions: Vec<String>,
    pub max_upload_bytes: usize,
}
