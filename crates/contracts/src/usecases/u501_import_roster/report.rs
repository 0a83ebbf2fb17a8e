use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Cleaned cell text of a row keyed by header label, in column order; empty cells are `None`
pub type RowData = IndexMap<String, Option<String>>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportSummary {
    pub total_rows: usize,
    pub total_processed: usize,
    pub successful: usize,
    pub failed: usize,
    pub skipped: usize,
    /// One decimal place with a percent sign, e.g. "66.7%"
    pub success_rate: String,
    /// Names of stations auto-created by this import
    pub stations_created: Vec<String>,
    pub divisions_created: Vec<String>,
    pub imported_by: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_interest_rate: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuccessfulRow {
    pub row: usize,
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub member_id: Option<String>,
    pub staff_id: String,
    pub full_name: String,
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wallet_number: Option<String>,
    pub station: Option<String>,
    pub division: Option<String>,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailedRow {
    pub row: usize,
    pub error: String,
    pub data: RowData,
    /// Field label -> message; `database` for persistence errors
    pub field_errors: IndexMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkippedRow {
    pub row: usize,
    pub reason: String,
    pub data: RowData,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LookupKind {
    Station,
    Division,
}

impl LookupKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LookupKind::Station => "station",
            LookupKind::Division => "division",
        }
    }
}

/// Station or division auto-created while resolving a row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedLookup {
    pub kind: LookupKind,
    pub id: String,
    pub code: String,
    pub name: String,
    pub row: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportReport {
    pub summary: ImportSummary,
    pub successful: Vec<SuccessfulRow>,
    pub failed: Vec<FailedRow>,
    pub skipped: Vec<SkippedRow>,
    /// Warnings of all successful rows, in row order, text unchanged
    pub warnings: Vec<String>,
    pub created_lookups: Vec<CreatedLookup>,
}

impl ImportReport {
    /// Row numbers of every outcome, sorted
    pub fn row_numbers(&self) -> Vec<usize> {
        let mut rows: Vec<usize> = self
            .successful
            .iter()
            .map(|r| r.row)
            .chain(self.failed.iter().map(|r| r.row))
            .chain(self.skipped.iter().map(|r| r.row))
            .collect();
        rows.sort_unstable();
        rows
    }
}
