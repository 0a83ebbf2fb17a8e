use chrono::{DateTime, Utc};
use contracts::usecases::u501_import_roster::report::RowData;
use contracts::usecases::u501_import_roster::{
    CreatedLookup, FailedRow, ImportReport, ImportSummary, LookupKind, SkippedRow, SuccessfulRow,
};
use indexmap::IndexMap;

use crate::shared::format::format_percent;

/// Result of one row, decided once
#[derive(Debug, Clone)]
pub enum RowOutcome {
    Created {
        row: SuccessfulRow,
        /// Lookups this row auto-created (committed with the row)
        lookups: Vec<CreatedLookup>,
    },
    Skipped {
        reason: String,
    },
    Failed {
        error: String,
        field_errors: IndexMap<String, String>,
    },
}

impl RowOutcome {
    pub fn failed(error: impl Into<String>) -> Self {
        RowOutcome::Failed {
            error: error.into(),
            field_errors: IndexMap::new(),
        }
    }

    /// Persistence error: text goes under `database`
    pub fn database_error(err: &anyhow::Error) -> Self {
        let text = readable(err);
        let mut field_errors = IndexMap::new();
        field_errors.insert("database".to_string(), text.clone());
        RowOutcome::Failed {
            error: format!("Database error: {}", text),
            field_errors,
        }
    }

    pub fn unexpected(err: &anyhow::Error) -> Self {
        RowOutcome::failed(format!("Unexpected error: {}", readable(err)))
    }
}

/// Outermost message plus the root cause. Driver errors repeat their
/// source in their own text, so the full chain reads as a stutter.
fn readable(err: &anyhow::Error) -> String {
    let top = err.to_string();
    let root = err.root_cause().to_string();
    if top.contains(&root) {
        top
    } else {
        format!("{}: {}", top, root)
    }
}

/// Accumulates outcomes in file order
pub struct ReportBuilder {
    imported_by: String,
    timestamp: DateTime<Utc>,
    total_rows: usize,
    successful: Vec<SuccessfulRow>,
    failed: Vec<FailedRow>,
    skipped: Vec<SkippedRow>,
    warnings: Vec<String>,
    created_lookups: Vec<CreatedLookup>,
}

impl ReportBuilder {
    pub fn new(imported_by: String, timestamp: DateTime<Utc>, total_rows: usize) -> Self {
        Self {
            imported_by,
            timestamp,
            total_rows,
            successful: Vec::new(),
            failed: Vec::new(),
            skipped: Vec::new(),
            warnings: Vec::new(),
            created_lookups: Vec::new(),
        }
    }

    pub fn record(&mut self, row: usize, data: RowData, outcome: RowOutcome) {
        match outcome {
            RowOutcome::Created { row: created, lookups } => {
                self.warnings.extend(created.warnings.iter().cloned());
                self.created_lookups.extend(lookups);
                self.successful.push(created);
            }
            RowOutcome::Skipped { reason } => {
                tracing::debug!("Row {} skipped: {}", row, reason);
                self.skipped.push(SkippedRow { row, reason, data });
            }
            RowOutcome::Failed {
                error,
                field_errors,
            } => {
                tracing::debug!("Row {} failed: {}", row, error);
                self.failed.push(FailedRow {
                    row,
                    error,
                    data,
                    field_errors,
                });
            }
        }
    }

    fn created_names(&self, kind: LookupKind) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for lookup in self.created_lookups.iter().filter(|l| l.kind == kind) {
            if !names.contains(&lookup.name) {
                names.push(lookup.name.clone());
            }
        }
        names
    }

    pub fn finish(self, default_interest_rate: Option<f64>) -> ImportReport {
        let total_processed = self.successful.len() + self.failed.len() + self.skipped.len();
        let summary = ImportSummary {
            total_rows: self.total_rows,
            total_processed,
            successful: self.successful.len(),
            failed: self.failed.len(),
            skipped: self.skipped.len(),
            success_rate: format_percent(self.successful.len(), total_processed),
            stations_created: self.created_names(LookupKind::Station),
            divisions_created: self.created_names(LookupKind::Division),
            imported_by: self.imported_by,
            timestamp: self.timestamp,
            default_interest_rate,
        };

        ImportReport {
            summary,
            successful: self.successful,
            failed: self.failed,
            skipped: self.skipped,
            warnings: self.warnings,
            created_lookups: self.created_lookups,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn success(row: usize, warnings: &[&str]) -> SuccessfulRow {
        SuccessfulRow {
            row,
            user_id: format!("u{}", row),
            employee_id: None,
            member_id: None,
            staff_id: row.to_string(),
            full_name: "X".into(),
            email: None,
            wallet_number: None,
            station: None,
            division: None,
            warnings: warnings.iter().map(|w| w.to_string()).collect(),
        }
    }

    fn lookup(kind: LookupKind, name: &str, row: usize) -> CreatedLookup {
        CreatedLookup {
            kind,
            id: format!("{}-{}", name, row),
            code: "ACC".into(),
            name: name.into(),
            row,
        }
    }

    #[test]
    fn counts_rate_and_flattened_warnings() {
        let mut builder = ReportBuilder::new("admin@ecg.com".into(), Utc::now(), 3);
        builder.record(
            2,
            RowData::new(),
            RowOutcome::Created {
                row: success(2, &["Created new station: \"Accra\""]),
                lookups: vec![lookup(LookupKind::Station, "Accra", 2)],
            },
        );
        builder.record(
            3,
            RowData::new(),
            RowOutcome::Skipped {
                reason: "dup".into(),
            },
        );
        builder.record(4, RowData::new(), RowOutcome::failed("boom"));

        let report = builder.finish(None);
        assert_eq!(report.summary.total_processed, 3);
        assert_eq!(report.summary.successful, 1);
        assert_eq!(report.summary.success_rate, "33.3%");
        assert_eq!(report.summary.stations_created, vec!["Accra".to_string()]);
        assert!(report.summary.divisions_created.is_empty());
        assert_eq!(report.warnings, vec!["Created new station: \"Accra\""]);
        assert_eq!(report.row_numbers(), vec![2, 3, 4]);
    }

    #[test]
    fn empty_upload_reports_zero_rate() {
        let report = ReportBuilder::new("a".into(), Utc::now(), 0).finish(Some(2.5));
        assert_eq!(report.summary.success_rate, "0.0%");
        assert_eq!(report.summary.default_interest_rate, Some(2.5));
    }

    #[test]
    fn database_error_lands_under_database_key() {
        let err = anyhow::anyhow!("UNIQUE constraint failed").context("Failed to insert user");
        match RowOutcome::database_error(&err) {
            RowOutcome::Failed {
                error,
                field_errors,
            } => {
                assert_eq!(
                    error,
                    "Database error: Failed to insert user: UNIQUE constraint failed"
                );
                assert_eq!(
                    field_errors["database"],
                    "Failed to insert user: UNIQUE constraint failed"
                );
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn nested_driver_error_is_not_repeated() {
        let err = anyhow::anyhow!("(code: 1811) boom")
            .context("error returned from database: (code: 1811) boom")
            .context("Failed to insert user");
        match RowOutcome::database_error(&err) {
            RowOutcome::Failed { field_errors, .. } => {
                assert_eq!(
                    field_errors["database"],
                    "Failed to insert user: (code: 1811) boom"
                );
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }
}
