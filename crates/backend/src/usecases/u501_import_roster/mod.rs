//! Bulk roster import: one engine for the `user` and `member` profiles

pub mod config;
pub mod draft;
pub mod error;
pub mod executor;
pub mod fields;
pub mod headers;
pub mod report;
pub mod sheet;

pub use config::{HeaderLabels, ImportConfig, TransactionScope};
pub use error::ImportError;
pub use executor::{Principal, RosterImporter};
pub use sheet::{UploadFormat, UploadTable};

use contracts::usecases::u501_import_roster::{ImportProfile, ImportSummary, ImportTemplate};

/// Human summary returned with the report
pub fn completion_message(profile: ImportProfile, summary: &ImportSummary) -> String {
    let noun = profile.noun();
    if summary.total_processed == 0 {
        return "No data to import.".to_string();
    }
    if summary.successful == 0 && summary.failed > 0 && summary.skipped == 0 {
        return "Import failed. All rows had errors.".to_string();
    }
    if summary.successful == 0 && summary.failed == 0 {
        return format!(
            "No new {} imported. All rows were skipped (duplicates).",
            noun
        );
    }

    let mut message = format!(
        "Import completed. {} {} created.",
        summary.successful, noun
    );
    if summary.failed > 0 {
        message.push_str(&format!(" {} row(s) failed.", summary.failed));
    }
    if summary.skipped > 0 {
        message.push_str(&format!(" {} row(s) skipped.", summary.skipped));
    }
    message
}

/// Headers a profile reads, as configured
pub fn template(profile: ImportProfile, config: &ImportConfig) -> ImportTemplate {
    let h = &config.headers;
    let first = |aliases: &Vec<String>| aliases.first().cloned().unwrap_or_default();

    let (required, optional) = match profile {
        ImportProfile::User => (
            vec![&h.staff_id, &h.name],
            vec![
                &h.station,
                &h.division,
                &h.directorate,
                &h.email,
                &h.title,
                &h.gender,
                &h.date_of_birth,
                &h.phone,
                &h.pb_number,
                &h.marital_status,
                &h.dependents,
                &h.date_registered,
                &h.discontinue,
                &h.emp_id,
            ],
        ),
        ImportProfile::Member => (
            vec![&h.staff_id],
            vec![
                &h.station,
                &h.division,
                &h.directorate,
                &h.email,
                &h.entrance_fee,
                &h.nominee,
                &h.address,
                &h.witness,
                &h.relationship,
                &h.joined_date,
            ],
        ),
    };

    ImportTemplate {
        profile,
        required_headers: required.into_iter().map(first).collect(),
        optional_headers: optional.into_iter().map(first).collect(),
        accepted_extensions: vec!["xlsx".into(), "xls".into(), "csv".into()],
        max_upload_bytes: config.max_upload_bytes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn summary(successful: usize, failed: usize, skipped: usize) -> ImportSummary {
        ImportSummary {
            total_rows: successful + failed + skipped,
            total_processed: successful + failed + skipped,
            successful,
            failed,
            skipped,
            success_rate: String::new(),
            stations_created: vec![],
            divisions_created: vec![],
            imported_by: "admin".into(),
            timestamp: Utc::now(),
            default_interest_rate: None,
        }
    }

    #[test]
    fn messages_follow_counts() {
        assert_eq!(
            completion_message(ImportProfile::User, &summary(3, 1, 1)),
            "Import completed. 3 users created. 1 row(s) failed. 1 row(s) skipped."
        );
        assert_eq!(
            completion_message(ImportProfile::Member, &summary(0, 0, 2)),
            "No new members imported. All rows were skipped (duplicates)."
        );
        assert_eq!(
            completion_message(ImportProfile::User, &summary(0, 2, 0)),
            "Import failed. All rows had errors."
        );
        assert_eq!(
            completion_message(ImportProfile::User, &summary(0, 0, 0)),
            "No data to import."
        );
    }

    #[test]
    fn template_lists_first_alias() {
        let t = template(ImportProfile::User, &ImportConfig::default());
        assert_eq!(t.required_headers, vec!["Staff #", "Name"]);
        assert!(t.optional_headers.contains(&"Sex".to_string()));

        let m = template(ImportProfile::Member, &ImportConfig::default());
        assert_eq!(m.required_headers, vec!["Staff #"]);
        assert_eq!(m.optional_headers.last().map(String::as_str), Some("Joined Date"));
    }
}
