pub mod profile;
pub mod report;
pub mod response;

pub use profile::ImportProfile;
pub use report::{
    CreatedLookup, FailedRow, ImportReport, ImportSummary, LookupKind, SkippedRow, SuccessfulRow,
};
pub use response::{ImportResponse, ImportTemplate};

use crate::usecases::common::UseCaseMetadata;

pub struct ImportRoster;

impl UseCaseMetadata for ImportRoster {
    fn usecase_index() -> &'static str {
        "u501"
    }

    fn usecase_name() -> &'static str {
        "import_roster"
    }

    fn display_name() -> &'static str {
        "Roster import"
    }

    fn description() -> &'static str {
        "Bulk onboarding of staff and credit-union members from an Excel roster"
    }
}
