//! Typed drafts of a row, built before anything touches the store.
//! Parsing never fails past the required fields: bad optional values become warnings.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use contracts::domain::a003_member::aggregate::Member;
use contracts::system::users::{Gender, MaritalStatus, Role, User};
use indexmap::IndexMap;

use super::fields::{self, DateCell};
use super::headers::{Column, Columns, RowView};
use super::report::RowOutcome;
use super::sheet::CellValue;

/// Row rejected on a required field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowFailure {
    pub error: String,
    pub field_errors: IndexMap<String, String>,
}

impl RowFailure {
    fn field(label: &str, error: String, message: &str) -> Self {
        let mut field_errors = IndexMap::new();
        field_errors.insert(label.to_string(), message.to_string());
        Self {
            error,
            field_errors,
        }
    }
}

impl From<RowFailure> for RowOutcome {
    fn from(failure: RowFailure) -> Self {
        RowOutcome::Failed {
            error: failure.error,
            field_errors: failure.field_errors,
        }
    }
}

/// A blank cell is "required", a cell that cleans to nothing is "empty"
pub fn required_text(row: &RowView<'_>, column: &Column) -> Result<String, RowFailure> {
    let cell = row.cell(Some(column));
    if matches!(cell, CellValue::Empty) {
        return Err(RowFailure::field(
            &column.label,
            format!("{} is required", column.label),
            "Required field is empty",
        ));
    }
    cell.as_text().ok_or_else(|| {
        RowFailure::field(
            &column.label,
            format!("{} is empty", column.label),
            "Field is empty",
        )
    })
}

fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(chrono::NaiveTime::MIN))
}

/// New directory record as read from a `user` profile row
#[derive(Debug, Clone)]
pub struct UserDraft {
    pub staff_id: String,
    pub full_name: String,
    /// Well-formed; uniqueness is checked against the store later
    pub email: Option<String>,
    pub title: Option<String>,
    pub gender: Gender,
    pub date_of_birth: Option<NaiveDate>,
    pub phone_number: Option<String>,
    pub pb_number: Option<String>,
    pub marital_status: MaritalStatus,
    pub number_of_dependents: u32,
    pub date_registered: DateTime<Utc>,
    pub discontinued: bool,
    pub station: Option<String>,
    pub division: Option<String>,
    pub directorate: Option<String>,
}

impl UserDraft {
    pub fn parse(
        row: &RowView<'_>,
        cols: &Columns,
        staff_id: String,
        full_name: String,
        phone_country_code: &str,
        now: DateTime<Utc>,
        warnings: &mut Vec<String>,
    ) -> Self {
        let email = row.text(cols.email.as_ref()).and_then(|email| {
            if fields::is_valid_email(&email) {
                Some(email)
            } else {
                warnings.push(format!(
                    "Invalid email format: \"{}\". Email field will be left blank.",
                    email
                ));
                None
            }
        });

        if let Some(emp_id) = row.text(cols.emp_id.as_ref()) {
            warnings.push(format!("Emp ID \"{}\" noted", emp_id));
        }

        let gender = match row.text(cols.gender.as_ref()) {
            Some(raw) => fields::parse_gender(&raw).unwrap_or_else(|| {
                warnings.push(format!(
                    "Unrecognised gender: \"{}\". Using default (OTHER).",
                    raw
                ));
                Gender::Other
            }),
            None => Gender::default(),
        };

        let date_of_birth = match fields::parse_date(row.cell(cols.date_of_birth.as_ref())) {
            DateCell::Parsed(dob) if dob > now.date_naive() => {
                warnings.push(format!("DOB {} is in the future. Setting to None.", dob));
                None
            }
            DateCell::Parsed(dob) => Some(dob),
            DateCell::Invalid => {
                warnings.push("DOB could not be parsed".to_string());
                None
            }
            DateCell::Missing => None,
        };

        let phone_number = row.text(cols.phone.as_ref()).and_then(|tel| {
            let cleaned = fields::clean_phone(&tel, phone_country_code);
            if cleaned.is_none() {
                warnings.push(format!("Invalid phone number: \"{}\"", tel));
            }
            cleaned
        });

        let marital_status = match row.text(cols.marital_status.as_ref()) {
            Some(raw) => fields::parse_marital_status(&raw).unwrap_or_else(|| {
                warnings.push(format!(
                    "Invalid marital status: \"{}\". Using default (SINGLE).",
                    raw
                ));
                MaritalStatus::Single
            }),
            None => MaritalStatus::default(),
        };

        let dependents_cell = row.cell(cols.dependents.as_ref());
        let number_of_dependents = match dependents_cell.as_text() {
            None => 0,
            Some(raw) => fields::parse_dependents(dependents_cell).unwrap_or_else(|| {
                warnings.push(format!("Invalid dependents value: \"{}\". Setting to 0.", raw));
                0
            }),
        };

        let date_registered = match fields::parse_date(row.cell(cols.date_registered.as_ref())) {
            DateCell::Parsed(date) => start_of_day(date),
            DateCell::Invalid => {
                warnings.push(
                    "Date of Registration could not be parsed. Using current date.".to_string(),
                );
                now
            }
            DateCell::Missing => now,
        };

        Self {
            staff_id,
            full_name,
            email,
            title: row.text(cols.title.as_ref()),
            gender,
            date_of_birth,
            phone_number,
            pb_number: row.text(cols.pb_number.as_ref()),
            marital_status,
            number_of_dependents,
            date_registered,
            discontinued: fields::parse_discontinue(row.cell(cols.discontinue.as_ref())),
            station: row.text(cols.station.as_ref()),
            division: row.text(cols.division.as_ref()),
            directorate: row.text(cols.directorate.as_ref()),
        }
    }

    /// Record ready to insert; links are filled in by the caller
    pub fn into_user(self, created_by: &str, now: DateTime<Utc>) -> User {
        let mut user = User::new_for_insert(self.staff_id, self.full_name, now);
        user.email = self.email;
        user.title = self.title.unwrap_or_default();
        user.gender = self.gender;
        user.date_of_birth = self.date_of_birth;
        user.phone_number = self.phone_number.unwrap_or_default();
        user.pb_number = self.pb_number.unwrap_or_default();
        user.marital_status = self.marital_status;
        user.number_of_dependents = self.number_of_dependents;
        user.directorate = self.directorate.unwrap_or_default();
        user.date_registered = self.date_registered;
        user.discontinued = self.discontinued;
        user.role = Role::Staff;
        user.created_by = Some(created_by.to_string());
        user.sync_discontinued(now);
        user
    }
}

/// Membership data read from a `member` profile row
#[derive(Debug, Clone)]
pub struct MemberDraft {
    pub email: Option<String>,
    pub entrance_fee: f64,
    pub nominee: Option<String>,
    pub address: Option<String>,
    pub witness: Option<String>,
    pub relationship: Option<String>,
    pub joined_at: DateTime<Utc>,
    pub station: Option<String>,
    pub division: Option<String>,
    pub directorate: Option<String>,
}

impl MemberDraft {
    pub fn parse(
        row: &RowView<'_>,
        cols: &Columns,
        now: DateTime<Utc>,
        warnings: &mut Vec<String>,
    ) -> Self {
        let email = row.text(cols.email.as_ref()).and_then(|email| {
            if fields::is_valid_email(&email) {
                Some(email)
            } else {
                warnings.push(format!(
                    "Invalid email format: \"{}\". Skipping email update.",
                    email
                ));
                None
            }
        });

        let fee_cell = row.cell(cols.entrance_fee.as_ref());
        let entrance_fee = match fee_cell.as_text() {
            None => 0.0,
            Some(raw) => match fields::parse_number(fee_cell) {
                Some(fee) if fee >= 0.0 => fee,
                _ => {
                    warnings.push(format!("Invalid entrance fee value: \"{}\". Using 0.", raw));
                    0.0
                }
            },
        };

        let joined_at = match fields::parse_date(row.cell(cols.joined_date.as_ref())) {
            DateCell::Parsed(date) => start_of_day(date),
            DateCell::Invalid => {
                warnings.push("Joined Date could not be parsed. Using current date.".to_string());
                now
            }
            DateCell::Missing => {
                warnings.push("Joined Date not provided. Using current date.".to_string());
                now
            }
        };

        Self {
            email,
            entrance_fee,
            nominee: row.text(cols.nominee.as_ref()),
            address: row.text(cols.address.as_ref()),
            witness: row.text(cols.witness.as_ref()),
            relationship: row.text(cols.relationship.as_ref()),
            joined_at,
            station: row.text(cols.station.as_ref()),
            division: row.text(cols.division.as_ref()),
            directorate: row.text(cols.directorate.as_ref()),
        }
    }

    pub fn to_member(&self, user_id: &str) -> Member {
        let mut member = Member::new_for_insert(user_id.to_string(), self.joined_at);
        member.entrance_fee = self.entrance_fee;
        member.nominee = self.nominee.clone();
        member.address = self.address.clone();
        member.witness = self.witness.clone();
        member.relationship = self.relationship.clone();
        member
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecases::u501_import_roster::config::HeaderLabels;
    use crate::usecases::u501_import_roster::headers::HeaderIndex;
    use contracts::usecases::u501_import_roster::ImportProfile;

    fn columns(labels: &[&str], profile: ImportProfile) -> Columns {
        let headers: Vec<String> = labels.iter().map(|s| s.to_string()).collect();
        Columns::resolve(&HeaderIndex::new(&headers), &HeaderLabels::default(), profile).unwrap()
    }

    fn text(values: &[&str]) -> Vec<CellValue> {
        values
            .iter()
            .map(|v| {
                if v.is_empty() {
                    CellValue::Empty
                } else {
                    CellValue::Text(v.to_string())
                }
            })
            .collect()
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 9, 10, 0, 0).unwrap()
    }

    #[test]
    fn required_field_messages() {
        let cols = columns(&["Staff #", "Name"], ImportProfile::User);

        let blank = vec![CellValue::Empty, CellValue::Text("Ama".into())];
        let failure = required_text(&RowView::new(&blank), &cols.staff_id).unwrap_err();
        assert_eq!(failure.error, "Staff # is required");
        assert_eq!(failure.field_errors["Staff #"], "Required field is empty");

        let spaces = vec![CellValue::Text("   ".into()), CellValue::Text("Ama".into())];
        let failure = required_text(&RowView::new(&spaces), &cols.staff_id).unwrap_err();
        assert_eq!(failure.error, "Staff # is empty");
        assert_eq!(failure.field_errors["Staff #"], "Field is empty");

        let number = vec![CellValue::Number(1001.0), CellValue::Empty];
        assert_eq!(required_text(&RowView::new(&number), &cols.staff_id).unwrap(), "1001");
    }

    #[test]
    fn user_draft_degrades_bad_values_to_warnings() {
        let cols = columns(
            &["Staff #", "Name", "Email", "Sex", "DOB", "Tel", "Marital Status", "# of Dependents", "Discontinue"],
            ImportProfile::User,
        );
        let cells = text(&["1001", "Ama", "ama-at-ecg", "x", "2099-01-01", "123", "engaged", "many", "yes"]);
        let mut warnings = Vec::new();
        let draft = UserDraft::parse(
            &RowView::new(&cells),
            &cols,
            "1001".into(),
            "Ama".into(),
            "+233",
            now(),
            &mut warnings,
        );

        assert!(draft.email.is_none());
        assert_eq!(draft.gender, Gender::Other);
        assert!(draft.date_of_birth.is_none());
        assert!(draft.phone_number.is_none());
        assert_eq!(draft.marital_status, MaritalStatus::Single);
        assert_eq!(draft.number_of_dependents, 0);
        assert!(draft.discontinued);
        assert_eq!(draft.date_registered, now());
        assert_eq!(
            warnings,
            vec![
                "Invalid email format: \"ama-at-ecg\". Email field will be left blank.",
                "Unrecognised gender: \"x\". Using default (OTHER).",
                "DOB 2099-01-01 is in the future. Setting to None.",
                "Invalid phone number: \"123\"",
                "Invalid marital status: \"engaged\". Using default (SINGLE).",
                "Invalid dependents value: \"many\". Setting to 0.",
            ]
        );

        let user = draft.into_user("admin-id", now());
        assert_eq!(user.discontinued_date, Some(now()));
        assert_eq!(user.created_by.as_deref(), Some("admin-id"));
        assert_eq!(user.role, Role::Staff);
    }

    #[test]
    fn user_draft_accepts_clean_values() {
        let cols = columns(
            &["Staff #", "Name", "Email", "Gender", "DOB", "Tel", "Date of Registration"],
            ImportProfile::User,
        );
        let cells = text(&["1001", "Ama", "ama@ecg.com.gh", "F", "17/05/1990", "0241234567", "2020-01-15"]);
        let mut warnings = Vec::new();
        let draft = UserDraft::parse(
            &RowView::new(&cells),
            &cols,
            "1001".into(),
            "Ama".into(),
            "+233",
            now(),
            &mut warnings,
        );

        assert!(warnings.is_empty(), "{:?}", warnings);
        assert_eq!(draft.email.as_deref(), Some("ama@ecg.com.gh"));
        assert_eq!(draft.gender, Gender::Female);
        assert_eq!(draft.date_of_birth, NaiveDate::from_ymd_opt(1990, 5, 17));
        assert_eq!(draft.phone_number.as_deref(), Some("+233241234567"));
        assert_eq!(
            draft.date_registered,
            Utc.with_ymd_and_hms(2020, 1, 15, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn member_draft_defaults() {
        let cols = columns(&["Staff #", "Entrance Fee", "Nominee"], ImportProfile::Member);
        let cells = text(&["1001", "-5", "Kofi"]);
        let mut warnings = Vec::new();
        let draft = MemberDraft::parse(&RowView::new(&cells), &cols, now(), &mut warnings);

        assert_eq!(draft.entrance_fee, 0.0);
        assert_eq!(draft.nominee.as_deref(), Some("Kofi"));
        assert_eq!(draft.joined_at, now());
        assert_eq!(
            warnings,
            vec![
                "Invalid entrance fee value: \"-5\". Using 0.",
                "Joined Date not provided. Using current date.",
            ]
        );
    }
}
