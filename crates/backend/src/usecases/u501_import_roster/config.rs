use serde::Deserialize;

/// Whether rows commit one by one or the upload commits as a whole
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TransactionScope {
    /// Each row in its own transaction
    #[default]
    Row,
    /// One enclosing transaction, a savepoint per row
    Batch,
}

/// Importer settings, `[import]` in config.toml
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    pub max_upload_bytes: usize,
    /// Replaces the leading `0` of local phone numbers
    pub phone_country_code: String,
    /// Initial password is staff number + suffix
    pub default_password_suffix: String,
    pub wallet_prefix: String,
    pub transaction_scope: TransactionScope,
    pub headers: HeaderLabels,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            max_upload_bytes: 5 * 1024 * 1024,
            phone_country_code: "+233".to_string(),
            default_password_suffix: "@ECG2026".to_string(),
            wallet_prefix: "CH".to_string(),
            transaction_scope: TransactionScope::Row,
            headers: HeaderLabels::default(),
        }
    }
}

/// Accepted header labels per field, `[import.headers]` in config.toml.
/// The first alias found in the upload wins.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HeaderLabels {
    pub staff_id: Vec<String>,
    pub name: Vec<String>,
    pub station: Vec<String>,
    pub division: Vec<String>,
    pub directorate: Vec<String>,
    pub email: Vec<String>,
    pub title: Vec<String>,
    pub gender: Vec<String>,
    pub date_of_birth: Vec<String>,
    pub phone: Vec<String>,
    pub pb_number: Vec<String>,
    pub marital_status: Vec<String>,
    pub dependents: Vec<String>,
    pub date_registered: Vec<String>,
    pub discontinue: Vec<String>,
    pub emp_id: Vec<String>,
    pub entrance_fee: Vec<String>,
    pub nominee: Vec<String>,
    pub address: Vec<String>,
    pub witness: Vec<String>,
    pub relationship: Vec<String>,
    pub joined_date: Vec<String>,
}

fn labels(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

impl Default for HeaderLabels {
    fn default() -> Self {
        Self {
            staff_id: labels(&["Staff #"]),
            name: labels(&["Name"]),
            station: labels(&["Station"]),
            division: labels(&["Division"]),
            directorate: labels(&["Directorate"]),
            email: labels(&["Email"]),
            title: labels(&["Title"]),
            gender: labels(&["Sex", "Gender"]),
            date_of_birth: labels(&["DOB"]),
            phone: labels(&["Tel"]),
            pb_number: labels(&["PB #"]),
            marital_status: labels(&["Marital Status"]),
            dependents: labels(&["# of Dependents"]),
            date_registered: labels(&["Date of Registration"]),
            discontinue: labels(&["Discontinue"]),
            emp_id: labels(&["Emp ID"]),
            entrance_fee: labels(&["Entrance Fee"]),
            nominee: labels(&["Nominee"]),
            address: labels(&["Address"]),
            witness: labels(&["Witness"]),
            relationship: labels(&["Relationship"]),
            joined_date: labels(&["Joined Date"]),
        }
    }
}
