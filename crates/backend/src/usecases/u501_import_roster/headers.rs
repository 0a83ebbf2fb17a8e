//! Header row resolution against the configured labels

use contracts::usecases::u501_import_roster::report::RowData;
use contracts::usecases::u501_import_roster::ImportProfile;
use indexmap::IndexMap;

use super::config::HeaderLabels;
use super::error::ImportError;
use super::sheet::CellValue;

/// A resolved column: where it is and the label it was found under
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub index: usize,
    pub label: String,
}

/// Trimmed header label -> column index. A repeated label keeps its first column.
#[derive(Debug, Clone, Default)]
pub struct HeaderIndex {
    labels: IndexMap<String, usize>,
}

impl HeaderIndex {
    pub fn new(headers: &[String]) -> Self {
        let mut labels = IndexMap::new();
        for (index, header) in headers.iter().enumerate() {
            let label = header.trim();
            if label.is_empty() {
                continue;
            }
            labels.entry(label.to_string()).or_insert(index);
        }
        Self { labels }
    }

    /// First alias present in the upload
    pub fn find(&self, aliases: &[String]) -> Option<Column> {
        aliases.iter().find_map(|alias| {
            let alias = alias.trim();
            self.labels.get(alias).map(|&index| Column {
                index,
                label: alias.to_string(),
            })
        })
    }

    /// Cleaned copy of a row for the report, header order kept
    pub fn row_data(&self, cells: &[CellValue]) -> RowData {
        self.labels
            .iter()
            .map(|(label, &index)| {
                let text = cells.get(index).and_then(CellValue::as_text);
                (label.clone(), text)
            })
            .collect()
    }
}

/// Columns the importer reads; optional ones are `None` when absent from the upload
#[derive(Debug, Clone)]
pub struct Columns {
    pub staff_id: Column,
    pub name: Option<Column>,
    pub station: Option<Column>,
    pub division: Option<Column>,
    pub directorate: Option<Column>,
    pub email: Option<Column>,
    pub title: Option<Column>,
    pub gender: Option<Column>,
    pub date_of_birth: Option<Column>,
    pub phone: Option<Column>,
    pub pb_number: Option<Column>,
    pub marital_status: Option<Column>,
    pub dependents: Option<Column>,
    pub date_registered: Option<Column>,
    pub discontinue: Option<Column>,
    pub emp_id: Option<Column>,
    pub entrance_fee: Option<Column>,
    pub nominee: Option<Column>,
    pub address: Option<Column>,
    pub witness: Option<Column>,
    pub relationship: Option<Column>,
    pub joined_date: Option<Column>,
}

fn display_label(aliases: &[String]) -> String {
    aliases
        .first()
        .map(|a| a.trim().to_string())
        .unwrap_or_else(|| "<unnamed>".to_string())
}

impl Columns {
    /// Fails with every missing required header at once
    pub fn resolve(
        index: &HeaderIndex,
        labels: &HeaderLabels,
        profile: ImportProfile,
    ) -> Result<Self, ImportError> {
        let mut missing = Vec::new();

        let staff_id = index.find(&labels.staff_id);
        if staff_id.is_none() {
            missing.push(display_label(&labels.staff_id));
        }

        let name = index.find(&labels.name);
        if profile == ImportProfile::User && name.is_none() {
            missing.push(display_label(&labels.name));
        }

        let Some(staff_id) = staff_id else {
            return Err(ImportError::MissingHeaders(missing));
        };
        if !missing.is_empty() {
            return Err(ImportError::MissingHeaders(missing));
        }

        Ok(Self {
            staff_id,
            name,
            station: index.find(&labels.station),
            division: index.find(&labels.division),
            directorate: index.find(&labels.directorate),
            email: index.find(&labels.email),
            title: index.find(&labels.title),
            gender: index.find(&labels.gender),
            date_of_birth: index.find(&labels.date_of_birth),
            phone: index.find(&labels.phone),
            pb_number: index.find(&labels.pb_number),
            marital_status: index.find(&labels.marital_status),
            dependents: index.find(&labels.dependents),
            date_registered: index.find(&labels.date_registered),
            discontinue: index.find(&labels.discontinue),
            emp_id: index.find(&labels.emp_id),
            entrance_fee: index.find(&labels.entrance_fee),
            nominee: index.find(&labels.nominee),
            address: index.find(&labels.address),
            witness: index.find(&labels.witness),
            relationship: index.find(&labels.relationship),
            joined_date: index.find(&labels.joined_date),
        })
    }
}

/// Borrowed view of one data row
pub struct RowView<'a> {
    cells: &'a [CellValue],
}

impl<'a> RowView<'a> {
    pub fn new(cells: &'a [CellValue]) -> Self {
        Self { cells }
    }

    pub fn cell(&self, column: Option<&Column>) -> &'a CellValue {
        const EMPTY: &CellValue = &CellValue::Empty;
        column
            .and_then(|c| self.cells.get(c.index))
            .unwrap_or(EMPTY)
    }

    /// Cleaned text, `None` for a missing column or blank cell
    pub fn text(&self, column: Option<&Column>) -> Option<String> {
        self.cell(column).as_text()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(labels: &[&str]) -> Vec<String> {
        labels.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn trimmed_labels_and_first_duplicate_wins() {
        let index = HeaderIndex::new(&headers(&[" Staff # ", "Name", "Email", "Name"]));
        let cols = Columns::resolve(&index, &HeaderLabels::default(), ImportProfile::User).unwrap();

        assert_eq!(cols.staff_id.index, 0);
        assert_eq!(cols.name.as_ref().map(|c| c.index), Some(1));
        assert_eq!(cols.email.as_ref().map(|c| c.index), Some(2));
        assert!(cols.station.is_none());
    }

    #[test]
    fn gender_alias_is_accepted() {
        let index = HeaderIndex::new(&headers(&["Staff #", "Name", "Gender"]));
        let cols = Columns::resolve(&index, &HeaderLabels::default(), ImportProfile::User).unwrap();
        let gender = cols.gender.unwrap();
        assert_eq!(gender.index, 2);
        assert_eq!(gender.label, "Gender");
    }

    #[test]
    fn missing_required_headers_are_listed_together() {
        let index = HeaderIndex::new(&headers(&["staff #", "Email"]));
        let err = Columns::resolve(&index, &HeaderLabels::default(), ImportProfile::User).unwrap_err();
        match err {
            ImportError::MissingHeaders(missing) => {
                assert_eq!(missing, vec!["Staff #".to_string(), "Name".to_string()])
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn member_profile_does_not_need_name() {
        let index = HeaderIndex::new(&headers(&["Staff #", "Entrance Fee"]));
        let cols = Columns::resolve(&index, &HeaderLabels::default(), ImportProfile::Member).unwrap();
        assert!(cols.name.is_none());
        assert!(cols.entrance_fee.is_some());
    }

    #[test]
    fn row_data_keeps_header_order_and_nulls() {
        let index = HeaderIndex::new(&headers(&["Staff #", "Name", "Email"]));
        let data = index.row_data(&[
            CellValue::Number(1001.0),
            CellValue::Text(" Ama ".into()),
            CellValue::Empty,
        ]);
        let pairs: Vec<_> = data.iter().collect();
        assert_eq!(pairs[0], (&"Staff #".to_string(), &Some("1001".to_string())));
        assert_eq!(pairs[1].1.as_deref(), Some("Ama"));
        assert_eq!(pairs[2].1, &None);
    }
}
