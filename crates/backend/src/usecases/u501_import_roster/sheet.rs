//! Upload decoding: first worksheet of an xlsx/xls workbook, or a CSV file,
//! into a header row plus typed data rows.

use calamine::{open_workbook_auto_from_rs, Data, Reader};
use chrono::NaiveDateTime;
use std::io::Cursor;

use super::error::ImportError;
use super::fields;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadFormat {
    Xlsx,
    Xls,
    Csv,
}

impl UploadFormat {
    /// By file extension, case-insensitive
    pub fn from_filename(filename: &str) -> Option<Self> {
        let ext = std::path::Path::new(filename)
            .extension()?
            .to_str()?
            .to_ascii_lowercase();
        match ext.as_str() {
            "xlsx" => Some(UploadFormat::Xlsx),
            "xls" => Some(UploadFormat::Xls),
            "csv" => Some(UploadFormat::Csv),
            _ => None,
        }
    }
}

/// Raw cell as read from the upload
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Date(NaiveDateTime),
    Bool(bool),
    Empty,
}

impl CellValue {
    /// Cleaned text of the cell; `None` when nothing is left after cleaning
    pub fn as_text(&self) -> Option<String> {
        match self {
            CellValue::Text(s) => fields::clean_string(s),
            CellValue::Number(n) => Some(fields::number_to_text(*n)),
            CellValue::Date(dt) => Some(dt.format("%Y-%m-%d").to_string()),
            CellValue::Bool(b) => Some(if *b { "TRUE" } else { "FALSE" }.to_string()),
            CellValue::Empty => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.as_text().is_none()
    }
}

/// Decoded upload. `rows[i]` is spreadsheet line `i + 2`.
#[derive(Debug, Clone, Default)]
pub struct UploadTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl UploadTable {
    /// Rows are padded to the header width so column lookups never go out of range
    pub fn new(headers: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        let width = headers.len();
        let mut rows = rows;
        for row in rows.iter_mut() {
            row.resize(width, CellValue::Empty);
        }
        // Trailing blank lines are formatting leftovers, not data
        while rows
            .last()
            .map(|r| r.iter().all(CellValue::is_empty))
            .unwrap_or(false)
        {
            rows.pop();
        }
        Self { headers, rows }
    }

    pub fn read(format: UploadFormat, bytes: Vec<u8>) -> Result<Self, ImportError> {
        match format {
            UploadFormat::Xlsx | UploadFormat::Xls => read_workbook(bytes),
            UploadFormat::Csv => read_csv(&bytes),
        }
    }
}

fn read_workbook(bytes: Vec<u8>) -> Result<UploadTable, ImportError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))
        .map_err(|e| ImportError::UnreadableFile(e.to_string()))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| ImportError::UnreadableFile("workbook has no worksheets".into()))?
        .map_err(|e| ImportError::UnreadableFile(e.to_string()))?;

    let mut lines = range.rows();
    let headers = match lines.next() {
        Some(first) => first
            .iter()
            .map(|c| cell_from_data(c).as_text().unwrap_or_default())
            .collect(),
        None => return Ok(UploadTable::default()),
    };

    let rows = lines
        .map(|line| line.iter().map(cell_from_data).collect())
        .collect();

    Ok(UploadTable::new(headers, rows))
}

fn cell_from_data(data: &Data) -> CellValue {
    match data {
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => fields::excel_serial_to_datetime(dt.as_f64())
            .map(CellValue::Date)
            .unwrap_or(CellValue::Empty),
        Data::DateTimeIso(s) => NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
            .map(CellValue::Date)
            .unwrap_or_else(|_| CellValue::Text(s.clone())),
        Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(_) | Data::Empty => CellValue::Empty,
    }
}

fn read_csv(bytes: &[u8]) -> Result<UploadTable, ImportError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    let mut records = reader.records();
    let headers = match records.next() {
        Some(first) => first
            .map_err(|e| ImportError::UnreadableFile(e.to_string()))?
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').to_string())
            .collect(),
        None => return Ok(UploadTable::default()),
    };

    let mut rows = Vec::new();
    for record in records {
        let record = record.map_err(|e| ImportError::UnreadableFile(e.to_string()))?;
        rows.push(
            record
                .iter()
                .map(|v| {
                    if v.trim().is_empty() {
                        CellValue::Empty
                    } else {
                        CellValue::Text(v.to_string())
                    }
                })
                .collect(),
        );
    }

    Ok(UploadTable::new(headers, rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::Workbook;

    #[test]
    fn format_from_extension() {
        assert_eq!(UploadFormat::from_filename("roster.XLSX"), Some(UploadFormat::Xlsx));
        assert_eq!(UploadFormat::from_filename("old.xls"), Some(UploadFormat::Xls));
        assert_eq!(UploadFormat::from_filename("dump.csv"), Some(UploadFormat::Csv));
        assert_eq!(UploadFormat::from_filename("notes.txt"), None);
        assert_eq!(UploadFormat::from_filename("noext"), None);
    }

    #[test]
    fn csv_pads_short_rows_and_drops_trailing_blanks() {
        let data = "Staff #,Name,Email\n1001,Ama,\n1002\n,,\n";
        let table = UploadTable::read(UploadFormat::Csv, data.as_bytes().to_vec()).unwrap();

        assert_eq!(table.headers, vec!["Staff #", "Name", "Email"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0][1], CellValue::Text("Ama".into()));
        assert_eq!(table.rows[0][2], CellValue::Empty);
        assert_eq!(table.rows[1].len(), 3);
        assert_eq!(table.rows[1][1], CellValue::Empty);
    }

    #[test]
    fn xlsx_first_sheet_is_read() {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, "Staff #").unwrap();
        sheet.write_string(0, 1, " Name ").unwrap();
        sheet.write_number(1, 0, 1001.0).unwrap();
        sheet.write_string(1, 1, "Ama  Mensah").unwrap();
        let bytes = workbook.save_to_buffer().unwrap();

        let table = UploadTable::read(UploadFormat::Xlsx, bytes).unwrap();
        assert_eq!(table.headers, vec!["Staff #", "Name"]);
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0][0].as_text().as_deref(), Some("1001"));
        assert_eq!(table.rows[0][1].as_text().as_deref(), Some("Ama Mensah"));
    }

    #[test]
    fn garbage_bytes_are_unreadable() {
        let err = UploadTable::read(UploadFormat::Xlsx, b"not a workbook".to_vec()).unwrap_err();
        assert!(matches!(err, ImportError::UnreadableFile(_)));
    }
}
