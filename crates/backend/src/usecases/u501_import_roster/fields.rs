//! Normalisation of loosely typed roster cells

use chrono::{Duration, NaiveDate, NaiveDateTime};
use contracts::system::users::{Gender, MaritalStatus};
use once_cell::sync::Lazy;
use regex::Regex;

use super::sheet::CellValue;

static WHITESPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("Invalid regex pattern for whitespace"));
static PHONE_NOISE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\d+]").expect("Invalid regex pattern for phone cleanup"));
static PHONE_VALID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+\d{9,15}$").expect("Invalid regex pattern for phone numbers"));

/// Text date formats, tried in order
const DATE_FORMATS: &[&str] = &[
    "%Y/%m/%d",
    "%d/%m/%Y",
    "%Y-%m-%d",
    "%d-%m-%Y",
    "%m/%d/%Y",
    "%d %b %Y",
    "%d %B %Y",
    "%Y.%m.%d",
];

/// Trim, drop `&nbsp;`, collapse internal whitespace. `None` when nothing is left.
pub fn clean_string(value: &str) -> Option<String> {
    let replaced = value.replace("&nbsp;", " ").replace('\u{a0}', " ");
    let cleaned = WHITESPACE.replace_all(replaced.trim(), " ").trim().to_string();
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned)
    }
}

/// Integral numbers render without a decimal part, so staff numbers stay "1234"
pub fn number_to_text(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

pub fn is_valid_email(email: &str) -> bool {
    match email.rsplit_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.'),
        None => false,
    }
}

/// Days since 1899-12-30, fractional part is the time of day
pub fn excel_serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() || !(0.0..2_958_466.0).contains(&serial) {
        return None;
    }
    let base = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    let millis = (serial * 86_400_000.0).round() as i64;
    base.checked_add_signed(Duration::milliseconds(millis))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateCell {
    Missing,
    Parsed(NaiveDate),
    Invalid,
}

/// Native date cells are taken as-is; text goes through `DATE_FORMATS` then the serial fallback
pub fn parse_date(cell: &CellValue) -> DateCell {
    match cell {
        CellValue::Empty => DateCell::Missing,
        CellValue::Date(dt) => DateCell::Parsed(dt.date()),
        CellValue::Number(n) => match excel_serial_to_datetime(*n) {
            Some(dt) => DateCell::Parsed(dt.date()),
            None => DateCell::Invalid,
        },
        CellValue::Bool(_) => DateCell::Invalid,
        CellValue::Text(raw) => {
            let Some(text) = clean_string(raw) else {
                return DateCell::Missing;
            };
            for fmt in DATE_FORMATS {
                if let Ok(date) = NaiveDate::parse_from_str(&text, fmt) {
                    return DateCell::Parsed(date);
                }
            }
            text.parse::<f64>()
                .ok()
                .and_then(excel_serial_to_datetime)
                .map(|dt| DateCell::Parsed(dt.date()))
                .unwrap_or(DateCell::Invalid)
        }
    }
}

/// Digits and `+` only; a leading `0` becomes the country code, otherwise `+` is prepended.
/// `None` when the result is not `+` followed by 9 to 15 digits.
pub fn clean_phone(value: &str, country_code: &str) -> Option<String> {
    let digits = PHONE_NOISE.replace_all(value, "").to_string();
    if digits.is_empty() {
        return None;
    }
    let phone = if digits.starts_with('+') {
        digits
    } else if let Some(local) = digits.strip_prefix('0') {
        format!("{}{}", country_code, local)
    } else {
        format!("+{}", digits)
    };
    PHONE_VALID.is_match(&phone).then_some(phone)
}

/// `None` for values outside the known vocabulary
pub fn parse_gender(value: &str) -> Option<Gender> {
    match value.trim().to_uppercase().as_str() {
        "M" | "MALE" | "BOY" => Some(Gender::Male),
        "F" | "FEMALE" | "GIRL" | "WOMAN" => Some(Gender::Female),
        "M/F" | "OTHER" => Some(Gender::Other),
        _ => None,
    }
}

pub fn parse_marital_status(value: &str) -> Option<MaritalStatus> {
    match value.trim().to_uppercase().as_str() {
        "SINGLE" | "S" | "A" => Some(MaritalStatus::Single),
        "MARRIED" | "M" => Some(MaritalStatus::Married),
        "DIVORCED" | "D" => Some(MaritalStatus::Divorced),
        "WIDOWED" | "W" => Some(MaritalStatus::Widowed),
        "SEPARATED" => Some(MaritalStatus::Separated),
        _ => None,
    }
}

pub fn parse_discontinue(cell: &CellValue) -> bool {
    match cell {
        CellValue::Bool(b) => *b,
        CellValue::Number(n) => *n as i64 != 0,
        other => {
            let Some(text) = other.as_text() else {
                return false;
            };
            match text.to_uppercase().as_str() {
                "1" | "YES" | "Y" | "TRUE" | "DISCONTINUE" | "DISCONTINUED" | "TERMINATED" => {
                    true
                }
                "0" | "NO" | "N" | "FALSE" | "ACTIVE" => false,
                upper => upper.parse::<f64>().map(|n| n as i64 != 0).unwrap_or(false),
            }
        }
    }
}

/// Number of a numeric or numeric-looking cell
pub fn parse_number(cell: &CellValue) -> Option<f64> {
    match cell {
        CellValue::Number(n) => Some(*n),
        CellValue::Text(raw) => clean_string(raw)?.replace(',', "").parse::<f64>().ok(),
        _ => None,
    }
    .filter(|n| n.is_finite())
}

/// Whole part, clamped at zero; `None` when not numeric
pub fn parse_dependents(cell: &CellValue) -> Option<u32> {
    parse_number(cell).map(|n| n.trunc().clamp(0.0, u32::MAX as f64) as u32)
}
