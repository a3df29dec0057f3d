use std::collections::HashSet;
use calamine::Data;
use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;
use crate::models::CellValue;

const DATETIME_FORMATS: [&str; 7] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M:%S",
    "%Y/%m/%d %H:%M:%S",
];

// Month-first wins when a value is valid both ways.
const DATE_FORMATS: [&str; 5] = [
    "%Y-%m-%d",
    "%m/%d/%Y",
    "%d/%m/%Y",
    "%Y/%m/%d",
    "%d-%m-%Y",
];

static NUMERIC_TEXT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?(\d{1,3}(,\d{3})+|\d+)?(\.\d+)?$").expect("numeric pattern is valid")
});

/// Header names for the first row. Blank headers become `Unnamed: <idx>`,
/// repeated ones get `.1`, `.2`, ... suffixes.
pub fn unique_headers(row: &[Data]) -> Vec<String> {
    let mut existing_names = HashSet::new();
    row.iter()
        .enumerate()
        .map(|(idx, cell)| {
            let base_name = match cell {
                Data::Empty => format!("Unnamed: {}", idx),
                other => {
                    let name = other.to_string();
                    if name.trim().is_empty() {
                        format!("Unnamed: {}", idx)
                    } else {
                        name
                    }
                }
            };

            let mut cleaned = base_name.clone();
            let mut counter = 1;
            while !existing_names.insert(cleaned.clone()) {
                cleaned = format!("{}.{}", base_name, counter);
                counter += 1;
            }
            cleaned
        })
        .collect()
}

pub fn cell_value(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Empty,
        Data::String(s) if s.trim().is_empty() => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(d) => match excel_serial_to_datetime(d.as_f64()) {
            Some(dt) => CellValue::Date(dt),
            None => CellValue::Number(d.as_f64()),
        },
        Data::DateTimeIso(s) => match parse_datetime(s) {
            Some(dt) => CellValue::Date(dt),
            None => CellValue::Text(s.clone()),
        },
        Data::Error(e) => {
            tracing::debug!("Treating cell error {} as empty", e);
            CellValue::Empty
        }
        other => CellValue::Text(other.to_string()),
    }
}

/// Excel serial day numbers count from 1899-12-30.
pub fn excel_serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() || serial < 0.0 || serial > 2_958_465.0 {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    let millis = (serial * 86_400_000.0).round() as i64;
    epoch.checked_add_signed(Duration::milliseconds(millis))
}

pub fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }

    for format in DATETIME_FORMATS.iter() {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(dt);
        }
    }

    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(s, format).ok())
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Calendar date of a cell. Bare numbers are read as Excel serials.
pub fn coerce_date(value: &CellValue) -> Option<NaiveDate> {
    match value {
        CellValue::Date(dt) => Some(dt.date()),
        CellValue::Text(s) => parse_datetime(s).map(|dt| dt.date()),
        CellValue::Number(n) => excel_serial_to_datetime(*n).map(|dt| dt.date()),
        CellValue::Empty | CellValue::Bool(_) => None,
    }
}

/// Numeric reading of a metric cell. Empty counts as zero; text that is
/// not a number yields `None`.
pub fn coerce_metric(value: &CellValue) -> Option<f64> {
    match value {
        CellValue::Empty => Some(0.0),
        CellValue::Number(n) => Some(*n),
        CellValue::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        CellValue::Text(s) => {
            let s = s.trim();
            if s.is_empty() || !NUMERIC_TEXT.is_match(s) || s == "+" || s == "-" {
                return None;
            }
            s.replace(',', "").parse::<f64>().ok()
        }
        CellValue::Date(_) => None,
    }
}
