use chrono::{NaiveDate, NaiveDateTime, Timelike};
use serde::Serialize;
use smallvec::SmallVec;
use std::collections::HashMap;
use std::fmt;

pub const TOP_RANKINGS: usize = 10;
pub const TOP_POSTS: usize = 5;

static EMPTY: CellValue = CellValue::Empty;

/// One scalar cell as loaded from a sheet.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    #[default]
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    Date(NaiveDateTime),
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Text used when counting distinct values. Empty cells have none.
    pub fn label(&self) -> Option<String> {
        match self {
            CellValue::Empty => None,
            other => Some(other.to_string()),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => write!(f, "N/A"),
            CellValue::Text(s) => write!(f, "{}", s),
            CellValue::Number(n) => write!(f, "{}", format_number(*n)),
            CellValue::Bool(b) => write!(f, "{}", b),
            CellValue::Date(dt) if dt.num_seconds_from_midnight() == 0 => {
                write!(f, "{}", dt.format("%Y-%m-%d"))
            }
            CellValue::Date(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
        }
    }
}

/// Whole numbers print without a fractional part.
pub fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

/// One row, keyed by column header.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    values: HashMap<String, CellValue>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, column: impl Into<String>, value: CellValue) {
        self.values.insert(column.into(), value);
    }

    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.values.get(column)
    }

    /// Like `get`, but a missing column reads as an empty cell.
    pub fn value(&self, column: &str) -> &CellValue {
        self.values.get(column).unwrap_or(&EMPTY)
    }

    pub fn is_blank(&self) -> bool {
        self.values.values().all(CellValue::is_empty)
    }
}

impl<K: Into<String>> FromIterator<(K, CellValue)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, CellValue)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (column, value) in iter {
            record.insert(column, value);
        }
        record
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sheet {
    pub name: String,
    pub headers: Vec<String>,
    pub records: Vec<Record>,
}

impl Sheet {
    pub fn new(name: impl Into<String>, headers: Vec<String>, records: Vec<Record>) -> Self {
        Self {
            name: name.into(),
            headers,
            records,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Sheets in the order the workbook enumerates them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Workbook {
    sheets: Vec<Sheet>,
}

impl Workbook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, sheet: Sheet) {
        self.sheets.push(sheet);
    }

    pub fn len(&self) -> usize {
        self.sheets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name == name)
    }

    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name.as_str()).collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Sheet> {
        self.sheets.iter()
    }
}

impl<'a> IntoIterator for &'a Workbook {
    type Item = &'a Sheet;
    type IntoIter = std::slice::Iter<'a, Sheet>;

    fn into_iter(self) -> Self::IntoIter {
        self.sheets.iter()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedCount {
    pub label: String,
    pub count: usize,
}

pub type Ranking = SmallVec<[RankedCount; TOP_RANKINGS]>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DailyCount {
    pub date: NaiveDate,
    pub views: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileViewSummary {
    pub total_views: usize,
    /// `None` when the sheet has no "Profile viewer" column.
    pub unique_viewers: Option<usize>,
    pub date_column: String,
    pub views_by_date: Vec<DailyCount>,
    /// Rows whose date value could not be read; they still count as views.
    pub undated_views: usize,
    pub top_companies: Option<Ranking>,
    pub top_job_titles: Option<Ranking>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricValue {
    pub column: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopPost {
    pub rank: usize,
    pub row: usize,
    pub date: Option<String>,
    pub content: String,
    pub total_engagement: f64,
    pub breakdown: Vec<MetricValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricSeries {
    pub column: String,
    pub points: Vec<(NaiveDate, f64)>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EngagementSummary {
    pub metric_columns: Vec<String>,
    /// Per-record sum of the metric columns, in sheet order.
    pub total_engagement: Vec<f64>,
    pub top_posts: Vec<TopPost>,
    /// Empty unless the sheet has a "Date" column and at least one metric.
    pub timeline: Vec<MetricSeries>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    NoData,
    Unrouted,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NoData => write!(f, "no data available for analysis"),
            SkipReason::Unrouted => write!(f, "sheet name matches no known analysis"),
        }
    }
}

/// What analyzing a single sheet produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "summary", rename_all = "snake_case")]
pub enum AnalysisOutcome {
    ProfileViews(ProfileViewSummary),
    Engagement(EngagementSummary),
    Skipped(SkipReason),
}
