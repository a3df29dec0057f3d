use crate::error::AppError;
use crate::models::{
    AnalysisOutcome, CellValue, EngagementSummary, MetricSeries, MetricValue, Record, Sheet, SkipReason,
    TopPost, TOP_POSTS,
};
use crate::services::columns::{ColumnResolver, CONTENT_COLUMN, DATE_COLUMN, POST_COLUMN};
use crate::services::excel::utils::{coerce_date, coerce_metric};

/// Content previews are cut after this many characters (Unicode scalar values).
pub const CONTENT_PREVIEW_CHARS: usize = 100;

pub struct EngagementAnalyzer;

impl EngagementAnalyzer {
    pub fn analyze(&self, sheet: &Sheet) -> Result<AnalysisOutcome, AppError> {
        if sheet.is_empty() {
            tracing::info!("Sheet {} has no post rows", sheet.name);
            return Ok(AnalysisOutcome::Skipped(SkipReason::NoData));
        }

        let resolver = ColumnResolver::new(&sheet.headers);
        let metric_columns = resolver.engagement_columns();
        if metric_columns.is_empty() {
            tracing::info!("Sheet {} has no engagement metric columns", sheet.name);
        } else {
            tracing::debug!("Engagement columns for {}: {:?}", sheet.name, metric_columns);
        }

        let total_engagement: Vec<f64> = sheet
            .records
            .iter()
            .enumerate()
            .map(|(row, record)| row_total(&sheet.name, row, record, &metric_columns))
            .collect();

        let top_posts = if metric_columns.is_empty() {
            Vec::new()
        } else {
            let content_column = resolver.first_present(&[CONTENT_COLUMN, POST_COLUMN]);
            let date_column = resolver.exact(DATE_COLUMN);
            top_rows(&total_engagement, TOP_POSTS)
                .into_iter()
                .enumerate()
                .map(|(idx, row)| {
                    let record = &sheet.records[row];
                    TopPost {
                        rank: idx + 1,
                        row,
                        date: date_column.map(|column| display_date(record.value(column))),
                        content: content_column
                            .and_then(|column| record.value(column).label())
                            .map(|text| content_preview(&text, CONTENT_PREVIEW_CHARS))
                            .unwrap_or_else(|| "N/A".to_string()),
                        total_engagement: total_engagement[row],
                        breakdown: metric_columns
                            .iter()
                            .map(|column| MetricValue {
                                column: column.to_string(),
                                value: record.value(column).to_string(),
                            })
                            .collect(),
                    }
                })
                .collect()
        };

        let timeline = match resolver.exact(DATE_COLUMN) {
            Some(date_column) if !metric_columns.is_empty() => {
                metric_timeline(&sheet.records, date_column, &metric_columns)
            }
            _ => Vec::new(),
        };

        Ok(AnalysisOutcome::Engagement(EngagementSummary {
            metric_columns: metric_columns.iter().map(|c| c.to_string()).collect(),
            total_engagement,
            top_posts,
            timeline,
        }))
    }
}

fn row_total(sheet: &str, row: usize, record: &Record, metric_columns: &[&str]) -> f64 {
    metric_columns
        .iter()
        .map(|column| {
            let value = record.value(column);
            coerce_metric(value).unwrap_or_else(|| {
                tracing::warn!(
                    "Non-numeric {} value {:?} in {} row {}; counting it as 0",
                    column,
                    value.to_string(),
                    sheet,
                    row + 1
                );
                0.0
            })
        })
        .sum()
}

fn display_date(value: &CellValue) -> String {
    match coerce_date(value) {
        Some(date) => date.format("%Y-%m-%d").to_string(),
        None => value.to_string(),
    }
}

/// Row indices of the `limit` largest totals, descending. Ties keep sheet order.
pub fn top_rows(totals: &[f64], limit: usize) -> Vec<usize> {
    let mut rows: Vec<usize> = (0..totals.len()).collect();
    rows.sort_by(|&a, &b| totals[b].total_cmp(&totals[a]));
    rows.truncate(limit);
    rows
}

/// First `max_chars` characters followed by `...`, cut or not.
pub fn content_preview(text: &str, max_chars: usize) -> String {
    let end = text
        .char_indices()
        .nth(max_chars)
        .map_or(text.len(), |(byte_idx, _)| byte_idx);
    format!("{}...", &text[..end])
}

/// One series per metric column, points ordered by date. Rows without a
/// readable date are left out, and no series at all come back when none
/// of the rows has one.
pub fn metric_timeline(records: &[Record], date_column: &str, metric_columns: &[&str]) -> Vec<MetricSeries> {
    let mut dated: Vec<(chrono::NaiveDate, &Record)> = records
        .iter()
        .filter_map(|record| coerce_date(record.value(date_column)).map(|date| (date, record)))
        .collect();
    let skipped = records.len() - dated.len();
    if skipped > 0 {
        tracing::warn!("{} posts have no readable {} and are left out of the timeline", skipped, date_column);
    }
    if dated.is_empty() {
        return Vec::new();
    }
    dated.sort_by_key(|(date, _)| *date);

    metric_columns
        .iter()
        .map(|column| MetricSeries {
            column: column.to_string(),
            points: dated
                .iter()
                .map(|(date, record)| (*date, coerce_metric(record.value(column)).unwrap_or(0.0)))
                .collect(),
        })
        .collect()
}
