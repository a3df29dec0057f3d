use std::collections::{BTreeMap, HashMap, HashSet};
use chrono::NaiveDate;
use crate::error::AppError;
use crate::models::{
    AnalysisOutcome, DailyCount, ProfileViewSummary, RankedCount, Ranking, Record, Sheet,
    SkipReason, TOP_RANKINGS,
};
use crate::services::columns::{
    ColumnResolver, COMPANY_COLUMN, JOB_TITLE_COLUMN, PROFILE_VIEWER_COLUMN,
};
use crate::services::excel::utils::coerce_date;

pub struct ProfileViewAnalyzer;

impl ProfileViewAnalyzer {
    pub fn analyze(&self, sheet: &Sheet) -> Result<AnalysisOutcome, AppError> {
        if sheet.is_empty() {
            tracing::info!("Sheet {} has no profile view rows", sheet.name);
            return Ok(AnalysisOutcome::Skipped(SkipReason::NoData));
        }

        let resolver = ColumnResolver::new(&sheet.headers);
        let date_column = resolver.require_date_column(&sheet.name)?;
        tracing::debug!("Using {} as the date column of {}", date_column, sheet.name);

        let (views_by_date, undated_views) = views_by_date(&sheet.records, date_column);
        if undated_views > 0 {
            tracing::warn!(
                "{} rows in {} have an unreadable {} value and are left out of the trend",
                undated_views,
                sheet.name,
                date_column
            );
        }

        let unique_viewers = resolver
            .exact(PROFILE_VIEWER_COLUMN)
            .map(|column| distinct_count(&sheet.records, column));

        let top_companies = resolver
            .exact(COMPANY_COLUMN)
            .map(|column| top_values(&sheet.records, column, TOP_RANKINGS));

        let top_job_titles = resolver
            .exact(JOB_TITLE_COLUMN)
            .map(|column| top_values(&sheet.records, column, TOP_RANKINGS));

        Ok(AnalysisOutcome::ProfileViews(ProfileViewSummary {
            total_views: sheet.len(),
            unique_viewers,
            date_column: date_column.to_string(),
            views_by_date,
            undated_views,
            top_companies,
            top_job_titles,
        }))
    }
}

/// Views per calendar date in date order, plus the number of rows whose
/// date could not be read.
pub fn views_by_date(records: &[Record], date_column: &str) -> (Vec<DailyCount>, usize) {
    let mut counts: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    let mut undated = 0;

    for record in records {
        match coerce_date(record.value(date_column)) {
            Some(date) => *counts.entry(date).or_insert(0) += 1,
            None => undated += 1,
        }
    }

    let series = counts
        .into_iter()
        .map(|(date, views)| DailyCount { date, views })
        .collect();
    (series, undated)
}

pub fn distinct_count(records: &[Record], column: &str) -> usize {
    records
        .iter()
        .filter_map(|record| record.value(column).label())
        .collect::<HashSet<_>>()
        .len()
}

/// Most frequent values, descending. Equal counts keep first-seen order.
pub fn top_values(records: &[Record], column: &str, limit: usize) -> Ranking {
    let mut order: Vec<RankedCount> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for label in records.iter().filter_map(|record| record.value(column).label()) {
        match index.get(&label) {
            Some(&pos) => order[pos].count += 1,
            None => {
                index.insert(label.clone(), order.len());
                order.push(RankedCount { label, count: 1 });
            }
        }
    }

    order.sort_by(|a, b| b.count.cmp(&a.count));
    order.into_iter().take(limit).collect()
}
