use std::fmt::Write as _;
use crate::models::{format_number, EngagementSummary, ProfileViewSummary, Ranking, Workbook};

pub const BANNER_TITLE: &str = "LinkedIn Analytics Data Analyzer";

pub fn banner() -> String {
    format!("{}\n{}\n", BANNER_TITLE, "=".repeat(BANNER_TITLE.len() - 1))
}

pub fn loaded_sheets(workbook: &Workbook) -> String {
    workbook
        .iter()
        .map(|sheet| format!("Loaded sheet: {} with {} rows\n", sheet.name, sheet.len()))
        .collect()
}

pub fn load_failure(diagnostic: &str) -> String {
    format!("{}\nCould not load analytics data. Please check the file path.\n", diagnostic)
}

pub fn analyzing(sheet_name: &str) -> String {
    format!("\n\nAnalyzing {}...\n", sheet_name)
}

/// Label/count pairs, labels padded to a common width.
pub fn ranking(title: &str, column: &str, ranking: &Ranking) -> String {
    let mut out = format!("\n{}:\n{}\n", title, column);
    let width = ranking.iter().map(|r| r.label.chars().count()).max().unwrap_or(0);
    for entry in ranking {
        let _ = writeln!(out, "{:<width$}    {}", entry.label, entry.count, width = width);
    }
    out
}

pub fn profile_views(summary: &ProfileViewSummary) -> String {
    let mut out = String::new();
    if let Some(companies) = &summary.top_companies {
        out.push_str(&ranking("Top Companies Viewing Your Profile", "Company", companies));
    }
    if let Some(titles) = &summary.top_job_titles {
        out.push_str(&ranking("Top Job Titles Viewing Your Profile", "Job title", titles));
    }
    let unique = summary
        .unique_viewers
        .map(|n| n.to_string())
        .unwrap_or_else(|| "N/A".to_string());
    let _ = writeln!(out, "Total profile views: {}", summary.total_views);
    let _ = writeln!(out, "Unique viewers: {}", unique);
    out
}

pub fn top_posts(summary: &EngagementSummary) -> String {
    if summary.top_posts.is_empty() {
        return String::new();
    }

    let mut out = format!("\nYour Top {} Performing Posts:\n", summary.top_posts.len());
    for post in &summary.top_posts {
        let breakdown = post
            .breakdown
            .iter()
            .map(|m| format!("{}: {}", m.column, m.value))
            .collect::<Vec<_>>()
            .join(", ");
        let _ = writeln!(out, "{}. Date: {}", post.rank, post.date.as_deref().unwrap_or("N/A"));
        let _ = writeln!(out, "   Content: {}", post.content);
        let _ = writeln!(out, "   Total Engagement: {}", format_number(post.total_engagement));
        let _ = writeln!(out, "   Breakdown: {}", breakdown);
        out.push('\n');
    }
    out
}

pub fn chart_saved(description: &str, file_name: &str) -> String {
    format!("{} chart saved as '{}'\n", description, file_name)
}

pub fn closing() -> String {
    "\n\nThis analysis is powered by a basic implementation.\n\
     For more advanced analytics, visit Professional Profile Analytics (PPA).\n"
        .to_string()
}
