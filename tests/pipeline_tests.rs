//! End-to-end runs over workbooks generated on the fly.

use pretty_assertions::assert_eq;
use profile_analytics::models::{AnalysisOutcome, SkipReason};
use profile_analytics::services::excel::SheetLoader;
use profile_analytics::services::pipeline::SheetResult;
use profile_analytics::{AppError, Config, Pipeline, RunReport};
use rust_xlsxwriter::{ExcelDateTime, Format, Workbook};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

// ═══════════════════════════════════════════════════════════════════════════
// FIXTURES
// ═══════════════════════════════════════════════════════════════════════════

enum Cell {
    Text(&'static str),
    Number(f64),
    Date(u16, u8, u8),
    Blank,
}

use Cell::{Blank, Date, Number, Text};

struct SheetFixture {
    name: &'static str,
    headers: Vec<&'static str>,
    rows: Vec<Vec<Cell>>,
}

fn write_workbook(path: &Path, sheets: &[SheetFixture]) {
    let mut workbook = Workbook::new();
    let date_format = Format::new().set_num_format("yyyy-mm-dd");

    for fixture in sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(fixture.name).unwrap();
        for (col, header) in fixture.headers.iter().enumerate() {
            worksheet.write_string(0, col as u16, *header).unwrap();
        }
        for (r, row) in fixture.rows.iter().enumerate() {
            let r = r as u32 + 1;
            for (c, cell) in row.iter().enumerate() {
                let c = c as u16;
                match cell {
                    Text(s) => {
                        worksheet.write_string(r, c, *s).unwrap();
                    }
                    Number(n) => {
                        worksheet.write_number(r, c, *n).unwrap();
                    }
                    Date(y, m, d) => {
                        let date = ExcelDateTime::from_ymd(*y, *m, *d).unwrap();
                        worksheet.write_datetime_with_format(r, c, &date, &date_format).unwrap();
                    }
                    Blank => {}
                }
            }
        }
    }

    workbook.save(path).unwrap();
}

fn profile_sheet() -> SheetFixture {
    SheetFixture {
        name: "Profile Views",
        headers: vec!["Date", "Profile viewer", "Company", "Job title"],
        rows: vec![
            vec![Date(2024, 1, 1), Text("A"), Text("Acme"), Text("Engineer")],
            vec![Date(2024, 1, 1), Text("B"), Text("Initech"), Text("Recruiter")],
            vec![Date(2024, 1, 2), Text("A"), Text("Acme"), Text("Engineer")],
        ],
    }
}

fn posts_sheet() -> SheetFixture {
    SheetFixture {
        name: "Posts",
        headers: vec!["Date", "Content", "Likes", "Comments", "Followers"],
        rows: vec![
            vec![Date(2024, 1, 3), Text("Shipping the new release"), Number(10.0), Number(5.0), Number(400.0)],
            vec![Date(2024, 1, 5), Text("Weekend reading list"), Number(2.0), Number(1.0), Number(410.0)],
        ],
    }
}

fn run(config: Config) -> (RunReport, String) {
    let mut out = Vec::new();
    let report = Pipeline::new(config).run(&mut out).unwrap();
    (report, String::from_utf8(out).unwrap())
}

fn fixture(dir: &TempDir, sheets: &[SheetFixture]) -> PathBuf {
    let path = dir.path().join("analytics.xlsx");
    write_workbook(&path, sheets);
    path
}

// ═══════════════════════════════════════════════════════════════════════════
// LOADING
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_loader_keeps_every_sheet_in_order() {
    let dir = TempDir::new().unwrap();
    let extra = SheetFixture {
        name: "Followers",
        headers: vec!["Date", "New followers"],
        rows: vec![vec![Date(2024, 1, 1), Number(3.0)]],
    };
    let path = fixture(&dir, &[posts_sheet(), extra, profile_sheet()]);

    let workbook = SheetLoader.load(&path).unwrap();
    assert_eq!(workbook.len(), 3);
    assert_eq!(workbook.sheet_names(), vec!["Posts", "Followers", "Profile Views"]);
    assert_eq!(workbook.get("Profile Views").unwrap().len(), 3);
    assert_eq!(workbook.get("Posts").unwrap().headers.len(), 5);
}

#[test]
fn test_loader_rejects_non_workbook_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("analytics.xlsx");
    std::fs::write(&path, "Date,Viewer\n2024-01-01,A\n").unwrap();

    let err = SheetLoader.load(&path).unwrap_err();
    assert!(matches!(err, AppError::LoadError(_)));
}

// ═══════════════════════════════════════════════════════════════════════════
// FULL RUNS
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_profile_and_posts_report() {
    let dir = TempDir::new().unwrap();
    let path = fixture(&dir, &[profile_sheet(), posts_sheet()]);
    let config = Config::default()
        .with_input(&path)
        .with_output_dir(dir.path())
        .without_charts();

    let (report, text) = run(config);

    assert!(report.loaded);
    assert_eq!(report.sheets.len(), 2);
    assert!(report.charts.is_empty());

    match &report.sheets[0].result {
        SheetResult::Analyzed { outcome: AnalysisOutcome::ProfileViews(summary) } => {
            assert_eq!(summary.total_views, 3);
            assert_eq!(summary.unique_viewers, Some(2));
            let series: Vec<(String, usize)> = summary
                .views_by_date
                .iter()
                .map(|d| (d.date.to_string(), d.views))
                .collect();
            assert_eq!(
                series,
                vec![("2024-01-01".to_string(), 2), ("2024-01-02".to_string(), 1)]
            );
            let companies = summary.top_companies.as_ref().unwrap();
            assert_eq!(companies[0].label, "Acme");
            assert_eq!(companies[0].count, 2);
        }
        other => panic!("unexpected profile result: {other:?}"),
    }

    match &report.sheets[1].result {
        SheetResult::Analyzed { outcome: AnalysisOutcome::Engagement(summary) } => {
            assert_eq!(summary.metric_columns, vec!["Likes", "Comments"]);
            assert_eq!(summary.total_engagement, vec![15.0, 3.0]);
            assert_eq!(summary.top_posts[0].row, 0);
            assert_eq!(summary.timeline.len(), 2);
        }
        other => panic!("unexpected posts result: {other:?}"),
    }

    assert!(text.starts_with("LinkedIn Analytics Data Analyzer\n"));
    assert!(text.contains("Loaded sheet: Profile Views with 3 rows"));
    assert!(text.contains("Loaded sheet: Posts with 2 rows"));
    assert!(text.contains("Analyzing Profile Views..."));
    assert!(text.contains("Total profile views: 3"));
    assert!(text.contains("Unique viewers: 2"));
    assert!(text.contains("Top Companies Viewing Your Profile:"));
    assert!(text.contains("1. Date: 2024-01-03"));
    assert!(text.contains("   Content: Shipping the new release"));
    assert!(text.contains("   Total Engagement: 15"));
    assert!(text.contains("   Breakdown: Likes: 10, Comments: 5"));
    assert!(text.contains("For more advanced analytics"));
    assert!(!text.contains("chart saved"));
}

#[test]
fn test_missing_date_column_fails_only_that_sheet() {
    let dir = TempDir::new().unwrap();
    let no_dates = SheetFixture {
        name: "Profile Viewers",
        headers: vec!["Profile viewer", "Company"],
        rows: vec![vec![Text("A"), Text("Acme")]],
    };
    let path = fixture(&dir, &[no_dates, posts_sheet()]);
    let config = Config::default().with_input(&path).without_charts();

    let (report, text) = run(config);

    match &report.sheets[0].result {
        SheetResult::Failed { error } => assert!(error.contains("no date column")),
        other => panic!("expected failure, got {other:?}"),
    }
    assert!(matches!(
        report.sheets[1].result,
        SheetResult::Analyzed { outcome: AnalysisOutcome::Engagement(_) }
    ));
    assert!(text.contains("Error analyzing Profile Viewers"));
    assert!(text.contains("Your Top 2 Performing Posts:"));
}

#[test]
fn test_unrouted_and_empty_sheets() {
    let dir = TempDir::new().unwrap();
    let followers = SheetFixture {
        name: "Followers",
        headers: vec!["Date", "New followers"],
        rows: vec![vec![Date(2024, 1, 1), Number(3.0)]],
    };
    let empty_posts = SheetFixture {
        name: "Articles",
        headers: vec!["Date", "Likes"],
        rows: vec![vec![Blank, Blank]],
    };
    let path = fixture(&dir, &[followers, empty_posts]);
    let (report, text) = run(Config::default().with_input(&path).without_charts());

    assert!(matches!(
        report.sheets[0].result,
        SheetResult::Analyzed { outcome: AnalysisOutcome::Skipped(SkipReason::Unrouted) }
    ));
    assert!(matches!(
        report.sheets[1].result,
        SheetResult::Analyzed { outcome: AnalysisOutcome::Skipped(SkipReason::NoData) }
    ));
    assert!(text.contains("No post engagement data available for analysis."));
}

#[test]
fn test_missing_file_stops_before_analysis() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope.xlsx");
    let config = Config::default()
        .with_input(&missing)
        .with_output_dir(dir.path())
        .with_summary_json(dir.path().join("summary.json"));

    let (report, text) = run(config);

    assert!(!report.loaded);
    assert!(report.sheets.is_empty());
    assert!(report.charts.is_empty());
    assert!(text.contains("not found."));
    assert!(text.contains("Could not load analytics data. Please check the file path."));
    assert!(!text.contains("Analyzing"));
    assert!(!text.contains("powered by a basic implementation"));
    assert!(!dir.path().join("profile_views_trend.png").exists());
    assert!(!dir.path().join("post_engagement_trend.png").exists());
    assert!(!dir.path().join("summary.json").exists());
}

#[test]
fn test_corrupt_file_reports_load_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.xlsx");
    std::fs::write(&path, b"PK\x03\x04 truncated").unwrap();

    let (report, text) = run(Config::default().with_input(&path).with_output_dir(dir.path()));

    assert!(!report.loaded);
    assert!(text.contains("Error loading data:"));
    assert!(!dir.path().join("profile_views_trend.png").exists());
}

#[test]
fn test_summary_json_lists_each_sheet() {
    let dir = TempDir::new().unwrap();
    let path = fixture(&dir, &[profile_sheet(), posts_sheet()]);
    let json_path = dir.path().join("summary.json");
    let config = Config::default()
        .with_input(&path)
        .without_charts()
        .with_summary_json(&json_path);

    run(config);

    let raw = std::fs::read_to_string(&json_path).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value["loaded"], serde_json::json!(true));
    let sheets = value["sheets"].as_array().unwrap();
    assert_eq!(sheets.len(), 2);
    assert_eq!(sheets[0]["sheet"], "Profile Views");
    assert_eq!(sheets[0]["status"], "analyzed");
    assert_eq!(sheets[0]["outcome"]["kind"], "profile_views");
    assert_eq!(sheets[0]["outcome"]["summary"]["total_views"], 3);
    assert_eq!(sheets[1]["outcome"]["summary"]["total_engagement"], serde_json::json!([15.0, 3.0]));
}

// ═══════════════════════════════════════════════════════════════════════════
// CHARTS
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_charts_written_to_output_dir() {
    let dir = TempDir::new().unwrap();
    let path = fixture(&dir, &[profile_sheet(), posts_sheet()]);
    let charts_dir = dir.path().join("charts");
    std::fs::create_dir(&charts_dir).unwrap();
    let config = Config::default().with_input(&path).with_output_dir(&charts_dir);

    let (report, text) = run(config);

    let profile_png = charts_dir.join("profile_views_trend.png");
    let engagement_png = charts_dir.join("post_engagement_trend.png");
    assert_eq!(report.charts, vec![profile_png.clone(), engagement_png.clone()]);
    assert!(std::fs::metadata(&profile_png).unwrap().len() > 0);
    assert!(std::fs::metadata(&engagement_png).unwrap().len() > 0);
    assert!(text.contains("Profile views trend chart saved as 'profile_views_trend.png'"));
    assert!(text.contains("Post engagement trend chart saved as 'post_engagement_trend.png'"));
    assert!(!text.contains("Error"));
}

#[test]
fn test_unreadable_dates_skip_charts_without_errors() {
    let dir = TempDir::new().unwrap();
    let profile = SheetFixture {
        name: "Profile Views",
        headers: vec!["Date", "Profile viewer"],
        rows: vec![vec![Text("sometime"), Text("A")], vec![Text("later"), Text("B")]],
    };
    let posts = SheetFixture {
        name: "Posts",
        headers: vec!["Date", "Content", "Likes"],
        rows: vec![vec![Text("garbage"), Text("Hello"), Number(3.0)]],
    };
    let path = fixture(&dir, &[profile, posts]);
    let config = Config::default().with_input(&path).with_output_dir(dir.path());

    let (report, text) = run(config);

    assert!(report.charts.is_empty());
    assert!(!dir.path().join("profile_views_trend.png").exists());
    assert!(!dir.path().join("post_engagement_trend.png").exists());
    assert!(!text.contains("Error"));
    assert!(!text.contains("chart saved"));
    assert!(text.contains("Total profile views: 2"));
    assert!(text.contains("   Total Engagement: 3"));
}
