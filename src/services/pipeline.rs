use std::io::Write;
use std::path::PathBuf;
use serde::Serialize;
use crate::config::Config;
use crate::error::AppError;
use crate::models::{AnalysisOutcome, Sheet, SkipReason, Workbook};
use crate::services::engagement::EngagementAnalyzer;
use crate::services::excel::SheetLoader;
use crate::services::profile_views::ProfileViewAnalyzer;
use crate::services::report::{summary, ReportRenderer, POST_ENGAGEMENT_CHART, PROFILE_VIEWS_CHART};

const PROFILE_KEYWORDS: [&str; 2] = ["profile", "view"];
const ENGAGEMENT_KEYWORDS: [&str; 3] = ["post", "article", "engagement"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetKind {
    ProfileViews,
    Engagement,
    Unrouted,
}

impl SheetKind {
    /// Profile keywords are checked first, so "Post views" is a profile sheet.
    pub fn classify(sheet_name: &str) -> Self {
        let lowered = sheet_name.to_lowercase();
        if PROFILE_KEYWORDS.iter().any(|k| lowered.contains(k)) {
            SheetKind::ProfileViews
        } else if ENGAGEMENT_KEYWORDS.iter().any(|k| lowered.contains(k)) {
            SheetKind::Engagement
        } else {
            SheetKind::Unrouted
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SheetResult {
    Analyzed { outcome: AnalysisOutcome },
    Failed { error: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct SheetReport {
    pub sheet: String,
    pub rows: usize,
    #[serde(flatten)]
    pub result: SheetResult,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RunReport {
    pub input: PathBuf,
    pub loaded: bool,
    pub sheets: Vec<SheetReport>,
    pub charts: Vec<PathBuf>,
}

pub struct Pipeline {
    config: Config,
    loader: SheetLoader,
    renderer: ReportRenderer,
}

impl Pipeline {
    pub fn new(config: Config) -> Self {
        let renderer = ReportRenderer::new(config.output_dir.clone());
        Self {
            config,
            loader: SheetLoader,
            renderer,
        }
    }

    /// Runs the whole report, writing the console text to `out`.
    ///
    /// A workbook that cannot be loaded is reported on `out` and yields a
    /// report with `loaded == false`; only failures writing to `out` or the
    /// JSON summary are returned as errors.
    pub fn run<W: Write>(&self, out: &mut W) -> Result<RunReport, AppError> {
        out.write_all(summary::banner().as_bytes())?;

        let mut report = RunReport {
            input: self.config.input_path.clone(),
            ..RunReport::default()
        };

        let workbook = match self.loader.load(&self.config.input_path) {
            Ok(workbook) => workbook,
            Err(e) => {
                tracing::error!("Could not load {}: {}", self.config.input_path.display(), e);
                out.write_all(summary::load_failure(&load_diagnostic(&e)).as_bytes())?;
                return Ok(report);
            }
        };
        report.loaded = true;
        out.write_all(summary::loaded_sheets(&workbook).as_bytes())?;

        self.analyze_workbook(&workbook, out, &mut report)?;

        out.write_all(summary::closing().as_bytes())?;

        if let Some(path) = &self.config.summary_json {
            let file = std::fs::File::create(path)?;
            serde_json::to_writer_pretty(file, &report)?;
            tracing::info!("Wrote run summary to {}", path.display());
        }

        Ok(report)
    }

    fn analyze_workbook<W: Write>(
        &self,
        workbook: &Workbook,
        out: &mut W,
        report: &mut RunReport,
    ) -> Result<(), AppError> {
        for sheet in workbook {
            out.write_all(summary::analyzing(&sheet.name).as_bytes())?;

            let result = match self.analyze_sheet(sheet) {
                Ok(outcome) => {
                    self.present(sheet, &outcome, out, &mut report.charts)?;
                    SheetResult::Analyzed { outcome }
                }
                Err(e) => {
                    tracing::error!("Analysis of sheet {} failed: {}", sheet.name, e);
                    writeln!(out, "Error analyzing {}: {}", sheet.name, e)?;
                    SheetResult::Failed { error: e.to_string() }
                }
            };

            report.sheets.push(SheetReport {
                sheet: sheet.name.clone(),
                rows: sheet.len(),
                result,
            });
        }
        Ok(())
    }

    pub fn analyze_sheet(&self, sheet: &Sheet) -> Result<AnalysisOutcome, AppError> {
        match SheetKind::classify(&sheet.name) {
            SheetKind::ProfileViews => ProfileViewAnalyzer.analyze(sheet),
            SheetKind::Engagement => EngagementAnalyzer.analyze(sheet),
            SheetKind::Unrouted => {
                tracing::debug!("No analysis matches sheet {}", sheet.name);
                Ok(AnalysisOutcome::Skipped(SkipReason::Unrouted))
            }
        }
    }

    /// Charts first, then the text, matching the order the report reads in.
    fn present<W: Write>(
        &self,
        sheet: &Sheet,
        outcome: &AnalysisOutcome,
        out: &mut W,
        charts: &mut Vec<PathBuf>,
    ) -> Result<(), AppError> {
        match outcome {
            AnalysisOutcome::ProfileViews(profile) => {
                if self.config.render_charts {
                    match self.renderer.render_profile_views(profile) {
                        Ok(Some(path)) => {
                            out.write_all(summary::chart_saved("Profile views trend", PROFILE_VIEWS_CHART).as_bytes())?;
                            charts.push(path);
                        }
                        Ok(None) => {}
                        Err(e) => self.chart_failed(out, &e)?,
                    }
                }
                out.write_all(summary::profile_views(profile).as_bytes())?;
            }
            AnalysisOutcome::Engagement(engagement) => {
                out.write_all(summary::top_posts(engagement).as_bytes())?;
                if self.config.render_charts {
                    match self.renderer.render_engagement(engagement) {
                        Ok(Some(path)) => {
                            out.write_all(summary::chart_saved("Post engagement trend", POST_ENGAGEMENT_CHART).as_bytes())?;
                            charts.push(path);
                        }
                        Ok(None) => {}
                        Err(e) => self.chart_failed(out, &e)?,
                    }
                }
            }
            AnalysisOutcome::Skipped(SkipReason::NoData) => {
                let kind = match SheetKind::classify(&sheet.name) {
                    SheetKind::ProfileViews => "profile views",
                    _ => "post engagement",
                };
                writeln!(out, "No {} data available for analysis.", kind)?;
            }
            AnalysisOutcome::Skipped(SkipReason::Unrouted) => {}
        }
        Ok(())
    }

    fn chart_failed<W: Write>(&self, out: &mut W, e: &AppError) -> Result<(), AppError> {
        tracing::error!("{}", e);
        writeln!(out, "Error: {}", e)?;
        Ok(())
    }
}

fn load_diagnostic(e: &AppError) -> String {
    match e {
        AppError::FileNotAccessible { path, .. } => {
            format!("Error: File {} not found.", path.display())
        }
        other => format!("Error loading data: {}", other),
    }
}
