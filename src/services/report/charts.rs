use std::path::{Path, PathBuf};
use chrono::{Duration, NaiveDate};
use plotters::prelude::*;
use crate::error::AppError;
use crate::models::{EngagementSummary, ProfileViewSummary};

pub const PROFILE_VIEWS_CHART: &str = "profile_views_trend.png";
pub const POST_ENGAGEMENT_CHART: &str = "post_engagement_trend.png";

#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub label: String,
    pub points: Vec<(NaiveDate, f64)>,
}

/// Value range the axes are built from. X is measured in days from `start`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartBounds {
    pub start: NaiveDate,
    pub span_days: i64,
    pub y_max: f64,
}

/// A date/value line chart. Each render call owns its own drawing area.
#[derive(Debug, Clone)]
pub struct LineChart {
    title: String,
    x_label: String,
    y_label: String,
    size: (u32, u32),
    series: Vec<ChartSeries>,
    legend: bool,
}

impl LineChart {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            x_label: "Date".to_string(),
            y_label: String::new(),
            size: (1200, 600),
            series: Vec::new(),
            legend: false,
        }
    }

    pub fn axis_labels(mut self, x: impl Into<String>, y: impl Into<String>) -> Self {
        self.x_label = x.into();
        self.y_label = y.into();
        self
    }

    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.size = (width, height);
        self
    }

    pub fn legend(mut self, show: bool) -> Self {
        self.legend = show;
        self
    }

    pub fn series(mut self, label: impl Into<String>, points: Vec<(NaiveDate, f64)>) -> Self {
        self.series.push(ChartSeries {
            label: label.into(),
            points,
        });
        self
    }

    pub fn profile_views(summary: &ProfileViewSummary) -> Self {
        let points = summary
            .views_by_date
            .iter()
            .map(|day| (day.date, day.views as f64))
            .collect();
        LineChart::new("LinkedIn Profile Views Over Time")
            .axis_labels("Date", "Number of Views")
            .series("Views", points)
    }

    /// `None` when the sheet had no dated metrics to plot.
    pub fn post_engagement(summary: &EngagementSummary) -> Option<Self> {
        if summary.timeline.is_empty() {
            return None;
        }
        let chart = summary.timeline.iter().fold(
            LineChart::new("LinkedIn Post Engagement Over Time")
                .axis_labels("Date", "Engagement Count")
                .size(1400, 700)
                .legend(true),
            |chart, metric| chart.series(metric.column.clone(), metric.points.clone()),
        );
        Some(chart)
    }

    pub fn bounds(&self) -> Option<ChartBounds> {
        let mut points = self.series.iter().flat_map(|s| s.points.iter());
        let first = points.next()?;
        let (mut start, mut end, mut y_max) = (first.0, first.0, first.1);
        for (date, value) in points {
            start = start.min(*date);
            end = end.max(*date);
            y_max = y_max.max(*value);
        }
        Some(ChartBounds {
            start,
            span_days: (end - start).num_days(),
            y_max,
        })
    }

    pub fn render(&self, path: &Path) -> Result<(), AppError> {
        let chart_name = path.display().to_string();
        let bounds = self.bounds().ok_or_else(|| AppError::Render {
            chart: chart_name.clone(),
            message: "no data points to plot".to_string(),
        })?;

        self.draw(path, bounds).map_err(|e| AppError::Render {
            chart: chart_name,
            message: e.to_string(),
        })
    }

    fn draw(&self, path: &Path, bounds: ChartBounds) -> Result<(), Box<dyn std::error::Error>> {
        let root = BitMapBackend::new(path, self.size).into_drawing_area();
        root.fill(&WHITE)?;

        // Pad so single-day and all-zero series still get a usable axis.
        let x_max = bounds.span_days.max(1);
        let y_max = if bounds.y_max > 0.0 { bounds.y_max * 1.1 } else { 1.0 };

        let mut chart = ChartBuilder::on(&root)
            .caption(&self.title, ("sans-serif", 28))
            .margin(15)
            .x_label_area_size(45)
            .y_label_area_size(60)
            .build_cartesian_2d(0i64..x_max, 0f64..y_max)?;

        let start = bounds.start;
        let date_label = |offset: &i64| (start + Duration::days(*offset)).format("%Y-%m-%d").to_string();

        chart
            .configure_mesh()
            .x_desc(self.x_label.as_str())
            .y_desc(self.y_label.as_str())
            .x_label_formatter(&date_label)
            .light_line_style(BLACK.mix(0.05))
            .bold_line_style(BLACK.mix(0.3))
            .draw()?;

        for (idx, series) in self.series.iter().enumerate() {
            let color = Palette99::pick(idx).mix(1.0);
            let points: Vec<(i64, f64)> = series
                .points
                .iter()
                .map(|(date, value)| ((*date - start).num_days(), *value))
                .collect();

            chart
                .draw_series(LineSeries::new(points.iter().copied(), color.stroke_width(2)))?
                .label(series.label.as_str())
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));

            chart.draw_series(
                points
                    .iter()
                    .map(|point| Circle::new(*point, 4, color.filled())),
            )?;
        }

        if self.legend {
            chart
                .configure_series_labels()
                .background_style(WHITE.mix(0.8))
                .border_style(BLACK)
                .draw()?;
        }

        root.present()?;
        Ok(())
    }
}

/// Writes the fixed-name chart files into one output directory.
#[derive(Debug, Clone)]
pub struct ReportRenderer {
    output_dir: PathBuf,
}

impl ReportRenderer {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn chart_path(&self, file_name: &str) -> PathBuf {
        self.output_dir.join(file_name)
    }

    /// `Ok(None)` when no view carried a readable date.
    pub fn render_profile_views(&self, summary: &ProfileViewSummary) -> Result<Option<PathBuf>, AppError> {
        if summary.views_by_date.is_empty() {
            tracing::warn!(
                "No readable dates in column {}; skipping profile views chart",
                summary.date_column
            );
            return Ok(None);
        }
        let path = self.chart_path(PROFILE_VIEWS_CHART);
        LineChart::profile_views(summary).render(&path)?;
        tracing::info!("Wrote {}", path.display());
        Ok(Some(path))
    }

    pub fn render_engagement(&self, summary: &EngagementSummary) -> Result<Option<PathBuf>, AppError> {
        let Some(chart) = LineChart::post_engagement(summary) else {
            tracing::debug!("No dated engagement metrics; skipping engagement chart");
            return Ok(None);
        };
        let path = self.chart_path(POST_ENGAGEMENT_CHART);
        chart.render(&path)?;
        tracing::info!("Wrote {}", path.display());
        Ok(Some(path))
    }
}
