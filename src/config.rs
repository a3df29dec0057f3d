use clap::Parser;
use std::path::PathBuf;

pub const DEFAULT_INPUT_FILE: &str = "LinkedIn_Analytics.xlsx";
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Analyze an exported professional-network analytics workbook.
#[derive(Debug, Parser)]
#[command(name = "profile-analytics", version, about)]
pub struct Cli {
    /// Workbook to analyze
    #[arg(long, short = 'f', env = "ANALYTICS_FILE", default_value = DEFAULT_INPUT_FILE)]
    pub file: PathBuf,

    /// Directory the trend charts are written to
    #[arg(long, short = 'o', env = "ANALYTICS_OUTPUT_DIR", default_value = ".")]
    pub output_dir: PathBuf,

    /// Also write a JSON summary of every analyzed sheet
    #[arg(long, env = "ANALYTICS_SUMMARY_JSON")]
    pub summary_json: Option<PathBuf>,

    /// Print the text report only
    #[arg(long)]
    pub no_charts: bool,

    /// Fallback log filter when RUST_LOG is unset
    #[arg(long, default_value = DEFAULT_LOG_LEVEL)]
    pub log_level: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub input_path: PathBuf,
    pub output_dir: PathBuf,
    pub summary_json: Option<PathBuf>,
    pub render_charts: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from(DEFAULT_INPUT_FILE),
            output_dir: PathBuf::from("."),
            summary_json: None,
            render_charts: true,
        }
    }
}

impl Config {
    /// Built from parsed flags. clap has already folded in the
    /// `ANALYTICS_*` variables, including any loaded from `.env`.
    pub fn new(cli: &Cli) -> Self {
        Self {
            input_path: cli.file.clone(),
            output_dir: cli.output_dir.clone(),
            summary_json: cli.summary_json.clone(),
            render_charts: !cli.no_charts,
        }
    }

    pub fn with_input(mut self, path: impl Into<PathBuf>) -> Self {
        self.input_path = path.into();
        self
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn with_summary_json(mut self, path: impl Into<PathBuf>) -> Self {
        self.summary_json = Some(path.into());
        self
    }

    pub fn without_charts(mut self) -> Self {
        self.render_charts = false;
        self
    }
}
