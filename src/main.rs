use anyhow::Result;
use clap::Parser;
use profile_analytics::config::{Cli, Config};
use profile_analytics::{logging, Pipeline};

fn main() -> Result<()> {
    // .env first so clap's env fallbacks can see it
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    logging::init_logging(&cli.log_level)?;

    let config = Config::new(&cli);
    tracing::info!("Starting analysis of {}", config.input_path.display());

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let report = Pipeline::new(config).run(&mut out)?;

    tracing::info!(
        "Finished: {} sheets analyzed, {} charts written",
        report.sheets.len(),
        report.charts.len()
    );
    Ok(())
}
