use cfo_copilot::{
    chart::JsonChartRenderer, config::CopilotConfig, ingest, Copilot, MetricResult,
};
use clap::Parser;
use std::io::{self, BufRead};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "copilot",
    about = "Answer questions about actuals, budget, cash and FX statements."
)]
struct Cli {
    /// Questions to answer; reads one per stdin line when none are given
    queries: Vec<String>,

    /// Directory holding actuals.csv, budget.csv, cash.csv and fx.csv
    /// (overrides COPILOT_DATA_DIR)
    #[arg(long = "data-dir")]
    data_dir: Option<PathBuf>,

    /// Write chart payloads here as chart-<n>.json (overrides COPILOT_CHART_DIR)
    #[arg(long = "chart-dir")]
    chart_dir: Option<PathBuf>,

    /// Year assumed when a question names a month without one
    /// (overrides COPILOT_REFERENCE_YEAR)
    #[arg(long = "reference-year")]
    reference_year: Option<i32>,
}

impl Cli {
    /// Flags win over environment values.
    fn apply(&self, mut config: CopilotConfig) -> CopilotConfig {
        if let Some(dir) = &self.data_dir {
            config.data_dir = dir.clone();
        }
        if let Some(dir) = &self.chart_dir {
            config.chart_dir = Some(dir.clone());
        }
        if let Some(year) = self.reference_year {
            config.reference_year = year;
        }
        config
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize tracing; stdout is reserved for answers
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let config = cli.apply(CopilotConfig::from_env()?);
    info!(
        data_dir = %config.data_dir.display(),
        reference_year = config.reference_year,
        fx_fallback = ?config.fx_fallback,
        "CFO Copilot starting"
    );

    let tables = ingest::load_dir(&config.data_dir)?;
    let copilot = Copilot::from_tables(tables, &config, Arc::new(JsonChartRenderer))?;

    let mut answered = 0usize;

    if cli.queries.is_empty() {
        for line in io::stdin().lock().lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            answered += 1;
            respond(&copilot, &config, &line, answered)?;
        }
    } else {
        for query in &cli.queries {
            answered += 1;
            respond(&copilot, &config, query, answered)?;
        }
    }

    Ok(())
}

fn respond(
    copilot: &Copilot,
    config: &CopilotConfig,
    query: &str,
    n: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    let MetricResult { text, chart } = copilot.answer(query);

    println!("{}\n", text);

    if let Some(chart) = chart {
        match &config.chart_dir {
            Some(dir) => {
                let path = write_chart(dir, n, &chart.bytes)?;
                println!("(chart: {})\n", path);
            }
            None => warn!("Chart produced but no chart directory is set; skipping"),
        }
    }

    Ok(())
}

fn write_chart(dir: &Path, n: usize, bytes: &[u8]) -> io::Result<String> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(format!("chart-{}.json", n));
    std::fs::write(&path, bytes)?;
    Ok(path.display().to_string())
}
