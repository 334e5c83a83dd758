//! Forecast weekly sales for every store/product in a CSV file.
//!
//! Usage:
//! ```text
//! forecast_sales --input sales.csv --model sales_model.json --horizon 12
//! forecast_sales --input walmart.csv --model sales_model.json --sales-col Weekly_Sales --json
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use sales_forecast::metrics::per_entity_totals;
use sales_forecast::{load_model, DataLoader, ForecastConfig, RecursiveForecaster};
use std::path::PathBuf;
use tracing::error;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Recursive weekly sales forecasting per store/product")]
struct Args {
    /// Sales CSV file
    #[arg(long)]
    input: PathBuf,

    /// Trained model artifact (JSON)
    #[arg(long)]
    model: PathBuf,

    /// Run configuration (JSON); flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Date column
    #[arg(long)]
    date_col: Option<String>,

    /// Sales column
    #[arg(long)]
    sales_col: Option<String>,

    /// Store/Product column
    #[arg(long)]
    store_col: Option<String>,

    /// Forecast horizon in weeks (4-52)
    #[arg(long)]
    horizon: Option<usize>,

    /// Print the forecast as JSON instead of a table
    #[arg(long)]
    json: bool,
}

fn main() {
    let args = Args::parse();

    let config = match build_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Config error: {e:#}");
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(&args, &config) {
        error!("Fatal error: {e:#}");
        std::process::exit(1);
    }
}

fn build_config(args: &Args) -> Result<ForecastConfig> {
    let mut config = match &args.config {
        Some(path) => ForecastConfig::from_json_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => ForecastConfig::default(),
    };

    if let Some(date) = &args.date_col {
        config.columns.date = date.clone();
    }
    if let Some(sales) = &args.sales_col {
        config.columns.sales = sales.clone();
    }
    if let Some(store) = &args.store_col {
        config.columns.store = store.clone();
    }
    if let Some(horizon) = args.horizon {
        config.horizon = horizon;
    }

    config.validate()?;
    Ok(config)
}

fn run(args: &Args, config: &ForecastConfig) -> Result<()> {
    let data = DataLoader::from_csv(&args.input, &config.columns, &config.date_formats)
        .with_context(|| format!("reading {}", args.input.display()))?;
    let model = load_model(&args.model)
        .with_context(|| format!("loading model {}", args.model.display()))?;

    let forecaster = RecursiveForecaster::from_config(config)?;
    let result = forecaster.forecast_all(data.series(), model.as_ref())?;

    if args.json {
        println!("{}", result.to_json()?);
        return Ok(());
    }

    println!("{}", result.kpis());

    if result.is_empty() {
        println!("No forecast data available.");
    } else {
        println!("{:<12} {:<12} {:>18}", "Store", "Date", "Predicted_Sales");
        for point in result.points() {
            println!(
                "{:<12} {:<12} {:>18.2}",
                point.entity_id, point.date, point.predicted_value
            );
        }

        println!("\nForecast total per store:");
        for (entity, total) in per_entity_totals(&result) {
            println!("  {:<12} {:>18.2}", entity, total);
        }
    }

    if !result.skipped().is_empty() {
        println!("\nSkipped:");
        for skipped in result.skipped() {
            println!("  {}", skipped);
        }
    }

    if let Some(importances) = model.feature_importances() {
        println!("\nFeature importance ({}):", model.name());
        for item in importances {
            println!("  {:<14} {:.4}", item.feature, item.importance);
        }
    }

    Ok(())
}
