//! # emissions-cli
//!
//! Command-line interface for training per-country emission models and
//! querying the resulting registry.

use algorithm_core::{AutoArima, InformationCriterion};
use anyhow::Context;
use clap::{Parser, Subcommand};
use emissions_registry::{
    load_observations, AutoArimaTechnique, ColumnSpec, DampedHoltTechnique, ModelRegistry,
    SkippedEntity, TrainedEntity, Trainer,
};
use emissions_server::{ForecastService, ServerConfig};
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

type CliResult<T> = anyhow::Result<T>;

#[derive(Parser)]
#[command(name = "emissions")]
#[command(about = "CO2 emission forecasting CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train one model per country and write the registry
    Train {
        /// Input CSV with a header row
        #[arg(short, long)]
        input: PathBuf,

        /// Registry file to write
        #[arg(short, long, default_value = emissions_server::config::DEFAULT_MODELS_PATH)]
        output: PathBuf,

        /// Column holding the country identifier
        #[arg(long, default_value = "country_name")]
        entity_column: String,

        /// Column holding the observation year
        #[arg(long, default_value = "year")]
        year_column: String,

        /// Column holding the observed value
        #[arg(long, default_value = "value")]
        value_column: String,

        /// Largest AR order tried
        #[arg(long, default_value = "3")]
        max_p: usize,

        /// Largest MA order tried
        #[arg(long, default_value = "3")]
        max_q: usize,

        /// Largest differencing order
        #[arg(long, default_value = "2")]
        max_d: usize,

        /// Information criterion (aic, aicc, bic)
        #[arg(long, default_value = "aic")]
        criterion: InformationCriterion,

        /// Write a JSON summary of trained and skipped countries
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// List countries with a trained model
    Countries {
        /// Registry file
        #[arg(short, long, default_value = emissions_server::config::DEFAULT_MODELS_PATH)]
        models: PathBuf,
    },

    /// Print a forecast for one country
    Predict {
        /// Registry file
        #[arg(short, long, default_value = emissions_server::config::DEFAULT_MODELS_PATH)]
        models: PathBuf,

        /// Country identifier, exactly as in the training data
        #[arg(short, long)]
        country: String,

        /// First forecast year
        #[arg(long)]
        start_year: Option<i32>,

        /// Last forecast year
        #[arg(long)]
        end_year: Option<i32>,
    },

    /// Start the REST API server
    Serve {
        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,

        /// Registry file
        #[arg(short, long)]
        models: Option<PathBuf>,
    },
}

struct TrainArgs {
    input: PathBuf,
    output: PathBuf,
    columns: ColumnSpec,
    search: AutoArima,
    report: Option<PathBuf>,
}

#[derive(Serialize)]
struct TrainSummary<'a> {
    trained: &'a [TrainedEntity],
    skipped: &'a [SkippedEntity],
}

fn run_train(args: TrainArgs) -> CliResult<()> {
    let observations = load_observations(&args.input, &args.columns)
        .with_context(|| format!("failed to read {}", args.input.display()))?;

    let trainer = Trainer::new(
        Box::new(AutoArimaTechnique::new(args.search)),
        Box::new(DampedHoltTechnique),
    );
    let report = trainer.train(&observations);

    if let Some(path) = &args.report {
        let summary = TrainSummary {
            trained: &report.trained,
            skipped: &report.skipped,
        };
        write_json(path, &summary)?;
        tracing::info!(path = %path.display(), "training report written");
    }

    let trained = report.trained.len();
    let skipped = report.skipped.len();
    let registry = report.into_registry()?;
    registry
        .save(&args.output)
        .with_context(|| format!("failed to write {}", args.output.display()))?;

    println!(
        "Trained {} countries ({} skipped), registry written to {}",
        trained,
        skipped,
        args.output.display()
    );
    Ok(())
}

fn run_countries(models: &Path, out: &mut impl Write) -> CliResult<()> {
    let registry = ModelRegistry::load(models)?;
    serde_json::to_writer_pretty(&mut *out, &registry.entities())?;
    writeln!(out)?;
    Ok(())
}

fn run_predict(
    models: &Path,
    country: &str,
    start_year: Option<i32>,
    end_year: Option<i32>,
    out: &mut impl Write,
) -> CliResult<()> {
    let defaults = emissions_server::default_range_from_env()?;
    let registry = ModelRegistry::load(models)?;
    let service = ForecastService::new(Arc::new(registry), defaults);

    let forecast = service.forecast(country, start_year, end_year)?;
    serde_json::to_writer_pretty(&mut *out, &forecast)?;
    writeln!(out)?;
    Ok(())
}

async fn run_serve(
    host: Option<String>,
    port: Option<u16>,
    models: Option<PathBuf>,
) -> CliResult<()> {
    let mut config = ServerConfig::from_env()?;
    if let Some(host) = host {
        config.host = host;
    }
    if let Some(port) = port {
        config.port = port;
    }
    if let Some(models) = models {
        config.models_path = models;
    }

    emissions_server::serve(config).await?;
    Ok(())
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> CliResult<()> {
    let file =
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.flush()?;
    Ok(())
}

/// Logs go to stderr so JSON printed on stdout stays parseable
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        "emissions_cli=info,emissions_registry=info,emissions_server=info,tower_http=info".into()
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

async fn run(command: Commands) -> CliResult<()> {
    match command {
        Commands::Train {
            input,
            output,
            entity_column,
            year_column,
            value_column,
            max_p,
            max_q,
            max_d,
            criterion,
            report,
        } => {
            let search = AutoArima::new(max_p, max_d, max_q)
                .context("invalid ARIMA search bounds")?
                .with_criterion(criterion);
            run_train(TrainArgs {
                input,
                output,
                columns: ColumnSpec {
                    entity: entity_column,
                    year: year_column,
                    value: value_column,
                },
                search,
                report,
            })
        }

        Commands::Countries { models } => run_countries(&models, &mut io::stdout().lock()),

        Commands::Predict {
            models,
            country,
            start_year,
            end_year,
        } => run_predict(
            &models,
            &country,
            start_year,
            end_year,
            &mut io::stdout().lock(),
        ),

        Commands::Serve { host, port, models } => run_serve(host, port, models).await,
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env file (optional - won't fail if missing)
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    match run(cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
