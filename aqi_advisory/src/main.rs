use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{anyhow, Context};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use aqi_advisory::guards::{EstimateRequest, RequestHandler};
use aqi_advisory::{Advisor, AdvisoryConfig, PollutantSpec, PollutantVector};

#[derive(Debug, Parser)]
#[command(name = "aqi_advisory", about = "AQI categories and health advisories")]
struct Cli {
    /// JSON file overriding the band table and/or estimator weights.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Advisory for a known AQI value.
    Advise {
        #[arg(long, allow_negative_numbers = true)]
        aqi: f64,
        #[arg(long)]
        group: Option<String>,
        /// Print a status summary instead of JSON.
        #[arg(long)]
        text: bool,
    },
    /// Estimate AQI from pollutant readings, then advise.
    Estimate {
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        no2: f64,
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        so2: f64,
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        co: f64,
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        o3: f64,
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        pm10: f64,
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        nh3: f64,
        #[arg(long)]
        group: Option<String>,
        /// Print a status summary instead of JSON.
        #[arg(long)]
        text: bool,
    },
    /// Check one pollutant reading against its warning/severe thresholds.
    Pollutant {
        #[arg(long)]
        name: String,
        #[arg(long, allow_negative_numbers = true)]
        value: f64,
    },
    /// One JSON request per stdin line, one JSON response per stdout line.
    ServeStdin,
}

fn load_advisor(path: Option<&PathBuf>) -> anyhow::Result<Advisor> {
    match path {
        Some(path) => AdvisoryConfig::from_json_file(path)
            .and_then(AdvisoryConfig::build)
            .with_context(|| format!("loading config from {}", path.display())),
        None => Ok(Advisor::canonical().clone()),
    }
}

fn print_json(value: &impl serde::Serialize) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string(value)?);
    Ok(())
}

fn serve_stdin(handler: RequestHandler<'_>) -> anyhow::Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();
    let (mut served, mut rejected) = (0usize, 0usize);

    for line in stdin.lock().lines() {
        let line = line.context("reading request from stdin")?;
        if line.trim().is_empty() {
            continue;
        }
        let response = match handler.handle_json(&line) {
            Ok(value) => {
                served += 1;
                value
            }
            Err(err) => {
                rejected += 1;
                tracing::warn!(error = %err, "rejected request");
                serde_json::to_value(err.to_response())?
            }
        };
        writeln!(stdout, "{response}")?;
    }

    tracing::info!(served, rejected, "stdin closed");
    Ok(())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let advisor = load_advisor(cli.config.as_ref())?;
    let handler = RequestHandler::new(&advisor);

    match cli.command {
        Command::Advise { aqi, group, text } => {
            let advisory = advisor.composer.compose(aqi, group.as_deref());
            tracing::info!(aqi, category = %advisory.category(), "advisory");
            if text {
                println!("{}", advisory.status_text());
            } else {
                print_json(&advisory)?;
            }
        }
        Command::Estimate {
            no2,
            so2,
            co,
            o3,
            pm10,
            nh3,
            group,
            text,
        } => {
            let req = EstimateRequest {
                pollutants: PollutantVector::new([no2, so2, co, o3, pm10, nh3]),
                group,
            };
            let response = handler.estimate(&req);
            tracing::info!(predicted_aqi = response.predicted_aqi, "estimate");
            if text {
                println!("{}", response.status_text());
            } else {
                print_json(&response)?;
            }
        }
        Command::Pollutant { name, value } => {
            let spec = PollutantSpec::lookup(&name)
                .ok_or_else(|| anyhow!("unknown pollutant '{name}'"))?;
            print_json(&spec.report(value))?;
        }
        Command::ServeStdin => serve_stdin(handler)?,
    }

    Ok(())
}
