//! QuantumEyes Sample - writes a labeled synthetic dataset to disk

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use quantumeyes_core::constants::{APP_NAME, APP_VERSION};
use quantumeyes_core::logic::dataset;
use quantumeyes_core::{CoreResult, GeneratorConfig, TrafficGenerator};

#[derive(Parser, Debug)]
#[command(name = "quantumeyes-sample", version, about = "Generate a labeled sample traffic dataset")]
struct Cli {
    /// Normal records to generate
    #[arg(long, default_value_t = 100)]
    normal: usize,

    /// Anomalous records, split evenly across port_scan / ddos / data_exfiltration
    #[arg(long, default_value_t = 30)]
    anomalies: usize,

    /// Seed for reproducible output
    #[arg(long)]
    seed: Option<u64>,

    /// Output directory (defaults to the local data dir)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Comma-separated protocols for normal traffic, e.g. tcp,https,dns
    #[arg(long, value_delimiter = ',')]
    protocols: Vec<String>,
}

fn run(cli: Cli) -> CoreResult<()> {
    let mut config = GeneratorConfig::default();
    if !cli.protocols.is_empty() {
        let names: Vec<&str> = cli.protocols.iter().map(String::as_str).collect();
        config = config.with_protocols(&names)?;
    }

    let mut generator = TrafficGenerator::from_seed(config, cli.seed)?;
    let traffic = generator.generate_mixed(cli.normal, cli.anomalies);

    let dir = cli.out.unwrap_or_else(dataset::default_dir);
    let paths = dataset::save_sample(&dir, &traffic)?;

    log::info!(
        "Wrote {} records ({} anomalies) to {} and {}",
        traffic.len(),
        traffic.anomaly_count(),
        paths.data.display(),
        paths.labels.display()
    );
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("{} sample generator v{}", APP_NAME, APP_VERSION);

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
