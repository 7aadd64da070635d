use anyhow::Context;
use clap::Parser;
use glossa::{run_analysis, AnalysisConfig};
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Score candidate language families against a target profile and validate the ranking
#[derive(Parser, Debug)]
#[command(name = "glossa")]
#[command(about = "Multi-dimensional language similarity with robustness checks", long_about = None)]
struct Args {
    /// Path to the JSON analysis config
    config: PathBuf,

    /// Override the master seed
    #[arg(long)]
    seed: Option<u64>,

    /// Override the number of bootstrap trials
    #[arg(long)]
    bootstrap_trials: Option<usize>,

    /// Override the number of perturbation trials per rate
    #[arg(long)]
    perturbation_trials: Option<usize>,

    /// Override the number of pseudo-lexicons for the chance control
    #[arg(long)]
    pseudo_lexicons: Option<usize>,

    /// Write the JSON report here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Pretty-print the JSON report
    #[arg(long)]
    pretty: bool,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting Glossa v{}", env!("CARGO_PKG_VERSION"));
    info!("Config: {:?}", args.config);

    let mut config = AnalysisConfig::from_path(&args.config)?;
    if let Some(seed) = args.seed {
        config.params.seed = seed;
    }
    if let Some(trials) = args.bootstrap_trials {
        config.params.bootstrap_trials = trials;
    }
    if let Some(trials) = args.perturbation_trials {
        config.params.perturbation_trials = trials;
    }
    if let Some(lexicons) = args.pseudo_lexicons {
        config.params.pseudo_lexicons = lexicons;
    }

    let report = run_analysis(&config).context("analysis failed")?;

    let json = if args.pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };

    match &args.output {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("failed to write report {}", path.display()))?;
            info!("Report written to {:?}", path);
        }
        None => println!("{}", json),
    }

    Ok(())
}
