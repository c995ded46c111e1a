// src/main.rs
use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};

use uptime_probe::{
    commit::StepOutput,
    config::{self, Overrides},
    health::Prober,
    notify::{LogNotifier, Notifier, SesNotifier},
    runner::{run_check, summary, FATAL_EXIT_CODE},
    state::{FileStateStore, MemoryStateStore, StateStore},
};

/// Probe a URL once, record the result and alert when it is down.
#[derive(Debug, Parser)]
#[command(name = "uptime-probe", version, about)]
struct Cli {
    /// Optional YAML or JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Endpoint to probe (overrides TARGET_URL)
    #[arg(long)]
    url: Option<String>,

    /// Probe timeout in seconds (overrides TIMEOUT_SECONDS)
    #[arg(long)]
    timeout: Option<u64>,

    /// Status file location (overrides STATE_PATH)
    #[arg(long)]
    state_path: Option<PathBuf>,

    /// Keep state in memory and log alerts instead of sending them
    #[arg(long)]
    dry_run: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries the commit signal and the summary.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("uptime_probe=info")),
        )
        .init();

    match run(cli) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            error!("{:#}", e);
            ExitCode::from(FATAL_EXIT_CODE)
        }
    }
}

fn run(cli: Cli) -> Result<u8> {
    let overrides = Overrides {
        target_url: cli.url,
        timeout_seconds: cli.timeout,
        state_path: cli.state_path,
    };
    let config = config::load_config(cli.config.as_deref(), &overrides)?;
    info!("Loaded configuration: {:?}", config);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    runtime.block_on(async {
        let prober = Prober::from_config(&config).context("Failed to build HTTP client")?;

        let (store, sink, notifier): (Box<dyn StateStore>, StepOutput, Box<dyn Notifier>) =
            if cli.dry_run {
                (
                    Box::new(MemoryStateStore::new()),
                    StepOutput::default(),
                    Box::new(LogNotifier),
                )
            } else {
                (
                    Box::new(FileStateStore::new(&config.state_path)),
                    StepOutput::new(config.github_output.clone()),
                    Box::new(SesNotifier::from_config(&config).await),
                )
            };

        let report = run_check(&prober, store.as_ref(), &sink, notifier.as_ref()).await?;

        println!("{}", summary(&report));

        Ok::<_, anyhow::Error>(report.exit_code())
    })
}
