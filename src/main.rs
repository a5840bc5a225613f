//! vultr-nocloud - seed cloud-init's NoCloud datasource from Vultr metadata
//!
//! Runs once during early boot. Exits non-zero on any failure.

use std::path::PathBuf;

use clap::Parser;
use tracing::{Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;

use vultr_nocloud::config::DEFAULT_OUTPUT_DIR;
use vultr_nocloud::{BridgeConfig, BridgeError, run};

#[derive(Parser)]
#[command(name = "vultr-nocloud")]
#[command(
    author,
    version,
    about = "Write a NoCloud seed from Vultr instance metadata",
    long_about = None
)]
struct Cli {
    /// The output directory for NoCloud files
    #[arg(short = 'o', long = "output", default_value = DEFAULT_OUTPUT_DIR)]
    output: PathBuf,

    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");
}

/// Resolve when `signal` fires
///
/// If the handler cannot be installed this never resolves, so the pipeline
/// keeps running instead of being cut short.
async fn signal_or_pending<F>(name: &str, signal: F)
where
    F: Future<Output = std::io::Result<()>>,
{
    if let Err(e) = signal.await {
        warn!("Failed to install {} handler: {}", name, e);
        std::future::pending::<()>().await;
    }
}

/// Wait for SIGINT or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = signal_or_pending("Ctrl+C", tokio::signal::ctrl_c());

    #[cfg(unix)]
    let terminate = signal_or_pending("SIGTERM", async {
        use tokio::signal::unix::{SignalKind, signal};

        signal(SignalKind::terminate())?.recv().await;
        Ok::<_, std::io::Error>(())
    });

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

#[tokio::main]
async fn main() -> Result<(), BridgeError> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = BridgeConfig::new(cli.output);

    // dropping the pipeline on a signal kills the DHCP client
    let result = tokio::select! {
        res = run(&config) => res,
        _ = shutdown_signal() => Err(BridgeError::Interrupted),
    };

    match result {
        Ok(()) => {
            info!("Done");
            Ok(())
        }
        Err(e) => {
            error!("{}", e);
            Err(e)
        }
    }
}
