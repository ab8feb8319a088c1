use clap::Parser;
use std::process;
use tracing::debug;
use wordnet_importer::WordnetError;
use tokio_util::sync::CancellationToken;
use wordnet_importer::cli::{self, Args};

/// Exit code used when the user interrupts the import
const EXIT_INTERRUPTED: i32 = 130;

fn main() {
    let args = Args::parse();
    setup_logging(args.verbose);

    let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
        eprintln!("Failed to create async runtime: {}", e);
        process::exit(1);
    });

    let result = runtime.block_on(async {
        let cancellation_token = CancellationToken::new();

        // Ctrl-C only trips the token; the importer rolls back its open batch
        let signal_token = cancellation_token.clone();
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    eprintln!("\nReceived CTRL+C, stopping after the current record...");
                    signal_token.cancel();
                }
                Err(e) => debug!("Could not install CTRL+C handler: {}", e),
            }
        });

        cli::run(args, cancellation_token).await
    });

    match result {
        Ok(_report) => process::exit(0),
        Err(error) => {
            eprintln!("Error: {:#}", error);
            let interrupted = matches!(
                error.downcast_ref::<WordnetError>(),
                Some(WordnetError::Interrupted { .. })
            );
            process::exit(if interrupted { EXIT_INTERRUPTED } else { 1 });
        }
    }
}

/// Install the fmt subscriber; `RUST_LOG` overrides the level
fn setup_logging(verbose: bool) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("wordnet_importer={}", log_level)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_timer(fmt::time::uptime())
                .with_writer(std::io::stderr),
        )
        .init();
}
