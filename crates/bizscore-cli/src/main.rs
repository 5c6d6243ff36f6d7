//! Bizscore CLI - Evaluate business-diagnosis submissions from the command line.

use bizscore_cli::cli::ConfigAction;
use bizscore_cli::commands;
use bizscore_cli::{Cli, Command, Config, Formatter};
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(e.exit_code());
    }
}

async fn run() -> bizscore_cli::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing (log to stderr, RUST_LOG wins over -v)
    let default_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();

    let initializing = matches!(
        &cli.command,
        Command::Config(args) if matches!(args.action, ConfigAction::Init { .. })
    );
    let config = match Config::load(cli.config.as_deref(), cli.preset) {
        Ok(config) => config,
        // A broken file must not block writing a fresh one
        Err(_) if initializing => Config::default(),
        Err(e) => return Err(e),
    };

    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(config.settings.format);
    let color_enabled = !cli.no_color && config.settings.color;
    let formatter = Formatter::new(format, color_enabled);

    match cli.command {
        Command::Run(args) => commands::execute_run(args, &config, &formatter).await,
        Command::Batch(args) => commands::execute_batch(args, &config, &formatter).await,
        Command::Score(args) => commands::execute_score(args, &config, &formatter),
        Command::Config(args) => commands::execute_config(args, &config, cli.config, &formatter),
    }
}
