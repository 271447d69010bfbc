use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

mod cli;
mod commands;
mod config;
mod errors;
mod events;
mod executor;
mod packer;
mod plan;
mod prompt;
mod scanner;
mod units;

#[cfg(test)]
mod tests;

use cli::{Cli, Commands};
use config::RuntimeConfig;
use errors::AppError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let debug = matches!(&cli.command, Commands::Plan(args) if args.debug);
    init_tracing(debug);

    info!("tightpack v{} starting", env!("CARGO_PKG_VERSION"));

    let cancel = CancellationToken::new();
    let signal_cancel = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Received Ctrl+C, stopping at the next safe point...");
            signal_cancel.cancel();
        }
    });

    if let Err(err) = run(cli, &cancel).await {
        let msg = errors::reclassify(err).user_message();
        eprintln!("Error: {}", msg.title);
        eprintln!("  {}", msg.detail);
        eprintln!("  hint: {}", msg.hint);
        std::process::exit(1);
    }
}

async fn run(cli: Cli, cancel: &CancellationToken) -> Result<(), AppError> {
    let cfg = RuntimeConfig::load();

    match cli.command {
        Commands::Plan(args) => {
            let opts = if prompt::should_prompt(args.any_option_given()) {
                prompt::prompt_plan_options()?
            } else {
                args.resolve()
            };
            commands::run_plan(&opts, &cfg, cancel).await
        }
        Commands::Apply(args) => commands::run_apply(&args.resolve(), cancel).await,
        Commands::Show(args) => commands::run_show(&args),
    }
}

fn init_tracing(debug: bool) {
    let default_filter = if debug { "tightpack=debug" } else { "tightpack=info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with_writer(std::io::stderr)
        .init();
}
