mod applier;
mod cli;
mod commands;
mod editor;
mod logger;

use ash_config::AppConfig;
use cli::Commands;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = cli::parse_args();
    logger::init(cli.verbose);

    let config = AppConfig::load();
    log::debug!("Loaded config: {:?}", config);

    match &cli.command {
        Commands::Render(args) => commands::render(args, &config),
        Commands::Compare(args) => commands::compare(args),
        Commands::Review(args) => commands::review(args, &config).await,
    }
}
