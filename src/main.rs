mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use shareup::config::Settings;
use shareup::observability;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let cli = Cli::parse();

    let settings = match cli.config {
        Some(path) => Settings::load_from_path(path)?,
        None => Settings::load()?,
    };
    observability::init_tracing(&settings.logging.filter);

    match cli.command {
        Commands::Upload(args) => {
            let code = commands::upload(&settings, args).await?;
            if code != 0 {
                std::process::exit(code);
            }
        }
        Commands::Targets => commands::list_targets(&settings)?,
        Commands::Validate => commands::validate(&settings)?,
    }

    Ok(())
}
