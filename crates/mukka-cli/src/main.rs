mod refresh;
mod route;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "mukka-cli")]
#[command(about = "Route planning and rest-area data maintenance")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetch the open-data rest-area and food rows and rewrite the local
    /// snapshot file
    Refresh,
    /// Plan a one-shot route with rest-area recommendations
    Route {
        /// Trip start, as a place name or address
        start: String,
        /// Trip destination, as a place name or address
        destination: String,
        /// Print the raw JSON response instead of a summary
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = mukka_core::load_app_config_from_env()?;
    let cli = Cli::parse();
    match cli.command {
        Commands::Refresh => refresh::run(&config).await,
        Commands::Route {
            start,
            destination,
            json,
        } => route::run(&config, &start, &destination, json).await,
    }
}
