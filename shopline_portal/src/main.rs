mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "shopline-portal")]
#[command(about = "Staff portal for browsing Shopline customers")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the portal web server
    Serve(commands::serve::ServeArgs),
    /// Print the digest to use for a staff password in PORTAL_STAFF_USERS
    HashPassword(commands::hash_password::HashPasswordArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("shopline_portal=info".parse()?)
                .add_directive("shopline_api=warn".parse()?),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Serve(args) => commands::serve::run(args).await?,
        Commands::HashPassword(args) => commands::hash_password::run(args)?,
    }

    Ok(())
}
