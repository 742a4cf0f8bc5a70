use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use pizza_restaurant_service::config::Config;
use pizza_restaurant_service::handlers::AppState;
use pizza_restaurant_service::store::Store;
use pizza_restaurant_service::{app, seed};

#[derive(Parser)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run pending migrations, then serve HTTP (default)
    Serve,
    /// Run pending migrations and exit
    Migrate,
    /// Replace all data with the demo restaurants and pizzas
    Seed,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();
    let config = Config::from_env();

    let store = Store::open(&config.database_url)?;
    store.run_migrations()?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            let app = app(AppState::new(store));
            let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
            info!("listening on {}", listener.local_addr()?);
            axum::serve(listener, app).await?;
        }
        Commands::Migrate => info!("migrations are up to date"),
        Commands::Seed => seed::seed(&store)?,
    }

    Ok(())
}
