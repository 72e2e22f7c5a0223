use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use pizza_api::{AppState, Database, db, router, seed};
use tracing::info;

#[derive(Parser)]
#[command(version, about = "Restaurants, pizzas and their prices over HTTP")]
struct Cli {
    /// SQLite database path
    #[arg(long, env = "DATABASE_URL", default_value = "app.db", global = true)]
    database_url: String,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply pending migrations and serve the HTTP API
    Serve {
        #[arg(long, env = "LISTEN_ADDR", default_value = "0.0.0.0:5555")]
        listen: String,
    },
    /// Apply pending migrations
    Migrate,
    /// Replace all records with the sample data set
    Seed,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Serve { listen } => serve(&cli.database_url, &listen).await,
        Commands::Migrate => {
            let mut conn = db::establish_connection(&cli.database_url)?;
            db::run_migrations(&mut conn)?;
            Ok(())
        }
        Commands::Seed => {
            let mut conn = db::establish_connection(&cli.database_url)?;
            db::run_migrations(&mut conn)?;
            seed::seed(&mut conn)?;
            Ok(())
        }
    }
}

async fn serve(database_url: &str, listen: &str) -> Result<(), Box<dyn std::error::Error>> {
    let state = AppState {
        db: Database::open(database_url)?,
    };
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(listen).await?;
    info!("Pizza API listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
