use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tallyboard::api::{self, AppState};
use tallyboard::config::Config;
use tallyboard::db;
use tallyboard::service::ValueService;
use tallyboard::store::StateStore;

#[derive(Parser, Debug)]
#[command(name = "tallyboard")]
#[command(about = "Shared counter and message board server")]
#[command(version)]
struct Cli {
    /// Port to listen on
    #[arg(short, long, env = "TALLYBOARD_PORT")]
    port: Option<u16>,

    /// Address to bind to
    #[arg(short, long, env = "TALLYBOARD_BIND")]
    bind: Option<String>,

    /// Path to the SQLite database
    #[arg(short, long, env = "TALLYBOARD_DB")]
    database: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, env = "TALLYBOARD_VERBOSE")]
    verbose: bool,

    /// Config file path (optional)
    #[arg(short, long, env = "TALLYBOARD_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose {
        "tallyboard=debug,tower_http=debug"
    } else {
        "tallyboard=info,tower_http=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load config from file if provided, otherwise use defaults;
    // CLI flags override either.
    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    if let Some(port) = cli.port {
        config.port = port;
    }
    if let Some(bind) = cli.bind {
        config.bind = bind;
    }
    if let Some(database) = cli.database {
        config.database_path = database;
    }

    let pool = db::open(&config.database_path).await?;

    let store = StateStore::new(pool);
    store.initialize().await.context("seeding initial state")?;

    let values = ValueService::new(store)
        .await
        .context("loading current message")?;

    info!("Database at {}", config.database_path.display());

    let app = api::create_router(AppState::new(values));

    let addr: SocketAddr = format!("{}:{}", config.bind, config.port)
        .parse()
        .context("parsing bind address")?;
    info!("Starting tallyboard on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
