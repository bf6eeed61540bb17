//! CoverdUp - a daily album cover guessing game
//!
//! Serves the REST API: auth, the daily game, the local album catalog and
//! the Spotify integration.

mod api;
mod catalog;
mod config;
mod core;
mod db;
mod models;
mod utils;

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

/// CoverdUp - daily album cover guessing game server
#[derive(Parser, Debug)]
#[command(name = "coverdup")]
#[command(version = "0.1.0")]
#[command(about = "Guess the album from its pixelated cover")]
struct Args {
    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on
    #[arg(long, default_value_t = 3001)]
    port: u16,

    /// Enable debug mode
    #[arg(long)]
    debug: bool,

    /// Path to config directory
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed the built-in album catalog and exit
    #[arg(long)]
    seed: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = if args.debug { "debug" } else { "info" };

    // sqlx logs every statement at info, keep it quieter
    let filter =
        tracing_subscriber::EnvFilter::new(format!("{},sqlx=warn,hyper=warn", log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();

    info!("CoverdUp v0.1.0 starting...");

    let paths = config::Paths::init(args.config)?;
    info!("Config directory: {:?}", paths.config_dir());

    run_setup().await?;

    if args.seed {
        let inserted = core::seed::seed_albums().await?;
        info!("Seeding done, {} albums added", inserted);
        return Ok(());
    }

    start_server(args.host, args.port).await
}

async fn run_setup() -> Result<()> {
    let mut config = config::UserConfig::load()?;

    // The server id doubles as the JWT secret and password salt, so it has
    // to survive restarts.
    if config.server_id.is_empty() {
        config.server_id = uuid::Uuid::new_v4().to_string();
        config.save()?;
    }

    db::setup_sqlite().await?;

    if !config.has_spotify_credentials() {
        tracing::warn!(
            "No Spotify credentials configured. \
             Set SPOTIFY_CLIENT_ID and SPOTIFY_CLIENT_SECRET to enable the catalog integration."
        );
    }

    if config.seed_on_empty {
        let inserted = core::seed::seed_if_empty().await?;
        if inserted > 0 {
            info!("Empty catalog, seeded {} built-in albums", inserted);
        }
    }

    Ok(())
}

async fn start_server(host: String, port: u16) -> Result<()> {
    let addr = format!("{}:{}", host, port);
    info!("Server listening on http://{}", addr);

    use actix_cors::Cors;
    use actix_web::{middleware, App, HttpServer};

    HttpServer::new(|| {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .configure(api::configure)
    })
    .bind(addr)?
    .run()
    .await?;

    Ok(())
}
