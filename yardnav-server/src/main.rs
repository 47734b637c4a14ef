use std::{path::PathBuf, sync::Arc};

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;
use yardnav_core::loading::load_catalog;
use yardnav_server::{AppState, ServerConfig, build_router};

#[derive(Parser, Debug)]
#[command(name = "yardnav-server", version, about = "Walking directions between yard lots")]
struct Args {
    /// Server configuration (TOML)
    #[arg(long, value_name = "PATH", default_value = "yardnav.toml")]
    config: PathBuf,

    /// Listen address, overrides `server.bind`
    #[arg(long, value_name = "ADDR")]
    bind: Option<String>,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, value_name = "FILTER", default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut config = ServerConfig::load(&args.config)?;
    if let Some(bind) = args.bind {
        config.server.bind = bind;
    }
    info!(
        config = %args.config.display(),
        yards = config.yards.len(),
        "Loading yards"
    );

    let yards = config.yards.clone();
    let default_yard = config.default_yard.clone();
    let network_config = config.navigation.network();
    let catalog = tokio::task::spawn_blocking(move || {
        load_catalog(&yards, default_yard.as_deref(), &network_config)
    })
    .await??;
    for yard in catalog.iter() {
        let stats = yard.network().stats();
        info!(
            yard = %yard.meta.key,
            nodes = stats.nodes,
            edges = stats.edges,
            lots = yard.slots().len(),
            "Yard ready"
        );
    }

    let state = Arc::new(AppState::new(catalog, config.navigation.tracker()));
    let app = build_router(state, &config.server);

    let listener = tokio::net::TcpListener::bind(&config.server.bind).await?;
    info!(bind = %config.server.bind, "Listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
