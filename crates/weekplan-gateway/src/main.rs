use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;
use weekplan_core::config::WeekplanConfig;

mod app;
mod http;
mod store;

/// Weekly schedule server: check in by email, manage a schedule per day.
#[derive(Debug, Parser)]
#[command(name = "weekplan-gateway", version)]
struct Args {
    /// Config file (default: $WEEKPLAN_CONFIG, then ~/.weekplan/weekplan.toml).
    #[arg(short, long)]
    config: Option<String>,

    /// Override `server.bind`.
    #[arg(long)]
    bind: Option<String>,

    /// Override `server.port`.
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "weekplan_gateway=info,tower_http=debug".into()),
        )
        .init();

    let args = Args::parse();

    // load config: --config > WEEKPLAN_CONFIG > ~/.weekplan/weekplan.toml
    let mut config = WeekplanConfig::load(args.config.as_deref()).unwrap_or_else(|e| {
        tracing::warn!("Config load failed ({}), using defaults", e);
        WeekplanConfig::default()
    });
    if let Some(bind) = args.bind {
        config.server.bind = bind;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    // one SQLite connection shared by the directory and the schedule manager
    let db = store::open_store(&config.database)?;

    let addr: SocketAddr = config.listen_addr().parse()?;
    let state = Arc::new(app::AppState::with_store(config, db));

    // populate the directory before accepting requests
    let cached = state.users.warm()?;
    info!(cached, "user directory ready");

    let router = app::build_router(state);

    info!("weekplan gateway listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
