use axum::Router;
use chrono::Utc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use whalewatch::config::Config;
use whalewatch::services::{render_report, summarize, ExportDocument};
use whalewatch::{api, AppState};

/// Interval between sweeps of expired feed batches.
const FEED_CLEANUP_SECS: u64 = 60;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "whalewatch=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();

    if std::env::args().nth(1).as_deref() == Some("report") {
        return run_report(config);
    }

    info!("Starting WhaleWatch server on {}:{}", config.host, config.port);
    if let Some(seed) = config.simulation.seed {
        info!("Simulation seeded with {}", seed);
    }

    let addr = format!("{}:{}", config.host, config.port);
    let state = AppState::new(config)?;

    // Sweep expired feed batches
    {
        let feed = state.feed.clone();
        tokio::spawn(async move {
            loop {
                tokio::time::sleep(Duration::from_secs(FEED_CLEANUP_SECS)).await;
                let removed = feed.cleanup();
                if removed > 0 {
                    debug!("Removed {} expired feed batches", removed);
                }
            }
        });
    }

    // Build CORS layer
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .merge(api::router())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("WhaleWatch server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// One-shot mode: print the text report and write a JSON export.
fn run_report(config: Config) -> anyhow::Result<()> {
    let state = AppState::new(config)?;
    let sim = &state.config.simulation;
    let now = Utc::now();

    let positions = state
        .simulator
        .positions(now, sim.position_min_usd, sim.position_count)?;
    let trades = state
        .simulator
        .trades(now, sim.trade_min_usd, sim.trade_count)?;
    let analysis = summarize(&positions, &trades);

    println!("{}", render_report(&positions, &trades, &analysis));

    let doc = ExportDocument::new(now, positions, trades, analysis);
    let path = doc.write_to(&state.config.export_dir)?;
    println!("Data exported to {}", path.display());

    Ok(())
}
