//! BMA Engine - Battlespace Management Analytics service
//!
//! Serves recommendations, logistics forecasts and hotspot detection over
//! HTTP and runs a periodic hotspot scan in the background.
//!
//! # Usage
//!
//! ```bash
//! # Durable sled storage in ./data, config from ./bma_config.toml if present
//! cargo run --release
//!
//! # Ephemeral stores seeded from a snapshot, no background scan
//! ./bma-engine --memory --seed snapshot.json --no-scheduler
//! ```
//!
//! # Environment Variables
//!
//! - `BMA_CONFIG`: Path to the TOML config file
//! - `BMA_SERVER_ADDR`: HTTP bind address (overrides the config file)
//! - `BMA_CORS_ORIGINS`: Comma-separated origins allowed cross-origin access
//! - `RUST_LOG`: Logging level (default: info)

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use bma_engine::api::{create_app, ApiState};
use bma_engine::config::{BmaConfig, StorageBackend};
use bma_engine::scheduler::HotspotScheduler;
use bma_engine::storage::{ProcessLock, SledStore, Snapshot, Stores};
use bma_engine::weather::provider_from_config;
use bma_engine::BmaService;

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "bma-engine")]
#[command(about = "Battlespace Management Analytics decision-support service")]
#[command(version)]
struct CliArgs {
    /// Override the server address (default: "0.0.0.0:8080")
    #[arg(short, long, env = "BMA_SERVER_ADDR")]
    addr: Option<String>,

    /// Path to a TOML config file (skips the BMA_CONFIG / ./bma_config.toml search)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Override the sled data directory
    #[arg(long, value_name = "DIR")]
    data_dir: Option<String>,

    /// Keep all data in memory (nothing survives a restart)
    #[arg(long)]
    memory: bool,

    /// JSON snapshot of units and reports to load at startup
    #[arg(long, value_name = "FILE")]
    seed: Option<PathBuf>,

    /// Disable the periodic hotspot scan
    #[arg(long)]
    no_scheduler: bool,
}

#[derive(Debug, Clone, Copy)]
enum TaskName {
    HttpServer,
    HotspotScheduler,
}

impl std::fmt::Display for TaskName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::HttpServer => write!(f, "HttpServer"),
            Self::HotspotScheduler => write!(f, "HotspotScheduler"),
        }
    }
}

// ============================================================================
// Startup
// ============================================================================

fn load_config(args: &CliArgs) -> Result<BmaConfig> {
    let mut cfg = match &args.config {
        Some(path) => BmaConfig::load_from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => BmaConfig::load(),
    };
    if let Some(addr) = &args.addr {
        cfg.server.addr.clone_from(addr);
    }
    if let Some(dir) = &args.data_dir {
        cfg.storage.data_dir.clone_from(dir);
    }
    if args.memory {
        cfg.storage.backend = StorageBackend::Memory;
    }
    if args.no_scheduler {
        cfg.hotspot.scheduler_enabled = false;
    }
    Ok(cfg)
}

/// Open the configured backend. The lock is held for the life of the process.
fn open_stores(cfg: &BmaConfig) -> Result<(Stores, Option<ProcessLock>)> {
    match cfg.storage.backend {
        StorageBackend::Memory => {
            info!("💾 Storage: in-memory (data is lost on exit)");
            Ok((Stores::in_memory(), None))
        }
        StorageBackend::Sled => {
            let data_dir = Path::new(&cfg.storage.data_dir);
            let lock = ProcessLock::acquire(data_dir)?;
            let store = SledStore::open(data_dir.join("bma.db"))
                .with_context(|| format!("Failed to open sled database in {}", data_dir.display()))?;
            info!(path = %data_dir.display(), size_bytes = store.size_bytes(), "💾 Storage: sled");
            Ok((Stores::from_backend(Arc::new(store)), Some(lock)))
        }
    }
}

fn load_seed(stores: &Stores, path: &Path) -> Result<()> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read seed file {}", path.display()))?;
    let snapshot = Snapshot::from_json(&raw)
        .with_context(|| format!("Invalid seed file {}", path.display()))?;
    let (units, reports) = stores.seed(&snapshot).context("Failed to store seed data")?;
    info!(units, reports, "📥 Seed snapshot loaded");
    Ok(())
}

// ============================================================================
// Tasks
// ============================================================================

fn spawn_http_server(
    task_set: &mut JoinSet<Result<TaskName>>,
    listener: tokio::net::TcpListener,
    app: axum::Router,
    cancel_token: CancellationToken,
) {
    task_set.spawn(async move {
        info!("[HttpServer] Task starting");

        let result = axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                cancel_token.cancelled().await;
                info!("[HttpServer] Received shutdown signal");
            })
            .await;

        match result {
            Ok(()) => {
                info!("[HttpServer] Graceful shutdown complete");
                Ok(TaskName::HttpServer)
            }
            Err(e) => {
                error!("[HttpServer] Server error: {}", e);
                Err(anyhow::anyhow!("HTTP server error: {}", e))
            }
        }
    });
}

fn spawn_hotspot_scheduler(
    task_set: &mut JoinSet<Result<TaskName>>,
    service: Arc<BmaService>,
    cancel_token: CancellationToken,
) {
    task_set.spawn(async move {
        let cycles = HotspotScheduler::from_config(service).run(cancel_token).await;
        info!(cycles, "[HotspotScheduler] Stopped");
        Ok(TaskName::HotspotScheduler)
    });
}

/// Monitor tasks; a failing task cancels the rest.
async fn run_supervisor(
    task_set: &mut JoinSet<Result<TaskName>>,
    cancel_token: CancellationToken,
) -> Result<()> {
    info!("🔒 Supervisor: All tasks spawned, monitoring...");

    loop {
        tokio::select! {
            () = cancel_token.cancelled() => {
                info!("🛑 Supervisor: Shutdown signal received");
                break;
            }
            result = task_set.join_next() => {
                match result {
                    Some(Ok(Ok(task_name))) => {
                        info!("🔒 Supervisor: Task {} completed normally", task_name);
                    }
                    Some(Ok(Err(e))) => {
                        error!("🔒 Supervisor: Task failed with error: {}", e);
                        cancel_token.cancel();
                        return Err(e);
                    }
                    Some(Err(e)) => {
                        error!("🔒 Supervisor: Task panicked: {}", e);
                        cancel_token.cancel();
                        return Err(anyhow::anyhow!("Task panicked: {}", e));
                    }
                    None => {
                        info!("🔒 Supervisor: All tasks completed");
                        break;
                    }
                }
            }
        }
    }

    // Let the remaining tasks observe cancellation and finish
    while let Some(result) = task_set.join_next().await {
        if let Ok(Ok(task_name)) = result {
            info!("🔒 Supervisor: Task {} stopped", task_name);
        }
    }

    Ok(())
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let args = CliArgs::parse();
    let cfg = load_config(&args)?;

    info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    info!("  BMA Engine - Battlespace Management Analytics");
    info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let (stores, _process_lock) = open_stores(&cfg)?;
    if let Some(seed) = &args.seed {
        load_seed(&stores, seed)?;
    }

    let weather: Arc<dyn bma_engine::weather::WeatherProvider> =
        Arc::from(provider_from_config(&cfg.weather));
    info!(provider = weather.provider_name(), "🌦️  Weather provider ready");

    let service = Arc::new(BmaService::new(stores, weather, cfg.clone()));

    let listener = tokio::net::TcpListener::bind(&cfg.server.addr)
        .await
        .with_context(|| format!("Failed to bind {}", cfg.server.addr))?;
    info!("🌐 Listening on http://{}/api/v1", cfg.server.addr);

    let cancel_token = CancellationToken::new();
    let shutdown_token = cancel_token.clone();
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        info!("🛑 Received Ctrl+C, initiating shutdown...");
        shutdown_token.cancel();
    });

    let mut task_set: JoinSet<Result<TaskName>> = JoinSet::new();
    spawn_http_server(
        &mut task_set,
        listener,
        create_app(ApiState::new(Arc::clone(&service))),
        cancel_token.clone(),
    );

    if cfg.hotspot.scheduler_enabled {
        spawn_hotspot_scheduler(&mut task_set, Arc::clone(&service), cancel_token.clone());
    } else {
        info!("⏸️  Hotspot scheduler disabled");
    }

    run_supervisor(&mut task_set, cancel_token).await?;

    info!("✓ BMA Engine shutdown complete");
    Ok(())
}
