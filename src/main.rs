use product_catalog::{
    create_router,
    infrastructure::{config::load_config, database::DatabaseManager, logger::Logger},
    AppState,
};
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (config, source) = load_config()?;
    Logger::init(&config.logging.level);

    info!("Starting product catalog server...");
    match source {
        Some(path) => info!("Loaded config from {}", path.display()),
        None => info!("No config file found, using defaults"),
    }

    let db = DatabaseManager::new(&config.database).await.map_err(|e| {
        error!("Failed to connect to database: {}", e);
        e
    })?;
    db.prepare(config.database.reset_on_start).await?;

    if config.debug.enabled {
        warn!(
            commands = ?config.debug.commands.keys().collect::<Vec<_>>(),
            allowed_hosts = ?config.debug.allowed_hosts,
            "Debug routes are enabled"
        );
    }

    let state = AppState::new(db.get_pool().clone(), config.debug.clone())?;
    let app = create_router(state, &config.http);

    let listener =
        TcpListener::bind((config.http.bind_address.as_str(), config.http.port)).await?;
    let addr = listener.local_addr()?;

    info!("🚀 Product catalog running on http://{}", addr);
    info!("📖 Available endpoints:");
    info!("   GET  /                    - List products");
    info!("   GET  /product/:id         - Product details");
    info!("   GET  /search?q=           - Search products");
    info!("   POST /product/:id/update  - Update product");
    info!("   GET  /product/:id/delete  - Delete product");
    info!("   GET  /add-product         - New product form");
    info!("   POST /add-product         - Create product");
    info!("   GET  /debug/exec?cmd=     - Run a configured diagnostic command");
    info!("   GET  /debug/fetch?url=    - Fetch from an allowlisted host");
    info!("   GET  /health              - Health check");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
