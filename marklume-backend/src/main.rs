use actix_files::Files;
use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

mod admin;
mod archive;
mod config;
mod controllers;
mod models;
#[cfg(test)]
mod test_support;

use admin::AdminKey;
use archive::{ArchiveStore, CacheSweeper};
use config::Config;

pub struct AppState {
    pub config: Config,
    pub archive: Arc<ArchiveStore>,
    pub admin_key: AdminKey,
    /// Server start time for uptime calculation
    pub started_at: Instant,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init();

    log::info!("Marklume v{}", env!("CARGO_PKG_VERSION"));
    let config = Config::from_env();

    log::info!("Scanning archive directory {}", config.archive_dir.display());
    let archive = Arc::new(ArchiveStore::new(config.archive_dir.clone()));
    if let Err(e) = archive.scan_archive_directory() {
        log::error!("Failed to initialize archive: {}", e);
        return Err(std::io::Error::other(e));
    }

    let admin_key = AdminKey::from_config(config.admin_key.as_deref());
    if config.admin_key.is_some() {
        log::info!("[ADMIN] Using admin key from {}", config::env_vars::ADMIN_KEY);
    } else {
        log::info!(
            "[ADMIN] Admin key generated (valid for this session): {}",
            admin_key.as_str()
        );
    }

    let shutdown = CancellationToken::new();
    let sweeper_handle = CacheSweeper::new(
        Arc::clone(&archive),
        config.sweep_interval,
        config.cache_expiry,
    )
    .spawn(shutdown.clone());

    let static_dir = if config.static_dir.is_dir() {
        log::info!("Serving static files from: {}", config.static_dir.display());
        Some(config.static_dir.clone())
    } else {
        log::warn!(
            "Static directory {} not found - static file serving disabled",
            config.static_dir.display()
        );
        None
    };

    let bind_address = config.bind_address.clone();
    let port = config.port;
    let started_at = Instant::now();

    log::info!("Starting Marklume server on {}:{}", bind_address, port);

    let server = HttpServer::new(move || {
        let mut app = App::new()
            .app_data(web::Data::new(AppState {
                config: config.clone(),
                archive: Arc::clone(&archive),
                admin_key: admin_key.clone(),
                started_at,
            }))
            .wrap(Logger::default())
            .configure(controllers::health::config_routes)
            .configure(controllers::admin::config)
            .configure(controllers::articles::config);

        if let Some(dir) = &static_dir {
            app = app.service(Files::new("/static", dir.clone()));
        }

        app
    })
    .bind((bind_address.as_str(), port))?
    .run();

    // Get server handle for graceful shutdown
    let server_handle = server.handle();
    let signal_shutdown = shutdown.clone();

    // Spawn Ctrl+C handler
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::error!("Failed to listen for Ctrl+C: {}", e);
            return;
        }
        log::info!("Received Ctrl+C, shutting down...");

        // Signal sweeper to stop
        signal_shutdown.cancel();

        log::info!("Stopping HTTP server...");
        let server_stop = server_handle.stop(true);
        if tokio::time::timeout(Duration::from_secs(5), server_stop).await.is_err() {
            log::warn!("Timeout waiting for HTTP server to stop, forcing exit...");
        }
    });

    let result = server.await;

    shutdown.cancel();
    if tokio::time::timeout(Duration::from_secs(5), sweeper_handle).await.is_err() {
        log::warn!("Timeout waiting for cache sweeper to stop");
    }
    log::info!("Shutdown complete");

    result
}
