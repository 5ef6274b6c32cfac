use nowornever_api::app::create_app;
use nowornever_api::config::{load_config, save_default_config};
use nowornever_api::constants::{CONFIG_PATH, DATA_DIR};
use nowornever_api::database::{create_pool, init_database, run_migrations};
use nowornever_api::logging::{init_logging, install_panic_hook};
use nowornever_api::routes::cleanup_expired_tokens;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

fn start_background_tasks(pool: nowornever_api::database::DbPool) {
    tokio::spawn(async move {
        if let Ok(conn) = pool.get() {
            match cleanup_expired_tokens(&conn) {
                Ok(removed) if removed > 0 => info!("Removed {} stale refresh tokens", removed),
                _ => {}
            }
        }
    });
}

#[tokio::main]
async fn main() {
    if std::env::args().any(|arg| arg == "--init-config") {
        match save_default_config(&CONFIG_PATH) {
            Ok(_) => {
                println!("Default configuration saved to {:?}", *CONFIG_PATH);
                std::process::exit(0);
            }
            Err(e) => {
                eprintln!("Failed to save default configuration: {}", e);
                std::process::exit(1);
            }
        }
    }

    // Initialize logging
    init_logging();
    install_panic_hook();

    // Load configuration
    let config = Arc::new(load_config(&CONFIG_PATH));

    // Initialize data directory
    std::fs::create_dir_all(&*DATA_DIR).ok();

    // Create database pool
    let pool = create_pool().expect("Failed to create database pool");

    // Initialize database schema
    {
        let conn = pool.get().expect("Failed to get connection");
        init_database(&conn).expect("Failed to initialize database");
        run_migrations(&conn).expect("Failed to run migrations");
    }

    // Start background tasks
    start_background_tasks(pool.clone());

    // Create the application
    let app = create_app(Arc::clone(&config), pool);

    // Bind to address
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    info!("Starting NowOrNever API on {}", addr);

    // Start server
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind");

    axum::serve(listener, app).await.expect("Server failed");
}
