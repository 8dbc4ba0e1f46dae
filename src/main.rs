// Main entry point for the foldersize-server application.
// Parses configuration, provisions the optional folder limit gate,
// configures the Axum router, and starts the HTTP server.

mod app;
mod error;
mod handlers;
mod limit;
mod listeners;
mod models;
mod scan;

use clap::Parser;
use limit::FolderLimit;
use std::path::PathBuf;
use tokio::signal;
use tracing::Level;

/// Command line arguments for foldersize-server
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct AppConfig {
    /// Hostname/IP to bind the server to.
    /// If this option is specified without value, it will default to "*", meaning the server will listen on all interfaces.
    #[arg(long, env = "FOLDERSIZE_SERVER_HOST", default_value = "localhost", num_args = 0..=1, default_missing_value = "*")]
    host: String,

    /// Port number to listen on.
    #[arg(short, long, env = "FOLDERSIZE_SERVER_PORT", default_value_t = 6880)]
    port: u16,

    /// Folder whose aggregate size gates incoming requests. While the folder
    /// exceeds --max-size, every request is rejected with 403.
    #[arg(long, env = "FOLDERSIZE_SERVER_FOLDER_PATH", requires = "max_size")]
    folder_path: Option<PathBuf>,

    /// Maximum aggregate size for the gated folder: a byte count with an
    /// optional kb/mb/gb suffix (e.g. "512mb").
    #[arg(long, env = "FOLDERSIZE_SERVER_MAX_SIZE", requires = "folder_path", value_parser = limit::parse_size)]
    max_size: Option<u64>,
}

#[tokio::main]
async fn main() {
    // Parse command line args and environment variables
    let config = AppConfig::parse();

    // Initialize tracing subscriber for structured logging.
    // Logs will go to stdout. Adjust level and format as needed.
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("Starting foldersize-server...");

    // --- Assemble the folder limit gate ---
    // clap guarantees the two options only appear together.
    let folder_limit = match (config.folder_path, config.max_size) {
        (Some(folder_path), Some(max_size)) => Some(FolderLimit {
            folder_path,
            max_size,
        }),
        _ => None,
    };

    if let Some(folder_limit) = &folder_limit {
        // The folder must exist at startup; requests do not re-check this.
        if let Err(err) = folder_limit.provision() {
            tracing::error!("FATAL: Invalid folder limit configuration: {}", err);
            eprintln!("FATAL: Invalid folder limit configuration: {}. Exiting.", err);
            std::process::exit(1);
        }
        tracing::info!(
            "Folder limit gate enabled: folder={}, max_size={} bytes",
            folder_limit.folder_path.display(),
            folder_limit.max_size
        );
    } else {
        tracing::info!("Folder limit gate disabled - all requests will be forwarded");
    }

    // --- Build Axum Application Router ---
    let app = app::create_app(folder_limit);
    tracing::info!("Axum router configured.");

    // --- Start HTTP Server ---
    let listener = match listeners::create_listener(&config.host, config.port).await {
        Ok((addr, listener)) => {
            tracing::info!("Server successfully bound. Listening on {}", addr);
            listener
        }
        Err(err) => {
            tracing::error!("FATAL: Failed to bind server: {}", err);
            eprintln!("FATAL: Could not bind server. Error: {}. Exiting.", err);
            std::process::exit(1);
        }
    };

    // Run the server.
    if let Err(err) = axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!("Server run error: {}", err);
        eprintln!("ERROR: Server shut down unexpectedly. Error: {}", err);
    }

    tracing::info!("foldersize-server has shut down.");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
