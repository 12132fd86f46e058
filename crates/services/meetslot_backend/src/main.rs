// File: services/meetslot_backend/src/main.rs
use meetslot_backend::app::build_app;
use meetslot_backend::service_factory::MeetslotServices;
use meetslot_common::logging;
use meetslot_config::load_config;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    let config = match load_config() {
        Ok(config) => Arc::new(config),
        Err(e) => {
            eprintln!("Failed to load config: {e}");
            return ExitCode::from(2);
        }
    };
    let _log_guard = logging::init_from_config(&config.logging);

    let services = match MeetslotServices::from_config(config.clone()).await {
        Ok(services) => services,
        Err(e) => {
            error!("Startup failed: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let app = build_app(services.gcal_state());

    // Bind and serve
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = match TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind {}: {}", addr, e);
            return ExitCode::FAILURE;
        }
    };
    info!("Starting server at http://{}", addr);

    if let Err(e) = axum::serve(listener, app.into_make_service()).await {
        error!("Server error: {}", e);
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
