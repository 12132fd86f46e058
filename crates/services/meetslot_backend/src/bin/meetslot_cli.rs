// File: services/meetslot_backend/src/bin/meetslot_cli.rs
//! Prints busy periods and free slots for the configured lookahead.

use chrono::{Duration, Utc};
use meetslot_backend::cli::{exit_code, render_report, EXIT_CONFIG, EXIT_OK};
use meetslot_backend::service_factory::MeetslotServices;
use meetslot_common::{logging, MeetslotError};
use meetslot_config::load_config;
use meetslot_gcal::logic::{fetch_busy, resolve_calendar_ids, suggest_slots};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::error;

async fn run(services: &MeetslotServices) -> Result<String, MeetslotError> {
    let defaults = &services.defaults;
    let tz = defaults.time_zone;
    let window_start = Utc::now().with_timezone(&tz);
    let window_end = window_start + Duration::hours(defaults.default_hours_ahead);
    let config = defaults.suggestion_config(window_start, window_end, defaults.slot_duration);

    let service = services.calendar_service.as_ref();
    let calendar_ids =
        resolve_calendar_ids(service, services.config.gcal.calendar_ids.as_deref()).await?;
    let busy = fetch_busy(service, &calendar_ids, window_start, window_end, tz).await?;
    let slots = suggest_slots(&busy, &config)?;

    Ok(render_report(&busy, &slots, &tz))
}

#[tokio::main]
async fn main() -> ExitCode {
    let config = match load_config() {
        Ok(config) => Arc::new(config),
        Err(e) => {
            eprintln!("Failed to load config: {e}");
            return ExitCode::from(EXIT_CONFIG);
        }
    };
    let _log_guard = logging::init_from_config(&config.logging);

    let result = match MeetslotServices::from_config(config).await {
        Ok(services) => run(&services).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(report) => {
            print!("{report}");
            ExitCode::from(EXIT_OK)
        }
        Err(e) => {
            error!("{}", e);
            eprintln!("{e}");
            ExitCode::from(exit_code(&e))
        }
    }
}
