// --- File: crates/services/meetslot_backend/src/service_factory.rs ---
//! Builds the calendar service and scheduling defaults from configuration.
//!
//! Shared by the HTTP server and the CLI so both authenticate and validate
//! settings the same way.

use meetslot_common::services::CalendarService;
use meetslot_common::MeetslotError;
use meetslot_config::AppConfig;
use meetslot_gcal::auth::create_calendar_hub;
use meetslot_gcal::handlers::GcalState;
use meetslot_gcal::logic::SchedulingDefaults;
use meetslot_gcal::service::{GcalServiceError, GoogleCalendarService};
use std::sync::Arc;
use tracing::info;

/// Everything a front end needs, built once at startup.
#[derive(Clone)]
pub struct MeetslotServices {
    pub config: Arc<AppConfig>,
    pub defaults: SchedulingDefaults,
    pub calendar_service: Arc<dyn CalendarService<Error = GcalServiceError>>,
}

impl MeetslotServices {
    /// Validates the scheduling section, then authenticates against Google.
    ///
    /// Scheduling problems surface before any credential file is touched.
    pub async fn from_config(config: Arc<AppConfig>) -> Result<Self, MeetslotError> {
        let defaults = SchedulingDefaults::from_config(&config.scheduling)?;
        info!(
            "Scheduling in {} from {} to {}, {} minute slots",
            defaults.time_zone,
            defaults.business_start,
            defaults.business_end,
            defaults.slot_duration.num_minutes()
        );

        let hub = create_calendar_hub(&config.gcal).await?;
        info!("Google Calendar service initialized.");

        Ok(Self {
            config,
            defaults,
            calendar_service: Arc::new(GoogleCalendarService::new(Arc::new(hub))),
        })
    }

    /// Router state for the HTTP handlers.
    pub fn gcal_state(&self) -> Arc<GcalState> {
        Arc::new(GcalState::new(
            self.config.clone(),
            self.defaults.clone(),
            self.calendar_service.clone(),
        ))
    }
}
