// File: crates/meetslot_gcal/src/handlers.rs
use crate::logic::{
    book_meeting, fetch_busy, resolve_calendar_ids, slot_view, suggest_slots, BookMeetingRequest,
    BookingResponse, SchedulingDefaults, SlotView, SuggestQuery, SuggestionConfig,
    TimeRangeRequest,
};
use crate::service::GcalServiceError;
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    response::Json,
};
use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;
use meetslot_common::services::CalendarService;
use meetslot_common::{configuration_error, validation_error, MeetslotError};
use meetslot_config::AppConfig;
use std::sync::Arc;
use tracing::info;

/// Lookahead beyond a year is refused outright.
const MAX_LOOKAHEAD_HOURS: i64 = 366 * 24;
/// A slot may not outlast a day.
const MAX_SLOT_MINUTES: i64 = 24 * 60;

pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

// Shared state needed by the handlers
#[derive(Clone)]
pub struct GcalState {
    pub config: Arc<AppConfig>,
    pub defaults: SchedulingDefaults,
    pub calendar_service: Arc<dyn CalendarService<Error = GcalServiceError>>,
    pub clock: Clock,
}

impl GcalState {
    pub fn new(
        config: Arc<AppConfig>,
        defaults: SchedulingDefaults,
        calendar_service: Arc<dyn CalendarService<Error = GcalServiceError>>,
    ) -> Self {
        Self::with_clock(config, defaults, calendar_service, Arc::new(Utc::now))
    }

    /// Like `new`, with a fixed notion of "now" (used by tests).
    pub fn with_clock(
        config: Arc<AppConfig>,
        defaults: SchedulingDefaults,
        calendar_service: Arc<dyn CalendarService<Error = GcalServiceError>>,
        clock: Clock,
    ) -> Self {
        Self {
            config,
            defaults,
            calendar_service,
            clock,
        }
    }

    fn now(&self) -> DateTime<Tz> {
        (self.clock)().with_timezone(&self.defaults.time_zone)
    }

    fn booking_calendar_id(&self) -> &str {
        self.config
            .gcal
            .booking_calendar_id
            .as_deref()
            .unwrap_or("primary")
    }

    /// Busy intervals and suggestions for `[now, now + lookahead)`.
    async fn suggestions(
        &self,
        lookahead: Duration,
        slot_duration: Duration,
        tweak: impl FnOnce(&mut SuggestionConfig),
    ) -> Result<Vec<DateTime<Tz>>, MeetslotError> {
        let window_start = self.now();
        let window_end = window_start
            .checked_add_signed(lookahead)
            .ok_or_else(|| configuration_error("lookahead window is out of range"))?;

        let mut config = self
            .defaults
            .suggestion_config(window_start, window_end, slot_duration);
        tweak(&mut config);
        config.validate()?;

        let service = self.calendar_service.as_ref();
        let calendar_ids =
            resolve_calendar_ids(service, self.config.gcal.calendar_ids.as_deref()).await?;
        let busy = fetch_busy(
            service,
            &calendar_ids,
            window_start,
            window_end,
            self.defaults.time_zone,
        )
        .await?;

        Ok(suggest_slots(&busy, &config)?)
    }
}

fn lookahead_hours(hours: i64) -> Result<Duration, MeetslotError> {
    if hours <= 0 {
        return Err(configuration_error(format!(
            "lookahead must be positive, got {hours} hours"
        )));
    }
    if hours > MAX_LOOKAHEAD_HOURS {
        return Err(configuration_error(format!(
            "lookahead of {hours} hours exceeds the maximum of {MAX_LOOKAHEAD_HOURS}"
        )));
    }
    Duration::try_hours(hours)
        .ok_or_else(|| configuration_error(format!("lookahead of {hours} hours is out of range")))
}

fn slot_minutes(minutes: i64) -> Result<Duration, MeetslotError> {
    if minutes > MAX_SLOT_MINUTES {
        return Err(configuration_error(format!(
            "slot duration of {minutes} minutes exceeds one day"
        )));
    }
    Duration::try_minutes(minutes)
        .ok_or_else(|| configuration_error(format!("slot duration {minutes} is out of range")))
}

/// Handler for the liveness check.
pub async fn root_handler() -> &'static str {
    "meetslot is running"
}

/// Handler suggesting free slot start times over the next few days.
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/suggest",
    params(SuggestQuery),
    responses(
        (status = 200, description = "Free slot start times (RFC 3339)", body = [String]),
        (status = 400, description = "Unparsable parameters or invalid window/duration"),
        (status = 502, description = "Calendar credentials rejected"),
        (status = 503, description = "Calendar unreachable")
    ),
    tag = "Suggest"
))]
pub async fn suggest_handler(
    State(state): State<Arc<GcalState>>,
    query: Result<Query<SuggestQuery>, QueryRejection>,
) -> Result<Json<Vec<String>>, MeetslotError> {
    let Query(query) = query.map_err(|e| validation_error(e.body_text()))?;
    info!("Suggest request: {:?}", query);

    let defaults = &state.defaults;
    let days = query.days.unwrap_or(defaults.default_days);
    let lookahead = lookahead_hours(days.saturating_mul(24))?;
    let slot_duration = match query.duration_minutes {
        Some(minutes) => slot_minutes(minutes)?,
        None => defaults.slot_duration,
    };
    let only_after = query
        .only_afternoon
        .unwrap_or(false)
        .then_some(defaults.afternoon_start);
    let exclude_lunch = query.exclude_lunch.unwrap_or(false);
    let limit = query.limit.or(defaults.suggest_limit);

    let slots = state
        .suggestions(lookahead, slot_duration, |config| {
            config.only_after = only_after;
            config.exclude_lunch = exclude_lunch;
            config.limit = limit;
        })
        .await?;

    info!("Suggesting {} slots", slots.len());
    Ok(Json(slots.iter().map(|s| s.to_rfc3339()).collect()))
}

/// Handler listing every free slot within the next `hours_ahead` hours.
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/calendar/suggest",
    request_body = TimeRangeRequest,
    responses(
        (status = 200, description = "Free slots", body = [SlotView]),
        (status = 400, description = "Invalid lookahead"),
        (status = 502, description = "Calendar credentials rejected"),
        (status = 503, description = "Calendar unreachable")
    ),
    tag = "Suggest"
))]
pub async fn calendar_suggest_handler(
    State(state): State<Arc<GcalState>>,
    payload: Result<Json<TimeRangeRequest>, JsonRejection>,
) -> Result<Json<Vec<SlotView>>, MeetslotError> {
    let Json(payload) = payload.map_err(|e| validation_error(e.body_text()))?;
    let hours = payload
        .hours_ahead
        .unwrap_or(state.defaults.default_hours_ahead);
    let lookahead = lookahead_hours(hours)?;
    let slot_duration = state.defaults.slot_duration;

    let slots = state.suggestions(lookahead, slot_duration, |_| {}).await?;
    Ok(Json(
        slots.iter().map(|s| slot_view(s, slot_duration)).collect(),
    ))
}

/// Handler to book a meeting.
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/book",
    request_body = BookMeetingRequest,
    responses(
        (status = 200, description = "Event created", body = BookingResponse),
        (status = 400, description = "Invalid booking payload"),
        (status = 502, description = "Calendar credentials rejected"),
        (status = 503, description = "Calendar unreachable")
    ),
    tag = "Booking"
))]
pub async fn book_handler(
    State(state): State<Arc<GcalState>>,
    payload: Result<Json<BookMeetingRequest>, JsonRejection>,
) -> Result<Json<BookingResponse>, MeetslotError> {
    let Json(payload) = payload.map_err(|e| validation_error(e.body_text()))?;
    info!("Booking request: {} ({} - {})", payload.title, payload.start_time, payload.end_time);
    let response = book_meeting(
        state.calendar_service.as_ref(),
        state.booking_calendar_id(),
        &payload,
        state.defaults.time_zone,
    )
    .await?;
    Ok(Json(response))
}
