// --- File: crates/meetslot_gcal/src/logic.rs ---
use crate::service::GcalServiceError;
use chrono::{
    DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc, Weekday,
};
use chrono_tz::Tz;
use meetslot_common::services::{CalendarEvent, CalendarService};
use meetslot_common::{server_config_error, validation_error, MeetslotError};
use meetslot_config::SchedulingConfig;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, info, warn};

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// Format used for every human-facing timestamp (CLI output).
pub const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M";

// --- Error Handling ---
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SuggestError {
    #[error("window end {end} must be after window start {start}")]
    InvalidWindow { start: String, end: String },
    #[error("slot duration must be positive, got {0} minutes")]
    InvalidDuration(i64),
    #[error("slot duration of {0} minutes is longer than a day")]
    DurationTooLong(i64),
    #[error("candidate step must be positive, got {0} minutes")]
    InvalidStep(i64),
    #[error("business hours start {0} must be before end {1}")]
    InvalidBusinessHours(NaiveTime, NaiveTime),
    #[error("lunch start {0} must be before lunch end {1}")]
    InvalidLunch(NaiveTime, NaiveTime),
    #[error("interval start {start} must be before end {end}")]
    InvalidInterval { start: String, end: String },
}

impl From<SuggestError> for MeetslotError {
    fn from(err: SuggestError) -> Self {
        MeetslotError::ConfigurationError(err.to_string())
    }
}

// --- Data Structures ---

/// A half-open `[start, end)` range in one time zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeInterval {
    start: DateTime<Tz>,
    end: DateTime<Tz>,
}

impl TimeInterval {
    pub fn new(start: DateTime<Tz>, end: DateTime<Tz>) -> Result<Self, SuggestError> {
        if start >= end {
            return Err(SuggestError::InvalidInterval {
                start: start.to_rfc3339(),
                end: end.to_rfc3339(),
            });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> DateTime<Tz> {
        self.start
    }

    pub fn end(&self) -> DateTime<Tz> {
        self.end
    }

    /// Touching endpoints do not overlap.
    pub fn overlaps(&self, other: &TimeInterval) -> bool {
        self.start < other.end && self.end > other.start
    }
}

/// Everything the engine needs for one request. Built once, then only read.
#[derive(Debug, Clone, PartialEq)]
pub struct SuggestionConfig {
    pub window_start: DateTime<Tz>,
    pub window_end: DateTime<Tz>,
    pub slot_duration: Duration,
    /// Spacing between candidate starts within a day.
    pub step: Duration,
    pub business_start: NaiveTime,
    pub business_end: NaiveTime,
    /// Days not listed here are skipped entirely.
    pub working_days: Vec<Weekday>,
    pub exclude_lunch: bool,
    pub lunch_start: NaiveTime,
    pub lunch_end: NaiveTime,
    /// Drop candidates starting earlier than this time of day.
    pub only_after: Option<NaiveTime>,
    pub time_zone: Tz,
    pub limit: Option<usize>,
}

impl SuggestionConfig {
    pub fn validate(&self) -> Result<(), SuggestError> {
        if self.window_end <= self.window_start {
            return Err(SuggestError::InvalidWindow {
                start: self.window_start.to_rfc3339(),
                end: self.window_end.to_rfc3339(),
            });
        }
        if self.slot_duration <= Duration::zero() {
            return Err(SuggestError::InvalidDuration(self.slot_duration.num_minutes()));
        }
        if self.slot_duration > Duration::days(1) {
            return Err(SuggestError::DurationTooLong(self.slot_duration.num_minutes()));
        }
        if self.step <= Duration::zero() {
            return Err(SuggestError::InvalidStep(self.step.num_minutes()));
        }
        if self.business_start >= self.business_end {
            return Err(SuggestError::InvalidBusinessHours(
                self.business_start,
                self.business_end,
            ));
        }
        if self.exclude_lunch && self.lunch_start >= self.lunch_end {
            return Err(SuggestError::InvalidLunch(self.lunch_start, self.lunch_end));
        }
        Ok(())
    }
}

/// Query parameters of `GET /suggest`.
#[derive(Deserialize, Debug, Default)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams, utoipa::ToSchema))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
pub struct SuggestQuery {
    /// Days to look ahead from now. Defaults to 3.
    #[cfg_attr(feature = "openapi", schema(example = 3))]
    pub days: Option<i64>,
    /// Only suggest slots starting in the afternoon. Defaults to false.
    pub only_afternoon: Option<bool>,
    /// Skip slots overlapping lunch. Defaults to false.
    pub exclude_lunch: Option<bool>,
    /// Slot length in minutes. Defaults to the configured slot duration.
    #[cfg_attr(feature = "openapi", schema(example = 30))]
    pub duration_minutes: Option<i64>,
    /// Maximum number of suggestions.
    pub limit: Option<usize>,
}

/// Body of `POST /calendar/suggest`.
#[derive(Deserialize, Debug, Default)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct TimeRangeRequest {
    /// Defaults to the configured lookahead (24 hours).
    #[cfg_attr(feature = "openapi", schema(example = 24))]
    pub hours_ahead: Option<i64>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct SlotView {
    #[cfg_attr(feature = "openapi", schema(example = "2025-05-05T14:00:00+08:00"))]
    pub start: String, // RFC 3339
    #[cfg_attr(feature = "openapi", schema(example = "2025-05-05T15:00:00+08:00"))]
    pub end: String, // RFC 3339
}

/// Body of `POST /book`.
#[derive(Deserialize, Debug, Clone)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct BookMeetingRequest {
    pub title: String,
    /// RFC 3339, or a local `YYYY-MM-DDTHH:MM[:SS]` read in the configured zone.
    #[cfg_attr(feature = "openapi", schema(example = "2025-05-05T14:00:00+08:00"))]
    pub start_time: String,
    #[cfg_attr(feature = "openapi", schema(example = "2025-05-05T15:00:00+08:00"))]
    pub end_time: String,
    pub description: Option<String>,
    #[serde(default)]
    pub attendees: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct BookingResponse {
    pub success: bool,
    pub event_link: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_id: Option<String>,
}

// --- Scheduling defaults ---

/// The `[scheduling]` config section, parsed and checked once at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct SchedulingDefaults {
    pub time_zone: Tz,
    pub business_start: NaiveTime,
    pub business_end: NaiveTime,
    pub working_days: Vec<Weekday>,
    pub lunch_start: NaiveTime,
    pub lunch_end: NaiveTime,
    pub afternoon_start: NaiveTime,
    pub slot_duration: Duration,
    /// `None` means one slot duration.
    pub step: Option<Duration>,
    pub default_days: i64,
    pub default_hours_ahead: i64,
    pub suggest_limit: Option<usize>,
}

pub const ALL_WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

fn hm(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or(NaiveTime::MIN)
}

impl Default for SchedulingDefaults {
    fn default() -> Self {
        Self {
            time_zone: chrono_tz::Asia::Hong_Kong,
            business_start: hm(9, 0),
            business_end: hm(18, 0),
            working_days: ALL_WEEKDAYS.to_vec(),
            lunch_start: hm(12, 0),
            lunch_end: hm(14, 0),
            afternoon_start: hm(14, 0),
            slot_duration: Duration::minutes(60),
            step: None,
            default_days: 3,
            default_hours_ahead: 24,
            suggest_limit: Some(10),
        }
    }
}

fn parse_time_of_day(field: &str, value: &str) -> Result<NaiveTime, MeetslotError> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .map_err(|_| server_config_error(format!("scheduling.{field}: expected HH:MM, got '{value}'")))
}

impl SchedulingDefaults {
    pub fn from_config(config: &SchedulingConfig) -> Result<Self, MeetslotError> {
        let base = Self::default();

        let time_zone = match &config.time_zone {
            Some(name) => Tz::from_str(name).map_err(|_| {
                server_config_error(format!("scheduling.time_zone: unknown zone '{name}'"))
            })?,
            None => base.time_zone,
        };
        let time = |field: &str, value: &Option<String>, fallback: NaiveTime| match value {
            Some(v) => parse_time_of_day(field, v),
            None => Ok(fallback),
        };
        let working_days = match &config.working_days {
            Some(days) => days
                .iter()
                .map(|d| {
                    Weekday::from_str(d).map_err(|_| {
                        server_config_error(format!("scheduling.working_days: unknown day '{d}'"))
                    })
                })
                .collect::<Result<Vec<_>, _>>()?,
            None => base.working_days,
        };
        if working_days.is_empty() {
            return Err(server_config_error(
                "scheduling.working_days: at least one day is required",
            ));
        }

        let bounded = |field: &str, value: Option<i64>, max: i64| match value {
            Some(v) if !(1..=max).contains(&v) => Err(server_config_error(format!(
                "scheduling.{field}: expected 1..={max}, got {v}"
            ))),
            other => Ok(other),
        };
        let slot_minutes = bounded("slot_duration_minutes", config.slot_duration_minutes, 24 * 60)?;
        let step_minutes = bounded("step_minutes", config.step_minutes, 24 * 60)?;
        let default_days = bounded("default_days", config.default_days, 366)?;
        let default_hours_ahead = bounded("default_hours_ahead", config.default_hours_ahead, 366 * 24)?;

        let defaults = Self {
            time_zone,
            business_start: time("work_start_time", &config.work_start_time, base.business_start)?,
            business_end: time("work_end_time", &config.work_end_time, base.business_end)?,
            working_days,
            lunch_start: time("lunch_start_time", &config.lunch_start_time, base.lunch_start)?,
            lunch_end: time("lunch_end_time", &config.lunch_end_time, base.lunch_end)?,
            afternoon_start: time(
                "afternoon_start_time",
                &config.afternoon_start_time,
                base.afternoon_start,
            )?,
            slot_duration: slot_minutes
                .map(Duration::minutes)
                .unwrap_or(base.slot_duration),
            step: step_minutes.map(Duration::minutes),
            default_days: default_days.unwrap_or(base.default_days),
            default_hours_ahead: default_hours_ahead.unwrap_or(base.default_hours_ahead),
            suggest_limit: config.suggest_limit.or(base.suggest_limit),
        };

        // Catch bad business hours or durations at startup rather than per request.
        let probe_start = Utc::now().with_timezone(&defaults.time_zone);
        defaults
            .suggestion_config(probe_start, probe_start + Duration::days(1), defaults.slot_duration)
            .validate()
            .map_err(|e| server_config_error(format!("scheduling: {e}")))?;
        Ok(defaults)
    }

    /// A config for the given window with every filter off.
    pub fn suggestion_config(
        &self,
        window_start: DateTime<Tz>,
        window_end: DateTime<Tz>,
        slot_duration: Duration,
    ) -> SuggestionConfig {
        SuggestionConfig {
            window_start,
            window_end,
            slot_duration,
            step: self.step.unwrap_or(slot_duration),
            business_start: self.business_start,
            business_end: self.business_end,
            working_days: self.working_days.clone(),
            exclude_lunch: false,
            lunch_start: self.lunch_start,
            lunch_end: self.lunch_end,
            only_after: None,
            time_zone: self.time_zone,
            limit: None,
        }
    }
}

// --- Availability Logic ---

/// Sorts and merges busy intervals into disjoint UTC ranges.
fn merge_busy_periods(busy: &[TimeInterval]) -> Vec<(DateTime<Utc>, DateTime<Utc>)> {
    let mut sorted: Vec<_> = busy
        .iter()
        .map(|b| (b.start.with_timezone(&Utc), b.end.with_timezone(&Utc)))
        .collect();
    sorted.sort_by_key(|(start, _)| *start);

    let mut merged: Vec<(DateTime<Utc>, DateTime<Utc>)> = Vec::with_capacity(sorted.len());
    for (start, end) in sorted {
        match merged.last_mut() {
            Some(last) if start <= last.1 => last.1 = last.1.max(end),
            _ => merged.push((start, end)),
        }
    }
    merged
}

/// `merged` must be sorted and disjoint, as returned by `merge_busy_periods`.
fn overlaps_busy(
    merged: &[(DateTime<Utc>, DateTime<Utc>)],
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> bool {
    let idx = merged.partition_point(|(_, busy_end)| *busy_end <= start);
    merged
        .get(idx)
        .is_some_and(|(busy_start, _)| *busy_start < end)
}

fn passes_filters(
    config: &SuggestionConfig,
    day: NaiveDate,
    local_start: NaiveDateTime,
    local_end: NaiveDateTime,
) -> bool {
    let time_of_day = local_start.time();
    if time_of_day < config.business_start || time_of_day >= config.business_end {
        return false;
    }
    if let Some(after) = config.only_after {
        if time_of_day < after {
            return false;
        }
    }
    if config.exclude_lunch {
        let lunch_start = day.and_time(config.lunch_start);
        let lunch_end = day.and_time(config.lunch_end);
        if local_start < lunch_end && local_end > lunch_start {
            return false;
        }
    }
    true
}

/// Computes free slot start times.
///
/// Candidates are laid out per day from `business_start` every `step` while the
/// whole slot still ends by `business_end`, and must lie inside the window.
/// A candidate survives only if it overlaps no busy interval and passes the
/// lunch, only-after and business-hours filters. Busy input may be unsorted
/// or overlapping. Output is ascending and free of duplicates.
///
/// Local start times that do not exist (DST gap) are skipped; ambiguous ones
/// resolve to the earlier instant.
pub fn suggest_slots(
    busy: &[TimeInterval],
    config: &SuggestionConfig,
) -> Result<Vec<DateTime<Tz>>, SuggestError> {
    config.validate()?;

    let tz = config.time_zone;
    let window_start = config.window_start.with_timezone(&tz);
    let window_end = config.window_end.with_timezone(&tz);
    let merged = merge_busy_periods(busy);

    debug!(
        "Suggesting {}min slots for {} - {}, working days {:?}, {} busy periods",
        config.slot_duration.num_minutes(),
        window_start,
        window_end,
        config.working_days,
        merged.len()
    );

    let mut slots = Vec::new();
    let last_day = window_end.date_naive();
    let mut day = window_start.date_naive();
    while day <= last_day {
        if config.working_days.contains(&day.weekday()) {
            let day_end = day.and_time(config.business_end);
            let mut local = day.and_time(config.business_start);
            while let Some(local_end) = local
                .checked_add_signed(config.slot_duration)
                .filter(|end| *end <= day_end)
            {
                let start = tz.from_local_datetime(&local).earliest();
                let end = start.and_then(|s| s.checked_add_signed(config.slot_duration));
                if let (Some(start), Some(end)) = (start, end) {
                    if start >= window_start
                        && end <= window_end
                        && !overlaps_busy(&merged, start.with_timezone(&Utc), end.with_timezone(&Utc))
                        && passes_filters(config, day, local, local_end)
                    {
                        slots.push(start);
                    }
                }
                local = match local.checked_add_signed(config.step) {
                    Some(next) => next,
                    None => break,
                };
            }
        }
        day = match day.succ_opt() {
            Some(next) => next,
            None => break,
        };
    }

    slots.sort();
    slots.dedup();
    if let Some(limit) = config.limit {
        slots.truncate(limit);
    }
    Ok(slots)
}

/// Formats a timestamp in the display zone as `YYYY-MM-DD HH:MM`.
pub fn format_display(time: &DateTime<Tz>, tz: &Tz) -> String {
    time.with_timezone(tz).format(DISPLAY_FORMAT).to_string()
}

pub fn slot_view(start: &DateTime<Tz>, duration: Duration) -> SlotView {
    SlotView {
        start: start.to_rfc3339(),
        end: (*start + duration).to_rfc3339(),
    }
}

// --- Busy-interval source ---

/// The configured calendars, or every calendar of the user when none are configured.
pub async fn resolve_calendar_ids<S>(
    service: &S,
    configured: Option<&[String]>,
) -> Result<Vec<String>, GcalServiceError>
where
    S: CalendarService<Error = GcalServiceError> + ?Sized,
{
    match configured {
        Some(ids) if !ids.is_empty() => Ok(ids.to_vec()),
        _ => {
            let ids = service.list_calendar_ids().await?;
            info!("Discovered {} calendars", ids.len());
            Ok(ids)
        }
    }
}

/// Fetches busy intervals from every calendar in `calendar_ids`, normalized to `tz`.
pub async fn fetch_busy<S>(
    service: &S,
    calendar_ids: &[String],
    window_start: DateTime<Tz>,
    window_end: DateTime<Tz>,
    tz: Tz,
) -> Result<Vec<TimeInterval>, GcalServiceError>
where
    S: CalendarService<Error = GcalServiceError> + ?Sized,
{
    let start_utc = window_start.with_timezone(&Utc);
    let end_utc = window_end.with_timezone(&Utc);

    let mut busy = Vec::new();
    for calendar_id in calendar_ids {
        let periods = service
            .get_busy_times(calendar_id, start_utc, end_utc)
            .await?;
        debug!("{} busy periods in calendar {}", periods.len(), calendar_id);
        for (start, end) in periods {
            match TimeInterval::new(start.with_timezone(&tz), end.with_timezone(&tz)) {
                Ok(interval) => busy.push(interval),
                Err(e) => warn!("Skipping busy period from {}: {}", calendar_id, e),
            }
        }
    }
    Ok(busy)
}

// --- Booking Logic ---

fn parse_booking_time(field: &str, value: &str, tz: &Tz) -> Result<DateTime<Utc>, MeetslotError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }
    let naive = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M"))
        .map_err(|_| validation_error(format!("{field}: expected an ISO-8601 timestamp, got '{value}'")))?;
    tz.from_local_datetime(&naive)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| validation_error(format!("{field}: '{value}' is ambiguous or skipped in {tz}")))
}

fn is_plausible_email(address: &str) -> bool {
    let mut parts = address.split('@');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => {
            !local.is_empty() && !domain.is_empty() && !address.contains(char::is_whitespace)
        }
        _ => false,
    }
}

/// Checks a booking request and turns it into a calendar event.
pub fn validate_booking(request: &BookMeetingRequest, tz: Tz) -> Result<CalendarEvent, MeetslotError> {
    let title = request.title.trim();
    if title.is_empty() {
        return Err(validation_error("title must not be empty"));
    }
    let start_time = parse_booking_time("start_time", &request.start_time, &tz)?;
    let end_time = parse_booking_time("end_time", &request.end_time, &tz)?;
    if end_time <= start_time {
        return Err(validation_error("end_time must be after start_time"));
    }
    if let Some(bad) = request.attendees.iter().find(|a| !is_plausible_email(a)) {
        return Err(validation_error(format!("invalid attendee email '{bad}'")));
    }

    Ok(CalendarEvent {
        start_time,
        end_time,
        summary: title.to_string(),
        description: request.description.clone(),
        attendees: request.attendees.clone(),
        time_zone: tz.name().to_string(),
    })
}

/// Validates the request and creates the event in `calendar_id`.
pub async fn book_meeting<S>(
    service: &S,
    calendar_id: &str,
    request: &BookMeetingRequest,
    tz: Tz,
) -> Result<BookingResponse, MeetslotError>
where
    S: CalendarService<Error = GcalServiceError> + ?Sized,
{
    let event = validate_booking(request, tz)?;
    let result = service.create_event(calendar_id, event).await?;
    info!("Created event {:?} in {}", result.event_id, calendar_id);

    let event_link = result.event_link.unwrap_or_else(|| {
        warn!("Calendar returned no link for event {:?}", result.event_id);
        String::new()
    });
    Ok(BookingResponse {
        success: true,
        event_link,
        event_id: result.event_id,
    })
}
