// --- File: crates/meetslot_gcal/src/service.rs ---
//! Google Calendar service implementation.
//!
//! This module provides an implementation of the CalendarService trait for Google Calendar.
//! API failures are classified here so callers only ever see auth, transient or
//! validation errors.

use chrono::{DateTime, Utc};
use google_calendar3::api::{
    Event, EventAttendee, EventDateTime, FreeBusyRequest, FreeBusyRequestItem,
};
use meetslot_common::services::{BoxFuture, CalendarEvent, CalendarEventResult, CalendarService};
use meetslot_common::MeetslotError;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::auth::HubType;

/// Errors that can occur when interacting with Google Calendar.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GcalServiceError {
    #[error("Google Calendar rejected the credentials: {0}")]
    Auth(String),
    #[error("Google Calendar unavailable: {0}")]
    Transient(String),
    #[error("Google Calendar rejected the request: {0}")]
    Validation(String),
    #[error("Unexpected Google Calendar response: {0}")]
    Upstream(String),
}

impl From<GcalServiceError> for MeetslotError {
    fn from(err: GcalServiceError) -> Self {
        match err {
            GcalServiceError::Auth(m) => MeetslotError::AuthError(m),
            GcalServiceError::Transient(m) => MeetslotError::TransientNetworkError(m),
            GcalServiceError::Validation(m) => MeetslotError::ValidationError(m),
            GcalServiceError::Upstream(m) => MeetslotError::InternalError(m),
        }
    }
}

fn classify_status(code: u16, message: String) -> GcalServiceError {
    match code {
        403 if message.to_lowercase().contains("rate") => GcalServiceError::Transient(message),
        401 | 403 => GcalServiceError::Auth(message),
        408 | 429 | 500..=599 => GcalServiceError::Transient(message),
        400..=499 => GcalServiceError::Validation(message),
        _ => GcalServiceError::Upstream(message),
    }
}

/// Maps the per-calendar error reasons of a free/busy answer.
///
/// Backend and quota reasons are transient; anything else (typically
/// `notFound` for a configured id) is an upstream fault, never the caller's.
fn classify_calendar_errors(calendar_id: &str, reasons: &[String]) -> GcalServiceError {
    let message = format!("calendar {}: {}", calendar_id, reasons.join(", "));
    let transient = reasons.iter().any(|reason| {
        matches!(
            reason.as_str(),
            "backendError" | "internalError" | "rateLimitExceeded" | "userRateLimitExceeded"
        )
    });
    if transient {
        GcalServiceError::Transient(message)
    } else {
        GcalServiceError::Upstream(message)
    }
}

/// Maps a raw API error onto the service error taxonomy.
pub fn classify_api_error(err: google_calendar3::Error) -> GcalServiceError {
    use google_calendar3::Error as ApiError;
    match err {
        ApiError::MissingToken(e) => GcalServiceError::Auth(e.to_string()),
        ApiError::MissingAPIKey => GcalServiceError::Auth("missing API key".to_string()),
        ApiError::HttpError(e) => GcalServiceError::Transient(e.to_string()),
        ApiError::Io(e) => GcalServiceError::Transient(e.to_string()),
        ApiError::Failure(response) => {
            let status = response.status();
            classify_status(status.as_u16(), format!("HTTP {}", status))
        }
        ApiError::BadRequest(body) => {
            let code = body
                .pointer("/error/code")
                .and_then(|c| c.as_u64())
                .and_then(|c| u16::try_from(c).ok())
                .unwrap_or(400);
            let message = body
                .pointer("/error/message")
                .and_then(|m| m.as_str())
                .unwrap_or("bad request")
                .to_string();
            classify_status(code, message)
        }
        other => GcalServiceError::Upstream(other.to_string()),
    }
}

/// Google Calendar service implementation.
pub struct GoogleCalendarService {
    calendar_hub: Arc<HubType>,
}

impl GoogleCalendarService {
    /// Create a new Google Calendar service around an authenticated hub.
    pub fn new(calendar_hub: Arc<HubType>) -> Self {
        Self { calendar_hub }
    }
}

impl CalendarService for GoogleCalendarService {
    type Error = GcalServiceError;

    /// Walks every page of the user's calendar list.
    fn list_calendar_ids(&self) -> BoxFuture<'_, Vec<String>, Self::Error> {
        let calendar_hub = self.calendar_hub.clone();

        Box::pin(async move {
            let mut ids = Vec::new();
            let mut page_token: Option<String> = None;
            loop {
                let mut call = calendar_hub.calendar_list().list();
                if let Some(token) = &page_token {
                    call = call.page_token(token);
                }
                let (_response, list) = call.doit().await.map_err(classify_api_error)?;

                for entry in list.items.unwrap_or_default() {
                    if entry.deleted.unwrap_or(false) {
                        continue;
                    }
                    if let Some(id) = entry.id {
                        debug!(
                            "Calendar {} ({})",
                            id,
                            entry.summary.as_deref().unwrap_or("untitled")
                        );
                        ids.push(id);
                    }
                }

                match list.next_page_token {
                    Some(token) => page_token = Some(token),
                    None => break,
                }
            }
            Ok(ids)
        })
    }

    /// Retrieves busy time periods for a specified calendar within a given time range.
    ///
    /// # Arguments
    ///
    /// * `calendar_id` - The ID of the calendar to check (e.g., "primary" or a specific calendar ID)
    /// * `start_time` - The start of the time range to check for busy periods
    /// * `end_time` - The end of the time range to check for busy periods
    ///
    /// # Errors
    ///
    /// Returns a `GcalServiceError` if the API call fails or the calendar
    /// reports its own errors (for instance "notFound").
    fn get_busy_times(
        &self,
        calendar_id: &str,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> BoxFuture<'_, Vec<(DateTime<Utc>, DateTime<Utc>)>, Self::Error> {
        let calendar_id = calendar_id.to_string();
        let calendar_hub = self.calendar_hub.clone();

        Box::pin(async move {
            let req = FreeBusyRequest {
                time_min: Some(start_time),
                time_max: Some(end_time),
                time_zone: Some("UTC".to_string()),
                items: Some(vec![FreeBusyRequestItem {
                    id: Some(calendar_id.clone()),
                }]),
                ..Default::default()
            };

            let (_response, freebusy_response) = calendar_hub
                .freebusy()
                .query(req)
                .doit()
                .await
                .map_err(classify_api_error)?;

            let mut busy_periods = Vec::new();

            let cal_info = freebusy_response
                .calendars
                .and_then(|mut calendars| calendars.remove(&calendar_id));
            if let Some(cal_info) = cal_info {
                if let Some(errors) = cal_info.errors.filter(|e| !e.is_empty()) {
                    let reasons: Vec<String> = errors
                        .into_iter()
                        .filter_map(|e| e.reason)
                        .collect();
                    return Err(classify_calendar_errors(&calendar_id, &reasons));
                }
                for period in cal_info.busy.unwrap_or_default() {
                    match (period.start, period.end) {
                        (Some(start_dt), Some(end_dt)) => busy_periods.push((start_dt, end_dt)),
                        _ => warn!("Skipping busy period with missing start/end: {:?}", period),
                    }
                }
            }
            Ok(busy_periods)
        })
    }

    /// Creates a new calendar event in the specified calendar.
    ///
    /// Attendees receive invitations. The returned result carries the
    /// event's web link.
    fn create_event(
        &self,
        calendar_id: &str,
        event: CalendarEvent,
    ) -> BoxFuture<'_, CalendarEventResult, Self::Error> {
        let calendar_id = calendar_id.to_string();
        let calendar_hub = self.calendar_hub.clone();

        Box::pin(async move {
            let attendees: Vec<EventAttendee> = event
                .attendees
                .iter()
                .map(|email| EventAttendee {
                    email: Some(email.clone()),
                    ..Default::default()
                })
                .collect();
            let has_attendees = !attendees.is_empty();

            let new_event = Event {
                summary: Some(event.summary),
                description: event.description,
                start: Some(EventDateTime {
                    date_time: Some(event.start_time),
                    time_zone: Some(event.time_zone.clone()),
                    ..Default::default()
                }),
                end: Some(EventDateTime {
                    date_time: Some(event.end_time),
                    time_zone: Some(event.time_zone),
                    ..Default::default()
                }),
                attendees: has_attendees.then_some(attendees),
                ..Default::default()
            };

            let mut call = calendar_hub.events().insert(new_event, &calendar_id);
            if has_attendees {
                call = call.send_updates("all");
            }
            let (_response, created_event) = call.doit().await.map_err(classify_api_error)?;
            info!("Inserted event {:?} into {}", created_event.id, calendar_id);

            Ok(CalendarEventResult {
                event_id: created_event.id,
                event_link: created_event.html_link,
                status: created_event
                    .status
                    .unwrap_or_else(|| "confirmed".to_string()),
            })
        })
    }
}
