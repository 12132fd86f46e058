//! Service abstractions for the calendar provider.
//!
//! Handlers and the CLI only see this trait, so the Google implementation can
//! be swapped for an in-memory one in tests.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;

/// Type alias for a boxed future that returns a Result
pub type BoxFuture<'a, T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'a>>;

/// A trait for calendar service operations.
///
/// One network round trip per call; no retries happen behind it.
pub trait CalendarService: Send + Sync {
    /// Error type returned by calendar service operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Lists the ids of all calendars visible to the authenticated user,
    /// skipping deleted entries.
    fn list_calendar_ids(&self) -> BoxFuture<'_, Vec<String>, Self::Error>;

    /// Get busy time intervals within a specified time range.
    ///
    /// Intervals may come back unsorted or overlapping.
    #[allow(clippy::type_complexity)]
    fn get_busy_times(
        &self,
        calendar_id: &str,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> BoxFuture<'_, Vec<(DateTime<Utc>, DateTime<Utc>)>, Self::Error>;

    /// Create a calendar event.
    fn create_event(
        &self,
        calendar_id: &str,
        event: CalendarEvent,
    ) -> BoxFuture<'_, CalendarEventResult, Self::Error>;
}

/// Represents a calendar event to be created.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CalendarEvent {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub summary: String,
    pub description: Option<String>,
    pub attendees: Vec<String>,
    /// IANA zone the event is displayed in.
    pub time_zone: String,
}

/// Represents the result of a calendar event operation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CalendarEventResult {
    pub event_id: Option<String>,
    /// Link to the event in the provider's web UI.
    pub event_link: Option<String>,
    pub status: String,
}
