// --- File: crates/meetslot_common/src/lib.rs ---

// Declare modules within this crate
pub mod error; // Error taxonomy shared by every crate
pub mod http; // Axum rendering of errors
pub mod logging; // tracing-subscriber setup
pub mod services; // Calendar service seam

// Re-export error types and utilities for easier access
pub use error::{
    auth_error, configuration_error, internal_error, server_config_error, transient_error,
    validation_error, ErrorKind, HttpStatusCode, MeetslotError,
};

pub use http::IntoHttpResponse;

pub use logging::{init, init_from_config, init_with_level, LogGuard};

pub use services::{BoxFuture, CalendarEvent, CalendarEventResult, CalendarService};
