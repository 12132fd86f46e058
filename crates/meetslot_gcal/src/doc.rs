// File: crates/meetslot_gcal/src/doc.rs
#![cfg(feature = "openapi")]

use utoipa::OpenApi;

use crate::logic::{BookMeetingRequest, BookingResponse, SlotView, SuggestQuery, TimeRangeRequest};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::suggest_handler,
        crate::handlers::calendar_suggest_handler,
        crate::handlers::book_handler
    ),
    components(
        schemas(
            SuggestQuery,
            TimeRangeRequest,
            SlotView,
            BookMeetingRequest,
            BookingResponse
        )
    ),
    tags(
        (name = "Suggest", description = "Free slot suggestions"),
        (name = "Booking", description = "Meeting booking")
    )
)]
pub struct GcalApiDoc;
