// --- File: crates/services/meetslot_backend/src/cli.rs ---
//! Report rendering and exit codes for `meetslot-cli`.

use chrono::DateTime;
use chrono_tz::Tz;
use meetslot_common::MeetslotError;
use meetslot_gcal::logic::{format_display, TimeInterval};
use std::fmt::Write;

pub const EXIT_OK: u8 = 0;
pub const EXIT_OTHER: u8 = 1;
pub const EXIT_CONFIG: u8 = 2;
pub const EXIT_AUTH: u8 = 3;
pub const EXIT_NETWORK: u8 = 4;

pub fn exit_code(err: &MeetslotError) -> u8 {
    match err {
        MeetslotError::ConfigurationError(_) | MeetslotError::ServerConfigError(_) => EXIT_CONFIG,
        MeetslotError::AuthError(_) => EXIT_AUTH,
        MeetslotError::TransientNetworkError(_) => EXIT_NETWORK,
        MeetslotError::ValidationError(_) | MeetslotError::InternalError(_) => EXIT_OTHER,
    }
}

/// Busy periods as `start to end`, then one start time per free slot, all in `tz`.
pub fn render_report(busy: &[TimeInterval], slots: &[DateTime<Tz>], tz: &Tz) -> String {
    let mut out = String::new();

    let mut busy: Vec<&TimeInterval> = busy.iter().collect();
    busy.sort_by_key(|b| b.start());

    let _ = writeln!(out, "Busy periods ({tz}):");
    if busy.is_empty() {
        let _ = writeln!(out, "  none");
    }
    for period in busy {
        let _ = writeln!(
            out,
            "  {} to {}",
            format_display(&period.start(), tz),
            format_display(&period.end(), tz)
        );
    }

    let _ = writeln!(out, "\nFree slots ({tz}):");
    if slots.is_empty() {
        let _ = writeln!(out, "  none");
    }
    for slot in slots {
        let _ = writeln!(out, "  {}", format_display(slot, tz));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use meetslot_common::{auth_error, configuration_error, internal_error, transient_error};

    #[test]
    fn test_exit_codes() {
        assert_eq!(exit_code(&configuration_error("bad window")), EXIT_CONFIG);
        assert_eq!(
            exit_code(&MeetslotError::ServerConfigError("bad zone".into())),
            EXIT_CONFIG
        );
        assert_eq!(exit_code(&auth_error("expired")), EXIT_AUTH);
        assert_eq!(exit_code(&transient_error("timeout")), EXIT_NETWORK);
        assert_eq!(exit_code(&internal_error("boom")), EXIT_OTHER);
    }

    #[test]
    fn test_render_report() {
        let tz = chrono_tz::Asia::Hong_Kong;
        let at = |h| tz.with_ymd_and_hms(2025, 5, 5, h, 0, 0).unwrap();
        let busy = [TimeInterval::new(at(9), at(11)).unwrap()];
        let report = render_report(&busy, &[at(11), at(14)], &tz);

        assert_eq!(
            report,
            "Busy periods (Asia/Hong_Kong):\n  2025-05-05 09:00 to 2025-05-05 11:00\n\n\
             Free slots (Asia/Hong_Kong):\n  2025-05-05 11:00\n  2025-05-05 14:00\n"
        );
    }

    #[test]
    fn test_render_report_empty() {
        let tz = chrono_tz::UTC;
        let report = render_report(&[], &[], &tz);
        assert!(report.contains("Busy periods (UTC):\n  none"));
        assert!(report.contains("Free slots (UTC):\n  none"));
    }
}
