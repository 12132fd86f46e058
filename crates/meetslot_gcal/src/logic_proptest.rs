#[cfg(test)]
mod tests {
    use crate::logic::{suggest_slots, SchedulingDefaults, SuggestionConfig, TimeInterval};
    use chrono::{DateTime, Duration, NaiveTime, TimeZone, Weekday};
    use chrono_tz::Tz;
    use proptest::prelude::*;

    // Helper function to create a fixed window starting on Monday 2025-05-05
    fn create_window(start_offset_hours: i64, duration_days: i64) -> (DateTime<Tz>, DateTime<Tz>) {
        let time_zone = Tz::Europe__Zurich;
        let start = time_zone.with_ymd_and_hms(2025, 5, 5, 0, 0, 0).unwrap()
            + Duration::hours(start_offset_hours);
        let end = start + Duration::days(duration_days);
        (start, end)
    }

    // Helper function to create a list of busy periods from (offset, length) pairs in minutes
    fn create_busy_periods(base_time: DateTime<Tz>, spans: &[(i64, i64)]) -> Vec<TimeInterval> {
        spans
            .iter()
            .map(|(offset, length)| {
                let start = base_time + Duration::minutes(*offset);
                TimeInterval::new(start, start + Duration::minutes(*length)).unwrap()
            })
            .collect()
    }

    fn create_config(
        start: DateTime<Tz>,
        end: DateTime<Tz>,
        duration_minutes: i64,
        step_minutes: i64,
        work_start_hour: u32,
        work_end_hour: u32,
    ) -> SuggestionConfig {
        let mut config = SchedulingDefaults {
            time_zone: Tz::Europe__Zurich,
            ..Default::default()
        }
        .suggestion_config(start, end, Duration::minutes(duration_minutes));
        config.step = Duration::minutes(step_minutes);
        config.business_start = NaiveTime::from_hms_opt(work_start_hour, 0, 0).unwrap();
        config.business_end = NaiveTime::from_hms_opt(work_end_hour, 0, 0).unwrap();
        config
    }

    fn busy_spans() -> impl Strategy<Value = Vec<(i64, i64)>> {
        prop::collection::vec((0..(5 * 24 * 60i64), 1..(6 * 60i64)), 0..8)
    }

    proptest! {
        // Test that slots are within working hours
        #[test]
        fn test_slots_within_working_hours(
            start_offset_hours in 0..24i64,
            duration_days in 1..5i64,
            appointment_duration_minutes in 15..120i64,
            work_start_hour in 0..12u32,
            work_end_hour in 13..23u32,
            spans in busy_spans(),
        ) {
            let (start, end) = create_window(start_offset_hours, duration_days);
            let busy = create_busy_periods(start, &spans);
            let config = create_config(start, end, appointment_duration_minutes, 15, work_start_hour, work_end_hour);

            let slots = suggest_slots(&busy, &config).unwrap();

            let work_start = config.business_start;
            let work_end = config.business_end;
            for slot in &slots {
                let slot_end = *slot + config.slot_duration;
                prop_assert!(slot.time() >= work_start,
                    "Slot should start after work hours begin: {:?}, work start: {:?}",
                    slot, work_start);
                prop_assert!(slot_end.time() <= work_end && slot_end.date_naive() == slot.date_naive(),
                    "Slot should end before work hours end: {:?}, work end: {:?}",
                    slot_end, work_end);
                prop_assert!(*slot >= start && slot_end <= end, "Slot {:?} outside window", slot);
            }
        }

        // Test that slots don't overlap with busy periods
        #[test]
        fn test_slots_dont_overlap_busy_periods(
            duration_days in 1..5i64,
            appointment_duration_minutes in 15..120i64,
            step_minutes in 5..60i64,
            spans in busy_spans(),
        ) {
            let (start, end) = create_window(0, duration_days);
            let busy = create_busy_periods(start, &spans);
            let config = create_config(start, end, appointment_duration_minutes, step_minutes, 0, 23);

            let slots = suggest_slots(&busy, &config).unwrap();

            for slot in &slots {
                let slot_end = *slot + config.slot_duration;
                for period in &busy {
                    // Check for overlap: (StartA < EndB) and (EndA > StartB)
                    let overlaps = *slot < period.end() && slot_end > period.start();
                    prop_assert!(!overlaps,
                        "Slot {:?} to {:?} overlaps with busy period {:?}",
                        slot, slot_end, period);
                }
            }
        }

        // Every candidate that avoids all busy periods survives
        #[test]
        fn test_free_candidates_are_retained(
            appointment_duration_minutes in prop::sample::select(vec![15i64, 30, 60]),
            spans in busy_spans(),
        ) {
            let (start, end) = create_window(0, 2);
            let busy = create_busy_periods(start, &spans);
            let config = create_config(start, end, appointment_duration_minutes, appointment_duration_minutes, 9, 18);

            let slots = suggest_slots(&busy, &config).unwrap();

            let mut expected = Vec::new();
            for day in 0..2 {
                let mut candidate = start + Duration::days(day) + Duration::hours(9);
                let day_end = start + Duration::days(day) + Duration::hours(18);
                while candidate + config.slot_duration <= day_end {
                    let candidate_end = candidate + config.slot_duration;
                    if busy.iter().all(|b| candidate_end <= b.start() || candidate >= b.end()) {
                        expected.push(candidate);
                    }
                    candidate += config.step;
                }
            }
            prop_assert_eq!(slots, expected);
        }

        // Output is strictly ascending, repeatable, and only on working days
        #[test]
        fn test_slots_ascending_and_repeatable(
            start_offset_hours in 0..48i64,
            duration_days in 1..8i64,
            appointment_duration_minutes in 15..120i64,
            step_minutes in 5..90i64,
            weekdays_only in any::<bool>(),
            spans in busy_spans(),
        ) {
            let (start, end) = create_window(start_offset_hours, duration_days);
            let busy = create_busy_periods(start, &spans);
            let mut config = create_config(start, end, appointment_duration_minutes, step_minutes, 9, 18);
            if weekdays_only {
                config.working_days = vec![Weekday::Mon, Weekday::Tue, Weekday::Wed, Weekday::Thu, Weekday::Fri];
            }

            let first = suggest_slots(&busy, &config).unwrap();
            let second = suggest_slots(&busy, &config).unwrap();

            prop_assert!(first.windows(2).all(|w| w[0] < w[1]));
            for slot in &first {
                prop_assert!(config.working_days.contains(&chrono::Datelike::weekday(slot)));
            }
            prop_assert_eq!(first, second);
        }
    }
}
