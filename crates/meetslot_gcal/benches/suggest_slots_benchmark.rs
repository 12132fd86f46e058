use chrono::{DateTime, Duration, TimeZone, Weekday};
use chrono_tz::Tz;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use meetslot_gcal::logic::{suggest_slots, SchedulingDefaults, SuggestionConfig, TimeInterval};

// Helper function to create a fixed window starting Monday 2025-05-05
fn create_time_range(duration_days: i64) -> (DateTime<Tz>, DateTime<Tz>) {
    let time_zone = Tz::Europe__Zurich;
    let start = time_zone.with_ymd_and_hms(2025, 5, 5, 0, 0, 0).unwrap();
    (start, start + Duration::days(duration_days))
}

// Helper function to create a list of busy periods
fn create_busy_periods(base_time: DateTime<Tz>, count: usize, duration_hours: i64) -> Vec<TimeInterval> {
    let mut busy_periods = Vec::new();
    let mut current_time = base_time;

    for _ in 0..count {
        let start = current_time + Duration::hours(1);
        let end = start + Duration::hours(duration_hours.max(1));
        busy_periods.push(TimeInterval::new(start, end).unwrap());
        current_time = end + Duration::hours(1);
    }

    busy_periods
}

fn create_config(duration_days: i64, step_minutes: i64) -> SuggestionConfig {
    let (start, end) = create_time_range(duration_days);
    let defaults = SchedulingDefaults {
        time_zone: Tz::Europe__Zurich,
        working_days: vec![Weekday::Mon, Weekday::Tue, Weekday::Wed, Weekday::Thu, Weekday::Fri],
        step: Some(Duration::minutes(step_minutes)),
        ..Default::default()
    };
    let mut config = defaults.suggestion_config(start, end, Duration::minutes(60));
    config.exclude_lunch = true;
    config
}

fn benchmark_suggest_slots(c: &mut Criterion) {
    let mut group = c.benchmark_group("suggest_slots");

    group.bench_function("no_busy_periods", |b| {
        let config = create_config(7, 15);
        let busy: Vec<TimeInterval> = Vec::new();
        b.iter(|| suggest_slots(black_box(&busy), black_box(&config)))
    });

    group.bench_function("few_busy_periods", |b| {
        let config = create_config(7, 15);
        let busy = create_busy_periods(config.window_start, 10, 2);
        b.iter(|| suggest_slots(black_box(&busy), black_box(&config)))
    });

    group.bench_function("many_busy_periods", |b| {
        let config = create_config(30, 15);
        let busy = create_busy_periods(config.window_start, 200, 1);
        b.iter(|| suggest_slots(black_box(&busy), black_box(&config)))
    });

    group.bench_function("fine_step_month", |b| {
        let config = create_config(30, 5);
        let busy = create_busy_periods(config.window_start, 50, 3);
        b.iter(|| suggest_slots(black_box(&busy), black_box(&config)))
    });

    group.finish();
}

criterion_group!(benches, benchmark_suggest_slots);
criterion_main!(benches);
