use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use slotbook_engine::{slice, subtract, AvailabilityService, InMemoryCalendar, TimeRange, WorkingHours};

fn base() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 5, 5, 0, 0, 0).unwrap()
}

// Helper function to create a window of whole days
fn create_window(days: i64) -> TimeRange {
    TimeRange::new(base(), base() + Duration::days(days)).unwrap()
}

// Helper function to create evenly spaced busy ranges
fn create_busy_ranges(count: usize, busy_minutes: i64, gap_minutes: i64) -> Vec<TimeRange> {
    let mut busy = Vec::with_capacity(count);
    let mut cursor = base();
    for _ in 0..count {
        let start = cursor + Duration::minutes(gap_minutes);
        let range = TimeRange::starting_at(start, Duration::minutes(busy_minutes)).unwrap();
        cursor = range.end();
        busy.push(range);
    }
    busy
}

fn weekdays() -> Vec<String> {
    ["Mon", "Tue", "Wed", "Thu", "Fri"]
        .iter()
        .map(|d| d.to_string())
        .collect()
}

fn benchmark_reducer(c: &mut Criterion) {
    let mut group = c.benchmark_group("subtract_and_slice");

    group.bench_function("no_busy_ranges", |b| {
        let window = create_window(7);
        let busy: Vec<TimeRange> = Vec::new();
        b.iter(|| {
            let free = subtract(black_box(window), black_box(&busy));
            slice(&free, black_box(Duration::minutes(30)), 500)
                .unwrap()
                .count()
        })
    });

    group.bench_function("few_busy_ranges", |b| {
        let window = create_window(7);
        let busy = create_busy_ranges(10, 90, 240);
        b.iter(|| {
            let free = subtract(black_box(window), black_box(&busy));
            slice(&free, black_box(Duration::minutes(30)), 500)
                .unwrap()
                .count()
        })
    });

    group.bench_function("many_busy_ranges", |b| {
        let window = create_window(30);
        let busy = create_busy_ranges(1_000, 20, 25);
        b.iter(|| {
            let free = subtract(black_box(window), black_box(&busy));
            slice(&free, black_box(Duration::minutes(15)), 500)
                .unwrap()
                .count()
        })
    });

    group.bench_function("ten_years_capped", |b| {
        let window = create_window(3_650);
        let busy: Vec<TimeRange> = Vec::new();
        b.iter(|| {
            let free = subtract(black_box(window), black_box(&busy));
            slice(&free, black_box(Duration::minutes(1)), 60)
                .unwrap()
                .count()
        })
    });

    group.finish();
}

fn benchmark_list_available_slots(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let mut group = c.benchmark_group("list_available_slots");

    let calendar = Arc::new(InMemoryCalendar::new());
    for range in create_busy_ranges(200, 45, 75) {
        calendar.insert_busy("bench", range, "Busy");
    }
    let hours = WorkingHours::parse("Europe/Zurich", "09:00", "18:00", &weekdays()).unwrap();
    let service = AvailabilityService::new(calendar).with_working_hours(hours);
    let window = create_window(14);

    group.bench_function("two_weeks_with_working_hours", |b| {
        b.to_async(&runtime).iter(|| async {
            service
                .list_available_slots(
                    black_box("bench"),
                    black_box(window),
                    black_box(Duration::minutes(30)),
                    black_box(500),
                )
                .await
                .unwrap()
                .len()
        })
    });

    group.finish();
}

criterion_group!(benches, benchmark_reducer, benchmark_list_available_slots);
criterion_main!(benches);
