//! Benchmarks for the progress core and snapshot assembly
//!
//! Run with: cargo bench

use chrono::{NaiveDate, NaiveDateTime};
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use tickboard::dashboard::{build_widgets, default_festivals, Dashboard};
use tickboard::festival::{
    FestivalResolver, FestivalRule, LunarCalendar, LunarDate, SalaryRule, TableLunarCalendar,
    WorkdayRule,
};
use tickboard::progress::{compute_progress, PeriodWindow};

fn instant() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 9, 17)
        .unwrap()
        .and_hms_opt(14, 37, 5)
        .unwrap()
}

fn bench_progress(c: &mut Criterion) {
    let mut group = c.benchmark_group("progress");
    let now = instant();

    let windows = [
        ("day", PeriodWindow::day_of(now)),
        ("week", PeriodWindow::week_of(now)),
        ("month", PeriodWindow::month_of(now)),
        ("year", PeriodWindow::year_of(now)),
    ];

    for (name, window) in windows {
        let window = window.unwrap();
        group.bench_function(format!("compute_{}", name), |b| {
            b.iter(|| compute_progress(black_box(&window), black_box(now)))
        });
    }

    group.finish();
}

fn bench_lunar(c: &mut Criterion) {
    let mut group = c.benchmark_group("lunar");
    let calendar = TableLunarCalendar::new();
    let date = instant().date();

    group.bench_function("gregorian_to_lunar", |b| {
        b.iter(|| calendar.gregorian_to_lunar(black_box(date)).unwrap())
    });

    group.bench_function("lunar_to_gregorian", |b| {
        b.iter(|| {
            calendar
                .lunar_to_gregorian(black_box(LunarDate::new(2025, 8, 15)))
                .unwrap()
        })
    });

    let resolver = FestivalResolver::default();
    let rule = FestivalRule::lunar(1, 1);
    group.bench_function("next_spring_festival", |b| {
        b.iter(|| resolver.next_occurrence(black_box(&rule), black_box(instant())).unwrap())
    });

    group.finish();
}

fn bench_snapshot(c: &mut Criterion) {
    let mut group = c.benchmark_group("snapshot");

    let widgets = build_widgets(
        &default_festivals(),
        WorkdayRule::default(),
        SalaryRule::default(),
    );
    let count = widgets.len();
    let dashboard = Dashboard::new(widgets, FestivalResolver::default());

    group.throughput(Throughput::Elements(count as u64));
    group.bench_function("default_widgets", |b| {
        b.iter(|| dashboard.snapshot(black_box(instant())))
    });

    group.finish();
}

criterion_group!(benches, bench_progress, bench_lunar, bench_snapshot);
criterion_main!(benches);
