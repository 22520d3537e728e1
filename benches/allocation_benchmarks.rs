//! Performance benchmarks for the worklog allocation engine.
//!
//! Covers the allocation core on its own, a full month plan over the
//! bundled configuration, and the `/plan` endpoint end to end.
//!
//! Run with: `cargo bench`
//! HTML reports are generated in `target/criterion/`

use chrono::NaiveDate;
use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use rand::SeedableRng;
use rand::rngs::StdRng;

use worklog_engine::api::{AppState, create_router};
use worklog_engine::calculation::{AllocationSettings, DaySelection, allocate, plan_range};
use worklog_engine::config::ConfigLoader;
use worklog_engine::models::Ticket;

use axum::{body::Body, http::Request};
use tower::ServiceExt;

fn load_config() -> ConfigLoader {
    ConfigLoader::load("./config/default").expect("Failed to load config")
}

fn tickets(count: usize) -> Vec<Ticket> {
    (0..count)
        .map(|i| Ticket::new(format!("SINT-{}", 1000 + i), (i % 5) as u32 + 1))
        .collect()
}

fn bench_allocate(c: &mut Criterion) {
    let mut group = c.benchmark_group("allocate");
    for count in [2usize, 10, 50] {
        let weights: Vec<u32> = (0..count).map(|i| (i % 5) as u32 + 1).collect();
        group.bench_with_input(BenchmarkId::from_parameter(count), &weights, |b, weights| {
            b.iter(|| allocate(black_box(480), black_box(weights), black_box(15)).unwrap())
        });
    }
    group.finish();
}

fn bench_plan_month(c: &mut Criterion) {
    let config = load_config();
    let period = config.period(
        NaiveDate::from_ymd_opt(2025, 8, 1).unwrap(),
        NaiveDate::from_ymd_opt(2025, 8, 31).unwrap(),
    );
    let tickets = tickets(12);

    c.bench_function("plan_range_month_all_tickets", |b| {
        let settings = AllocationSettings::default();
        b.iter(|| {
            let mut rng = StdRng::seed_from_u64(1);
            plan_range(black_box(&period), black_box(&tickets), &settings, &mut rng).unwrap()
        })
    });

    c.bench_function("plan_range_month_random_subset", |b| {
        let settings = AllocationSettings {
            selection: DaySelection::random(3),
            ..AllocationSettings::default()
        };
        b.iter(|| {
            let mut rng = StdRng::seed_from_u64(1);
            plan_range(black_box(&period), black_box(&tickets), &settings, &mut rng).unwrap()
        })
    });
}

fn bench_plan_endpoint(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let state = AppState::new(load_config());
    let body = serde_json::json!({
        "start_date": "2025-08-01",
        "end_date": "2025-08-31",
        "seed": 7
    })
    .to_string();

    c.bench_function("plan_endpoint_month", |b| {
        b.to_async(&runtime).iter(|| {
            let router = create_router(state.clone());
            let request = Request::builder()
                .method("POST")
                .uri("/plan")
                .header("Content-Type", "application/json")
                .body(Body::from(body.clone()))
                .unwrap();
            async move { router.oneshot(request).await.unwrap() }
        })
    });
}

criterion_group!(benches, bench_allocate, bench_plan_month, bench_plan_endpoint);
criterion_main!(benches);
