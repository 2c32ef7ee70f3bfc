use chrono::{TimeZone, Utc};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use bot_dashboard::generator::TradeGenerator;
use bot_dashboard::html::render_page;
use bot_dashboard::loader::LoadState;
use bot_dashboard::types::Snapshot;
use bot_dashboard::view::{build_view_in, render_text};

fn loaded_state(count: usize) -> LoadState {
    let mut gen = TradeGenerator::new(7);
    let end = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
    let trades = gen.generate_trades(count, end);
    let status = gen.status_for(&trades);
    LoadState::Loaded(Snapshot { trades, status })
}

fn build_view(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_view");
    for size in [100, 500, 1000, 5000] {
        let state = loaded_state(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &state, |b, state| {
            b.iter(|| build_view_in(state, &Utc));
        });
    }
    group.finish();
}

fn render_outputs(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");
    for size in [100, 1000] {
        let view = build_view_in(&loaded_state(size), &Utc);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("text", size), &view, |b, view| {
            b.iter(|| render_text("Bench", view));
        });
        group.bench_with_input(BenchmarkId::new("html", size), &view, |b, view| {
            b.iter(|| render_page("Bench", view));
        });
    }
    group.finish();
}

criterion_group!(benches, build_view, render_outputs);
criterion_main!(benches);
