use clob_engine::{MatchingEngine, NullSink, Side};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

fn bench_order_submission(c: &mut Criterion) {
    let mut group = c.benchmark_group("order_submission");

    for &num_orders in [100, 1000, 10000].iter() {
        group.bench_with_input(
            BenchmarkId::new("non_crossing_orders", num_orders),
            &num_orders,
            |b, &num_orders| {
                b.iter(|| {
                    let engine = MatchingEngine::new(Box::new(NullSink));
                    for i in 0..num_orders {
                        let side = if i % 2 == 0 { Side::Buy } else { Side::Sell };
                        let price = if i % 2 == 0 {
                            10000.0 - i as f64
                        } else {
                            10100.0 + i as f64
                        };
                        black_box(engine.submit("AAPL", side, price, 100).unwrap());
                    }
                })
            },
        );
    }

    group.finish();
}

fn bench_order_matching(c: &mut Criterion) {
    let mut group = c.benchmark_group("order_matching");

    for &depth in [10, 100, 1000].iter() {
        group.bench_with_input(
            BenchmarkId::new("crossing_orders", depth),
            &depth,
            |b, &depth| {
                b.iter_batched(
                    || {
                        let engine = MatchingEngine::new(Box::new(NullSink));
                        for i in 0..depth {
                            engine
                                .submit("AAPL", Side::Sell, 10000.0 + i as f64, 100)
                                .unwrap();
                            engine
                                .submit("AAPL", Side::Buy, 9999.0 - i as f64, 100)
                                .unwrap();
                        }
                        engine
                    },
                    |engine| {
                        black_box(
                            engine
                                .submit("AAPL", Side::Buy, 10000.0 + depth as f64, (depth * 50) as u64)
                                .unwrap(),
                        )
                    },
                    criterion::BatchSize::SmallInput,
                )
            },
        );
    }

    group.finish();
}

fn bench_market_data_access(c: &mut Criterion) {
    let mut group = c.benchmark_group("market_data");

    let engine = MatchingEngine::new(Box::new(NullSink));
    for i in 0..1000 {
        engine.submit("AAPL", Side::Sell, 10000.0 + i as f64, 100).unwrap();
        engine.submit("AAPL", Side::Buy, 9999.0 - i as f64, 100).unwrap();
    }

    group.bench_function("top_bids", |b| {
        b.iter(|| black_box(engine.top_bids("AAPL", 1)))
    });

    group.bench_function("top_asks", |b| {
        b.iter(|| black_box(engine.top_asks("AAPL", 1)))
    });

    group.finish();
}

fn bench_order_cancellation(c: &mut Criterion) {
    let mut group = c.benchmark_group("cancellation");

    for &num_orders in [100, 1000].iter() {
        group.bench_with_input(
            BenchmarkId::new("eager_remove", num_orders),
            &num_orders,
            |b, &num_orders| {
                b.iter_batched(
                    || {
                        let engine = MatchingEngine::new(Box::new(NullSink));
                        let mut order_ids = Vec::new();
                        for _ in 0..num_orders {
                            order_ids.push(engine.submit("AAPL", Side::Buy, 10000.0, 100).unwrap());
                        }
                        (engine, order_ids)
                    },
                    |(engine, order_ids)| {
                        for (i, order_id) in order_ids.iter().enumerate() {
                            if i % 2 == 0 {
                                black_box(engine.cancel(*order_id));
                            }
                        }
                    },
                    criterion::BatchSize::SmallInput,
                )
            },
        );
    }

    group.finish();
}

fn bench_high_frequency_scenario(c: &mut Criterion) {
    let mut group = c.benchmark_group("hft_scenario");

    group.bench_function("rapid_order_flow", |b| {
        b.iter(|| {
            let engine = MatchingEngine::new(Box::new(NullSink));

            for _ in 0..100 {
                for i in 0..5 {
                    engine.submit("AAPL", Side::Sell, 10000.0 + i as f64, 100).unwrap();
                    engine.submit("AAPL", Side::Buy, 9999.0 - i as f64, 100).unwrap();
                }

                black_box(engine.submit("AAPL", Side::Buy, 10002.0, 300).unwrap());
                black_box(engine.top_bids("AAPL", 1));
                black_box(engine.top_asks("AAPL", 1));
            }
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_order_submission,
    bench_order_matching,
    bench_market_data_access,
    bench_order_cancellation,
    bench_high_frequency_scenario
);

criterion_main!(benches);
