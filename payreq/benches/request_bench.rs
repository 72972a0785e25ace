//! Benchmarks for contract resolution and parameter finalization.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use payreq::contracts::{resolve, resolve_uncached};
use payreq::requests::{
    ConfirmationFields, CreateAndConfirmIntention, IntentionFields,
    PlatformCheckoutCreateAndConfirmIntention,
};
use payreq::request::{Request, RequestType};
use payreq::results::{sort_records, SortDirection};
use payreq::testing::mock_transport;
use serde_json::json;

fn contract_benchmark(c: &mut Criterion) {
    let descriptor = PlatformCheckoutCreateAndConfirmIntention::type_descriptor();

    c.bench_function("resolve_cached", |b| b.iter(|| black_box(resolve(descriptor))));
    c.bench_function("resolve_uncached", |b| {
        b.iter(|| black_box(resolve_uncached(descriptor)))
    });
}

fn params_benchmark(c: &mut Criterion) {
    let mut request = CreateAndConfirmIntention::create(mock_transport(), None).unwrap();
    request.set_amount(1500).unwrap();
    request.set_currency_code("usd").unwrap();
    request.set_payment_method("pm_card_visa").unwrap();
    request.set_description("Order #1001").unwrap();

    c.bench_function("get_params", |b| b.iter(|| black_box(request.get_params().unwrap())));
}

fn sort_benchmark(c: &mut Criterion) {
    let records: Vec<_> = (0..1_000)
        .map(|i| json!({"id": i, "amount": (i * 7919) % 1_000}))
        .collect();

    c.bench_function("sort_1000_records", |b| {
        b.iter(|| {
            let mut batch = records.clone();
            sort_records(&mut batch, "amount", SortDirection::Descending);
            black_box(batch)
        })
    });
}

criterion_group!(benches, contract_benchmark, params_benchmark, sort_benchmark);
criterion_main!(benches);
