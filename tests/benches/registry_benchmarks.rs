//! # Objective Registry Benchmarks
//!
//! | Area | Operation | Expectation |
//! |------|-----------|-------------|
//! | Codec | encode / decode one value | sub-microsecond |
//! | Challenge | build and sign a disclosure message | < 1ms |
//! | Signatures | recover a `personal_sign` signer | < 1ms |
//! | Registry | list an index of N records (in-memory) | linear in N |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use objective_registry::prelude::*;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Runtime;

// ============================================================================
// CODEC
// ============================================================================

fn bench_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("codec");
    let codec = MarkerCodec::new();
    let token = codec.encode(4.0);

    group.bench_function("encode", |b| b.iter(|| codec.encode(black_box(6.5))));
    group.bench_function("decode_marked", |b| {
        b.iter(|| codec.decode(black_box(&token)))
    });
    group.bench_function("decode_plain", |b| {
        b.iter(|| codec.decode(black_box("  -12.5e3xyz")))
    });

    group.finish();
}

// ============================================================================
// DISCLOSURE
// ============================================================================

fn bench_disclosure_signing(c: &mut Criterion) {
    let mut group = c.benchmark_group("disclosure");
    group.measurement_time(Duration::from_secs(10));

    let rt = Runtime::new().expect("tokio runtime");
    let wallet = LocalWallet::random();
    let challenge = DisclosureChallenge::generate(
        &mut rand::thread_rng(),
        "0x0000000000000000000000000000000000000b0b",
        11_155_111,
        1_718_000_000,
        30,
    );
    let message = challenge.message();
    let signature = rt
        .block_on(wallet.sign_message(&message))
        .expect("signature");

    group.bench_function("challenge_generate", |b| {
        b.iter(|| {
            DisclosureChallenge::generate(
                &mut rand::thread_rng(),
                "0x0000000000000000000000000000000000000b0b",
                black_box(1),
                black_box(1_718_000_000),
                30,
            )
        })
    });

    group.bench_function("sign_message", |b| {
        b.iter(|| rt.block_on(wallet.sign_message(black_box(&message))))
    });

    group.bench_function("recover_signer", |b| {
        b.iter(|| recover_personal_signer(black_box(&message), black_box(&signature)))
    });

    group.finish();
}

// ============================================================================
// REGISTRY
// ============================================================================

fn bench_listing(c: &mut Criterion) {
    let mut group = c.benchmark_group("registry-list");
    let rt = Runtime::new().expect("tokio runtime");

    for size in [10usize, 100, 500] {
        let store = Arc::new(InMemoryStore::new());
        let clock = Arc::new(FixedClock::at_secs(1_718_000_000));
        let service =
            ObjectiveService::with_clock(Arc::clone(&store), Arc::clone(&clock), ServiceConfig::default());
        let owner = LocalWallet::random().address();

        rt.block_on(async {
            for i in 0..size {
                clock.advance(1);
                let role = STANDARD_ROLES[i % STANDARD_ROLES.len()];
                service
                    .create(&owner, &NewObjective::new(role, 1.0 + (i % 8) as f64))
                    .await
                    .expect("seed objective");
            }
        });

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("list", size), &service, |b, service| {
            b.iter(|| rt.block_on(service.list()).expect("listing"))
        });
    }

    group.finish();
}

criterion_group!(
    registry_benches,
    bench_codec,
    bench_disclosure_signing,
    bench_listing
);
criterion_main!(registry_benches);
