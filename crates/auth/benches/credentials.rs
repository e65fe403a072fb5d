//! Benchmarks for the per-request credential work: password hashing and
//! verification, and token verification.
//!
//! Run with: `cargo bench -p bizdir-auth`

use chrono::{Duration, Utc};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

use bizdir_auth::{CredentialHasher, HashCost, Hs256TokenService, SigningSecret, TokenVerifier};
use bizdir_core::UserId;

fn bench_password(c: &mut Criterion) {
    let hasher = CredentialHasher::new(HashCost::default()).expect("default cost is valid");
    let hash = hasher.hash("password1").expect("hash");

    let mut group = c.benchmark_group("password");
    group.sample_size(20);
    group.bench_function("hash_default_cost", |b| {
        b.iter(|| hasher.hash(black_box("password1")).expect("hash"))
    });
    group.bench_function("verify_default_cost", |b| {
        b.iter(|| hasher.verify(black_box("password1"), black_box(&hash)))
    });
    group.finish();
}

fn bench_token(c: &mut Criterion) {
    let tokens = Hs256TokenService::new(&SigningSecret::new("bench-secret"), Duration::hours(24));
    let token = tokens.issue(UserId::new(), Utc::now()).expect("issue");

    c.bench_function("token_verify", |b| {
        b.iter(|| tokens.verify(black_box(&token), Utc::now()).expect("verify"))
    });
}

criterion_group!(benches, bench_password, bench_token);
criterion_main!(benches);
