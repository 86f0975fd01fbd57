use criterion::{Criterion, criterion_group, criterion_main};
use edwards25519::{open, open_batch, publickey, sign};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use std::hint::black_box;

fn bench_ed25519(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0x0bad_5eed);
    let mut sk = [0u8; 32];
    rng.fill_bytes(&mut sk);
    let mut msg = [0u8; 64];
    rng.fill_bytes(&mut msg);

    let pk = publickey(&sk);
    let sig = sign(&msg, &sk, &pk);

    c.bench_function("publickey", |b| b.iter(|| publickey(black_box(&sk))));
    c.bench_function("sign", |b| {
        b.iter(|| sign(black_box(&msg), black_box(&sk), black_box(&pk)))
    });
    c.bench_function("open", |b| {
        b.iter(|| open(black_box(&msg), black_box(&pk), black_box(&sig)))
    });
}

fn bench_batch(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0x0bad_cafe);
    let n = 64;

    let mut messages = Vec::with_capacity(n);
    let mut public_keys = Vec::with_capacity(n);
    let mut signatures = Vec::with_capacity(n);
    for _ in 0..n {
        let mut sk = [0u8; 32];
        rng.fill_bytes(&mut sk);
        let mut msg = vec![0u8; 64];
        rng.fill_bytes(&mut msg);

        let pk = publickey(&sk);
        signatures.push(sign(&msg, &sk, &pk));
        public_keys.push(pk);
        messages.push(msg);
    }
    let slices: Vec<&[u8]> = messages.iter().map(|m| m.as_slice()).collect();

    c.bench_function("open_batch_64", |b| {
        b.iter(|| {
            open_batch(
                black_box(&slices),
                black_box(&public_keys),
                black_box(&signatures),
                &mut rng,
            )
        })
    });
}

criterion_group!(benches, bench_ed25519, bench_batch);
criterion_main!(benches);
