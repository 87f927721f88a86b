use cryptal::derivation::{Scrypt, ScryptParameters};

use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

pub fn bench_scrypt(c: &mut Criterion) {
    let params = ScryptParameters::builder()
        .with_salt(b"SodiumChloride")
        .with_cost(1 << 14)
        .with_block_size(8)
        .with_parallelism(1)
        .build();
    let engine = Scrypt::new(b"pleaseletmein", &params).unwrap();

    c.bench_function("scrypt N=16384 r=8 p=1", |b| {
        b.iter(|| engine.get_bytes(black_box(64)).unwrap())
    });
}

criterion_group! {
    name = benches;
    config = Criterion::default().sample_size(20);
    targets = bench_scrypt
}
criterion_main!(benches);
