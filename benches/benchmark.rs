use criterion::{criterion_group, criterion_main, Criterion};

use ml_kem_1024::traits::{Decaps, Encaps, KeyGen};
use ml_kem_1024::KG;

#[allow(clippy::redundant_closure)]
pub fn criterion_benchmark(c: &mut Criterion) {
    let (ek, dk) = KG::try_keygen().unwrap();
    let (ct, _) = ek.try_encaps().unwrap();

    c.bench_function("ml_kem_1024 KeyGen", |b| b.iter(KG::try_keygen));
    c.bench_function("ml_kem_1024 Encaps", |b| b.iter(|| ek.try_encaps()));
    c.bench_function("ml_kem_1024 Decaps", |b| b.iter(|| dk.decaps(&ct)));
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
