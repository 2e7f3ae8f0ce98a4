use criterion::{criterion_group, criterion_main, Criterion};
use dhgen_bignum::{BigUint, OsEntropy};

fn bench_mul(c: &mut Criterion) {
    let mut entropy = OsEntropy;
    let a = BigUint::random_bits(&mut entropy, 512).unwrap();
    let b = BigUint::random_bits(&mut entropy, 512).unwrap();
    c.bench_function("mul_512", |bench| bench.iter(|| a.mul(&b)));
}

fn bench_pow_mod(c: &mut Criterion) {
    let mut entropy = OsEntropy;
    let base = BigUint::from_u32(2);
    let exp = BigUint::random_bits(&mut entropy, 128).unwrap();
    let mut modulus = BigUint::random_bits(&mut entropy, 128).unwrap();
    modulus.set_bit(0);
    modulus.set_bit(127);
    c.bench_function("pow_mod_128", |bench| {
        bench.iter(|| base.pow_mod(&exp, &modulus).unwrap())
    });
}

fn bench_is_prime(c: &mut Criterion) {
    let mut entropy = OsEntropy;
    // 2^61 - 1, a Mersenne prime.
    let n = BigUint::from_u64((1 << 61) - 1);
    c.bench_function("is_prime_61", |bench| {
        bench.iter(|| n.is_prime(7, &mut entropy).unwrap())
    });
}

criterion_group!(benches, bench_mul, bench_pow_mod, bench_is_prime);
criterion_main!(benches);
