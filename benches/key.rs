use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand_chacha::{rand_core::SeedableRng, ChaCha8Rng};
use rsa_forge::{engine, HashAlgorithm, KeyPair, RandomSource};

fn get_key() -> KeyPair {
    // 2048 bits
    KeyPair::generate(2048, &RandomSource::Deterministic(42)).unwrap()
}

fn bench_rsa_1024_gen_key(c: &mut Criterion) {
    let mut rng = ChaCha8Rng::from_seed([42; 32]);

    c.bench_function("rsa_1024_gen_key", |b| {
        b.iter(|| black_box(KeyPair::new(&mut rng, 1024).unwrap()))
    });
}

fn bench_rsa_2048_gen_key(c: &mut Criterion) {
    let mut rng = ChaCha8Rng::from_seed([42; 32]);

    let mut group = c.benchmark_group("slow");
    group.sample_size(10);
    group.bench_function("rsa_2048_gen_key", |b| {
        b.iter(|| black_box(KeyPair::new(&mut rng, 2048).unwrap()))
    });
    group.finish();
}

fn bench_rsa_2048_pkcsv1(c: &mut Criterion) {
    let priv_key = get_key();
    let pub_key = priv_key.to_public_key();
    let mut rng = ChaCha8Rng::from_seed([42; 32]);
    let ciphertext = engine::encrypt_block(&mut rng, &pub_key, b"testing").unwrap();

    c.bench_function("rsa_2048_pkcsv1_encrypt", |b| {
        b.iter(|| {
            let ciphertext = engine::encrypt_block(&mut rng, &pub_key, b"testing").unwrap();
            black_box(ciphertext)
        })
    });

    c.bench_function("rsa_2048_pkcsv1_decrypt", |b| {
        b.iter(|| {
            let plaintext = engine::decrypt_block(&priv_key, &ciphertext).unwrap();
            black_box(plaintext)
        })
    });
}

fn bench_rsa_2048_pkcsv1_sign(c: &mut Criterion) {
    let priv_key = get_key();
    let hash = HashAlgorithm::Sha256;
    let signature = engine::sign_digest(&priv_key, b"testing", hash).unwrap();

    c.bench_function("rsa_2048_pkcsv1_sign", |b| {
        b.iter(|| {
            let signature = engine::sign_digest(&priv_key, b"testing", hash).unwrap();
            black_box(signature)
        })
    });

    c.bench_function("rsa_2048_pkcsv1_verify", |b| {
        b.iter(|| {
            let valid = engine::verify_digest(&priv_key, b"testing", &signature, hash);
            black_box(valid)
        })
    });
}

criterion_group!(
    benches,
    bench_rsa_1024_gen_key,
    bench_rsa_2048_gen_key,
    bench_rsa_2048_pkcsv1,
    bench_rsa_2048_pkcsv1_sign
);
criterion_main!(benches);
