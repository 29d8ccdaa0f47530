//! # Cellar Market Core Benchmarks
//!
//! | Path | Operation |
//! |------|-----------|
//! | cm-01 | Ed25519 strict verify (handshake proof, transaction check) |
//! | shared-crypto | seal / open one catalog line |
//! | cm-02 | catalog line encode / decode |
//! | cm-04 | canonical message + signature check |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use cm_01_signature_verification::{SignatureVerificationApi, SignatureVerificationService};
use cm_02_identity_store::domain::codec::{decode_record, encode_record};
use cm_02_identity_store::{Availability, IdentityRecord};
use cm_04_transaction_record::{SignerKeyDirectory, TransactionRecord};
use shared_crypto::{open_line, seal_line, Ed25519KeyPair, Ed25519PublicKey, FileKey};
use shared_types::{TransactionKind, UserId};

struct SingleKey(Ed25519PublicKey);

impl SignerKeyDirectory for SingleKey {
    fn signer_key(&self, _user_id: &UserId) -> Option<Ed25519PublicKey> {
        Some(self.0)
    }
}

fn bench_signature_verification(c: &mut Criterion) {
    let service = SignatureVerificationService::new();
    let keypair = Ed25519KeyPair::generate();
    let nonce = [7u8; 8];
    let signature = keypair.sign(&nonce);
    let public_key = keypair.public_key();

    c.bench_function("cm-01/verify_nonce", |b| {
        b.iter(|| service.verify(black_box(&public_key), black_box(&nonce), black_box(&signature)))
    });
}

fn bench_line_cipher(c: &mut Criterion) {
    let key = FileKey::generate();
    let mut group = c.benchmark_group("shared-crypto/line");

    for items in [0usize, 10, 100] {
        let mut availability = Availability::new();
        for i in 0..items {
            availability.insert(format!("item{}", i), vec!["red".into(), "2019".into()]);
        }
        let record =
            IdentityRecord::with_state(UserId::new("alice").unwrap(), 200.0, availability);
        let line = encode_record(&record).unwrap();
        let sealed = seal_line(&key, &line).unwrap();

        group.bench_with_input(BenchmarkId::new("seal", items), &line, |b, line| {
            b.iter(|| seal_line(&key, black_box(line)).unwrap())
        });
        group.bench_with_input(BenchmarkId::new("open", items), &sealed, |b, sealed| {
            b.iter(|| open_line(&key, black_box(sealed)).unwrap())
        });
        group.bench_with_input(BenchmarkId::new("decode", items), &line, |b, line| {
            b.iter(|| decode_record(black_box(line)).unwrap())
        });
    }
    group.finish();
}

fn bench_transaction_validate(c: &mut Criterion) {
    let service = SignatureVerificationService::new();
    let keypair = Ed25519KeyPair::generate();
    let directory = SingleKey(keypair.public_key());
    let tx = TransactionRecord::signed(
        TransactionKind::Buy,
        "tinto-2019",
        12,
        18.5,
        UserId::new("alice").unwrap(),
        &keypair,
    )
    .unwrap();

    c.bench_function("cm-04/validate", |b| {
        b.iter(|| black_box(&tx).validate(&directory, &service))
    });
}

criterion_group!(
    benches,
    bench_signature_verification,
    bench_line_cipher,
    bench_transaction_validate
);
criterion_main!(benches);
