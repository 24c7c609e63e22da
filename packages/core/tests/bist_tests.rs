//! End-to-end tests for the BIST engine
//!
//! - full reference corpus validates cleanly and the verdict passes
//! - a tampered recorded shared secret is reported as a mismatch
//! - a 1ns threshold fails exactly one performance test
//! - primitive failures during generation and stress tests are contained

use pqc_bist::bist::exit_criteria::CRITICAL_TESTS;
use pqc_bist::bist::generator::VectorGenerator;
use pqc_bist::bist::{
    report, BistRunner, BistSuite, FailureKind, OpKind, ThresholdTable, VectorExecutor,
};
use pqc_bist::config::Config;
use pqc_bist::crypto::levels::{SecurityLevel, VectorFamily};
use pqc_bist::crypto::{hashing, PostQuantumSuiteProvider, PrimitiveProvider};
use pqc_bist::error::CryptoError;
use std::time::Duration;

type Suite = PostQuantumSuiteProvider;

/// Reference corpus, light stress loops, no timing gates
fn deterministic_config() -> Config {
    Config {
        kem_stress_iterations: 3,
        signature_stress_iterations: 1,
        thresholds_enabled: false,
        ..Config::default()
    }
}

fn flip_hex_byte(hex_value: &str, index: usize) -> String {
    let mut bytes = hex::decode(hex_value).unwrap();
    bytes[index] ^= 0x01;
    hex::encode(bytes)
}

#[test]
fn test_full_corpus_passes_exit_criteria() {
    let runner =
        BistRunner::<Suite>::new(deterministic_config(), ThresholdTable::default_thresholds());
    let run = runner.run();
    let suite = &run.suite;

    assert_eq!(suite.vector_count(VectorFamily::Kem), 30);
    assert_eq!(suite.vector_count(VectorFamily::Signature), 42);

    let kem = suite.result("KEM-BIST-001").unwrap();
    assert!(kem.passed, "{:?}", kem.error_message);
    assert_eq!(kem.test_vectors, Some(30));

    let sig = suite.result("SIG-BIST-001").unwrap();
    assert!(sig.passed, "{:?}", sig.error_message);
    assert_eq!(sig.test_vectors, Some(42));

    assert!(suite.errors().is_empty(), "{:?}", suite.errors());
    for id in CRITICAL_TESTS {
        assert!(suite.result(id).unwrap().passed, "{}", id);
    }

    assert_eq!(suite.failed_tests(), 0);
    assert_eq!(suite.passed_tests() + suite.failed_tests(), suite.total_tests());
    assert!(suite.end_time().is_some());
    assert!(suite.exit_criteria_met());
    assert_eq!(run.exit_code(), 0);
}

#[test]
fn test_every_generated_vector_classifies_as_expected() {
    let generator = VectorGenerator::<Suite>::new(&Config::default());
    let mut corpus = generator.generate_kem_vectors();
    corpus.extend(generator.generate_signature_vectors());

    let outcome = VectorExecutor::<Suite>::new().run_batch(&corpus);
    assert_eq!(outcome.failed, 0, "{:?}", outcome.diagnostics);
    assert_eq!(outcome.passed, 72);
}

/// Corrupted KEM vectors never reproduce the secret of their valid sibling
#[test]
fn test_corrupted_kem_vectors_diverge_from_valid_sibling() {
    let vectors = VectorGenerator::<Suite>::new(&Config::default()).generate_kem_vectors();

    for pair in vectors.chunks(2) {
        let (valid, invalid) = (&pair[0], &pair[1]);
        let private_key = hex::decode(&invalid.private_key).unwrap();
        let ciphertext = hex::decode(&invalid.ciphertext).unwrap();

        if let Ok(secret) = Suite::kem_decapsulate(&private_key, &ciphertext) {
            assert_ne!(hex::encode(secret), valid.shared_secret, "{}", invalid.id);
        }
    }
}

#[test]
fn test_tampered_shared_secret_is_mismatch() {
    let mut vectors = VectorGenerator::<Suite>::new(&Config::default()).generate_kem_vectors();
    let target = vectors.iter().position(|v| v.expected_result).unwrap();
    vectors[target].shared_secret = flip_hex_byte(&vectors[target].shared_secret, 0);

    let executor = VectorExecutor::<Suite>::new();
    let failure = executor.classify(&vectors[target]).unwrap_err();
    assert_eq!(failure.kind, FailureKind::Mismatch);

    let outcome = executor.run_batch(&vectors);
    assert_eq!(outcome.failed, 1);
    assert_eq!(outcome.passed, vectors.len() - 1);
    assert_eq!(
        outcome.diagnostics,
        vec![format!("Test vector {}: Shared secret mismatch", vectors[target].id)]
    );
}

#[test]
fn test_nanosecond_threshold_fails_only_that_operation() {
    let mut thresholds = ThresholdTable::empty();
    thresholds.set("Kyber512", OpKind::KeyGen, Duration::from_nanos(1));

    let config = Config {
        thresholds_enabled: true,
        ..deterministic_config()
    };
    let runner = BistRunner::<Suite>::new(config, thresholds);
    let mut suite = BistSuite::new();
    runner.run_performance_tests(&mut suite);

    assert_eq!(suite.failed_tests(), 1);

    let keygen = suite.result("PERF-Kyber512-KEYGEN").unwrap();
    assert!(!keygen.passed);
    assert_eq!(keygen.failure_kind, Some(FailureKind::ThresholdExceeded));
    let message = keygen.error_message.as_deref().unwrap();
    assert!(message.starts_with("Performance threshold exceeded: "), "{}", message);
    assert!(message.ends_with(" > 1ns"), "{}", message);
    assert!(message.contains(&format!("{:?}", keygen.execution_time)));

    // следующие операции того же алгоритма всё равно выполнены
    assert!(suite.result("PERF-Kyber512-ENCAP").unwrap().passed);
    assert!(suite.result("PERF-Kyber512-DECAP").unwrap().passed);
}

/// Kyber768 key generation always fails; everything else delegates
struct BrokenKyber768;

impl PrimitiveProvider for BrokenKyber768 {
    fn suite_name() -> &'static str {
        "broken Kyber768"
    }

    fn kem_generate_keypair(level: SecurityLevel) -> Result<(Vec<u8>, Vec<u8>), CryptoError> {
        if level == SecurityLevel::Level192 {
            return Err(CryptoError::KeyGenerationError("entropy source unavailable".to_string()));
        }
        Suite::kem_generate_keypair(level)
    }

    fn kem_encapsulate(public_key: &[u8]) -> Result<(Vec<u8>, Vec<u8>), CryptoError> {
        Suite::kem_encapsulate(public_key)
    }

    fn kem_decapsulate(private_key: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>, CryptoError> {
        Suite::kem_decapsulate(private_key, ciphertext)
    }

    fn sig_generate_keypair(level: SecurityLevel) -> Result<(Vec<u8>, Vec<u8>), CryptoError> {
        Suite::sig_generate_keypair(level)
    }

    fn sign(private_key: &[u8], message: &[u8]) -> Result<Vec<u8>, CryptoError> {
        Suite::sign(private_key, message)
    }

    fn verify(public_key: &[u8], message: &[u8], signature: &[u8]) -> Result<bool, CryptoError> {
        Suite::verify(public_key, message, signature)
    }

    fn hash(level: SecurityLevel, data: &[u8]) -> Result<Vec<u8>, CryptoError> {
        Suite::hash(level, data)
    }
}

#[test]
fn test_generation_skips_failed_iterations() {
    let vectors = VectorGenerator::<BrokenKyber768>::new(&Config::default()).generate_kem_vectors();
    assert_eq!(vectors.len(), 20);
    assert!(vectors.iter().all(|v| v.algorithm != "Kyber768"));
    // счётчик не пропускает номера
    assert_eq!(vectors[10].id, "KEM-011");
    assert_eq!(vectors[10].algorithm, "Kyber1024");
}

#[test]
fn test_primitive_failure_is_contained() {
    let runner = BistRunner::<BrokenKyber768>::new(deterministic_config(), ThresholdTable::empty());
    let run = runner.run();
    let suite = &run.suite;

    // оставшиеся векторы валидны
    assert!(suite.result("KEM-BIST-001").unwrap().passed);

    let stress = suite.result("KEM-Kyber768-BIST").unwrap();
    assert!(!stress.passed);
    assert_eq!(stress.failure_kind, Some(FailureKind::PrimitiveFailure));
    assert!(stress.error_message.as_deref().unwrap().starts_with("Key generation failed"));

    // другие подтесты выполнены
    assert!(suite.result("KEM-Kyber1024-BIST").unwrap().passed);
    assert!(suite.result("SIG-Dilithium3-BIST").unwrap().passed);

    assert!(!suite.result("CROSS-VAL-001").unwrap().passed);
    assert!(suite.result("CROSS-VAL-003").unwrap().passed);

    assert!(!suite.result("PERF-Kyber768-KEYGEN").unwrap().passed);
    assert!(suite.result("PERF-Kyber768-ENCAP").is_none());

    // 20 < 30 KEM векторов, критический тест провален
    assert!(!run.exit_report.vector_requirements_met);
    assert!(!run.exit_report.critical_tests_passed);
    assert!(!suite.exit_criteria_met());
    assert_eq!(run.exit_code(), 1);
}

#[test]
fn test_reports_written_for_full_run() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config {
        kem_vectors_per_level: 1,
        min_kem_vectors: 6,
        ..deterministic_config()
    };
    let run = BistRunner::<Suite>::new(config, ThresholdTable::empty()).run();

    let vectors_path = dir.path().join("pqc_test_vectors.json");
    let report_path = dir.path().join("pqc_bist_report.json");
    report::save_test_vectors(&run.suite, &vectors_path).unwrap();
    report::save_report(&run.suite, &report_path).unwrap();

    let vectors: Vec<pqc_bist::bist::TestVector> =
        serde_json::from_str(&std::fs::read_to_string(&vectors_path).unwrap()).unwrap();
    assert_eq!(vectors.len(), 6 + 42);
    assert_eq!(vectors.as_slice(), run.suite.test_vectors());

    let report: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&report_path).unwrap()).unwrap();
    assert_eq!(report["run_id"], run.suite.run_id().to_string());
    assert_eq!(report["exit_criteria_met"], true);
    assert_eq!(report["total_tests"], run.suite.total_tests());

    let summary = report::render_summary(&run.suite);
    assert!(summary.contains("Cross-Validation:"));
    assert!(summary.contains("Exit Criteria Met: true"));
}

/// Level192 hashes with SHAKE128 instead of SHAKE256, at the right output size
struct MislabelledShake;

impl PrimitiveProvider for MislabelledShake {
    fn suite_name() -> &'static str {
        "mislabelled SHAKE"
    }

    fn kem_generate_keypair(level: SecurityLevel) -> Result<(Vec<u8>, Vec<u8>), CryptoError> {
        Suite::kem_generate_keypair(level)
    }

    fn kem_encapsulate(public_key: &[u8]) -> Result<(Vec<u8>, Vec<u8>), CryptoError> {
        Suite::kem_encapsulate(public_key)
    }

    fn kem_decapsulate(private_key: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>, CryptoError> {
        Suite::kem_decapsulate(private_key, ciphertext)
    }

    fn sig_generate_keypair(level: SecurityLevel) -> Result<(Vec<u8>, Vec<u8>), CryptoError> {
        Suite::sig_generate_keypair(level)
    }

    fn sign(private_key: &[u8], message: &[u8]) -> Result<Vec<u8>, CryptoError> {
        Suite::sign(private_key, message)
    }

    fn verify(public_key: &[u8], message: &[u8], signature: &[u8]) -> Result<bool, CryptoError> {
        Suite::verify(public_key, message, signature)
    }

    fn hash(level: SecurityLevel, data: &[u8]) -> Result<Vec<u8>, CryptoError> {
        if level == SecurityLevel::Level192 {
            let size = level.hash_output_size();
            return hashing::hash_with_size(data, SecurityLevel::Level128, size);
        }
        Suite::hash(level, data)
    }
}

#[test]
fn test_hash_consistency_checks_reference_output() {
    let runner =
        BistRunner::<MislabelledShake>::new(deterministic_config(), ThresholdTable::empty());
    let mut suite = BistSuite::new();
    runner.run_cross_validation(&mut suite);

    assert!(suite.result("CROSS-VAL-001").unwrap().passed);
    assert!(suite.result("CROSS-VAL-002").unwrap().passed);

    // детерминирован, нужной длины, различает входы, но не SHAKE256
    let hash = suite.result("CROSS-VAL-003").unwrap();
    assert!(!hash.passed);
    assert_eq!(hash.failure_kind, Some(FailureKind::Mismatch));
    assert_eq!(
        hash.error_message.as_deref(),
        Some("SHAKE256 digest differs from the reference output")
    );
}
