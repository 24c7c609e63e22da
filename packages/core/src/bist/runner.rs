//! Оркестрация прогона BIST
//!
//! ```text
//! Phase 1  генерация векторов (KEM, подписи)
//! Phase 2  KEM BIST:       KEM-BIST-001 + KEM-<alg>-BIST
//! Phase 3  Signature BIST: SIG-BIST-001 + SIG-<alg>-BIST
//! Phase 4  cross-validation: CROSS-VAL-001..003
//! Phase 5  производительность: PERF-<alg>-<op>
//! Phase 6  end time, критерии выхода
//! ```
//!
//! Фазы строго последовательны. Каждая фаза получает `&mut BistSuite` и
//! только добавляет в него результаты; ошибки примитивов превращаются в
//! проваленные результаты и никогда не прерывают прогон.

use crate::bist::executor::VectorExecutor;
use crate::bist::exit_criteria::{
    ExitCriteriaReport, ExitPolicy, INTERFERENCE_TEST_ID, KEM_VECTOR_VALIDATION_ID,
    SIGNATURE_VECTOR_VALIDATION_ID,
};
use crate::bist::generator::{pattern_message, VectorGenerator};
use crate::bist::perf::{OpKind, PerformanceProbe, ThresholdTable};
use crate::bist::result::{BistResult, FailureKind, VectorFailure};
use crate::bist::suite::BistSuite;
use crate::config::Config;
use crate::crypto::{aead, hashing};
use crate::crypto::levels::{algorithm_name, sizes_for, SecurityLevel, VectorFamily};
use crate::crypto::provider::PrimitiveProvider;
use crate::error::CryptoError;
use crate::utils::crypto_utils::{flip_low_bit, secure_compare};
use std::marker::PhantomData;
use std::time::{Duration, Instant};

pub const KEM_AEAD_TEST_ID: &str = "CROSS-VAL-002";
pub const HASH_CONSISTENCY_TEST_ID: &str = "CROSS-VAL-003";

const CROSS_VALIDATION_ALGORITHM: &str = "CROSS-VALIDATION";
const CROSS_VALIDATION_MESSAGE: &[u8] = b"Cross validation test message";
const PERFORMANCE_MESSAGE: &[u8] = b"Performance test message";

/// Сообщения стресс-теста подписи
fn signature_stress_messages() -> Vec<Vec<u8>> {
    vec![
        Vec::new(),
        b"test message".to_vec(),
        b"Hello, Post-Quantum Cryptography!".to_vec(),
        pattern_message(1024),
    ]
}

/// Преобразовать ошибку примитива в провал с контекстом
fn primitive(context: &'static str) -> impl FnOnce(CryptoError) -> VectorFailure {
    move |e| VectorFailure::new(FailureKind::PrimitiveFailure, format!("{}: {}", context, e))
}

/// Итог прогона: suite с результатами и подробности критериев выхода
#[derive(Debug)]
pub struct BistRun {
    pub suite: BistSuite,
    pub exit_report: ExitCriteriaReport,
}

impl BistRun {
    pub fn exit_code(&self) -> i32 {
        self.exit_report.exit_code()
    }
}

pub struct BistRunner<P: PrimitiveProvider> {
    config: Config,
    probe: PerformanceProbe,
    policy: ExitPolicy,
    _phantom: PhantomData<P>,
}

impl<P: PrimitiveProvider> BistRunner<P> {
    /// `thresholds` игнорируется, если в конфигурации пороги отключены
    pub fn new(config: Config, thresholds: ThresholdTable) -> Self {
        let thresholds = if config.thresholds_enabled {
            thresholds
        } else {
            ThresholdTable::empty()
        };
        Self {
            policy: ExitPolicy::from_config(&config),
            probe: PerformanceProbe::new(thresholds),
            config,
            _phantom: PhantomData,
        }
    }

    /// Полный прогон всех фаз
    pub fn run(&self) -> BistRun {
        let mut suite = BistSuite::new();
        tracing::info!(
            target: "bist::runner",
            run_id = %suite.run_id(),
            suite = P::suite_name(),
            "Starting comprehensive BIST suite"
        );

        tracing::info!(target: "bist::runner", "Phase 1: generating test vectors");
        self.generate_vectors(&mut suite);

        tracing::info!(target: "bist::runner", "Phase 2: running KEM BIST");
        self.run_kem_bist(&mut suite);

        tracing::info!(target: "bist::runner", "Phase 3: running signature BIST");
        self.run_signature_bist(&mut suite);

        tracing::info!(target: "bist::runner", "Phase 4: running cross-validation tests");
        self.run_cross_validation(&mut suite);

        tracing::info!(target: "bist::runner", "Phase 5: running performance tests");
        self.run_performance_tests(&mut suite);

        suite.finalize();
        let exit_report = self.policy.evaluate(&mut suite);

        tracing::info!(
            target: "bist::runner",
            total = suite.total_tests(),
            passed = suite.passed_tests(),
            failed = suite.failed_tests(),
            exit_criteria_met = suite.exit_criteria_met(),
            "BIST suite finished"
        );

        BistRun { suite, exit_report }
    }

    // === Phase 1 ===

    pub fn generate_vectors(&self, suite: &mut BistSuite) {
        let generator = VectorGenerator::<P>::new(&self.config);
        suite.add_vectors(generator.generate_kem_vectors());
        suite.add_vectors(generator.generate_signature_vectors());

        tracing::info!(
            target: "bist::runner",
            total = suite.test_vectors().len(),
            kem = suite.vector_count(VectorFamily::Kem),
            signature = suite.vector_count(VectorFamily::Signature),
            "Generated test vectors"
        );
    }

    // === Phase 2 / 3 ===

    pub fn run_kem_bist(&self, suite: &mut BistSuite) {
        if self.validate_family(suite, VectorFamily::Kem) {
            for level in SecurityLevel::ALL {
                let result = self.kem_stress_test(level);
                suite.add_result(result);
            }
        }
    }

    pub fn run_signature_bist(&self, suite: &mut BistSuite) {
        if self.validate_family(suite, VectorFamily::Signature) {
            for level in SecurityLevel::ALL {
                let result = self.signature_stress_test(level);
                suite.add_result(result);
            }
        }
    }

    /// Пакетная проверка векторов семейства. `false`, если векторов нет.
    fn validate_family(&self, suite: &mut BistSuite, family: VectorFamily) -> bool {
        let (test_id, algorithm, label) = match family {
            VectorFamily::Kem => (KEM_VECTOR_VALIDATION_ID, "KEM", "KEM"),
            VectorFamily::Signature => (SIGNATURE_VECTOR_VALIDATION_ID, "SIGNATURE", "signature"),
        };

        let total = suite.vector_count(family);
        if total == 0 {
            tracing::error!(target: "bist::runner", family = ?family, "No test vectors generated");
            suite.add_result(BistResult::fail(
                test_id,
                algorithm,
                "Test Vector Generation",
                Duration::ZERO,
                FailureKind::MissingVectors,
                format!("No {} test vectors generated", label),
            ));
            return false;
        }

        let start = Instant::now();
        let outcome = VectorExecutor::<P>::new().run_batch(suite.vectors_of(family));
        let elapsed = start.elapsed();

        for diagnostic in &outcome.diagnostics {
            tracing::warn!(target: "bist::runner", "{}", diagnostic);
        }
        for diagnostic in outcome.diagnostics {
            suite.add_error(diagnostic);
        }

        let result = if outcome.failed == 0 {
            BistResult::pass(test_id, algorithm, "Test Vector Validation", elapsed)
        } else {
            BistResult::fail(
                test_id,
                algorithm,
                "Test Vector Validation",
                elapsed,
                FailureKind::VectorFailures,
                format!("{}/{} test vectors failed", outcome.failed, total),
            )
        };
        suite.add_result(result.with_test_vectors(total));
        true
    }

    fn kem_stress_test(&self, level: SecurityLevel) -> BistResult {
        let alg = algorithm_name(level, VectorFamily::Kem);
        let iterations = self.config.kem_stress_iterations;

        let start = Instant::now();
        let outcome = (0..iterations).try_for_each(|_| Self::kem_stress_round(level));

        BistResult::from_outcome(
            format!("KEM-{}-BIST", alg),
            alg,
            "Algorithm Stress Test",
            start.elapsed(),
            outcome,
        )
        .with_iterations(iterations)
    }

    fn kem_stress_round(level: SecurityLevel) -> Result<(), VectorFailure> {
        let (public_key, private_key) =
            P::kem_generate_keypair(level).map_err(primitive("Key generation failed"))?;
        let (ciphertext, sent) =
            P::kem_encapsulate(&public_key).map_err(primitive("Encapsulation failed"))?;
        let received = P::kem_decapsulate(&private_key, &ciphertext)
            .map_err(primitive("Decapsulation failed"))?;

        if !secure_compare(&sent, &received) {
            return Err(VectorFailure::new(FailureKind::Mismatch, "Shared secrets do not match"));
        }

        let sizes = sizes_for(level, VectorFamily::Kem);
        if public_key.len() != sizes.public_key
            || private_key.len() != sizes.private_key
            || ciphertext.len() != sizes.third
            || sent.len() != sizes.fourth
        {
            return Err(VectorFailure::new(
                FailureKind::SizeMismatch,
                "Unexpected key or ciphertext sizes",
            ));
        }
        Ok(())
    }

    fn signature_stress_test(&self, level: SecurityLevel) -> BistResult {
        let alg = algorithm_name(level, VectorFamily::Signature);
        let iterations = self.config.signature_stress_iterations;
        let messages = signature_stress_messages();

        let start = Instant::now();
        let outcome =
            (0..iterations).try_for_each(|_| Self::signature_stress_round(level, &messages));

        BistResult::from_outcome(
            format!("SIG-{}-BIST", alg),
            alg,
            "Algorithm Stress Test",
            start.elapsed(),
            outcome,
        )
        .with_iterations(iterations)
    }

    fn signature_stress_round(
        level: SecurityLevel,
        messages: &[Vec<u8>],
    ) -> Result<(), VectorFailure> {
        let (public_key, private_key) =
            P::sig_generate_keypair(level).map_err(primitive("Key generation failed"))?;

        for message in messages {
            let signature = P::sign(&private_key, message).map_err(primitive("Signing failed"))?;

            let valid = P::verify(&public_key, message, &signature)
                .map_err(primitive("Verification failed"))?;
            if !valid {
                return Err(VectorFailure::new(
                    FailureKind::Mismatch,
                    "Valid signature verification failed",
                ));
            }

            if !message.is_empty() {
                let wrong_message = flip_low_bit(message, 0);
                let wrong_valid = P::verify(&public_key, &wrong_message, &signature)
                    .map_err(primitive("Wrong message verification error"))?;
                if wrong_valid {
                    return Err(VectorFailure::new(
                        FailureKind::Mismatch,
                        "Wrong message incorrectly verified",
                    ));
                }
            }
        }

        let sizes = sizes_for(level, VectorFamily::Signature);
        if public_key.len() != sizes.public_key || private_key.len() != sizes.private_key {
            return Err(VectorFailure::new(FailureKind::SizeMismatch, "Unexpected key sizes"));
        }

        let signature = P::sign(&private_key, b"size test").map_err(primitive("Signing failed"))?;
        if signature.len() != sizes.third {
            return Err(VectorFailure::new(FailureKind::SizeMismatch, "Unexpected signature size"));
        }
        Ok(())
    }

    // === Phase 4 ===

    pub fn run_cross_validation(&self, suite: &mut BistSuite) {
        suite.add_result(Self::cross_test(
            INTERFERENCE_TEST_ID,
            "Algorithm Interference Test",
            Self::interference_round,
        ));
        suite.add_result(Self::cross_test(
            KEM_AEAD_TEST_ID,
            "KEM-AEAD Integration Test",
            Self::kem_aead_round,
        ));
        suite.add_result(Self::cross_test(
            HASH_CONSISTENCY_TEST_ID,
            "Hash Consistency Test",
            Self::hash_consistency_round,
        ));
    }

    /// Один кросс-тест по всем уровням; первый провал прерывает тест
    fn cross_test(
        test_id: &str,
        test_name: &str,
        round: impl Fn(SecurityLevel) -> Result<(), VectorFailure>,
    ) -> BistResult {
        let start = Instant::now();
        let outcome = SecurityLevel::ALL.into_iter().try_for_each(round);
        BistResult::from_outcome(
            test_id,
            CROSS_VALIDATION_ALGORITHM,
            test_name,
            start.elapsed(),
            outcome,
        )
    }

    /// KEM и подписи вперемешку на свежих ключах: операции не должны влиять друг на друга
    fn interference_round(level: SecurityLevel) -> Result<(), VectorFailure> {
        let (kem_public, kem_private) =
            P::kem_generate_keypair(level).map_err(primitive("KEM key generation failed"))?;
        let (sig_public, sig_private) =
            P::sig_generate_keypair(level).map_err(primitive("Signature key generation failed"))?;

        let (ciphertext, sent) =
            P::kem_encapsulate(&kem_public).map_err(primitive("Encapsulation failed"))?;
        let signature =
            P::sign(&sig_private, CROSS_VALIDATION_MESSAGE).map_err(primitive("Signing failed"))?;
        let received = P::kem_decapsulate(&kem_private, &ciphertext)
            .map_err(primitive("Decapsulation failed"))?;

        let valid = P::verify(&sig_public, CROSS_VALIDATION_MESSAGE, &signature)
            .map_err(primitive("Verification failed"))?;
        if !valid {
            return Err(VectorFailure::new(
                FailureKind::Mismatch,
                "Verification failed: signature rejected",
            ));
        }

        if !secure_compare(&sent, &received) {
            return Err(VectorFailure::new(
                FailureKind::Mismatch,
                "Shared secrets do not match in cross-validation",
            ));
        }
        Ok(())
    }

    /// Секрет KEM → HKDF-SHA256 → ChaCha20-Poly1305 на обеих сторонах
    fn kem_aead_round(level: SecurityLevel) -> Result<(), VectorFailure> {
        let alg = algorithm_name(level, VectorFamily::Kem);
        let info = format!("pqc-bist kem-aead {}", alg);
        let plaintext = b"KEM-AEAD integration payload";

        let (public_key, private_key) =
            P::kem_generate_keypair(level).map_err(primitive("KEM key generation failed"))?;
        let (ciphertext, sent) =
            P::kem_encapsulate(&public_key).map_err(primitive("Encapsulation failed"))?;
        let received = P::kem_decapsulate(&private_key, &ciphertext)
            .map_err(primitive("Decapsulation failed"))?;

        let sender_key = aead::derive_session_key(&sent, info.as_bytes())
            .map_err(primitive("Key derivation failed"))?;
        let receiver_key = aead::derive_session_key(&received, info.as_bytes())
            .map_err(primitive("Key derivation failed"))?;

        let (nonce, sealed) = aead::seal(&sender_key, plaintext, alg.as_bytes())
            .map_err(primitive("AEAD encryption failed"))?;
        let opened = aead::open(&receiver_key, &nonce, &sealed, alg.as_bytes())
            .map_err(primitive("AEAD decryption failed"))?;
        if opened != plaintext {
            return Err(VectorFailure::new(FailureKind::Mismatch, "AEAD round trip mismatch"));
        }

        let tampered = flip_low_bit(&sealed, 0);
        if aead::open(&receiver_key, &nonce, &tampered, alg.as_bytes()).is_ok() {
            return Err(VectorFailure::new(
                FailureKind::UnexpectedMatch,
                "Tampered AEAD ciphertext was accepted",
            ));
        }
        Ok(())
    }

    fn hash_consistency_round(level: SecurityLevel) -> Result<(), VectorFailure> {
        let data = b"Hash consistency test data";
        let first = P::hash(level, data).map_err(primitive("Hashing failed"))?;
        let second = P::hash(level, data).map_err(primitive("Hashing failed"))?;
        let other = P::hash(level, &flip_low_bit(data, 0)).map_err(primitive("Hashing failed"))?;

        if first != second {
            return Err(VectorFailure::new(
                FailureKind::Mismatch,
                format!("{} is not deterministic", level.hash_algorithm()),
            ));
        }
        if first.len() != level.hash_output_size() {
            return Err(VectorFailure::new(
                FailureKind::SizeMismatch,
                format!(
                    "{} produced {} bytes, expected {}",
                    level.hash_algorithm(),
                    first.len(),
                    level.hash_output_size()
                ),
            ));
        }
        if first == other {
            return Err(VectorFailure::new(
                FailureKind::UnexpectedMatch,
                format!("{} does not distinguish inputs", level.hash_algorithm()),
            ));
        }

        // SHAKE: дайджест провайдера обязан быть префиксом длинного эталонного вывода
        let reference_len = match level {
            SecurityLevel::Level256 => level.hash_output_size(),
            _ => level.hash_output_size() * 2,
        };
        let reference = hashing::hash_with_size(data, level, reference_len)
            .map_err(primitive("Reference hashing failed"))?;
        if !reference.starts_with(&first) {
            return Err(VectorFailure::new(
                FailureKind::Mismatch,
                format!("{} digest differs from the reference output", level.hash_algorithm()),
            ));
        }
        Ok(())
    }

    // === Phase 5 ===

    pub fn run_performance_tests(&self, suite: &mut BistSuite) {
        for level in SecurityLevel::ALL {
            self.kem_performance(level, suite);
        }
        for level in SecurityLevel::ALL {
            self.signature_performance(level, suite);
        }
        for level in SecurityLevel::ALL {
            self.hash_performance(level, suite);
        }
    }

    fn kem_performance(&self, level: SecurityLevel, suite: &mut BistSuite) {
        let alg = algorithm_name(level, VectorFamily::Kem);

        let (keys, elapsed) = PerformanceProbe::measure(|| P::kem_generate_keypair(level));
        let keys =
            self.record_perf(suite, alg, OpKind::KeyGen, elapsed, keys, "Key generation failed");
        let Some((public_key, private_key)) = keys else { return };

        let (encapsulated, elapsed) = PerformanceProbe::measure(|| P::kem_encapsulate(&public_key));
        let encapsulated = self.record_perf(
            suite,
            alg,
            OpKind::Encap,
            elapsed,
            encapsulated,
            "Encapsulation failed",
        );
        let Some((ciphertext, _)) = encapsulated else { return };

        let (decapsulated, elapsed) =
            PerformanceProbe::measure(|| P::kem_decapsulate(&private_key, &ciphertext));
        self.record_perf(suite, alg, OpKind::Decap, elapsed, decapsulated, "Decapsulation failed");
    }

    fn signature_performance(&self, level: SecurityLevel, suite: &mut BistSuite) {
        let alg = algorithm_name(level, VectorFamily::Signature);

        let (keys, elapsed) = PerformanceProbe::measure(|| P::sig_generate_keypair(level));
        let keys =
            self.record_perf(suite, alg, OpKind::KeyGen, elapsed, keys, "Key generation failed");
        let Some((public_key, private_key)) = keys else { return };

        let (signature, elapsed) =
            PerformanceProbe::measure(|| P::sign(&private_key, PERFORMANCE_MESSAGE));
        let signature =
            self.record_perf(suite, alg, OpKind::Sign, elapsed, signature, "Signing failed");
        let Some(signature) = signature else { return };

        let (verified, elapsed) =
            PerformanceProbe::measure(|| P::verify(&public_key, PERFORMANCE_MESSAGE, &signature));
        let call = match verified {
            Ok(true) => Ok(()),
            Ok(false) => Err(VectorFailure::new(
                FailureKind::Mismatch,
                "Signature verification returned false",
            )),
            Err(e) => Err(primitive("Verification failed")(e)),
        };
        suite.add_result(self.probe.result_for(alg, OpKind::Verify, elapsed, call));
    }

    fn hash_performance(&self, level: SecurityLevel, suite: &mut BistSuite) {
        let data = pattern_message(1024);
        let (digest, elapsed) = PerformanceProbe::measure(|| P::hash(level, &data));
        self.record_perf(
            suite,
            level.hash_algorithm(),
            OpKind::Hash,
            elapsed,
            digest,
            "Hashing failed",
        );
    }

    /// Записать `PERF-<alg>-<op>`; `Some` только если вызов примитива успешен
    fn record_perf<T>(
        &self,
        suite: &mut BistSuite,
        algorithm: &str,
        op: OpKind,
        elapsed: Duration,
        outcome: Result<T, CryptoError>,
        context: &'static str,
    ) -> Option<T> {
        match outcome {
            Ok(value) => {
                suite.add_result(self.probe.result_for(algorithm, op, elapsed, Ok(())));
                Some(value)
            }
            Err(e) => {
                let failure = primitive(context)(e);
                suite.add_result(self.probe.result_for(algorithm, op, elapsed, Err(failure)));
                None
            }
        }
    }
}
