//! Исполнитель / классификатор векторов
//!
//! Вектор проигрывается через примитивы, результат сравнивается с
//! `expected_result`. Для KEM семантика асимметрична:
//!
//! | expected | decapsulate       | recorded secret | итог              |
//! |----------|-------------------|-----------------|-------------------|
//! | true     | ошибка            | -               | PrimitiveFailure  |
//! | true     | секрет            | совпал          | pass              |
//! | true     | секрет            | не совпал       | Mismatch          |
//! | false    | ошибка            | -               | pass              |
//! | false    | секрет            | пустой          | pass              |
//! | false    | секрет            | не совпал       | pass              |
//! | false    | секрет            | совпал          | UnexpectedMatch   |
//!
//! Для подписи `verify` должен вернуть ровно `expected_result`; ошибка
//! вызова всегда провал. Ошибка декодирования hex всегда провал.
//!
//! Ad hoc режим ([`validate_test_vector`]) мягче в одном месте: валидный KEM
//! вектор без записанного секрета проходит после успешной decapsulation.

use crate::bist::result::{FailureKind, VectorFailure};
use crate::bist::vector::{decode_field, TestVector};
use crate::crypto::levels::VectorFamily;
use crate::crypto::provider::PrimitiveProvider;
use crate::utils::crypto_utils::secure_compare;
use std::marker::PhantomData;
use zeroize::Zeroizing;

/// Итог пакетной классификации
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchOutcome {
    pub passed: usize,
    pub failed: usize,
    /// `"Test vector <id>: <detail>"` для каждого провала
    pub diagnostics: Vec<String>,
    pub failure_kinds: Vec<FailureKind>,
}

impl BatchOutcome {
    pub fn total(&self) -> usize {
        self.passed + self.failed
    }
}

pub struct VectorExecutor<P: PrimitiveProvider> {
    /// Не сравнивать секрет, если у валидного KEM вектора он не записан
    skip_missing_secret: bool,
    _phantom: PhantomData<P>,
}

impl<P: PrimitiveProvider> Default for VectorExecutor<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: PrimitiveProvider> VectorExecutor<P> {
    pub fn new() -> Self {
        Self {
            skip_missing_secret: false,
            _phantom: PhantomData,
        }
    }

    /// Исполнитель для проверки отдельных векторов вне прогона
    pub fn ad_hoc() -> Self {
        Self {
            skip_missing_secret: true,
            _phantom: PhantomData,
        }
    }

    /// Классифицировать один вектор
    pub fn classify(&self, vector: &TestVector) -> Result<(), VectorFailure> {
        match vector.family {
            VectorFamily::Kem => self.classify_kem(vector),
            VectorFamily::Signature => self.classify_signature(vector),
        }
    }

    /// Прогнать весь пакет. Никогда не прерывается на отдельном векторе.
    pub fn run_batch<'a>(&self, vectors: impl IntoIterator<Item = &'a TestVector>) -> BatchOutcome {
        let mut outcome = BatchOutcome::default();

        for vector in vectors {
            match self.classify(vector) {
                Ok(()) => outcome.passed += 1,
                Err(failure) => {
                    tracing::debug!(
                        target: "bist::executor",
                        vector_id = %vector.id,
                        kind = ?failure.kind,
                        "{}",
                        failure.detail
                    );
                    outcome.failed += 1;
                    outcome
                        .diagnostics
                        .push(format!("Test vector {}: {}", vector.id, failure.detail));
                    outcome.failure_kinds.push(failure.kind);
                }
            }
        }

        outcome
    }

    fn classify_kem(&self, vector: &TestVector) -> Result<(), VectorFailure> {
        // публичный ключ не участвует в decapsulation, но должен декодироваться
        decode_field("public key", &vector.public_key)?;
        let private_key = Zeroizing::new(decode_field("private key", &vector.private_key)?);
        let ciphertext = decode_field("ciphertext", &vector.ciphertext)?;

        let recovered = P::kem_decapsulate(&private_key, &ciphertext).map(Zeroizing::new);

        if vector.expected_result {
            let recovered = recovered.map_err(|e| {
                VectorFailure::new(
                    FailureKind::PrimitiveFailure,
                    format!("Decapsulation failed unexpectedly: {}", e),
                )
            })?;
            if self.skip_missing_secret && vector.shared_secret.is_empty() {
                return Ok(());
            }
            let expected = Zeroizing::new(decode_field("shared secret", &vector.shared_secret)?);

            if secure_compare(&recovered, &expected) {
                Ok(())
            } else {
                Err(VectorFailure::new(FailureKind::Mismatch, "Shared secret mismatch"))
            }
        } else {
            let recovered = match recovered {
                // ожидаемый отказ
                Err(_) => return Ok(()),
                Ok(secret) => secret,
            };
            if vector.shared_secret.is_empty() {
                return Ok(());
            }

            let expected = Zeroizing::new(decode_field("shared secret", &vector.shared_secret)?);
            if secure_compare(&recovered, &expected) {
                Err(VectorFailure::new(
                    FailureKind::UnexpectedMatch,
                    "Unexpected match for invalid input",
                ))
            } else {
                Ok(())
            }
        }
    }

    fn classify_signature(&self, vector: &TestVector) -> Result<(), VectorFailure> {
        let public_key = decode_field("public key", &vector.public_key)?;
        let message = decode_field("message", &vector.message)?;
        let signature = decode_field("signature", &vector.signature)?;

        let valid = P::verify(&public_key, &message, &signature).map_err(|e| {
            VectorFailure::new(FailureKind::PrimitiveFailure, format!("Verification error: {}", e))
        })?;

        if valid == vector.expected_result {
            Ok(())
        } else {
            Err(VectorFailure::new(
                FailureKind::Mismatch,
                format!(
                    "Verification result mismatch: got {}, expected {}",
                    valid, vector.expected_result
                ),
            ))
        }
    }
}

/// Проверить один вектор вне прогона suite (ad hoc)
pub fn validate_test_vector<P: PrimitiveProvider>(
    vector: &TestVector,
) -> Result<(), VectorFailure> {
    VectorExecutor::<P>::ad_hoc().classify(vector)
}
