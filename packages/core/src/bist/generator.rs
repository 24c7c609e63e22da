//! Генератор корпуса тестовых векторов
//!
//! Для каждого уровня: валидные векторы из живых вызовов примитивов плюс
//! повреждённые (инвертирован один бит) для проверки decapsulation и
//! обнаружения подделки подписи. Ошибка примитива пропускает итерацию,
//! но не прерывает генерацию.

use crate::bist::vector::{TestVector, VectorIdCounter};
use crate::config::Config;
use crate::crypto::levels::{algorithm_name, SecurityLevel, VectorFamily};
use crate::crypto::provider::PrimitiveProvider;
use crate::utils::crypto_utils::flip_low_bit;
use std::marker::PhantomData;

/// Длина сообщения-шаблона `i mod 256`
pub const PATTERN_MESSAGE_LEN: usize = 1000;

/// Сообщения для векторов подписи: пустое, 1 байт, две ASCII строки, шаблон
pub fn signature_fixtures() -> Vec<Vec<u8>> {
    vec![
        Vec::new(),
        b"a".to_vec(),
        b"Hello, Post-Quantum World!".to_vec(),
        b"The quick brown fox jumps over the lazy dog".to_vec(),
        pattern_message(PATTERN_MESSAGE_LEN),
    ]
}

/// Сообщение длины `len`, заполненное `i mod 256`
pub fn pattern_message(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 256) as u8).collect()
}

pub struct VectorGenerator<P: PrimitiveProvider> {
    kem_vectors_per_level: usize,
    signature_corruption_min_len: usize,
    _phantom: PhantomData<P>,
}

impl<P: PrimitiveProvider> VectorGenerator<P> {
    pub fn new(config: &Config) -> Self {
        Self {
            kem_vectors_per_level: config.kem_vectors_per_level,
            signature_corruption_min_len: config.signature_corruption_min_len,
            _phantom: PhantomData,
        }
    }

    /// На каждом уровне `kem_vectors_per_level` пар: валидный вектор и вектор
    /// с инвертированным младшим битом первого байта шифртекста.
    pub fn generate_kem_vectors(&self) -> Vec<TestVector> {
        let mut ids = VectorIdCounter::new(VectorFamily::Kem);
        let mut vectors = Vec::new();

        for level in SecurityLevel::ALL {
            let alg = algorithm_name(level, VectorFamily::Kem);

            for iteration in 0..self.kem_vectors_per_level {
                let (public_key, private_key) = match P::kem_generate_keypair(level) {
                    Ok(pair) => pair,
                    Err(e) => {
                        tracing::warn!(
                            target: "bist::generator",
                            algorithm = alg,
                            iteration,
                            error = %e,
                            "Failed to generate keypair, skipping"
                        );
                        continue;
                    }
                };

                let (ciphertext, shared_secret) = match P::kem_encapsulate(&public_key) {
                    Ok(pair) => pair,
                    Err(e) => {
                        tracing::warn!(
                            target: "bist::generator",
                            algorithm = alg,
                            iteration,
                            error = %e,
                            "Failed to encapsulate, skipping"
                        );
                        continue;
                    }
                };

                vectors.push(TestVector::kem(
                    ids.next_id(),
                    level,
                    &public_key,
                    &private_key,
                    &ciphertext,
                    &shared_secret,
                    true,
                    format!("Valid {} KEM operation", alg),
                ));

                if !ciphertext.is_empty() {
                    vectors.push(TestVector::kem(
                        ids.next_id(),
                        level,
                        &public_key,
                        &private_key,
                        &flip_low_bit(&ciphertext, 0),
                        &[],
                        false,
                        format!("Invalid {} KEM operation - corrupted ciphertext", alg),
                    ));
                }
            }
        }

        tracing::debug!(target: "bist::generator", count = vectors.len(), "Generated KEM vectors");
        vectors
    }

    /// Одна пара ключей на уровень; на каждое сообщение валидный вектор,
    /// вектор с повреждённой подписью и вектор с изменённым сообщением.
    pub fn generate_signature_vectors(&self) -> Vec<TestVector> {
        let fixtures = signature_fixtures();
        let mut ids = VectorIdCounter::new(VectorFamily::Signature);
        let mut vectors = Vec::with_capacity(SecurityLevel::ALL.len() * fixtures.len() * 3);

        for level in SecurityLevel::ALL {
            let alg = algorithm_name(level, VectorFamily::Signature);

            let (public_key, private_key) = match P::sig_generate_keypair(level) {
                Ok(pair) => pair,
                Err(e) => {
                    tracing::warn!(
                        target: "bist::generator",
                        algorithm = alg,
                        error = %e,
                        "Failed to generate keypair, skipping level"
                    );
                    continue;
                }
            };

            for (msg_idx, message) in fixtures.iter().enumerate() {
                let signature = match P::sign(&private_key, message) {
                    Ok(sig) => sig,
                    Err(e) => {
                        tracing::warn!(
                            target: "bist::generator",
                            algorithm = alg,
                            msg_idx,
                            error = %e,
                            "Failed to sign, skipping message"
                        );
                        continue;
                    }
                };

                vectors.push(TestVector::signature(
                    ids.next_id(),
                    level,
                    &public_key,
                    &private_key,
                    message,
                    &signature,
                    true,
                    format!("Valid {} signature for message type {}", alg, msg_idx),
                ));

                if signature.len() > self.signature_corruption_min_len {
                    vectors.push(TestVector::signature(
                        ids.next_id(),
                        level,
                        &public_key,
                        &private_key,
                        message,
                        &flip_low_bit(&signature, signature.len() / 2),
                        false,
                        format!("Invalid {} signature - corrupted signature", alg),
                    ));
                }

                if !message.is_empty() {
                    vectors.push(TestVector::signature(
                        ids.next_id(),
                        level,
                        &public_key,
                        &private_key,
                        &flip_low_bit(message, 0),
                        &signature,
                        false,
                        format!("Invalid {} signature - wrong message", alg),
                    ));
                }
            }
        }

        tracing::debug!(
            target: "bist::generator",
            count = vectors.len(),
            "Generated signature test vectors"
        );
        vectors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::suites::pq::PostQuantumSuiteProvider;

    fn generator() -> VectorGenerator<PostQuantumSuiteProvider> {
        VectorGenerator::new(&Config::default())
    }

    #[test]
    fn test_fixtures() {
        let fixtures = signature_fixtures();
        assert_eq!(fixtures.len(), 5);
        assert!(fixtures[0].is_empty());
        assert_eq!(fixtures[1], b"a");
        assert_eq!(fixtures[4].len(), 1000);
        assert_eq!(fixtures[4][255], 255);
        assert_eq!(fixtures[4][256], 0);
    }

    #[test]
    fn test_kem_corpus_shape() {
        let vectors = generator().generate_kem_vectors();
        assert_eq!(vectors.len(), 30);
        assert_eq!(vectors[0].id, "KEM-001");
        assert_eq!(vectors[29].id, "KEM-030");

        for pair in vectors.chunks(2) {
            let (valid, invalid) = (&pair[0], &pair[1]);
            assert!(valid.expected_result);
            assert!(!invalid.expected_result);
            assert!(!valid.shared_secret.is_empty());
            assert!(invalid.shared_secret.is_empty());
            assert_eq!(valid.private_key, invalid.private_key);

            let ct = hex::decode(&valid.ciphertext).unwrap();
            let corrupted = hex::decode(&invalid.ciphertext).unwrap();
            assert_eq!(ct[0] ^ 1, corrupted[0]);
            assert_eq!(ct[1..], corrupted[1..]);
        }

        assert_eq!(vectors[0].algorithm, "Kyber512");
        assert_eq!(vectors[10].algorithm, "Kyber768");
        assert_eq!(vectors[20].algorithm, "Kyber1024");
    }

    #[test]
    fn test_signature_corpus_shape() {
        let vectors = generator().generate_signature_vectors();
        // 3 уровня x (5 валидных + 5 повреждённых подписей + 4 чужих сообщения)
        assert_eq!(vectors.len(), 42);
        assert_eq!(vectors[0].id, "SIG-001");
        assert_eq!(vectors[0].description, "Valid Dilithium2 signature for message type 0");
        assert_eq!(vectors[1].description, "Invalid Dilithium2 signature - corrupted signature");
        // пустое сообщение не получает вектора с чужим сообщением
        assert_eq!(vectors[2].description, "Valid Dilithium2 signature for message type 1");
        assert_eq!(vectors[4].description, "Invalid Dilithium2 signature - wrong message");

        let valid = vectors.iter().filter(|v| v.expected_result).count();
        assert_eq!(valid, 15);
    }
}
