//! Модель тестового вектора
//!
//! Вектор создаётся генератором один раз и дальше только читается.
//! Байтовые поля хранятся в hex; поля, не относящиеся к семейству,
//! остаются пустыми и не попадают в JSON.

use crate::bist::result::{FailureKind, VectorFailure};
use crate::crypto::levels::{algorithm_name, SecurityLevel, VectorFamily};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestVector {
    pub id: String,
    pub family: VectorFamily,
    pub algorithm: String,
    pub security_level: SecurityLevel,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub public_key: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub private_key: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub message: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub signature: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub ciphertext: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub shared_secret: String,
    pub expected_result: bool,
    pub description: String,
}

/// `KEM-001`, `SIG-042`, ...
pub fn format_vector_id(family: VectorFamily, n: usize) -> String {
    format!("{}-{:03}", family.id_prefix(), n)
}

/// Счётчик идентификаторов одного семейства, начинается с 1
#[derive(Debug)]
pub struct VectorIdCounter {
    family: VectorFamily,
    next: usize,
}

impl VectorIdCounter {
    pub fn new(family: VectorFamily) -> Self {
        Self { family, next: 1 }
    }

    pub fn next_id(&mut self) -> String {
        let id = format_vector_id(self.family, self.next);
        self.next += 1;
        id
    }
}

impl TestVector {
    /// KEM вектор. `shared_secret` пустой для повреждённых векторов.
    #[allow(clippy::too_many_arguments)]
    pub fn kem(
        id: String,
        level: SecurityLevel,
        public_key: &[u8],
        private_key: &[u8],
        ciphertext: &[u8],
        shared_secret: &[u8],
        expected_result: bool,
        description: String,
    ) -> Self {
        Self {
            id,
            family: VectorFamily::Kem,
            algorithm: algorithm_name(level, VectorFamily::Kem).to_string(),
            security_level: level,
            public_key: hex::encode(public_key),
            private_key: hex::encode(private_key),
            message: String::new(),
            signature: String::new(),
            ciphertext: hex::encode(ciphertext),
            shared_secret: hex::encode(shared_secret),
            expected_result,
            description,
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub fn signature(
        id: String,
        level: SecurityLevel,
        public_key: &[u8],
        private_key: &[u8],
        message: &[u8],
        signature: &[u8],
        expected_result: bool,
        description: String,
    ) -> Self {
        Self {
            id,
            family: VectorFamily::Signature,
            algorithm: algorithm_name(level, VectorFamily::Signature).to_string(),
            security_level: level,
            public_key: hex::encode(public_key),
            private_key: hex::encode(private_key),
            message: hex::encode(message),
            signature: hex::encode(signature),
            ciphertext: String::new(),
            shared_secret: String::new(),
            expected_result,
            description,
        }
    }
}

/// Декодировать hex-поле вектора; ошибка классифицируется как [`FailureKind::Decode`]
pub fn decode_field(field: &str, value: &str) -> Result<Vec<u8>, VectorFailure> {
    hex::decode(value).map_err(|e| {
        VectorFailure::new(FailureKind::Decode, format!("Failed to decode {}: {}", field, e))
    })
}
