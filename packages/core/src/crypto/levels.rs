//! Реестр уровней безопасности
//!
//! Закрытая таблица: уровень → имя алгоритма и фиксированные размеры
//! ключей/шифртекстов/подписей для каждого семейства примитивов.
//!
//! | Уровень  | KEM       | pub/priv/ct/ss         | Подпись    | pub/priv/sig     | Хеш      |
//! |----------|-----------|------------------------|------------|------------------|----------|
//! | Level128 | Kyber512  | 800/1632/768/32        | Dilithium2 | 1312/2528/2420   | SHAKE128 |
//! | Level192 | Kyber768  | 1184/2400/1088/32      | Dilithium3 | 1952/4000/3293   | SHAKE256 |
//! | Level256 | Kyber1024 | 1568/3168/1568/32      | Dilithium5 | 2592/4864/4595   | SHA3-256 |
//!
//! Ключевой материал не несёт тега уровня, поэтому уровень восстанавливается
//! по длине ключа. Неизвестная длина даёт [`FALLBACK_LEVEL`] с флагом `fallback`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Уровень безопасности. В JSON пишется строкой [`SecurityLevel::description`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SecurityLevel {
    #[serde(rename = "Level 1 (~AES-128)")]
    Level128,
    #[serde(rename = "Level 3 (~AES-192)")]
    Level192,
    #[serde(rename = "Level 5 (~AES-256)")]
    Level256,
}

/// Семейство операций
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VectorFamily {
    Kem,
    Signature,
}

/// Уровень, который получает ключ неизвестной длины
pub const FALLBACK_LEVEL: SecurityLevel = SecurityLevel::Level192;

/// Размеры материала для (уровень, семейство).
///
/// Для KEM: `third` = ciphertext, `fourth` = shared secret.
/// Для подписей: `third` = signature, `fourth` = 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaterialSizes {
    pub public_key: usize,
    pub private_key: usize,
    pub third: usize,
    pub fourth: usize,
}

/// Результат обратного поиска уровня по длине ключа
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelLookup {
    pub level: SecurityLevel,
    /// `true`, если длина не распознана и применён [`FALLBACK_LEVEL`]
    pub fallback: bool,
}

impl SecurityLevel {
    pub const ALL: [SecurityLevel; 3] = [
        SecurityLevel::Level128,
        SecurityLevel::Level192,
        SecurityLevel::Level256,
    ];

    pub fn description(&self) -> &'static str {
        match self {
            SecurityLevel::Level128 => "Level 1 (~AES-128)",
            SecurityLevel::Level192 => "Level 3 (~AES-192)",
            SecurityLevel::Level256 => "Level 5 (~AES-256)",
        }
    }

    /// Имя алгоритма хеширования для уровня
    pub fn hash_algorithm(&self) -> &'static str {
        match self {
            SecurityLevel::Level128 => "SHAKE128",
            SecurityLevel::Level192 => "SHAKE256",
            SecurityLevel::Level256 => "SHA3-256",
        }
    }

    /// Длина дайджеста по умолчанию (в байтах)
    pub fn hash_output_size(&self) -> usize {
        match self {
            SecurityLevel::Level128 => 16,
            SecurityLevel::Level192 | SecurityLevel::Level256 => 32,
        }
    }
}

impl fmt::Display for SecurityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

impl VectorFamily {
    /// Префикс идентификаторов векторов
    pub fn id_prefix(&self) -> &'static str {
        match self {
            VectorFamily::Kem => "KEM",
            VectorFamily::Signature => "SIG",
        }
    }
}

pub fn algorithm_name(level: SecurityLevel, family: VectorFamily) -> &'static str {
    match (family, level) {
        (VectorFamily::Kem, SecurityLevel::Level128) => "Kyber512",
        (VectorFamily::Kem, SecurityLevel::Level192) => "Kyber768",
        (VectorFamily::Kem, SecurityLevel::Level256) => "Kyber1024",
        (VectorFamily::Signature, SecurityLevel::Level128) => "Dilithium2",
        (VectorFamily::Signature, SecurityLevel::Level192) => "Dilithium3",
        (VectorFamily::Signature, SecurityLevel::Level256) => "Dilithium5",
    }
}

pub fn sizes_for(level: SecurityLevel, family: VectorFamily) -> MaterialSizes {
    let (public_key, private_key, third, fourth) = match (family, level) {
        (VectorFamily::Kem, SecurityLevel::Level128) => (800, 1632, 768, 32),
        (VectorFamily::Kem, SecurityLevel::Level192) => (1184, 2400, 1088, 32),
        (VectorFamily::Kem, SecurityLevel::Level256) => (1568, 3168, 1568, 32),
        (VectorFamily::Signature, SecurityLevel::Level128) => (1312, 2528, 2420, 0),
        (VectorFamily::Signature, SecurityLevel::Level192) => (1952, 4000, 3293, 0),
        (VectorFamily::Signature, SecurityLevel::Level256) => (2592, 4864, 4595, 0),
    };
    MaterialSizes {
        public_key,
        private_key,
        third,
        fourth,
    }
}

pub fn level_from_public_key_size(size: usize, family: VectorFamily) -> LevelLookup {
    reverse_lookup(family, "public key", size, |sizes| sizes.public_key)
}

pub fn level_from_private_key_size(size: usize, family: VectorFamily) -> LevelLookup {
    reverse_lookup(family, "private key", size, |sizes| sizes.private_key)
}

fn reverse_lookup(
    family: VectorFamily,
    what: &str,
    size: usize,
    field: impl Fn(&MaterialSizes) -> usize,
) -> LevelLookup {
    match SecurityLevel::ALL
        .iter()
        .find(|level| field(&sizes_for(**level, family)) == size)
    {
        Some(level) => LevelLookup {
            level: *level,
            fallback: false,
        },
        None => {
            tracing::warn!(
                target: "crypto::levels",
                family = ?family,
                size,
                fallback = %FALLBACK_LEVEL,
                "Unrecognized {} size, falling back to default security level",
                what
            );
            LevelLookup {
                level: FALLBACK_LEVEL,
                fallback: true,
            }
        }
    }
}
