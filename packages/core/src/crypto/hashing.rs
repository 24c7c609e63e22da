// Хеширование семейства SHA-3 по уровню безопасности

use crate::crypto::levels::SecurityLevel;
use crate::error::CryptoError;
use sha3::digest::{ExtendableOutput, Update, XofReader};
use sha3::{Digest, Sha3_256, Shake128, Shake256};

/// Хеш с длиной вывода по умолчанию для уровня
pub fn hash(data: &[u8], level: SecurityLevel) -> Vec<u8> {
    match level {
        SecurityLevel::Level128 => shake128(data, level.hash_output_size()),
        SecurityLevel::Level192 => shake256(data, level.hash_output_size()),
        SecurityLevel::Level256 => sha3_256(data),
    }
}

/// Хеш с произвольной длиной вывода. SHA3-256 поддерживает только 32 байта.
pub fn hash_with_size(
    data: &[u8],
    level: SecurityLevel,
    output_size: usize,
) -> Result<Vec<u8>, CryptoError> {
    match level {
        SecurityLevel::Level128 => Ok(shake128(data, output_size)),
        SecurityLevel::Level192 => Ok(shake256(data, output_size)),
        SecurityLevel::Level256 => {
            if output_size != 32 {
                return Err(CryptoError::HashingError(
                    "SHA3-256 has fixed output size of 32 bytes".to_string(),
                ));
            }
            Ok(sha3_256(data))
        }
    }
}

fn shake128(data: &[u8], output_size: usize) -> Vec<u8> {
    let mut hasher = Shake128::default();
    Update::update(&mut hasher, data);
    let mut output = vec![0u8; output_size];
    hasher.finalize_xof().read(&mut output);
    output
}

fn shake256(data: &[u8], output_size: usize) -> Vec<u8> {
    let mut hasher = Shake256::default();
    Update::update(&mut hasher, data);
    let mut output = vec![0u8; output_size];
    hasher.finalize_xof().read(&mut output);
    output
}

fn sha3_256(data: &[u8]) -> Vec<u8> {
    <Sha3_256 as Digest>::digest(data).to_vec()
}
