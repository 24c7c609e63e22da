use thiserror::Error;

/// Ошибки примитивов (KEM, подписи, хеширование, AEAD)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    #[error("Failed to generate keys: {0}")]
    KeyGenerationError(String),
    #[error("Signing failed: {0}")]
    SigningError(String),
    #[error("Signature verification failed: {0}")]
    SignatureVerificationError(String),
    #[error("KEM encapsulation failed: {0}")]
    KemEncapsulationError(String),
    #[error("KEM decapsulation failed: {0}")]
    KemDecapsulationError(String),
    #[error("AEAD encryption failed: {0}")]
    AeadEncryptionError(String),
    #[error("AEAD decryption failed: {0}")]
    AeadDecryptionError(String),
    #[error("Key derivation failed: {0}")]
    KeyDerivationError(String),
    #[error("Hashing failed: {0}")]
    HashingError(String),
    #[error("Invalid input: {0}")]
    InvalidInputError(String),
}
