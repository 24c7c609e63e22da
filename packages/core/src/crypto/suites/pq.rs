use crate::crypto::hashing;
use crate::crypto::levels::{
    level_from_private_key_size, level_from_public_key_size, SecurityLevel, VectorFamily,
};
use crate::crypto::provider::PrimitiveProvider;
use crate::error::CryptoError;
use pqcrypto_dilithium::{dilithium2, dilithium3, dilithium5};
use pqcrypto_kyber::{kyber1024, kyber512, kyber768};
use pqcrypto_traits::kem::{Ciphertext as _, PublicKey as _, SecretKey as _, SharedSecret as _};
use pqcrypto_traits::sign::{DetachedSignature as _, PublicKey as _, SecretKey as _};

/// Concrete implementation of `PrimitiveProvider` over Kyber, Dilithium and the SHA-3 family.
pub struct PostQuantumSuiteProvider;

// Один и тот же код для каждого набора параметров; модули pqcrypto не
// объединены общим trait'ом, поэтому диспетчеризация через macro.

macro_rules! keypair {
    ($alg:ident) => {{
        let (pk, sk) = $alg::keypair();
        (pk.as_bytes().to_vec(), sk.as_bytes().to_vec())
    }};
}

macro_rules! kem_encapsulate {
    ($alg:ident, $public_key:expr) => {{
        let pk = $alg::PublicKey::from_bytes($public_key)
            .map_err(|e| {
                CryptoError::KemEncapsulationError(format!("invalid public key: {:?}", e))
            })?;
        let (ss, ct) = $alg::encapsulate(&pk);
        (ct.as_bytes().to_vec(), ss.as_bytes().to_vec())
    }};
}

macro_rules! kem_decapsulate {
    ($alg:ident, $private_key:expr, $ciphertext:expr) => {{
        let sk = $alg::SecretKey::from_bytes($private_key)
            .map_err(|e| {
                CryptoError::KemDecapsulationError(format!("invalid private key: {:?}", e))
            })?;
        let ct = $alg::Ciphertext::from_bytes($ciphertext)
            .map_err(|e| {
                CryptoError::KemDecapsulationError(format!("invalid ciphertext: {:?}", e))
            })?;
        $alg::decapsulate(&ct, &sk).as_bytes().to_vec()
    }};
}

macro_rules! sig_sign {
    ($alg:ident, $private_key:expr, $message:expr) => {{
        let sk = $alg::SecretKey::from_bytes($private_key)
            .map_err(|e| CryptoError::SigningError(format!("invalid private key: {:?}", e)))?;
        $alg::detached_sign($message, &sk).as_bytes().to_vec()
    }};
}

macro_rules! sig_verify {
    ($alg:ident, $public_key:expr, $message:expr, $signature:expr) => {{
        let pk = $alg::PublicKey::from_bytes($public_key).map_err(|e| {
            CryptoError::SignatureVerificationError(format!("invalid public key: {:?}", e))
        })?;
        // Подпись неверной длины - просто невалидная подпись, а не ошибка вызова
        match $alg::DetachedSignature::from_bytes($signature) {
            Ok(sig) => $alg::verify_detached_signature(&sig, $message, &pk).is_ok(),
            Err(_) => false,
        }
    }};
}

impl PrimitiveProvider for PostQuantumSuiteProvider {
    fn suite_name() -> &'static str {
        "Kyber + Dilithium + SHA-3"
    }

    fn kem_generate_keypair(level: SecurityLevel) -> Result<(Vec<u8>, Vec<u8>), CryptoError> {
        Ok(match level {
            SecurityLevel::Level128 => keypair!(kyber512),
            SecurityLevel::Level192 => keypair!(kyber768),
            SecurityLevel::Level256 => keypair!(kyber1024),
        })
    }

    fn kem_encapsulate(public_key: &[u8]) -> Result<(Vec<u8>, Vec<u8>), CryptoError> {
        let lookup = level_from_public_key_size(public_key.len(), VectorFamily::Kem);
        Ok(match lookup.level {
            SecurityLevel::Level128 => kem_encapsulate!(kyber512, public_key),
            SecurityLevel::Level192 => kem_encapsulate!(kyber768, public_key),
            SecurityLevel::Level256 => kem_encapsulate!(kyber1024, public_key),
        })
    }

    fn kem_decapsulate(private_key: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let lookup = level_from_private_key_size(private_key.len(), VectorFamily::Kem);
        Ok(match lookup.level {
            SecurityLevel::Level128 => kem_decapsulate!(kyber512, private_key, ciphertext),
            SecurityLevel::Level192 => kem_decapsulate!(kyber768, private_key, ciphertext),
            SecurityLevel::Level256 => kem_decapsulate!(kyber1024, private_key, ciphertext),
        })
    }

    fn sig_generate_keypair(level: SecurityLevel) -> Result<(Vec<u8>, Vec<u8>), CryptoError> {
        Ok(match level {
            SecurityLevel::Level128 => keypair!(dilithium2),
            SecurityLevel::Level192 => keypair!(dilithium3),
            SecurityLevel::Level256 => keypair!(dilithium5),
        })
    }

    fn sign(private_key: &[u8], message: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let lookup = level_from_private_key_size(private_key.len(), VectorFamily::Signature);
        Ok(match lookup.level {
            SecurityLevel::Level128 => sig_sign!(dilithium2, private_key, message),
            SecurityLevel::Level192 => sig_sign!(dilithium3, private_key, message),
            SecurityLevel::Level256 => sig_sign!(dilithium5, private_key, message),
        })
    }

    fn verify(public_key: &[u8], message: &[u8], signature: &[u8]) -> Result<bool, CryptoError> {
        let lookup = level_from_public_key_size(public_key.len(), VectorFamily::Signature);
        Ok(match lookup.level {
            SecurityLevel::Level128 => sig_verify!(dilithium2, public_key, message, signature),
            SecurityLevel::Level192 => sig_verify!(dilithium3, public_key, message, signature),
            SecurityLevel::Level256 => sig_verify!(dilithium5, public_key, message, signature),
        })
    }

    fn hash(level: SecurityLevel, data: &[u8]) -> Result<Vec<u8>, CryptoError> {
        Ok(hashing::hash(data, level))
    }
}
