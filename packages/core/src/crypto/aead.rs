// HKDF-SHA256 + ChaCha20-Poly1305 поверх общего секрета KEM

use crate::error::CryptoError;
use chacha20poly1305::{
    aead::{Aead, Payload},
    ChaCha20Poly1305, Key, KeyInit, Nonce,
};
use hkdf::Hkdf;
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::Sha256;
use zeroize::Zeroizing;

pub const SESSION_KEY_LEN: usize = 32;
pub const NONCE_LEN: usize = 12;

/// Вывести симметричный ключ из общего секрета KEM
pub fn derive_session_key(
    shared_secret: &[u8],
    info: &[u8],
) -> Result<Zeroizing<Vec<u8>>, CryptoError> {
    let hkdf = Hkdf::<Sha256>::new(None, shared_secret);
    let mut okm = Zeroizing::new(vec![0u8; SESSION_KEY_LEN]);
    hkdf.expand(info, okm.as_mut_slice())
        .map_err(|e| CryptoError::KeyDerivationError(e.to_string()))?;
    Ok(okm)
}

/// Зашифровать со случайным nonce. Возвращает `(nonce, ciphertext_with_tag)`.
pub fn seal(key: &[u8], plaintext: &[u8], aad: &[u8]) -> Result<(Vec<u8>, Vec<u8>), CryptoError> {
    if key.len() != SESSION_KEY_LEN {
        return Err(CryptoError::InvalidInputError(format!(
            "AEAD key must be {} bytes, got {}",
            SESSION_KEY_LEN,
            key.len()
        )));
    }

    let mut nonce = vec![0u8; NONCE_LEN];
    OsRng.fill_bytes(&mut nonce);

    let cipher = ChaCha20Poly1305::new(Key::from_slice(key));
    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&nonce), Payload { msg: plaintext, aad })
        .map_err(|e| CryptoError::AeadEncryptionError(e.to_string()))?;
    Ok((nonce, ciphertext))
}

pub fn open(
    key: &[u8],
    nonce: &[u8],
    ciphertext: &[u8],
    aad: &[u8],
) -> Result<Vec<u8>, CryptoError> {
    if key.len() != SESSION_KEY_LEN || nonce.len() != NONCE_LEN {
        return Err(CryptoError::InvalidInputError(
            "invalid AEAD key or nonce length".to_string(),
        ));
    }

    let cipher = ChaCha20Poly1305::new(Key::from_slice(key));
    cipher
        .decrypt(Nonce::from_slice(nonce), Payload { msg: ciphertext, aad })
        .map_err(|e| CryptoError::AeadDecryptionError(e.to_string()))
}
