//! Tests for the primitive layer
//!
//! This test suite covers:
//! - Post-Quantum Suite Provider (Kyber, Dilithium, SHA-3)
//! - Level recovery from key material
//! - KEM → HKDF → ChaCha20-Poly1305 helpers
//! - Error Handling

use pqc_bist::crypto::aead;
use pqc_bist::crypto::hashing;
use pqc_bist::crypto::levels::{sizes_for, SecurityLevel, VectorFamily};
use pqc_bist::crypto::suites::pq::PostQuantumSuiteProvider;
use pqc_bist::crypto::PrimitiveProvider;
use pqc_bist::error::CryptoError;

type Suite = PostQuantumSuiteProvider;

/// KEM keys have the registry sizes at every level
#[test]
fn test_pq_suite_generate_kem_keys() {
    for level in SecurityLevel::ALL {
        let result = Suite::kem_generate_keypair(level);
        assert!(result.is_ok(), "Failed to generate KEM keys for {:?}", level);

        let (public_key, private_key) = result.unwrap();
        let sizes = sizes_for(level, VectorFamily::Kem);
        assert_eq!(public_key.len(), sizes.public_key);
        assert_eq!(private_key.len(), sizes.private_key);
    }
}

/// Signature keys have the registry sizes at every level
#[test]
fn test_pq_suite_generate_signature_keys() {
    for level in SecurityLevel::ALL {
        let (public_key, private_key) = Suite::sig_generate_keypair(level).unwrap();
        let sizes = sizes_for(level, VectorFamily::Signature);
        assert_eq!(public_key.len(), sizes.public_key);
        assert_eq!(private_key.len(), sizes.private_key);
    }
}

#[test]
fn test_pq_suite_sign_verify() {
    let (public_key, private_key) = Suite::sig_generate_keypair(SecurityLevel::Level128).unwrap();
    let message = b"Hello, Post-Quantum World!";

    let signature = Suite::sign(&private_key, message);
    assert!(signature.is_ok(), "Failed to sign message");
    let signature = signature.unwrap();

    // Dilithium2 signature is 2420 bytes
    assert_eq!(signature.len(), 2420);

    assert!(Suite::verify(&public_key, message, &signature).unwrap());
}

#[test]
fn test_pq_suite_verify_fails_with_wrong_message() {
    let (public_key, private_key) = Suite::sig_generate_keypair(SecurityLevel::Level192).unwrap();
    let signature = Suite::sign(&private_key, b"Original message").unwrap();

    let valid = Suite::verify(&public_key, b"Modified message", &signature).unwrap();
    assert!(!valid, "Verification should fail with wrong message");
}

#[test]
fn test_pq_suite_verify_fails_with_corrupted_signature() {
    let (public_key, private_key) = Suite::sig_generate_keypair(SecurityLevel::Level256).unwrap();
    let message = b"Original message";
    let mut signature = Suite::sign(&private_key, message).unwrap();
    let middle = signature.len() / 2;
    signature[middle] ^= 1;

    assert!(!Suite::verify(&public_key, message, &signature).unwrap());
}

/// Signature from another key pair of the same level is rejected
#[test]
fn test_pq_suite_verify_fails_with_wrong_key() {
    let (_, private_key) = Suite::sig_generate_keypair(SecurityLevel::Level128).unwrap();
    let (other_public, _) = Suite::sig_generate_keypair(SecurityLevel::Level128).unwrap();
    let signature = Suite::sign(&private_key, b"message").unwrap();

    assert!(!Suite::verify(&other_public, b"message", &signature).unwrap());
}

#[test]
fn test_pq_suite_kem_roundtrip() {
    for level in SecurityLevel::ALL {
        let (public_key, private_key) = Suite::kem_generate_keypair(level).unwrap();
        let (ciphertext, shared_secret) = Suite::kem_encapsulate(&public_key).unwrap();
        let recovered = Suite::kem_decapsulate(&private_key, &ciphertext).unwrap();
        assert_eq!(shared_secret, recovered, "KEM roundtrip failed for {:?}", level);
    }
}

/// Decapsulating with a different key of the same level yields a different secret
#[test]
fn test_pq_suite_kem_wrong_private_key() {
    let (public_key, _) = Suite::kem_generate_keypair(SecurityLevel::Level192).unwrap();
    let (_, other_private) = Suite::kem_generate_keypair(SecurityLevel::Level192).unwrap();
    let (ciphertext, shared_secret) = Suite::kem_encapsulate(&public_key).unwrap();

    let recovered = Suite::kem_decapsulate(&other_private, &ciphertext).unwrap();
    assert_ne!(shared_secret, recovered);
}

#[test]
fn test_pq_suite_encapsulate_rejects_unknown_key_size() {
    let result = Suite::kem_encapsulate(&[0u8; 100]);
    assert!(matches!(result, Err(CryptoError::KemEncapsulationError(_))));
}

#[test]
fn test_pq_suite_sign_rejects_unknown_key_size() {
    let result = Suite::sign(&[0u8; 100], b"message");
    assert!(matches!(result, Err(CryptoError::SigningError(_))));
}

#[test]
fn test_pq_suite_hash_matches_hashing_module() {
    for level in SecurityLevel::ALL {
        let digest = Suite::hash(level, b"data").unwrap();
        assert_eq!(digest, hashing::hash(b"data", level));
        assert_eq!(digest.len(), level.hash_output_size());
    }
}

/// Both KEM sides derive the same AEAD key
#[test]
fn test_kem_secret_drives_aead() {
    let (public_key, private_key) = Suite::kem_generate_keypair(SecurityLevel::Level256).unwrap();
    let (ciphertext, sent) = Suite::kem_encapsulate(&public_key).unwrap();
    let received = Suite::kem_decapsulate(&private_key, &ciphertext).unwrap();

    let sender_key = aead::derive_session_key(&sent, b"integration").unwrap();
    let receiver_key = aead::derive_session_key(&received, b"integration").unwrap();

    let (nonce, sealed) = aead::seal(&sender_key, b"Hello", b"").unwrap();
    let opened = aead::open(&receiver_key, &nonce, &sealed, b"").unwrap();
    assert_eq!(opened, b"Hello");
}

#[test]
fn test_aead_open_with_wrong_key_fails() {
    let key = aead::derive_session_key(&[1u8; 32], b"a").unwrap();
    let other = aead::derive_session_key(&[2u8; 32], b"a").unwrap();
    let (nonce, sealed) = aead::seal(&key, b"secret", b"").unwrap();

    assert!(aead::open(&other, &nonce, &sealed, b"").is_err());
}

/// Fresh nonces: sealing the same plaintext twice gives different ciphertexts
#[test]
fn test_aead_nonce_uniqueness() {
    let key = aead::derive_session_key(&[9u8; 32], b"n").unwrap();
    let (nonce1, ct1) = aead::seal(&key, b"same", b"").unwrap();
    let (nonce2, ct2) = aead::seal(&key, b"same", b"").unwrap();
    assert_ne!(nonce1, nonce2);
    assert_ne!(ct1, ct2);
}
