//! Криптографические наборы (Crypto Suites)
//!
//! Реализации [`PrimitiveProvider`](crate::crypto::provider::PrimitiveProvider).
//!
//! ## Доступные наборы
//!
//! ### Post-Quantum Suite
//! - **KEM**: Kyber512 / Kyber768 / Kyber1024
//! - **Signatures**: Dilithium2 / Dilithium3 / Dilithium5
//! - **Hash**: SHAKE128 / SHAKE256 / SHA3-256
//!
//! ## Выбор suite
//!
//! ```rust
//! use pqc_bist::crypto::levels::SecurityLevel;
//! use pqc_bist::crypto::provider::PrimitiveProvider;
//! use pqc_bist::crypto::suites::pq::PostQuantumSuiteProvider;
//!
//! type MySuite = PostQuantumSuiteProvider;
//!
//! let (public_key, private_key) = MySuite::kem_generate_keypair(SecurityLevel::Level128)?;
//! let (ciphertext, shared_secret) = MySuite::kem_encapsulate(&public_key)?;
//! assert_eq!(MySuite::kem_decapsulate(&private_key, &ciphertext)?, shared_secret);
//! # Ok::<(), pqc_bist::error::CryptoError>(())
//! ```

pub mod pq;
