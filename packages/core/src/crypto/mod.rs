//! Криптографический модуль
//!
//! # Архитектура
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     BIST engine (bist::*)                   │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │             PrimitiveProvider (узкий интерфейс)             │
//! │  - KEM: keypair / encapsulate / decapsulate                 │
//! │  - Signatures: keypair / sign / verify                      │
//! │  - Hash по уровню                                           │
//! └─────────────────────────────────────────────────────────────┘
//!                │                           │
//!                ▼                           ▼
//! ┌───────────────────────────┐  ┌──────────────────────────┐
//! │  suites::pq               │  │  levels (registry)       │
//! │  - Kyber512/768/1024      │  │  - имена алгоритмов      │
//! │  - Dilithium2/3/5         │  │  - размеры материала     │
//! │  - SHAKE / SHA3-256       │  │  - уровень по длине      │
//! └───────────────────────────┘  └──────────────────────────┘
//! ```
//!
//! ## Модули
//!
//! - [`levels`]: реестр уровней безопасности
//! - [`provider`]: PrimitiveProvider trait
//! - [`suites`]: реализации PrimitiveProvider
//! - [`hashing`]: SHA-3 семейство по уровню
//! - [`aead`]: HKDF + ChaCha20-Poly1305 для проверки связки KEM → AEAD

// ============================================================================
// Core Traits
// ============================================================================

pub mod levels;

pub mod provider;

// ============================================================================
// Implementations
// ============================================================================

pub mod suites;

pub mod hashing;

pub mod aead;

// ============================================================================
// Re-exports для удобства
// ============================================================================

pub use levels::{SecurityLevel, VectorFamily};
pub use provider::PrimitiveProvider;
pub use suites::pq::PostQuantumSuiteProvider;
