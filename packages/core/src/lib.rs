// PQC BIST
// Built-In Self-Test engine for post-quantum KEM and signature primitives

#![warn(clippy::all)]

// Модули
pub mod bist;
pub mod config;
pub mod crypto;
pub mod error;
pub mod utils;

// Re-exports для удобства
pub use bist::{BistRunner, BistSuite};
pub use config::Config;
pub use crypto::{PostQuantumSuiteProvider, PrimitiveProvider, SecurityLevel};
pub use utils::error::{BistError, Result};
