pub mod crypto_utils;
pub mod error;
pub mod logging;
pub mod serialization;
