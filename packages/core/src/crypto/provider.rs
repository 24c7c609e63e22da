//! Defines the PrimitiveProvider trait: the narrow interface between the
//! self-test engine and the primitive implementations it validates.

use crate::crypto::levels::SecurityLevel;
use crate::error::CryptoError;

/// Trait that formalizes the primitive operations the engine exercises.
///
/// Key material travels as raw bytes without a level tag; implementations
/// recover the level from the key length via [`crate::crypto::levels`].
/// All functions are associated (no receiver) so the engine can stay generic
/// over the suite with a `PhantomData<P>`.
pub trait PrimitiveProvider: Send + Sync + 'static {
    /// Human-readable suite name for logs and reports.
    fn suite_name() -> &'static str;

    /// Generates a KEM key pair. Returns `(public_key, private_key)`.
    fn kem_generate_keypair(level: SecurityLevel) -> Result<(Vec<u8>, Vec<u8>), CryptoError>;

    /// Encapsulates a fresh shared secret to `public_key`.
    /// Returns `(ciphertext, shared_secret)`.
    fn kem_encapsulate(public_key: &[u8]) -> Result<(Vec<u8>, Vec<u8>), CryptoError>;

    /// Recovers the shared secret from `ciphertext`.
    fn kem_decapsulate(private_key: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>, CryptoError>;

    /// Generates a signature key pair. Returns `(public_key, private_key)`.
    fn sig_generate_keypair(level: SecurityLevel) -> Result<(Vec<u8>, Vec<u8>), CryptoError>;

    /// Signs `message`, returning a detached signature.
    fn sign(private_key: &[u8], message: &[u8]) -> Result<Vec<u8>, CryptoError>;

    /// Verifies a detached signature.
    ///
    /// `Ok(false)` means the signature does not verify. `Err` is reserved for
    /// material the provider cannot interpret at all (e.g. an unparsable key).
    fn verify(public_key: &[u8], message: &[u8], signature: &[u8]) -> Result<bool, CryptoError>;

    /// Hashes `data` with the level's default algorithm and output size.
    fn hash(level: SecurityLevel, data: &[u8]) -> Result<Vec<u8>, CryptoError>;
}
