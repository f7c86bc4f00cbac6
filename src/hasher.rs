//! The capability every pluggable hashing algorithm provides

use crate::crypto::SecureBytes;
use crate::error::Result;

/// A password hashing algorithm implementation
///
/// Secrets are taken by value so the implementation owns them for the
/// duration of the call; `SecureBytes` wipes them when the call returns,
/// whatever the outcome.
///
/// Implementations are shared across threads by [`crate::PasswordHasher`]
/// and must not mutate their configuration after construction.
pub trait Hasher: Send + Sync {
    /// PHC algorithm identifier, e.g. `argon2id`
    fn id(&self) -> &str;

    /// Hash `secret` with a fresh salt and return the PHC string
    fn hash(&self, secret: SecureBytes) -> Result<String>;

    /// Check `secret` against a stored PHC string
    ///
    /// Returns `Ok(false)` both for a wrong secret and for a record produced
    /// by a different algorithm. Errors mean the record could not be checked.
    fn verify(&self, secret: SecureBytes, encoded: &str) -> Result<bool>;

    /// Whether the stored record was produced with different settings than
    /// this implementation currently uses
    fn needs_rehash(&self, encoded: &str) -> Result<bool>;
}
