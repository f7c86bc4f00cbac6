//! Salt generation from the operating system RNG
//!
//! There is no fallback source: if the OS refuses, the error is returned.

use rand::rngs::OsRng;
use rand::RngCore;

use super::SecureBytes;
use crate::error::{PwdHashError, Result};

/// Fill a fresh buffer of `len` bytes from the OS RNG
pub fn random_salt(len: usize) -> Result<SecureBytes> {
    let mut salt = SecureBytes::zeroed(len);
    OsRng
        .try_fill_bytes(&mut salt)
        .map_err(|e| PwdHashError::Random(e.to_string()))?;
    Ok(salt)
}
