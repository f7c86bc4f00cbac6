//! Low-level building blocks shared by the hashing engines
//!
//! - Secure memory handling with automatic zeroing
//! - Constant-time comparison of derived digests
//! - Salt generation from the OS RNG

mod compare;
mod random;
mod secure_bytes;

pub use compare::constant_time_eq;
pub use random::random_salt;
pub use secure_bytes::SecureBytes;
