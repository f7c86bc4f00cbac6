//! pwdhash - password hashing behind self-describing PHC strings
//!
//! This crate:
//! - Hashes secrets with Argon2id and encodes algorithm, version, cost
//!   parameters, salt and digest into one `$`-delimited string
//! - Verifies candidate secrets against stored strings in constant time
//! - Tells whether a stored hash is stale under the current policy
//! - Dispatches stored hashes to the algorithm that produced them, so the
//!   active algorithm can change without invalidating existing records
//!
//! Hashing is deliberately expensive in CPU and memory. Callers running many
//! hashes at once should bound concurrency themselves.

pub mod argon2id;
pub mod config;
pub mod crypto;
pub mod error;
pub mod hasher;
pub mod password;
pub mod phc;
pub mod policy;

pub use argon2id::{Argon2idConfig, Argon2idHasher};
pub use config::HasherConfig;
pub use crypto::SecureBytes;
pub use error::{PwdHashError, Result};
pub use hasher::Hasher;
pub use password::{PasswordHasher, PasswordHasherBuilder};
pub use phc::EncodedRecord;
pub use policy::{resolve_policy, Policy, PolicyParams};
