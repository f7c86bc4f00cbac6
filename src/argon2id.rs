//! Argon2id hashing engine
//!
//! Uses Argon2id (winner of the Password Hashing Competition) to derive a
//! digest from the secret and a random salt, and stores everything needed to
//! repeat the computation in a PHC string:
//!
//! `$argon2id$v=19$m=<KiB>,p=<lanes>,t=<passes>$<salt>$<digest>`
//!
//! Verification always re-derives with the parameters stored in the record,
//! never with the engine's current configuration.

use argon2::{Algorithm, Argon2, Params, Version};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::crypto::{constant_time_eq, random_salt, SecureBytes};
use crate::error::{PwdHashError, Result};
use crate::hasher::Hasher;
use crate::phc::{self, EncodedRecord};
use crate::policy::Policy;

/// PHC algorithm identifier
pub const ALGORITHM_ID: &str = "argon2id";

/// Argon2 primitive version 1.3
pub const VERSION: u32 = 0x13;

pub const MIN_MEMORY_COST: u32 = 32 * 1024; // 32 MiB
pub const MAX_MEMORY_COST: u32 = 1024 * 1024; // 1 GiB
pub const MIN_TIME_COST: u32 = 2;
pub const MAX_TIME_COST: u32 = 100;
pub const MIN_PARALLELISM: u32 = 1;
pub const MAX_PARALLELISM: u32 = 32;
pub const MIN_SALT_LEN: usize = 16;
pub const MAX_SALT_LEN: usize = 64;
pub const MIN_DIGEST_LEN: usize = 16;
pub const MAX_DIGEST_LEN: usize = 64;

const DEFAULT_SALT_LEN: usize = 16;
const DEFAULT_DIGEST_LEN: usize = 32;

const PARAM_MEMORY: &str = "m";
const PARAM_TIME: &str = "t";
const PARAM_PARALLELISM: &str = "p";

/// Tunable settings of one Argon2id engine
///
/// Missing fields deserialize to the interactive tier with a 16-byte salt
/// and a 32-byte digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Argon2idConfig {
    /// Memory cost in KiB
    pub memory_cost: u32,
    /// Number of passes over memory
    pub time_cost: u32,
    /// Number of lanes
    pub parallelism: u32,
    /// Salt length in bytes
    pub salt_length: usize,
    /// Digest length in bytes
    pub digest_length: usize,
}

impl Argon2idConfig {
    /// Cost parameters from `policy`, default salt and digest lengths
    pub fn from_policy(policy: Policy) -> Self {
        let params = policy.params();
        Self {
            memory_cost: params.memory_cost,
            time_cost: params.time_cost,
            parallelism: params.parallelism,
            salt_length: DEFAULT_SALT_LEN,
            digest_length: DEFAULT_DIGEST_LEN,
        }
    }

    /// Check every field against the engine limits; nothing is clamped
    pub fn validate(&self) -> Result<()> {
        check_range("memory_cost", self.memory_cost, MIN_MEMORY_COST, MAX_MEMORY_COST)?;
        check_range("time_cost", self.time_cost, MIN_TIME_COST, MAX_TIME_COST)?;
        check_range("parallelism", self.parallelism, MIN_PARALLELISM, MAX_PARALLELISM)?;
        check_range("salt_length", self.salt_length, MIN_SALT_LEN, MAX_SALT_LEN)?;
        check_range("digest_length", self.digest_length, MIN_DIGEST_LEN, MAX_DIGEST_LEN)?;
        Ok(())
    }
}

impl Default for Argon2idConfig {
    fn default() -> Self {
        Self::from_policy(Policy::Interactive)
    }
}

fn check_range<T>(field: &str, value: T, min: T, max: T) -> Result<()>
where
    T: PartialOrd + std::fmt::Display,
{
    if value < min || value > max {
        return Err(PwdHashError::InvalidConfig(format!(
            "argon2id {} = {} is outside [{}, {}]",
            field, value, min, max
        )));
    }
    Ok(())
}

/// Argon2id implementation of [`Hasher`]
///
/// The configuration is validated in [`Argon2idHasher::new`] and never
/// changes afterwards, so one instance can be shared between threads.
#[derive(Debug, Clone)]
pub struct Argon2idHasher {
    config: Argon2idConfig,
}

impl Argon2idHasher {
    pub fn new(config: Argon2idConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn from_policy(policy: Policy) -> Result<Self> {
        Self::new(Argon2idConfig::from_policy(policy))
    }

    pub fn config(&self) -> &Argon2idConfig {
        &self.config
    }
}

impl Default for Argon2idHasher {
    fn default() -> Self {
        Self {
            config: Argon2idConfig::default(),
        }
    }
}

/// Run Argon2id over `secret` and `salt`
///
/// The output buffer is wiped on drop, including when derivation fails.
fn derive(
    secret: &[u8],
    salt: &[u8],
    memory_cost: u32,
    time_cost: u32,
    parallelism: u32,
    digest_len: usize,
) -> Result<SecureBytes> {
    let params = Params::new(memory_cost, time_cost, parallelism, Some(digest_len))
        .map_err(|e| PwdHashError::Derivation(format!("Argon2 params error: {}", e)))?;

    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    let mut digest = SecureBytes::zeroed(digest_len);
    argon2
        .hash_password_into(secret, salt, &mut digest)
        .map_err(|e| PwdHashError::Derivation(e.to_string()))?;

    Ok(digest)
}

/// Parse a numeric parameter and check it against the engine limits
fn stored_param(record: &EncodedRecord, key: &str, min: u32, max: u32) -> Result<u32> {
    let raw = record
        .param(key)
        .ok_or_else(|| PwdHashError::InvalidParam(format!("missing '{}'", key)))?;

    let value: u32 = raw
        .parse()
        .map_err(|_| PwdHashError::InvalidParam(format!("{}={} is not an unsigned integer", key, raw)))?;

    if value < min || value > max {
        return Err(PwdHashError::InvalidParam(format!(
            "{}={} is outside [{}, {}]",
            key, value, min, max
        )));
    }

    Ok(value)
}

impl Hasher for Argon2idHasher {
    fn id(&self) -> &str {
        ALGORITHM_ID
    }

    fn hash(&self, secret: SecureBytes) -> Result<String> {
        let cfg = &self.config;

        let salt = random_salt(cfg.salt_length)?;
        let digest = derive(
            &secret,
            &salt,
            cfg.memory_cost,
            cfg.time_cost,
            cfg.parallelism,
            cfg.digest_length,
        )?;

        let record = EncodedRecord::new(ALGORITHM_ID, VERSION)
            .with_param(PARAM_MEMORY, cfg.memory_cost)
            .with_param(PARAM_TIME, cfg.time_cost)
            .with_param(PARAM_PARALLELISM, cfg.parallelism)
            .with_salt(&salt)
            .with_digest(&digest);

        debug!(
            algorithm = ALGORITHM_ID,
            m = cfg.memory_cost,
            t = cfg.time_cost,
            p = cfg.parallelism,
            "Hashed secret"
        );

        Ok(phc::encode(&record))
    }

    fn verify(&self, secret: SecureBytes, encoded: &str) -> Result<bool> {
        let record = phc::decode(encoded)?;

        if record.algorithm != ALGORITHM_ID {
            debug!(algorithm = %record.algorithm, "Record belongs to another algorithm");
            return Ok(false);
        }

        if record.version != VERSION {
            warn!(found = record.version, expected = VERSION, "Unsupported argon2 version");
            return Err(PwdHashError::UnsupportedVersion {
                expected: VERSION,
                found: record.version,
            });
        }

        let memory_cost = stored_param(&record, PARAM_MEMORY, MIN_MEMORY_COST, MAX_MEMORY_COST)?;
        let time_cost = stored_param(&record, PARAM_TIME, MIN_TIME_COST, MAX_TIME_COST)?;
        let parallelism = stored_param(&record, PARAM_PARALLELISM, MIN_PARALLELISM, MAX_PARALLELISM)?;

        if !(MIN_SALT_LEN..=MAX_SALT_LEN).contains(&record.salt.len()) {
            return Err(PwdHashError::InvalidParam(format!(
                "salt length {} is outside [{}, {}]",
                record.salt.len(),
                MIN_SALT_LEN,
                MAX_SALT_LEN
            )));
        }

        // A digest of a length this engine never emits cannot match.
        if !(MIN_DIGEST_LEN..=MAX_DIGEST_LEN).contains(&record.digest.len()) {
            debug!(len = record.digest.len(), "Stored digest length out of range");
            return Ok(false);
        }

        let computed = derive(
            &secret,
            &record.salt,
            memory_cost,
            time_cost,
            parallelism,
            record.digest.len(),
        )?;

        let matched = constant_time_eq(&computed, &record.digest);
        debug!(algorithm = ALGORITHM_ID, m = memory_cost, t = time_cost, matched, "Verified secret");

        Ok(matched)
    }

    fn needs_rehash(&self, encoded: &str) -> Result<bool> {
        let record = phc::decode(encoded)?;

        if record.algorithm != ALGORITHM_ID || record.version != VERSION {
            return Ok(true);
        }

        // Parallelism is left out so lane counts can be tuned without a mass rehash.
        let stale = |key: &str, current: u32| {
            record
                .param(key)
                .and_then(|raw| raw.parse::<u32>().ok())
                .map_or(true, |stored| stored != current)
        };

        let needs = stale(PARAM_MEMORY, self.config.memory_cost) || stale(PARAM_TIME, self.config.time_cost);
        debug!(algorithm = ALGORITHM_ID, needs, "Checked rehash");

        Ok(needs)
    }
}
