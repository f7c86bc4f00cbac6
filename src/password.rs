//! Password hasher front-end
//!
//! Routes new hashes to the active algorithm and stored hashes to whichever
//! registered algorithm produced them, so records written under an earlier
//! configuration stay verifiable after the active algorithm changes.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::argon2id::Argon2idHasher;
use crate::config::HasherConfig;
use crate::crypto::SecureBytes;
use crate::error::{PwdHashError, Result};
use crate::hasher::Hasher;
use crate::phc;
use crate::policy::Policy;

/// Dispatches hashing operations over a fixed set of algorithms
///
/// The registry is frozen once built; the hasher can be shared between
/// threads (e.g. behind an `Arc`) without locking.
pub struct PasswordHasher {
    current: Arc<dyn Hasher>,
    registry: HashMap<String, Arc<dyn Hasher>>,
}

/// Pending choice of the active algorithm, applied in call order
enum ActiveChoice {
    Hasher(Arc<dyn Hasher>),
    Policy(String),
}

/// Builder for [`PasswordHasher`]
#[derive(Default)]
pub struct PasswordHasherBuilder {
    active: Option<ActiveChoice>,
    legacy: Vec<Arc<dyn Hasher>>,
}

impl PasswordHasherBuilder {
    /// Replace the active algorithm implementation
    pub fn with_hasher(mut self, hasher: impl Hasher + 'static) -> Self {
        self.active = Some(ActiveChoice::Hasher(Arc::new(hasher)));
        self
    }

    /// Use Argon2id with the cost parameters of `tier` as the active algorithm
    ///
    /// An unknown tier makes [`PasswordHasherBuilder::build`] fail.
    pub fn with_policy(mut self, tier: impl AsRef<str>) -> Self {
        self.active = Some(ActiveChoice::Policy(tier.as_ref().to_string()));
        self
    }

    /// Keep records of another algorithm verifiable without making it active
    pub fn register(mut self, hasher: impl Hasher + 'static) -> Self {
        self.legacy.push(Arc::new(hasher));
        self
    }

    pub fn build(self) -> Result<PasswordHasher> {
        let current: Arc<dyn Hasher> = match self.active {
            None => Arc::new(Argon2idHasher::default()),
            Some(ActiveChoice::Hasher(hasher)) => hasher,
            Some(ActiveChoice::Policy(tier)) => {
                let policy: Policy = tier.parse()?;
                Arc::new(Argon2idHasher::from_policy(policy)?)
            }
        };

        let mut registry: HashMap<String, Arc<dyn Hasher>> = HashMap::new();
        for hasher in self.legacy {
            registry.insert(hasher.id().to_string(), hasher);
        }
        // The active algorithm always owns its id.
        registry.insert(current.id().to_string(), Arc::clone(&current));

        debug!(active = current.id(), registered = registry.len(), "Built password hasher");

        Ok(PasswordHasher { current, registry })
    }
}

impl PasswordHasher {
    /// Argon2id with the interactive policy
    pub fn new() -> Self {
        let current: Arc<dyn Hasher> = Arc::new(Argon2idHasher::default());
        let mut registry: HashMap<String, Arc<dyn Hasher>> = HashMap::new();
        registry.insert(current.id().to_string(), Arc::clone(&current));
        Self { current, registry }
    }

    pub fn builder() -> PasswordHasherBuilder {
        PasswordHasherBuilder::default()
    }

    /// Build from a loaded configuration file
    ///
    /// The active algorithm is Argon2id with the file's tier, adjusted by
    /// its `argon2id` overrides.
    pub fn from_config(config: &HasherConfig) -> Result<Self> {
        let argon2id = Argon2idHasher::new(config.argon2id_config()?)?;
        Self::builder().with_hasher(argon2id).build()
    }

    /// Identifier of the algorithm used for new hashes
    pub fn active_id(&self) -> &str {
        self.current.id()
    }

    /// Identifiers of every algorithm that can verify, sorted
    pub fn algorithms(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.registry.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// Hash `secret` with the active algorithm
    pub fn hash(&self, secret: impl Into<SecureBytes>) -> Result<String> {
        self.current.hash(secret.into())
    }

    /// Verify `secret` against a record produced by any registered algorithm
    pub fn verify(&self, secret: impl Into<SecureBytes>, encoded: &str) -> Result<bool> {
        let secret = secret.into();
        let record = phc::decode(encoded)?;

        let hasher = self.registry.get(&record.algorithm).ok_or_else(|| {
            warn!(algorithm = %record.algorithm, "No hasher registered for algorithm");
            PwdHashError::UnknownAlgorithm(record.algorithm.clone())
        })?;

        hasher.verify(secret, encoded)
    }

    /// Whether a stored record should be replaced by a fresh hash
    ///
    /// Records of any algorithm other than the active one always need a
    /// rehash, including algorithms nobody registered.
    pub fn needs_rehash(&self, encoded: &str) -> Result<bool> {
        let record = phc::decode(encoded)?;

        if record.algorithm != self.current.id() {
            if !self.registry.contains_key(&record.algorithm) {
                warn!(algorithm = %record.algorithm, "Unknown algorithm, treating as stale");
            }
            return Ok(true);
        }

        self.current.needs_rehash(encoded)
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl Hasher for PasswordHasher {
    fn id(&self) -> &str {
        self.active_id()
    }

    fn hash(&self, secret: SecureBytes) -> Result<String> {
        PasswordHasher::hash(self, secret)
    }

    fn verify(&self, secret: SecureBytes, encoded: &str) -> Result<bool> {
        PasswordHasher::verify(self, secret, encoded)
    }

    fn needs_rehash(&self, encoded: &str) -> Result<bool> {
        PasswordHasher::needs_rehash(self, encoded)
    }
}

impl fmt::Debug for PasswordHasher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordHasher")
            .field("active", &self.active_id())
            .field("algorithms", &self.algorithms())
            .finish()
    }
}
