//! Hasher configuration file
//!
//! JSON document selecting the active algorithm settings:
//!
//! ```json
//! { "policy": "moderate" }
//! { "policy": "moderate", "argon2id": { "parallelism": 2 } }
//! ```
//!
//! The policy tier (interactive when absent) sets the base Argon2id settings;
//! fields present in the `argon2id` block replace the matching base values.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::argon2id::Argon2idConfig;
use crate::error::Result;
use crate::policy::Policy;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HasherConfig {
    /// Policy tier name (interactive, moderate, sensitive)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy: Option<String>,
    /// Per-field Argon2id overrides on top of the tier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub argon2id: Option<Argon2idOverrides>,
}

/// Argon2id fields that replace the tier's values when set
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Argon2idOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_cost: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_cost: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parallelism: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salt_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub digest_length: Option<usize>,
}

impl Argon2idOverrides {
    pub fn apply(&self, base: Argon2idConfig) -> Argon2idConfig {
        Argon2idConfig {
            memory_cost: self.memory_cost.unwrap_or(base.memory_cost),
            time_cost: self.time_cost.unwrap_or(base.time_cost),
            parallelism: self.parallelism.unwrap_or(base.parallelism),
            salt_length: self.salt_length.unwrap_or(base.salt_length),
            digest_length: self.digest_length.unwrap_or(base.digest_length),
        }
    }
}

impl HasherConfig {
    /// Read and parse a JSON configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_json(&content)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Policy tier given on the command line takes precedence over the file
    pub fn with_policy(mut self, tier: impl Into<String>) -> Self {
        self.policy = Some(tier.into());
        self
    }

    /// Selected tier; unknown names fail with `UnknownPolicy`
    pub fn policy_tier(&self) -> Result<Policy> {
        match &self.policy {
            Some(tier) => tier.parse(),
            None => Ok(Policy::Interactive),
        }
    }

    /// Tier settings with the `argon2id` overrides applied, not yet validated
    pub fn argon2id_config(&self) -> Result<Argon2idConfig> {
        let base = Argon2idConfig::from_policy(self.policy_tier()?);
        Ok(match &self.argon2id {
            Some(overrides) => overrides.apply(base),
            None => base,
        })
    }
}
