//! Password policy tiers
//!
//! Each tier maps to a fixed Argon2id cost triple. The table is compiled in;
//! unknown tier names are an error, never a silent default.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{PwdHashError, Result};

/// A password hashing strength preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Policy {
    /// Balances cost with low latency for login flows
    Interactive,
    /// Higher cost for privileged accounts or admin portals
    Moderate,
    /// Maximum cost for high-value secrets
    Sensitive,
}

/// Cost parameters associated with a policy tier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PolicyParams {
    /// Memory cost in KiB
    pub memory_cost: u32,
    /// Number of passes
    pub time_cost: u32,
    /// Number of lanes
    pub parallelism: u32,
}

impl Policy {
    /// All tiers, cheapest first
    pub const ALL: [Policy; 3] = [Policy::Interactive, Policy::Moderate, Policy::Sensitive];

    pub fn as_str(&self) -> &'static str {
        match self {
            Policy::Interactive => "interactive",
            Policy::Moderate => "moderate",
            Policy::Sensitive => "sensitive",
        }
    }

    pub fn params(&self) -> PolicyParams {
        match self {
            Policy::Interactive => PolicyParams {
                memory_cost: 64 * 1024, // 64 MiB
                time_cost: 3,
                parallelism: 4,
            },
            Policy::Moderate => PolicyParams {
                memory_cost: 128 * 1024, // 128 MiB
                time_cost: 4,
                parallelism: 4,
            },
            Policy::Sensitive => PolicyParams {
                memory_cost: 256 * 1024, // 256 MiB
                time_cost: 5,
                parallelism: 8,
            },
        }
    }
}

/// Look up the cost parameters for a tier name
pub fn resolve_policy(tier: &str) -> Result<PolicyParams> {
    Ok(tier.parse::<Policy>()?.params())
}

impl FromStr for Policy {
    type Err = PwdHashError;

    fn from_str(s: &str) -> Result<Self> {
        Policy::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| PwdHashError::UnknownPolicy(s.to_string()))
    }
}

impl TryFrom<u8> for Policy {
    type Error = PwdHashError;

    fn try_from(id: u8) -> Result<Self> {
        Policy::ALL
            .get(id as usize)
            .copied()
            .ok_or_else(|| PwdHashError::UnknownPolicy(id.to_string()))
    }
}

impl AsRef<str> for Policy {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
