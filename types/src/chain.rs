//! Chain identifier bound into permit domains.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies the execution environment a ledger is deployed on.
///
/// Permit signatures embed this value, so a signature produced for one chain
/// never validates on another.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChainId(u64);

impl ChainId {
    pub const MAINNET: Self = Self(1);
    pub const SEPOLIA: Self = Self(11_155_111);
    /// Local development chain.
    pub const DEV: Self = Self(31_337);

    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }

    /// Human-readable name for well-known chains.
    pub fn name(&self) -> Option<&'static str> {
        match *self {
            Self::MAINNET => Some("mainnet"),
            Self::SEPOLIA => Some("sepolia"),
            Self::DEV => Some("dev"),
            _ => None,
        }
    }
}

impl Default for ChainId {
    fn default() -> Self {
        Self::DEV
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{} ({})", self.0, name),
            None => write!(f, "{}", self.0),
        }
    }
}
