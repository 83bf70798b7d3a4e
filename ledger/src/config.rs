//! Ledger configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tally_types::{Address, BlockNumber, Multiplier, DENOMINATOR};

use crate::error::LedgerError;
use crate::snapshot::DEFAULT_SNAPSHOT_LAG;

/// Configuration for a new [`Ledger`](crate::Ledger).
///
/// Can be loaded from a TOML file via [`LedgerConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// The administrator: the only address allowed to grant capabilities.
    pub admin: Address,

    /// Starting cumulative multiplier, fixed point with denominator 10^18.
    /// TOML integers are signed 64-bit, which caps this at about 9.2x.
    #[serde(default = "default_initial_multiplier")]
    pub initial_multiplier: u64,

    /// How many blocks behind the current block a new snapshot boundary sits.
    #[serde(default = "default_snapshot_lag")]
    pub snapshot_lag: u64,

    /// The block the ledger starts producing.
    #[serde(default = "default_start_block")]
    pub start_block: BlockNumber,

    #[serde(default)]
    pub minters: Vec<Address>,

    #[serde(default)]
    pub burners: Vec<Address>,

    #[serde(default)]
    pub rebasers: Vec<Address>,

    #[serde(default)]
    pub snapshotters: Vec<Address>,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_initial_multiplier() -> u64 {
    DENOMINATOR as u64
}

fn default_snapshot_lag() -> u64 {
    DEFAULT_SNAPSHOT_LAG
}

fn default_start_block() -> BlockNumber {
    1
}

// ── Impl ───────────────────────────────────────────────────────────────

impl LedgerConfig {
    /// A config with defaults for everything except the administrator.
    pub fn with_admin(admin: Address) -> Self {
        Self {
            admin,
            initial_multiplier: default_initial_multiplier(),
            snapshot_lag: default_snapshot_lag(),
            start_block: default_start_block(),
            minters: Vec::new(),
            burners: Vec::new(),
            rebasers: Vec::new(),
            snapshotters: Vec::new(),
        }
    }

    pub fn multiplier(&self) -> Result<Multiplier, LedgerError> {
        Multiplier::new(u128::from(self.initial_multiplier))
            .map_err(|_| LedgerError::Config("initial_multiplier must be non-zero".into()))
    }

    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, LedgerError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| LedgerError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, LedgerError> {
        let config: Self = toml::from_str(s).map_err(|e| LedgerError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, LedgerError> {
        toml::to_string_pretty(self).map_err(|e| LedgerError::Config(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), LedgerError> {
        if self.admin.is_zero() {
            return Err(LedgerError::Config("admin must be a non-zero address".into()));
        }
        self.multiplier()?;
        Ok(())
    }
}
