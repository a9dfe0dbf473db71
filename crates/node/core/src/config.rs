//! Figment-based configuration loading.
//!
//! Configuration priority (highest wins):
//! 1. CLI arguments
//! 2. Config file (TOML)
//! 3. Environment variables (`STAKER_` prefix)
//! 4. Defaults

use std::path::Path;

use eyre::{Result, WrapErr};
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

use crate::{args::LedgerArgs, constants::ENV_PREFIX};

/// Complete client configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StakerConfig {
    /// Ledger connection.
    pub ledger: LedgerArgs,
}

impl StakerConfig {
    /// Load configuration from defaults, environment and config file, then
    /// apply the flags given on the command line.
    pub fn load(config_path: Option<&Path>, cli: &LedgerArgs) -> Result<Self> {
        Self::figment(config_path, cli)
            .extract()
            .wrap_err("Failed to load configuration")
    }

    fn figment(config_path: Option<&Path>, cli: &LedgerArgs) -> Figment {
        let mut figment = Figment::new()
            .merge(Serialized::defaults(Self::default()))
            .merge(Env::prefixed(ENV_PREFIX).split("_"));

        if let Some(path) = config_path
            && path.exists()
        {
            figment = figment.merge(Toml::file(path));
        }

        figment.merge(Serialized::default("ledger", cli))
    }
}
