use std::path::PathBuf;

use anyhow::{Context, Result};
use sbmigrate_core::MigratorSelection;
use sbmigrate_shared::{
    loader::Loader, persistor::toml_persistor, scope::Scope, upgrader::NoUpgrader,
    version::Versioned,
};
use serde::{Deserialize, Serialize};

pub const CONFIG_VERSION: usize = 1;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct CliConfig {
    pub version: usize,
    /// Skip the confirmation prompt.
    pub assume_yes: bool,
    /// `tracing` filter used when `SBMIGRATE_LOG` is unset.
    pub log_filter: String,
    pub migrators: MigratorSelection,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            assume_yes: false,
            log_filter: "info".to_owned(),
            migrators: MigratorSelection::default(),
        }
    }
}

impl Versioned for CliConfig {
    #[inline(always)]
    fn version(&self) -> usize {
        self.version
    }
}

/// `--config` if given, otherwise `<config dir>/.sbmigrate/config.toml`.
pub fn config_path(explicit: Option<PathBuf>) -> Result<PathBuf> {
    match explicit {
        Some(path) => Ok(path),
        None => Scope::Config.get_full_path("config", Some("toml")),
    }
}

pub fn load(explicit: Option<PathBuf>) -> Result<CliConfig> {
    let path = config_path(explicit)?;
    let loader = Loader::load(NoUpgrader, toml_persistor::<CliConfig>(&path), CONFIG_VERSION)
        .with_context(|| format!("load config `{}` failed", path.display()))?;
    Ok(loader.into_inner())
}
