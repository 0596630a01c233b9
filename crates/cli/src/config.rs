//! CLI configuration: file and environment, then command-line overrides

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use stockroom_core::ClientConfig;

/// Values given on the command line, which beat every other source
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub base_url: Option<String>,
    pub data_dir: Option<PathBuf>,
}

/// Load the client configuration. A missing base URL is fatal.
pub fn load_config(file: Option<&Path>, overrides: Overrides) -> Result<ClientConfig> {
    let config = ClientConfig::read(file).context("Failed to load configuration")?;
    apply_overrides(config, overrides)
}

fn apply_overrides(mut config: ClientConfig, overrides: Overrides) -> Result<ClientConfig> {
    if let Some(base_url) = overrides.base_url {
        config.api.base_url = Some(base_url);
    }
    if let Some(data_dir) = overrides.data_dir {
        config.data_dir = data_dir;
    }

    Ok(config.validate()?)
}
