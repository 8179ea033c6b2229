// Copyright 2025 Kore Ledger, SL
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::env;

use config::Config;
use params::Params;
use tracing::error;

pub mod command;
use crate::{config::Config as BridgeConfig, error::Error};
mod params;

const TARGET_SETTINGS: &str = "Hwproj-Bridge-Settings";

/// Builds the configuration from the environment (when `env` is set) and
/// from `file` (json, yaml or toml, ignored when empty). File values that
/// differ from the defaults take precedence.
pub fn build_config(env: bool, file: &str) -> Result<BridgeConfig, Error> {
    // Env configuration
    let mut params_env = Params::default();
    if env {
        params_env = Params::from_env()?;
    }

    // file configuration (json, yaml or toml)
    let mut params_file = Params::default();
    if !file.is_empty() {
        let config = Config::builder()
            .add_source(config::File::with_name(file))
            .build()
            .map_err(|e| {
                error!(target: TARGET_SETTINGS, "Error building config: {}", e);
                Error::Settings(e.to_string())
            })?;

        params_file = config.try_deserialize().map_err(|e| {
            error!(
                target: TARGET_SETTINGS,
                "Error try deserialize config: {}", e
            );
            Error::Settings(e.to_string())
        })?;
    }

    // Mix configurations.
    BridgeConfig::try_from(params_env.mix_config(params_file))
}

pub fn build_file_path() -> String {
    env::var("HWPROJ_FILE_PATH").unwrap_or_default()
}
