// Copyright 2025 Kore Ledger, SL
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::str::FromStr;

use serde::Deserialize;
use tracing::error;

use crate::{
    config::{Config, Logging, LoggingOutput, LoggingRotation},
    error::Error,
};

const TARGET_PARAMS: &str = "Hwproj-Bridge-Params";

#[derive(Debug, Deserialize, Default)]
pub struct Params {
    #[serde(default)]
    hwproj: HwprojParams,
}

impl Params {
    pub fn from_env() -> Result<Self, Error> {
        Ok(Self {
            hwproj: HwprojParams::from_env("HWPROJ")?,
        })
    }

    /// Values of `other_config` that differ from the defaults win.
    pub fn mix_config(&self, other_config: Params) -> Self {
        Self {
            hwproj: self.hwproj.mix_config(other_config.hwproj),
        }
    }
}

impl TryFrom<Params> for Config {
    type Error = Error;

    fn try_from(params: Params) -> Result<Self, Self::Error> {
        let logging = params.hwproj.logging;

        let output =
            LoggingOutput::from_str(&logging.output).map_err(Error::Settings)?;
        let rotation = LoggingRotation::from_str(&logging.rotation)
            .map_err(Error::Settings)?;

        Ok(Self {
            prometheus: params.hwproj.prometheus,
            logging: Logging {
                output,
                file_path: logging.file_path,
                rotation,
                max_size: logging.max_size,
                max_files: logging.max_files,
                level: logging.level,
            },
        })
    }
}

fn build_source<T>(source: config::Environment) -> Result<T, Error>
where
    T: for<'de> Deserialize<'de>,
{
    let config = config::Config::builder()
        .add_source(source)
        .build()
        .map_err(|e| {
            error!(target: TARGET_PARAMS, "Error building config: {}", e);
            Error::Settings(e.to_string())
        })?;

    config.try_deserialize().map_err(|e| {
        error!(target: TARGET_PARAMS, "Error try deserialize config: {}", e);
        Error::Settings(e.to_string())
    })
}

#[derive(Debug, Deserialize, Default)]
struct HwprojParams {
    #[serde(default)]
    prometheus: String,
    #[serde(default)]
    logging: LoggingParams,
}

impl HwprojParams {
    fn from_env(parent: &str) -> Result<Self, Error> {
        let hwproj: HwprojParams =
            build_source(config::Environment::with_prefix(parent))?;

        Ok(Self {
            prometheus: hwproj.prometheus,
            logging: LoggingParams::from_env(&format!("{parent}_"))?,
        })
    }

    fn mix_config(&self, other_config: HwprojParams) -> Self {
        let prometheus = if !other_config.prometheus.is_empty() {
            other_config.prometheus
        } else {
            self.prometheus.clone()
        };

        Self {
            prometheus,
            logging: self.logging.mix_config(other_config.logging),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
struct LoggingParams {
    #[serde(default = "default_log_output")]
    output: String,
    #[serde(default = "default_log_file_path")]
    file_path: String,
    #[serde(default = "default_log_rotation")]
    rotation: String,
    #[serde(default = "default_log_max_size")]
    max_size: usize,
    #[serde(default = "default_log_max_files")]
    max_files: usize,
    #[serde(default = "default_log_level")]
    level: String,
}

fn default_log_output() -> String {
    "stdout".into()
}
fn default_log_file_path() -> String {
    "logs".into()
}
fn default_log_rotation() -> String {
    "size".into()
}
fn default_log_max_size() -> usize {
    100 * 1024 * 1024
}
fn default_log_max_files() -> usize {
    3
}
fn default_log_level() -> String {
    "info".into()
}

impl Default for LoggingParams {
    fn default() -> Self {
        LoggingParams {
            output: default_log_output(),
            file_path: default_log_file_path(),
            rotation: default_log_rotation(),
            max_size: default_log_max_size(),
            max_files: default_log_max_files(),
            level: default_log_level(),
        }
    }
}

impl LoggingParams {
    /// Reads `{parent}LOGGING_*` variables, e.g. `HWPROJ_LOGGING_OUTPUT`.
    fn from_env(parent: &str) -> Result<Self, Error> {
        build_source(
            config::Environment::with_prefix(&format!("{parent}LOGGING"))
                .try_parsing(true),
        )
    }

    fn mix_config(&self, other: LoggingParams) -> LoggingParams {
        LoggingParams {
            output: if other.output != default_log_output() {
                other.output
            } else {
                self.output.clone()
            },
            file_path: if other.file_path != default_log_file_path() {
                other.file_path
            } else {
                self.file_path.clone()
            },
            rotation: if other.rotation != default_log_rotation() {
                other.rotation
            } else {
                self.rotation.clone()
            },
            max_size: if other.max_size != default_log_max_size() {
                other.max_size
            } else {
                self.max_size
            },
            max_files: if other.max_files != default_log_max_files() {
                other.max_files
            } else {
                self.max_files
            },
            level: if other.level != default_log_level() {
                other.level
            } else {
                self.level.clone()
            },
        }
    }
}
