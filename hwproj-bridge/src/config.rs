// Copyright 2025 Kore Ledger, SL
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct Config {
    /// TcpListener from prometheus axum server. Empty disables it.
    pub prometheus: String,
    /// Logging parameters.
    pub logging: Logging,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Logging {
    pub output: LoggingOutput,
    /// Directory of the log file.
    pub file_path: String,
    pub rotation: LoggingRotation,
    /// Bytes, only used with `LoggingRotation::Size`.
    pub max_size: usize,
    /// Rotated files to keep.
    pub max_files: usize,
    /// Default `EnvFilter` directive when `RUST_LOG` is not set.
    pub level: String,
}

impl Logging {
    /// Whether any output is enabled.
    pub fn logs(&self) -> bool {
        self.output.stdout || self.output.file
    }
}

impl Default for Logging {
    fn default() -> Self {
        Self {
            output: LoggingOutput::default(),
            file_path: "logs".to_owned(),
            rotation: LoggingRotation::Size,
            max_size: 100 * 1024 * 1024,
            max_files: 3,
            level: "info".to_owned(),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct LoggingOutput {
    pub stdout: bool,
    pub file: bool,
}

impl Default for LoggingOutput {
    fn default() -> Self {
        Self {
            stdout: true,
            file: false,
        }
    }
}

impl FromStr for LoggingOutput {
    type Err = String;

    /// Comma separated outputs, e.g. `"stdout,file"`. `"none"` disables
    /// logging.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut output = LoggingOutput {
            stdout: false,
            file: false,
        };

        for value in s.split(',').map(str::trim).filter(|x| !x.is_empty()) {
            match value.to_lowercase().as_str() {
                "stdout" => output.stdout = true,
                "file" => output.file = true,
                "none" => {}
                other => {
                    return Err(format!("Invalid logging output: {}", other));
                }
            }
        }

        Ok(output)
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LoggingRotation {
    Size,
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Yearly,
    Never,
}

impl FromStr for LoggingRotation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "size" => Ok(LoggingRotation::Size),
            "hourly" => Ok(LoggingRotation::Hourly),
            "daily" => Ok(LoggingRotation::Daily),
            "weekly" => Ok(LoggingRotation::Weekly),
            "monthly" => Ok(LoggingRotation::Monthly),
            "yearly" => Ok(LoggingRotation::Yearly),
            "never" => Ok(LoggingRotation::Never),
            other => Err(format!("Invalid logging rotation: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logging_output_from_str() {
        let output = LoggingOutput::from_str("stdout, file").unwrap();
        assert!(output.stdout && output.file);

        let output = LoggingOutput::from_str("FILE").unwrap();
        assert!(!output.stdout && output.file);

        let output = LoggingOutput::from_str("none").unwrap();
        assert!(!output.stdout && !output.file);

        assert!(LoggingOutput::from_str("syslog").is_err());
    }

    #[test]
    fn test_logging_rotation_from_str() {
        assert_eq!(
            LoggingRotation::from_str("Daily").unwrap(),
            LoggingRotation::Daily
        );
        assert!(LoggingRotation::from_str("fortnightly").is_err());
    }

    #[test]
    fn test_logs_disabled_without_output() {
        let mut logging = Logging::default();
        assert!(logging.logs());

        logging.output = LoggingOutput::from_str("none").unwrap();
        assert!(!logging.logs());
    }
}
