// Copyright 2025 Kore Ledger, SL
// SPDX-License-Identifier: AGPL-3.0-or-later

use clap::Parser;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Path to the file containing the settings you want to use, if not specified, the path of the environment variable 'HWPROJ_FILE_PATH' will be used.
    #[arg(short, long, default_value_t = String::default())]
    pub file_path: String,

    /// Bulean to indicate whether you want to use the environment variables as a configuration (file_path compatible)
    #[arg(short, long, default_value_t = true)]
    pub env_config: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_defaults() {
        let args = Args::parse_from(["hwproj-http"]);
        assert!(args.file_path.is_empty());
        assert!(args.env_config);
    }

    #[test]
    fn test_args_file_path() {
        let args = Args::parse_from(["hwproj-http", "-f", "settings.toml"]);
        assert_eq!(args.file_path, "settings.toml");
    }
}
