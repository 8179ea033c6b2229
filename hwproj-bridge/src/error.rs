// Copyright 2025 Kore Ledger, SL
// SPDX-License-Identifier: AGPL-3.0-or-later

//! # Error module.
//!

use thiserror::Error;

/// Error type.
#[derive(Error, Debug, Clone)]
pub enum Error {
    /// Settings could not be loaded.
    #[error("Settings error: {0}")]
    Settings(String),
    /// Prometheus endpoint error.
    #[error("Prometheus error: {0}")]
    Prometheus(String),
    /// HTTP server error.
    #[error("Server error: {0}")]
    Server(String),
}
