//! Error types for rc.conf configuration operations.
//!
//! All errors implement `std::error::Error` via `thiserror`. Two of the
//! variants correspond to the caller-visible failure classes:
//! [`NetCfgError::InvalidConfig`] for bad or missing caller input, and
//! [`NetCfgError::Store`] for unexpected output or status from sysrc.

use std::io;
use thiserror::Error;

/// Result type alias for configuration operations.
pub type NetCfgResult<T> = Result<T, NetCfgError>;

/// Errors that can occur while building or applying network configuration.
#[derive(Debug, Error)]
pub enum NetCfgError {
    /// Failed to execute a shell command (spawn error).
    #[error("Failed to execute shell command '{command}': {source}")]
    ShellExec {
        /// The command that failed to execute.
        command: String,
        /// The underlying IO error.
        #[source]
        source: io::Error,
    },

    /// Shell command returned non-zero exit code.
    #[error("Shell command failed: '{command}' (exit code {exit_code}): {output}")]
    ShellCommandFailed {
        /// The command that failed.
        command: String,
        /// The exit code.
        exit_code: i32,
        /// Combined stdout/stderr output.
        output: String,
    },

    /// Configuration validation error (bad or missing caller input).
    #[error("Invalid configuration for {field}: {message}")]
    InvalidConfig {
        /// The field or setting that failed validation.
        field: String,
        /// Error message.
        message: String,
    },

    /// Unexpected status or malformed output from the sysrc store.
    #[error("sysrc store error for '{key}': {message}")]
    Store {
        /// The rc.conf key involved.
        key: String,
        /// Error message.
        message: String,
    },
}

impl NetCfgError {
    /// Creates an invalid configuration error.
    pub fn invalid_config(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Creates a store error.
    pub fn store(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Store {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Returns true if this error was caused by caller input rather than
    /// the system the configuration is being applied to.
    pub fn is_validation(&self) -> bool {
        matches!(self, NetCfgError::InvalidConfig { .. })
    }
}
