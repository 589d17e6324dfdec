//! Common infrastructure for FreeBSD rc.conf network configuration.
//!
//! This crate provides the shared pieces used by the manager crates:
//!
//! - [`shell`]: Safe shell command execution with proper quoting, plus the
//!   [`CommandRunner`] collaborator trait
//! - [`sysrc`]: The rc.conf key/value store adapter ([`SysrcStore`])
//! - [`error`]: Error types for configuration operations
//! - [`settings`]: Loosely-typed field/value settings bags
//!
//! # Architecture
//!
//! Managers follow this pattern:
//!
//! 1. Validate caller-supplied settings into typed configuration
//! 2. Format rc.conf lines (pure, testable without side effects)
//! 3. Persist lines through the [`SysrcStore`] adapter
//! 4. Invoke OS commands (`ifconfig`, `/etc/rc.d/netif`) to apply them
//!
//! Both collaborators are injected as trait objects, so tests swap in
//! capture mocks and in-memory stores.

pub mod error;
pub mod settings;
pub mod shell;
pub mod sysrc;

// Re-export commonly used items at crate root
pub use error::{NetCfgError, NetCfgResult};
pub use settings::{FieldValue, FieldValues, FieldValuesExt};
pub use shell::{CommandRunner, ExecResult, ShellRunner};
pub use sysrc::{Sysrc, SysrcStore};
