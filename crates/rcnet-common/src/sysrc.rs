//! Key/value store adapter for `sysrc(8)`.
//!
//! rc.conf is a flat key/value file; `sysrc` is the system utility that
//! reads and writes named keys in it. The adapter takes either a bare key
//! (read) or a `key="value"` assignment (write) and returns the raw
//! command result. Last write wins; no uniqueness is enforced beyond what
//! rc.conf itself guarantees.

use async_trait::async_trait;

use crate::error::NetCfgResult;
use crate::shell::{self, ExecResult, SYSRC_CMD};

/// The sysrc store collaborator.
///
/// Held as a trait object by managers so tests can substitute an
/// in-memory store.
#[async_trait]
pub trait SysrcStore: Send + Sync {
    /// Runs sysrc against a key (read) or `key=value` assignment (write).
    ///
    /// Reads print `key: value` on stdout with exit code 0, or exit code 1
    /// when the key is not set. Writes print the old and new value.
    async fn run(&self, key_or_assignment: &str) -> NetCfgResult<ExecResult>;
}

/// The real store, invoking `/usr/sbin/sysrc` against `/etc/rc.conf`.
#[derive(Debug, Default, Clone, Copy)]
pub struct Sysrc;

#[async_trait]
impl SysrcStore for Sysrc {
    async fn run(&self, key_or_assignment: &str) -> NetCfgResult<ExecResult> {
        let cmd = format!("{} {}", SYSRC_CMD, key_or_assignment);
        shell::exec(&cmd).await
    }
}

/// Splits a sysrc read output `key: value` into its value part.
///
/// Returns `None` when the output is not prefixed with the expected key.
pub fn parse_read_output<'a>(output: &'a str, key: &str) -> Option<&'a str> {
    let rest = output.strip_prefix(key)?;
    let rest = rest.strip_prefix(':')?;
    Some(rest.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_read_output() {
        assert_eq!(
            parse_read_output("static_routes: r1:em0 r2:em0", "static_routes"),
            Some("r1:em0 r2:em0")
        );
        assert_eq!(
            parse_read_output("route_r1: 192.168.1.0 192.168.1.1 255.255.255.0", "route_r1"),
            Some("192.168.1.0 192.168.1.1 255.255.255.0")
        );
    }

    #[test]
    fn test_parse_read_output_no_value() {
        assert_eq!(parse_read_output("static_routes: NO", "static_routes"), Some("NO"));
        assert_eq!(parse_read_output("static_routes:", "static_routes"), Some(""));
    }

    #[test]
    fn test_parse_read_output_wrong_key() {
        assert_eq!(parse_read_output("hostname: gw0", "static_routes"), None);
        assert_eq!(parse_read_output("garbage", "static_routes"), None);
    }
}
