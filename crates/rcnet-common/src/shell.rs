//! Shell command execution for network configuration.
//!
//! Provides safe shell command execution with proper quoting to prevent
//! command injection, plus the [`CommandRunner`] trait used to inject the
//! command collaborator into managers (real shell in production, a capture
//! mock in tests).

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use std::process::Stdio;
use tokio::process::Command;

use crate::error::{NetCfgError, NetCfgResult};

/// Path to the `sysrc` utility for rc.conf key management.
pub const SYSRC_CMD: &str = "/usr/sbin/sysrc";

/// Path to the `ifconfig` command.
pub const IFCONFIG_CMD: &str = "/sbin/ifconfig";

/// Path to the netif rc script for interface subsystem restarts.
pub const NETIF_CMD: &str = "/etc/rc.d/netif";

/// Path to the netstart script for full network restarts.
pub const NETSTART_CMD: &str = "/etc/netstart";

/// Path to the `hostname` command.
pub const HOSTNAME_CMD: &str = "/bin/hostname";

/// Regex for characters that need escaping in shell double-quotes.
/// Matches: $, `, ", \, and newline
static SHELL_ESCAPE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"([$`"\\\n])"#).expect("Invalid regex pattern"));

/// Quotes a string for safe use in shell commands.
///
/// Wraps the string in double quotes and escapes the characters that have
/// special meaning inside double quotes: `$`, `` ` ``, `"`, `\` and newline.
///
/// # Example
///
/// ```
/// use rcnet_common::shell::shellquote;
///
/// assert_eq!(shellquote("em0"), "\"em0\"");
/// assert_eq!(shellquote("with$var"), "\"with\\$var\"");
/// ```
pub fn shellquote(s: &str) -> String {
    let escaped = SHELL_ESCAPE_RE.replace_all(s, r"\$1");
    format!("\"{}\"", escaped)
}

/// Result of a shell command execution.
#[derive(Debug, Clone)]
pub struct ExecResult {
    /// The exit code of the command (0 = success).
    pub exit_code: i32,
    /// The trimmed stdout output.
    pub stdout: String,
    /// The trimmed stderr output.
    pub stderr: String,
}

impl ExecResult {
    /// Returns true if the command succeeded (exit code 0).
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// Returns the combined output (stdout + stderr) for error messages.
    pub fn combined_output(&self) -> String {
        if self.stderr.is_empty() {
            self.stdout.clone()
        } else if self.stdout.is_empty() {
            self.stderr.clone()
        } else {
            format!("{}\n{}", self.stdout, self.stderr)
        }
    }
}

/// Executes a shell command asynchronously.
///
/// Runs the command through `/bin/sh -c`; a non-zero exit code is reported
/// inside the returned [`ExecResult`], not as an error. Only a spawn
/// failure is an `Err`.
pub async fn exec(cmd: &str) -> NetCfgResult<ExecResult> {
    tracing::debug!(command = %cmd, "Executing shell command");

    let output = Command::new("/bin/sh")
        .arg("-c")
        .arg(cmd)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await
        .map_err(|e| NetCfgError::ShellExec {
            command: cmd.to_string(),
            source: e,
        })?;

    let exit_code = output.status.code().unwrap_or(-1);
    let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();

    let result = ExecResult {
        exit_code,
        stdout,
        stderr,
    };

    if result.success() {
        tracing::trace!(command = %cmd, "Command succeeded");
    } else {
        tracing::warn!(
            command = %cmd,
            exit_code = exit_code,
            stderr = %result.stderr,
            "Command failed"
        );
    }

    Ok(result)
}

/// Executes a shell command and returns an error on non-zero exit.
pub async fn exec_or_throw(cmd: &str) -> NetCfgResult<String> {
    let result = exec(cmd).await?;
    if result.success() {
        Ok(result.stdout)
    } else {
        Err(NetCfgError::ShellCommandFailed {
            command: cmd.to_string(),
            exit_code: result.exit_code,
            output: result.combined_output(),
        })
    }
}

/// Command execution collaborator.
///
/// Managers hold this as a trait object so tests can substitute a capture
/// mock for the real shell.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Runs a command line and returns its result.
    async fn run(&self, cmd: &str) -> NetCfgResult<ExecResult>;
}

/// The real command runner, dispatching through `/bin/sh`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ShellRunner;

#[async_trait]
impl CommandRunner for ShellRunner {
    async fn run(&self, cmd: &str) -> NetCfgResult<ExecResult> {
        exec(cmd).await
    }
}
