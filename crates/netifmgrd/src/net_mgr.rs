//! Network interface manager - core implementation

use std::collections::HashSet;
use std::sync::Arc;

use rcnet_common::shell::{HOSTNAME_CMD, IFCONFIG_CMD, NETIF_CMD, NETSTART_CMD};
use rcnet_common::sysrc::parse_read_output;
use rcnet_common::{
    shell, CommandRunner, ExecResult, NetCfgError, NetCfgResult, ShellRunner, Sysrc, SysrcStore,
};
use tracing::{info, warn};

use crate::rcconf::{self, ConfigLine, ROUTE_KEY_PREFIX, STATIC_ROUTES_KEY};
use crate::types::{ApplySettings, IfaceKind, IfaceName, InterfaceConfig, RouteSpec};

/// Network interface manager.
///
/// Translates interface and static-route declarations into rc.conf
/// entries persisted through the sysrc store, and drives interface
/// lifecycle through the command runner. Both collaborators are injected;
/// tests substitute capture mocks.
///
/// Operations are synchronous from the caller's point of view and do not
/// lock the store; callers configuring the same keys must serialize.
pub struct NetIfMgr {
    store: Arc<dyn SysrcStore>,
    runner: Arc<dyn CommandRunner>,
}

impl NetIfMgr {
    /// Creates a manager with explicit collaborators.
    pub fn new(store: Arc<dyn SysrcStore>, runner: Arc<dyn CommandRunner>) -> Self {
        Self { store, runner }
    }

    /// Creates a manager bound to the real sysrc utility and shell.
    pub fn with_system_defaults() -> Self {
        Self::new(Arc::new(Sysrc), Arc::new(ShellRunner))
    }

    /// Builds the rc.conf entries for a network interface.
    ///
    /// Returns the formatted lines in all cases so callers can diff
    /// expected output; unless `dry_run` is set they are also persisted,
    /// primary line first, then the cloned-interfaces line for GRE.
    pub async fn build_interface(
        &self,
        iface: &str,
        config: &InterfaceConfig,
    ) -> NetCfgResult<Vec<ConfigLine>> {
        let name = IfaceName::parse(iface);

        let mut lines = vec![rcconf::build_iface_line(&name, config)?];
        if matches!(config.kind, IfaceKind::Gre(_)) {
            lines.push(rcconf::build_cloned_line(&name.major));
        }

        if config.dry_run {
            return Ok(lines);
        }

        for line in &lines {
            self.persist(line).await?;
        }
        info!(
            iface = %name.major,
            kind = config.kind.name(),
            "Interface configuration written"
        );
        Ok(lines)
    }

    /// Builds the rc.conf entries for a set of static routes on an
    /// interface.
    ///
    /// Route names must be pairwise distinct; a duplicate fails the whole
    /// call before anything is written. The returned lines carry the
    /// aggregate `static_routes` entry first; persistence writes the
    /// per-route entries first and the aggregate last. Persistence is not
    /// transactional past validation.
    pub async fn build_routes(
        &self,
        iface: &str,
        routes: &[RouteSpec],
        dry_run: bool,
    ) -> NetCfgResult<Vec<ConfigLine>> {
        let iface = iface.to_lowercase();
        if routes.is_empty() {
            return Err(NetCfgError::invalid_config(
                "routes",
                format!("no routes supplied for {}", iface),
            ));
        }

        let mut seen = HashSet::new();
        let mut entries = Vec::with_capacity(routes.len());
        let mut route_lines = Vec::with_capacity(routes.len());
        for route in routes {
            if !seen.insert(route.name.as_str()) {
                return Err(NetCfgError::invalid_config(
                    "routes",
                    format!("duplicate route {}", route.name),
                ));
            }
            entries.push(format!("{}:{}", route.name, iface));
            route_lines.push(rcconf::build_route_line(route));
        }
        let mut lines = vec![rcconf::build_static_routes_line(&entries)];
        lines.extend(route_lines);

        if dry_run {
            return Ok(lines);
        }

        // Route entries first, then the aggregate key.
        for line in &lines[1..] {
            self.persist(line).await?;
        }
        self.persist(&lines[0]).await?;
        info!(iface = %iface, count = routes.len(), "Static routes written");
        Ok(lines)
    }

    /// Reads back the static routes configured for an interface.
    ///
    /// Returns the filtered aggregate line followed by the matching
    /// per-route lines, or an empty sequence when `static_routes` is `NO`
    /// or empty.
    pub async fn get_routes(&self, iface: &str) -> NetCfgResult<Vec<ConfigLine>> {
        let res = self.store.run(STATIC_ROUTES_KEY).await?;
        if !res.success() {
            return Err(NetCfgError::store(
                STATIC_ROUTES_KEY,
                format!(
                    "unexpected exit code {}: {}",
                    res.exit_code,
                    res.combined_output()
                ),
            ));
        }
        let value = parse_read_output(&res.stdout, STATIC_ROUTES_KEY).ok_or_else(|| {
            NetCfgError::store(
                STATIC_ROUTES_KEY,
                format!("unexpected sysrc output '{}'", res.stdout),
            )
        })?;

        let routekeys: Vec<&str> = value.split_whitespace().collect();
        if routekeys.is_empty() || routekeys == [rcconf::NO_ROUTES] {
            return Ok(Vec::new());
        }

        let mut entries = Vec::new();
        let mut route_lines = Vec::new();
        for key in routekeys {
            let (name, route_iface) = match key.split_once(':') {
                Some((name, route_iface)) => (name, Some(route_iface)),
                None => (key, None),
            };
            let Some(route) = self.read_static_route(name).await? else {
                warn!(key = %key, "static_routes references an unset route variable, skipping");
                continue;
            };
            if route_iface != Some(iface) {
                continue;
            }
            entries.push(key.to_string());
            route_lines.push(rcconf::build_route_line(&route));
        }

        let mut lines = vec![rcconf::build_static_routes_line(&entries)];
        lines.extend(route_lines);
        Ok(lines)
    }

    /// Reads one `route_<name>` entry.
    ///
    /// Exit code 1 means the variable is not set (a dangling aggregate
    /// entry) and maps to `None`; any other failure or malformed output is
    /// a store error.
    async fn read_static_route(&self, name: &str) -> NetCfgResult<Option<RouteSpec>> {
        let syskey = format!("{}{}", ROUTE_KEY_PREFIX, name);
        let res = self.store.run(&syskey).await?;
        if res.exit_code == 1 {
            return Ok(None);
        }
        if !res.success() {
            return Err(NetCfgError::store(
                syskey,
                format!(
                    "failed to read route (exit code {}): {}",
                    res.exit_code,
                    res.combined_output()
                ),
            ));
        }
        let value = parse_read_output(&res.stdout, &syskey).ok_or_else(|| {
            NetCfgError::store(
                syskey.clone(),
                format!("unexpected sysrc output '{}'", res.stdout),
            )
        })?;
        RouteSpec::parse_value(name, value).map(Some)
    }

    /// Restarts the interface subsystem for the major device of `iface`.
    pub async fn up(&self, iface: &str) -> NetCfgResult<ExecResult> {
        let name = IfaceName::parse(iface);
        let cmd = format!("{} restart {}", NETIF_CMD, shell::shellquote(&name.major));
        self.runner.run(&cmd).await
    }

    /// Takes the major device of `iface` down.
    pub async fn down(&self, iface: &str) -> NetCfgResult<ExecResult> {
        let name = IfaceName::parse(iface);
        let cmd = format!("{} {} down", IFCONFIG_CMD, shell::shellquote(&name.major));
        self.runner.run(&cmd).await
    }

    /// Changes the running hostname and persists it to rc.conf.
    pub async fn set_hostname(&self, hostname: &str) -> NetCfgResult<()> {
        let cmd = format!("{} {}", HOSTNAME_CMD, shell::shellquote(hostname));
        let res = self.runner.run(&cmd).await?;
        if !res.success() {
            return Err(NetCfgError::ShellCommandFailed {
                command: cmd,
                exit_code: res.exit_code,
                output: res.combined_output(),
            });
        }
        self.persist(&ConfigLine::set(rcconf::HOSTNAME_KEY, hostname))
            .await?;
        info!(hostname = %hostname, "Hostname applied");
        Ok(())
    }

    /// Applies global network configuration.
    ///
    /// Returns the logical AND of the hostname step (true when not
    /// requested) and the restart/reboot step.
    pub async fn apply_network_settings(&self, settings: &ApplySettings) -> NetCfgResult<bool> {
        let hostname_res = if settings.apply_hostname {
            match &settings.hostname {
                Some(hostname) => match self.set_hostname(hostname).await {
                    Ok(()) => true,
                    Err(e) => {
                        warn!(error = %e, "Hostname change failed");
                        false
                    }
                },
                None => {
                    warn!("Hostname change requested but no hostname is defined");
                    false
                }
            }
        } else {
            true
        };

        let restart_res = if settings.require_reboot {
            warn!("Network configuration requires a reboot of the system to fully apply");
            true
        } else {
            let cmd = format!("{} restart", NETSTART_CMD);
            match self.runner.run(&cmd).await {
                Ok(res) => res.success(),
                Err(e) => {
                    warn!(error = %e, "Network restart failed");
                    false
                }
            }
        };

        Ok(hostname_res && restart_res)
    }

    /// Persists one line through the store, treating a non-zero sysrc
    /// exit as a store error.
    async fn persist(&self, line: &ConfigLine) -> NetCfgResult<()> {
        let res = self.store.run(&line.render()).await?;
        if !res.success() {
            return Err(NetCfgError::store(
                line.key.clone(),
                format!(
                    "sysrc write failed (exit code {}): {}",
                    res.exit_code,
                    res.combined_output()
                ),
            ));
        }
        Ok(())
    }
}
