//! rc.conf line builders and parsers
//!
//! Pure formatting of interface and route declarations into rc.conf
//! key/value entries. The rendered text must stay bit-exact to what the
//! boot scripts parse:
//!
//! - `ifconfig_<major>_alias<minor>="inet <ipaddr> netmask <netmask>"`
//! - `ifconfig_<major>="inet <ipaddr> <peer_inner_addr> netmask <netmask>
//!   tunnel <tunnel_addr> <tunnel_peer>"` plus `cloned_interfaces="<major>"`
//! - `route_<name>="<ipaddr> <gateway> <netmask>"`
//! - `static_routes+=" <name>:<iface> ..."`

use std::fmt;

use rcnet_common::{NetCfgError, NetCfgResult};

use crate::types::{IfaceKind, IfaceName, InterfaceConfig, RouteSpec};

/// rc.conf key listing the configured static route names.
pub const STATIC_ROUTES_KEY: &str = "static_routes";

/// Key prefix for per-route entries.
pub const ROUTE_KEY_PREFIX: &str = "route_";

/// rc.conf key listing interfaces cloned at boot.
pub const CLONED_INTERFACES_KEY: &str = "cloned_interfaces";

/// Key prefix for interface entries.
pub const IFCONFIG_KEY_PREFIX: &str = "ifconfig_";

/// rc.conf key for the system hostname.
pub const HOSTNAME_KEY: &str = "hostname";

/// Sentinel value meaning "no routes configured".
pub const NO_ROUTES: &str = "NO";

/// One rc.conf key/value entry.
///
/// Rendered as `key="value"`, or `key+="value"` for append assignments;
/// the rendered form is also what gets handed to sysrc.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigLine {
    /// The rc.conf variable name.
    pub key: String,
    /// The value, without surrounding quotes.
    pub value: String,
    /// Whether this is an append (`+=`) assignment.
    pub append: bool,
}

impl ConfigLine {
    /// Creates a plain `key="value"` assignment.
    pub fn set(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            append: false,
        }
    }

    /// Creates an appending `key+="value"` assignment.
    pub fn append(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            append: true,
        }
    }

    /// Renders the line in rc.conf syntax.
    pub fn render(&self) -> String {
        if self.append {
            format!("{}+=\"{}\"", self.key, self.value)
        } else {
            format!("{}=\"{}\"", self.key, self.value)
        }
    }
}

impl fmt::Display for ConfigLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Builds the primary interface line for a configuration.
///
/// Alias interfaces require a minor number; the key would be meaningless
/// without one.
pub fn build_iface_line(name: &IfaceName, cfg: &InterfaceConfig) -> NetCfgResult<ConfigLine> {
    match &cfg.kind {
        IfaceKind::Alias => {
            let minor = name.minor.as_deref().ok_or_else(|| {
                NetCfgError::invalid_config(
                    "iface",
                    format!("alias interface {} has no minor number", name.major),
                )
            })?;
            Ok(ConfigLine::set(
                format!("{}{}_alias{}", IFCONFIG_KEY_PREFIX, name.major, minor),
                format!("inet {} netmask {}", cfg.ipaddr, cfg.netmask),
            ))
        }
        IfaceKind::Gre(gre) => Ok(ConfigLine::set(
            format!("{}{}", IFCONFIG_KEY_PREFIX, name.major),
            format!(
                "inet {} {} netmask {} tunnel {} {}",
                cfg.ipaddr, gre.peer_inner_addr, cfg.netmask, gre.tunnel_addr, gre.tunnel_peer
            ),
        )),
    }
}

/// Builds the cloned-interfaces line for a boot-cloned device.
pub fn build_cloned_line(major: &str) -> ConfigLine {
    ConfigLine::set(CLONED_INTERFACES_KEY, major)
}

/// Builds the per-route line: `route_<name>="<ipaddr> <gateway> <netmask>"`.
pub fn build_route_line(route: &RouteSpec) -> ConfigLine {
    ConfigLine::set(
        format!("{}{}", ROUTE_KEY_PREFIX, route.name),
        format!("{} {} {}", route.ipaddr, route.gateway, route.netmask),
    )
}

/// Builds the aggregate static_routes line from `<name>:<iface>` entries.
///
/// Each entry is prefixed with a space, matching the append syntax the
/// boot scripts accumulate.
pub fn build_static_routes_line<I, S>(entries: I) -> ConfigLine
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut value = String::new();
    for entry in entries {
        value.push(' ');
        value.push_str(entry.as_ref());
    }
    ConfigLine::append(STATIC_ROUTES_KEY, value)
}
